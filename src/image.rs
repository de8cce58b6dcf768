//! Color metadata, chroma subsampling modes, and decode reports

use crate::error::{Error, Result};
use whereat::at;

/// Chroma subsampling requested for an encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// 4:0:0 - luma only
    Monochrome,
    /// 4:2:0 - chroma is half resolution in both dimensions
    #[default]
    Cs420,
    /// 4:2:2 - chroma is half resolution horizontally
    Cs422,
    /// 4:4:4 - no chroma subsampling
    Cs444,
    /// RGB stored through the identity matrix, always 4:4:4
    Identity,
}

impl ChromaSubsampling {
    /// Host-side code for this mode
    pub const fn code(self) -> i32 {
        match self {
            ChromaSubsampling::Monochrome => 0,
            ChromaSubsampling::Cs420 => 1,
            ChromaSubsampling::Cs422 => 2,
            ChromaSubsampling::Cs444 => 3,
            ChromaSubsampling::Identity => 4,
        }
    }

    /// Whether chroma is stored at full resolution
    pub const fn is_full_chroma(self) -> bool {
        matches!(self, ChromaSubsampling::Cs444 | ChromaSubsampling::Identity)
    }
}

impl TryFrom<i32> for ChromaSubsampling {
    type Error = whereat::At<Error>;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ChromaSubsampling::Monochrome),
            1 => Ok(ChromaSubsampling::Cs420),
            2 => Ok(ChromaSubsampling::Cs422),
            3 => Ok(ChromaSubsampling::Cs444),
            4 => Ok(ChromaSubsampling::Identity),
            other => Err(at(Error::UnknownYuvFormat(other))),
        }
    }
}

/// Color primaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPrimaries(pub u8);

impl ColorPrimaries {
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const BT470M: Self = Self(4);
    pub const BT470BG: Self = Self(5);
    pub const BT601: Self = Self(6);
    pub const SMPTE240: Self = Self(7);
    pub const FILM: Self = Self(8);
    pub const BT2020: Self = Self(9);
    pub const XYZ: Self = Self(10);
    pub const SMPTE431: Self = Self(11);
    pub const SMPTE432: Self = Self(12);
    pub const EBU3213: Self = Self(22);
}

/// Transfer characteristics (gamma curve)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferCharacteristics(pub u8);

impl TransferCharacteristics {
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const BT601: Self = Self(6);
    pub const LINEAR: Self = Self(8);
    pub const SRGB: Self = Self(13);
    pub const SMPTE2084: Self = Self(16);
    pub const HLG: Self = Self(18);
}

/// Matrix coefficients for RGB <-> YUV conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixCoefficients(pub u8);

impl MatrixCoefficients {
    pub const IDENTITY: Self = Self(0);
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const FCC: Self = Self(4);
    pub const BT470BG: Self = Self(5);
    pub const BT601: Self = Self(6);
    pub const SMPTE240: Self = Self(7);
    pub const YCGCO: Self = Self(8);
    pub const BT2020_NCL: Self = Self(9);
    pub const BT2020_CL: Self = Self(10);
    pub const SMPTE2085: Self = Self(11);
    pub const CHROMAT_NCL: Self = Self(12);
    pub const CHROMAT_CL: Self = Self(13);
    pub const ICTCP: Self = Self(14);
}

/// Color range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRange {
    /// Limited/studio range (Y: 16-235, UV: 16-240 for 8-bit)
    #[default]
    Limited,
    /// Full range (0-255 for 8-bit)
    Full,
}

/// CICP color description driving coefficient selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConversionInfo {
    /// Color primaries
    pub color_primaries: ColorPrimaries,
    /// Transfer characteristics
    pub transfer_characteristics: TransferCharacteristics,
    /// Matrix coefficients
    pub matrix_coefficients: MatrixCoefficients,
}

impl Default for ColorConversionInfo {
    /// sRGB stored with BT.601 coefficients
    fn default() -> Self {
        Self {
            color_primaries: ColorPrimaries::BT709,
            transfer_characteristics: TransferCharacteristics::SRGB,
            matrix_coefficients: MatrixCoefficients::BT601,
        }
    }
}

impl ColorConversionInfo {
    /// Color info with the given matrix and sRGB primaries/transfer
    pub fn with_matrix(matrix_coefficients: MatrixCoefficients) -> Self {
        Self {
            matrix_coefficients,
            ..Self::default()
        }
    }

    /// Nothing known about the content
    pub const fn unspecified() -> Self {
        Self {
            color_primaries: ColorPrimaries::UNKNOWN,
            transfer_characteristics: TransferCharacteristics::UNKNOWN,
            matrix_coefficients: MatrixCoefficients::UNKNOWN,
        }
    }
}

/// Properties of a decoded frame, reported by every decompression call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Bit depth of the decoded planes
    pub bit_depth: u8,
    /// Chroma layout of the frame
    pub chroma_subsampling: ChromaSubsampling,
    /// Range of the decoded samples
    pub color_range: ColorRange,
    /// Color description used for reconstruction
    pub color_info: ColorConversionInfo,
}

impl Default for DecodeInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            bit_depth: 8,
            chroma_subsampling: ChromaSubsampling::Cs420,
            color_range: ColorRange::Full,
            color_info: ColorConversionInfo::unspecified(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsampling_codes_roundtrip() {
        for mode in [
            ChromaSubsampling::Monochrome,
            ChromaSubsampling::Cs420,
            ChromaSubsampling::Cs422,
            ChromaSubsampling::Cs444,
            ChromaSubsampling::Identity,
        ] {
            assert_eq!(ChromaSubsampling::try_from(mode.code()).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_subsampling_code_is_rejected() {
        let err = ChromaSubsampling::try_from(7).unwrap_err().into_inner();
        assert!(matches!(err, Error::UnknownYuvFormat(7)));
        assert!(ChromaSubsampling::try_from(-1).is_err());
    }
}
