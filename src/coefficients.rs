//! RGB <-> YUV mixing coefficients
//!
//! References:
//! - ITU-T H.273 (coding-independent code points)
//! - ITU-R BT.601, BT.709, BT.2020

use crate::error::{Error, Result};
use crate::image::{ColorConversionInfo, ColorPrimaries, MatrixCoefficients};
use whereat::at;

/// Luma weights for R, G, and B
///
/// `kg` is always `1 - kr - kb`. The identity matrix is represented by
/// `kr = kb = 0`, `kg = 1`, and converters store G/B/R in Y/U/V directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YuvCoefficients {
    pub kr: f32,
    pub kg: f32,
    pub kb: f32,
}

impl YuvCoefficients {
    /// RGB stored unchanged (matrix coefficients 0)
    pub const IDENTITY: Self = Self {
        kr: 0.0,
        kg: 1.0,
        kb: 0.0,
    };

    /// Build from the red and blue weights
    pub const fn from_kr_kb(kr: f32, kb: f32) -> Self {
        Self {
            kr,
            kg: 1.0 - kr - kb,
            kb,
        }
    }

    /// Whether planes carry G/B/R rather than luma and color differences
    pub fn is_identity(&self) -> bool {
        self.kr == 0.0 && self.kb == 0.0
    }
}

/// (kr, kb) for matrices defined by fixed constants
fn matrix_table(matrix: MatrixCoefficients) -> Option<(f32, f32)> {
    Some(match matrix {
        MatrixCoefficients::BT709 => (0.2126, 0.0722),
        MatrixCoefficients::FCC => (0.30, 0.11),
        MatrixCoefficients::BT470BG | MatrixCoefficients::BT601 => (0.299, 0.114),
        MatrixCoefficients::SMPTE240 => (0.212, 0.087),
        MatrixCoefficients::BT2020_NCL => (0.2627, 0.0593),
        _ => return None,
    })
}

/// CIE 1931 xy chromaticities: red, green, blue, white
fn primaries_table(primaries: ColorPrimaries) -> [f32; 8] {
    const D65: [f32; 2] = [0.3127, 0.3290];
    const ILLUMINANT_C: [f32; 2] = [0.310, 0.316];
    let ([rx, ry, gx, gy, bx, by], [wx, wy]) = match primaries {
        ColorPrimaries::BT470M => ([0.67, 0.33, 0.21, 0.71, 0.14, 0.08], ILLUMINANT_C),
        ColorPrimaries::BT470BG => ([0.64, 0.33, 0.29, 0.60, 0.15, 0.06], D65),
        ColorPrimaries::BT601 | ColorPrimaries::SMPTE240 => {
            ([0.630, 0.340, 0.310, 0.595, 0.155, 0.070], D65)
        }
        ColorPrimaries::FILM => ([0.681, 0.319, 0.243, 0.692, 0.145, 0.049], ILLUMINANT_C),
        ColorPrimaries::BT2020 => ([0.708, 0.292, 0.170, 0.797, 0.131, 0.046], D65),
        ColorPrimaries::XYZ => ([1.0, 0.0, 0.0, 1.0, 0.0, 0.0], [1.0 / 3.0, 1.0 / 3.0]),
        ColorPrimaries::SMPTE431 => ([0.680, 0.320, 0.265, 0.690, 0.150, 0.060], [0.314, 0.351]),
        ColorPrimaries::SMPTE432 => ([0.680, 0.320, 0.265, 0.690, 0.150, 0.060], D65),
        ColorPrimaries::EBU3213 => ([0.630, 0.340, 0.295, 0.605, 0.155, 0.077], D65),
        // BT.709 and anything unspecified
        _ => ([0.64, 0.33, 0.30, 0.60, 0.15, 0.06], D65),
    };
    [rx, ry, gx, gy, bx, by, wx, wy]
}

/// Luma weights implied by a set of primaries (H.273 equations 39-44)
///
/// `None` when the primaries do not yield a usable mix, as with XYZ.
fn derive_from_primaries(primaries: ColorPrimaries) -> Option<(f32, f32)> {
    let [rx, ry, gx, gy, bx, by, wx, wy] = primaries_table(primaries);
    let rz = 1.0 - (rx + ry);
    let gz = 1.0 - (gx + gy);
    let bz = 1.0 - (bx + by);
    let wz = 1.0 - (wx + wy);
    let denom =
        wy * (rx * (gy * bz - by * gz) + gx * (by * rz - ry * bz) + bx * (ry * gz - gy * rz));
    let kr = (ry * (wx * (gy * bz - by * gz) + wy * (bx * gz - gx * bz) + wz * (gx * by - bx * gy)))
        / denom;
    let kb = (by * (wx * (ry * gz - gy * rz) + wy * (gx * rz - rx * gz) + wz * (rx * gy - gx * ry)))
        / denom;
    let usable = kr.is_finite() && kb.is_finite() && kr > 0.0 && kb > 0.0 && kr + kb < 1.0;
    usable.then_some((kr, kb))
}

/// Resolve the mixing coefficients for a color description
///
/// Unspecified matrices default to BT.601. Matrices that are not a simple
/// linear mix (YCgCo, constant luminance, ICtCp) and reserved codes fail
/// with [`Error::UnsupportedColorMatrix`].
pub fn yuv_coefficients(info: &ColorConversionInfo) -> Result<YuvCoefficients> {
    let matrix = info.matrix_coefficients;
    if matrix == MatrixCoefficients::IDENTITY {
        return Ok(YuvCoefficients::IDENTITY);
    }
    if matrix == MatrixCoefficients::UNKNOWN {
        return Ok(YuvCoefficients::from_kr_kb(0.299, 0.114));
    }
    if matrix == MatrixCoefficients::CHROMAT_NCL {
        let (kr, kb) = derive_from_primaries(info.color_primaries)
            .ok_or_else(|| at(Error::UnsupportedColorMatrix(matrix)))?;
        return Ok(YuvCoefficients::from_kr_kb(kr, kb));
    }
    matrix_table(matrix)
        .map(|(kr, kb)| YuvCoefficients::from_kr_kb(kr, kb))
        .ok_or_else(|| at(Error::UnsupportedColorMatrix(matrix)))
}
