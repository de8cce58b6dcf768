//! AV1 encoder backend using rav1e

use crate::codec::{Av1Encode, CodecError, ImageKind};
use crate::encoder::EncoderOptions;
use crate::image::{ColorPrimaries, ColorRange, MatrixCoefficients, TransferCharacteristics};
use crate::planar::{PixelFormat, PlaneIndex, PlanarImage};

use rav1e::prelude::{
    ChromaSampling, ColorDescription, Config, Context, EncoderConfig, EncoderStatus, PixelRange,
    SpeedSettings,
};
use rav1e::prelude::{
    ColorPrimaries as Rav1eColorPrimaries, MatrixCoefficients as Rav1eMatrixCoefficients,
    TransferCharacteristics as Rav1eTransferCharacteristics,
};

fn convert_color_primaries(pri: ColorPrimaries) -> Rav1eColorPrimaries {
    match pri {
        ColorPrimaries::BT709 => Rav1eColorPrimaries::BT709,
        ColorPrimaries::BT470M => Rav1eColorPrimaries::BT470M,
        ColorPrimaries::BT470BG => Rav1eColorPrimaries::BT470BG,
        ColorPrimaries::BT601 => Rav1eColorPrimaries::BT601,
        ColorPrimaries::SMPTE240 => Rav1eColorPrimaries::SMPTE240,
        ColorPrimaries::FILM => Rav1eColorPrimaries::GenericFilm,
        ColorPrimaries::BT2020 => Rav1eColorPrimaries::BT2020,
        ColorPrimaries::XYZ => Rav1eColorPrimaries::XYZ,
        ColorPrimaries::SMPTE431 => Rav1eColorPrimaries::SMPTE431,
        ColorPrimaries::SMPTE432 => Rav1eColorPrimaries::SMPTE432,
        ColorPrimaries::EBU3213 => Rav1eColorPrimaries::EBU3213,
        _ => Rav1eColorPrimaries::Unspecified,
    }
}

fn convert_transfer(trc: TransferCharacteristics) -> Rav1eTransferCharacteristics {
    match trc {
        TransferCharacteristics::BT709 => Rav1eTransferCharacteristics::BT709,
        TransferCharacteristics::BT601 => Rav1eTransferCharacteristics::BT601,
        TransferCharacteristics::LINEAR => Rav1eTransferCharacteristics::Linear,
        TransferCharacteristics::SRGB => Rav1eTransferCharacteristics::SRGB,
        TransferCharacteristics::SMPTE2084 => Rav1eTransferCharacteristics::SMPTE2084,
        TransferCharacteristics::HLG => Rav1eTransferCharacteristics::HLG,
        _ => Rav1eTransferCharacteristics::Unspecified,
    }
}

fn convert_matrix(mtrx: MatrixCoefficients) -> Rav1eMatrixCoefficients {
    match mtrx {
        MatrixCoefficients::IDENTITY => Rav1eMatrixCoefficients::Identity,
        MatrixCoefficients::BT709 => Rav1eMatrixCoefficients::BT709,
        MatrixCoefficients::FCC => Rav1eMatrixCoefficients::FCC,
        MatrixCoefficients::BT470BG => Rav1eMatrixCoefficients::BT470BG,
        MatrixCoefficients::BT601 => Rav1eMatrixCoefficients::BT601,
        MatrixCoefficients::SMPTE240 => Rav1eMatrixCoefficients::SMPTE240,
        MatrixCoefficients::BT2020_NCL => Rav1eMatrixCoefficients::BT2020NCL,
        MatrixCoefficients::CHROMAT_NCL => Rav1eMatrixCoefficients::ChromatNCL,
        _ => Rav1eMatrixCoefficients::Unspecified,
    }
}

/// Map quality 1..=100 onto rav1e's 0..=255 quantizer, steeper near the top
fn quality_to_quantizer(quality: f32) -> usize {
    let q = quality.clamp(1.0, 100.0) / 100.0;
    let x = if q >= 0.85 {
        (1.0 - q) * 3.0
    } else if q > 0.25 {
        1.0 - 0.125 - q * 0.5
    } else {
        1.0 - q
    };
    (x * 255.0).round() as usize
}

/// Encodes 8-bit still images with rav1e
#[derive(Debug, Clone, Default)]
pub struct Rav1eEncoder {
    threads: usize,
}

impl Rav1eEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker threads inside rav1e (0 = rav1e default)
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    fn encoder_config(
        &self,
        image: &PlanarImage,
        kind: ImageKind,
        options: &EncoderOptions,
    ) -> EncoderConfig {
        let monochrome = image.is_monochrome() || image.format() == PixelFormat::I400;
        let chroma_sampling = if monochrome {
            ChromaSampling::Cs400
        } else {
            match image.format() {
                PixelFormat::I420 | PixelFormat::I400 => ChromaSampling::Cs420,
                PixelFormat::I422 => ChromaSampling::Cs422,
                PixelFormat::I444 => ChromaSampling::Cs444,
            }
        };
        let color_description = match kind {
            ImageKind::Alpha => None,
            ImageKind::Color => {
                let info = image.color_info();
                Some(ColorDescription {
                    color_primaries: convert_color_primaries(info.color_primaries),
                    transfer_characteristics: convert_transfer(info.transfer_characteristics),
                    matrix_coefficients: convert_matrix(info.matrix_coefficients),
                })
            }
        };
        let quantizer = quality_to_quantizer(options.quality_for(kind));

        EncoderConfig {
            width: image.width() as usize,
            height: image.height() as usize,
            bit_depth: 8,
            chroma_sampling,
            pixel_range: match image.range() {
                ColorRange::Full => PixelRange::Full,
                ColorRange::Limited => PixelRange::Limited,
            },
            color_description,
            still_picture: true,
            quantizer,
            min_quantizer: quantizer.saturating_sub(10) as u8,
            speed_settings: SpeedSettings::from_preset(options.speed.min(10)),
            ..Default::default()
        }
    }
}

impl Av1Encode for Rav1eEncoder {
    fn compress(
        &mut self,
        image: &PlanarImage,
        kind: ImageKind,
        options: &EncoderOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let enc = self.encoder_config(image, kind, options);
        let chroma_sampling = enc.chroma_sampling;
        let cfg = Config::new()
            .with_encoder_config(enc)
            .with_threads(self.threads);
        let mut ctx: Context<u8> = cfg
            .new_context()
            .map_err(|e| CodecError::Init(e.to_string()))?;

        let mut frame = ctx.new_frame();
        let indices: &[PlaneIndex] = if chroma_sampling == ChromaSampling::Cs400 {
            &[PlaneIndex::Y]
        } else {
            &[PlaneIndex::Y, PlaneIndex::U, PlaneIndex::V]
        };
        for &index in indices {
            let plane = image.plane(index);
            frame.planes[index as usize].copy_from_raw_u8(plane.as_slice(), plane.stride(), 1);
        }

        ctx.send_frame(frame)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        ctx.flush();

        let mut out = Vec::new();
        loop {
            match ctx.receive_packet() {
                Ok(packet) => out.extend_from_slice(&packet.data),
                Err(EncoderStatus::Encoded) => continue,
                Err(EncoderStatus::LimitReached) => break,
                Err(e) => return Err(CodecError::Encode(e.to_string())),
            }
        }
        log::debug!("rav1e {kind:?} {chroma_sampling:?}: {} bytes", out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantizer_decreases_with_quality() {
        assert_eq!(quality_to_quantizer(100.0), 0);
        assert!(quality_to_quantizer(90.0) < quality_to_quantizer(75.0));
        assert!(quality_to_quantizer(50.0) < quality_to_quantizer(10.0));
        assert!(quality_to_quantizer(1.0) <= 255);
    }

    #[test]
    fn monochrome_images_encode_as_400() {
        let mut image = PlanarImage::allocate(PixelFormat::I420, 4, 4, 16).unwrap();
        image.set_monochrome(true);
        let enc =
            Rav1eEncoder::new().encoder_config(&image, ImageKind::Alpha, &EncoderOptions::new());
        assert_eq!(enc.chroma_sampling, ChromaSampling::Cs400);
        assert!(enc.color_description.is_none());
        assert!(enc.still_picture);
    }

    #[test]
    fn matrix_codes_keep_their_meaning() {
        assert_eq!(convert_matrix(MatrixCoefficients::FCC), Rav1eMatrixCoefficients::FCC);
        assert_eq!(
            convert_matrix(MatrixCoefficients::SMPTE240),
            Rav1eMatrixCoefficients::SMPTE240
        );
        assert_eq!(
            convert_matrix(MatrixCoefficients::IDENTITY),
            Rav1eMatrixCoefficients::Identity
        );
        for code in 0..=14u8 {
            let mapped = convert_matrix(MatrixCoefficients(code));
            if mapped != Rav1eMatrixCoefficients::Unspecified {
                assert_eq!(mapped as u8, code);
            }
        }
    }
}
