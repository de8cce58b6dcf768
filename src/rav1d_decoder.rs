//! AV1 decoder backend using the rav1d-safe managed API

#![deny(unsafe_code)]

use crate::codec::{Av1Decode, CodecError};
use crate::config::DecoderConfig;
use crate::image::{
    ColorConversionInfo, ColorPrimaries, ColorRange, MatrixCoefficients, TransferCharacteristics,
};
use crate::planar::{IMAGE_ALIGN, PixelFormat, PlaneIndex, PlanarImage};

use rav1d_safe::src::managed::{
    ColorPrimaries as Rav1dColorPrimaries, ColorRange as Rav1dColorRange, Decoder,
    MatrixCoefficients as Rav1dMatrixCoefficients, PixelLayout, Planes, Settings,
    TransferCharacteristics as Rav1dTransferCharacteristics,
};

// managed enums use H.273 code points as discriminants
fn convert_color_primaries(pri: Rav1dColorPrimaries) -> ColorPrimaries {
    ColorPrimaries(pri as u8)
}

fn convert_transfer(trc: Rav1dTransferCharacteristics) -> TransferCharacteristics {
    TransferCharacteristics(trc as u8)
}

fn convert_matrix(mtrx: Rav1dMatrixCoefficients) -> MatrixCoefficients {
    MatrixCoefficients(mtrx as u8)
}

fn convert_color_range(range: Rav1dColorRange) -> ColorRange {
    match range {
        Rav1dColorRange::Limited => ColorRange::Limited,
        Rav1dColorRange::Full => ColorRange::Full,
    }
}

fn convert_layout(layout: PixelLayout) -> PixelFormat {
    match layout {
        PixelLayout::I400 => PixelFormat::I400,
        PixelLayout::I420 => PixelFormat::I420,
        PixelLayout::I422 => PixelFormat::I422,
        PixelLayout::I444 => PixelFormat::I444,
    }
}

/// Decodes 8-bit AV1 still images with rav1d
pub struct Rav1dDecoder {
    config: DecoderConfig,
}

impl Rav1dDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}

impl Default for Rav1dDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl Av1Decode for Rav1dDecoder {
    fn decompress(&mut self, data: &[u8]) -> Result<PlanarImage, CodecError> {
        // a fresh context per bitstream, color and alpha share nothing
        let mut settings = Settings::default();
        settings.threads = 1;
        settings.apply_grain = self.config.apply_grain;
        settings.frame_size_limit = self.config.frame_size_limit;
        let mut decoder = Decoder::with_settings(settings)
            .map_err(|_e| CodecError::Init("failed to create rav1d decoder".into()))?;

        let frame = decoder
            .decode(data)
            .map_err(|_e| CodecError::Decode("failed to decode frame".into()))?
            .ok_or_else(|| CodecError::Decode("no frame returned from decoder".into()))?;

        let bit_depth = frame.bit_depth() as u8;
        if bit_depth != 8 {
            return Err(CodecError::UnsupportedBitDepth(bit_depth));
        }

        let format = convert_layout(frame.pixel_layout());
        let color = frame.color_info();
        let Planes::Depth8(planes) = frame.planes() else {
            return Err(CodecError::UnsupportedBitDepth(bit_depth));
        };

        let mut image = PlanarImage::allocate(format, frame.width(), frame.height(), IMAGE_ALIGN)
            .ok_or(CodecError::OutOfMemory)?;
        image.set_range(convert_color_range(color.color_range));
        image.set_color_info(ColorConversionInfo {
            color_primaries: convert_color_primaries(color.primaries),
            transfer_characteristics: convert_transfer(color.transfer_characteristics),
            matrix_coefficients: convert_matrix(color.matrix_coefficients),
        });

        log::debug!(
            "rav1d frame {}x{} {:?}",
            frame.width(),
            frame.height(),
            format
        );

        let y_view = planes.y();
        let mut y_plane = image.plane_mut(PlaneIndex::Y);
        for row in 0..y_plane.height() {
            let width = y_plane.width();
            y_plane.row_mut(row).copy_from_slice(&y_view.row(row)[..width]);
        }

        if format != PixelFormat::I400 {
            let u_view = planes
                .u()
                .ok_or_else(|| CodecError::Decode("missing U plane".into()))?;
            let v_view = planes
                .v()
                .ok_or_else(|| CodecError::Decode("missing V plane".into()))?;
            for (index, view) in [(PlaneIndex::U, u_view), (PlaneIndex::V, v_view)] {
                let mut plane = image.plane_mut(index);
                let width = plane.width();
                for row in 0..plane.height() {
                    plane.row_mut(row).copy_from_slice(&view.row(row)[..width]);
                }
            }
        }

        Ok(image)
    }
}
