//! Still-image decompression orchestration
//!
//! Color and alpha bitstreams are decoded by independent calls that share
//! no state; each writes its own channels of the caller's raster.

use crate::codec::Av1Decode;
use crate::coefficients::{YuvCoefficients, yuv_coefficients};
use crate::convert::add_alpha8;
use crate::error::{Error, Result};
use crate::image::{ChromaSubsampling, ColorConversionInfo, DecodeInfo, MatrixCoefficients};
use crate::planar::{PixelFormat, PlaneIndex, PlanarImage};
use crate::raster::RasterMut;
use crate::yuv_convert::yuv_to_bgra8;
use enough::Stop;
use whereat::at;

/// Decompresses AV1 bitstreams into BGRA rasters
#[derive(Debug)]
pub struct ImageDecompressor<D> {
    codec: D,
}

impl<D: Av1Decode> ImageDecompressor<D> {
    pub fn new(codec: D) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &D {
        &self.codec
    }

    pub fn into_codec(self) -> D {
        self.codec
    }

    /// Decode a color bitstream into the B, G, R channels of `output`
    ///
    /// Alpha is set to opaque. Color information from the container, when
    /// given, takes precedence over what the bitstream signals.
    pub fn decompress_color(
        &mut self,
        data: &[u8],
        container_color_info: Option<&ColorConversionInfo>,
        output: &mut RasterMut<'_>,
        stop: &impl Stop,
    ) -> Result<DecodeInfo> {
        let image = self.decode(data, output, stop)?;

        let color_info = container_color_info
            .copied()
            .unwrap_or(*image.color_info());
        let monochrome = is_monochrome(&image);
        let coefficients = if monochrome {
            // gray output needs no matrix
            YuvCoefficients::IDENTITY
        } else {
            yuv_coefficients(&color_info)?
        };

        yuv_to_bgra8(&image, &coefficients, output);

        let chroma_subsampling = if monochrome {
            ChromaSubsampling::Monochrome
        } else if coefficients.is_identity() && image.format() == PixelFormat::I444 {
            ChromaSubsampling::Identity
        } else {
            image.format().subsampling()
        };
        Ok(decode_info(&image, chroma_subsampling, color_info))
    }

    /// Decode an alpha bitstream into the alpha channel of `output`
    ///
    /// Only the luma plane is used; B, G and R are left untouched.
    pub fn decompress_alpha(
        &mut self,
        data: &[u8],
        output: &mut RasterMut<'_>,
        stop: &impl Stop,
    ) -> Result<DecodeInfo> {
        let image = self.decode(data, output, stop)?;

        add_alpha8(output, image.plane(PlaneIndex::Y).rows(), image.range());

        let color_info = ColorConversionInfo {
            matrix_coefficients: MatrixCoefficients::IDENTITY,
            ..*image.color_info()
        };
        Ok(decode_info(&image, ChromaSubsampling::Monochrome, color_info))
    }

    fn decode(
        &mut self,
        data: &[u8],
        output: &RasterMut<'_>,
        stop: &impl Stop,
    ) -> Result<PlanarImage> {
        stop.check().map_err(|e| at(Error::from(e)))?;

        let image = self
            .codec
            .decompress(data)
            .map_err(|e| at(Error::from(e)))?;
        log::debug!(
            "decoded {}x{} {:?} frame, {:?} range, monochrome: {}",
            image.width(),
            image.height(),
            image.format(),
            image.range(),
            image.is_monochrome()
        );

        if image.width() < output.width() || image.height() < output.height() {
            return Err(at(Error::ImageSizeMismatch {
                width: output.width(),
                height: output.height(),
                actual_width: image.width(),
                actual_height: image.height(),
            }));
        }
        Ok(image)
    }
}

fn is_monochrome(image: &PlanarImage) -> bool {
    image.is_monochrome() || image.format() == PixelFormat::I400
}

fn decode_info(
    image: &PlanarImage,
    chroma_subsampling: ChromaSubsampling,
    color_info: ColorConversionInfo,
) -> DecodeInfo {
    DecodeInfo {
        width: image.width(),
        height: image.height(),
        bit_depth: 8,
        chroma_subsampling,
        color_range: image.range(),
        color_info,
    }
}
