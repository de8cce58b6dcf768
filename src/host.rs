//! Status-code entry points for host applications
//!
//! These functions mirror a C-style boundary: every input that a host may
//! fail to supply is an `Option`, and every call returns exactly one
//! terminal status code instead of an error value.

use crate::codec::{Av1Decode, Av1Encode};
use crate::decoder::ImageDecompressor;
use crate::encoder::{EncoderOptions, ImageCompressor, OutputAllocator};
use crate::error::{DecoderStatus, EncoderStatus, Error, Result};
use crate::image::{ChromaSubsampling, ColorConversionInfo, DecodeInfo};
use crate::planar::ImageAllocator;
use crate::progress::ProgressContext;
use crate::raster::{Raster, RasterMut};
use enough::Unstoppable;
use whereat::at;

/// Raw encoder options as supplied by a host
///
/// `yuv_format` uses the codes of [`ChromaSubsampling::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct HostEncoderOptions {
    pub quality: i32,
    pub speed: i32,
    pub yuv_format: i32,
}

impl Default for HostEncoderOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            speed: 6,
            yuv_format: ChromaSubsampling::Cs420.code(),
        }
    }
}

impl TryFrom<&HostEncoderOptions> for EncoderOptions {
    type Error = whereat::At<Error>;

    fn try_from(raw: &HostEncoderOptions) -> Result<Self> {
        let subsampling = ChromaSubsampling::try_from(raw.yuv_format)?;
        Ok(EncoderOptions::new()
            .quality(raw.quality.clamp(1, 100) as f32)
            .speed(raw.speed.clamp(0, 10) as u8)
            .chroma_subsampling(subsampling))
    }
}

fn encoder_status<T>(result: Result<T>) -> core::result::Result<T, EncoderStatus> {
    result.map_err(|e| {
        let err = e.into_inner();
        log::debug!("compression failed: {err}");
        EncoderStatus::from(&err)
    })
}

fn decoder_status<T>(result: Result<T>) -> core::result::Result<T, DecoderStatus> {
    result.map_err(|e| {
        let err = e.into_inner();
        log::debug!("decompression failed: {err}");
        DecoderStatus::from(&err)
    })
}

/// Compress a raster, storing the bitstream buffers in the output slots
///
/// `image`, `options`, `progress`, `output_allocator` and `compressed_color`
/// are required. Supplying `compressed_alpha` requests an alpha bitstream.
/// The progress callback is invoked once, after the required inputs are
/// checked and before the options are interpreted.
#[allow(clippy::too_many_arguments)]
pub fn compress_image<E, A, O>(
    compressor: &mut ImageCompressor<E, A>,
    image: Option<&Raster<'_>>,
    options: Option<&HostEncoderOptions>,
    progress: Option<&mut ProgressContext<'_>>,
    color_info: &ColorConversionInfo,
    output_allocator: Option<&mut O>,
    compressed_color: Option<&mut Option<O::Buffer>>,
    compressed_alpha: Option<&mut Option<O::Buffer>>,
) -> EncoderStatus
where
    E: Av1Encode,
    A: ImageAllocator,
    O: OutputAllocator,
{
    let (Some(image), Some(options), Some(progress), Some(output), Some(color_slot)) = (
        image,
        options,
        progress,
        output_allocator,
        compressed_color,
    ) else {
        return EncoderStatus::NullParameter;
    };

    if let Err(reason) = progress.report() {
        return EncoderStatus::from(&Error::from(reason));
    }

    let options = match encoder_status(EncoderOptions::try_from(options)) {
        Ok(options) => options,
        Err(status) => return status,
    };

    let with_alpha = compressed_alpha.is_some();
    let compressed = match encoder_status(compressor.compress_planes(
        image,
        &options,
        color_info,
        output,
        with_alpha,
    )) {
        Ok(compressed) => compressed,
        Err(status) => return status,
    };

    *color_slot = Some(compressed.color);
    if let Some(alpha_slot) = compressed_alpha {
        *alpha_slot = compressed.alpha;
    }
    EncoderStatus::Ok
}

/// Decode a color bitstream into `output`
///
/// `decode_info`, when supplied, receives the frame description.
pub fn decompress_color_image<D: Av1Decode>(
    decompressor: &mut ImageDecompressor<D>,
    data: Option<&[u8]>,
    container_color_info: Option<&ColorConversionInfo>,
    decode_info: Option<&mut DecodeInfo>,
    output: Option<&mut RasterMut<'_>>,
) -> DecoderStatus {
    let (Some(data), Some(output)) = (data, output) else {
        return DecoderStatus::NullParameter;
    };
    let result = non_empty(data).and_then(|data| {
        decompressor.decompress_color(data, container_color_info, output, &Unstoppable)
    });
    match decoder_status(result) {
        Ok(info) => {
            if let Some(slot) = decode_info {
                *slot = info;
            }
            DecoderStatus::Ok
        }
        Err(status) => status,
    }
}

/// Decode an alpha bitstream into the alpha channel of `output`
pub fn decompress_alpha_image<D: Av1Decode>(
    decompressor: &mut ImageDecompressor<D>,
    data: Option<&[u8]>,
    decode_info: Option<&mut DecodeInfo>,
    output: Option<&mut RasterMut<'_>>,
) -> DecoderStatus {
    let (Some(data), Some(output)) = (data, output) else {
        return DecoderStatus::NullParameter;
    };
    let result = non_empty(data)
        .and_then(|data| decompressor.decompress_alpha(data, output, &Unstoppable));
    match decoder_status(result) {
        Ok(info) => {
            if let Some(slot) = decode_info {
                *slot = info;
            }
            DecoderStatus::Ok
        }
        Err(status) => status,
    }
}

fn non_empty(data: &[u8]) -> Result<&[u8]> {
    if data.is_empty() {
        return Err(at(Error::NullParameter("compressed image is empty")));
    }
    Ok(data)
}
