//! # avif-planar
//!
//! Color conversion and codec marshaling between interleaved BGRA rasters
//! and the planar YUV images consumed by AV1 codecs.
//!
//! This crate sits between an image host and an AV1 encoder/decoder: it
//! converts rasters to Y/U/V planes with the requested chroma subsampling,
//! hands them to the codec, and converts decoded planes back into the
//! caller's raster. Container parsing (ISOBMFF/HEIF) is out of scope; the
//! bitstreams produced and consumed here are raw AV1.
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(all(feature = "encode", feature = "decode"))]
//! # fn main() -> avif_planar::Result<()> {
//! use avif_planar::{EncoderOptions, Raster, RasterMut};
//!
//! let pixels = vec![128u8; 64 * 64 * 4];
//! let raster = Raster::new(&pixels, 64, 64, 64 * 4)?;
//! let compressed = avif_planar::encode(&raster, &EncoderOptions::new(), false)?;
//!
//! let mut out = vec![0u8; 64 * 64 * 4];
//! let mut output = RasterMut::new(&mut out, 64, 64, 64 * 4)?;
//! let info = avif_planar::decode_color(&compressed.color, &mut output)?;
//! println!("{}x{} {:?}", info.width, info.height, info.chroma_subsampling);
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "encode", feature = "decode")))]
//! # fn main() {}
//! ```
//!
//! ## Features
//!
//! - **`encode`**: AV1 encoding with [rav1e](https://github.com/xiph/rav1e)
//! - **`decode`**: AV1 decoding with rav1d-safe's managed API
//!
//! Without either feature the crate still provides the conversions and the
//! orchestrators; plug in any codec through [`Av1Encode`] and [`Av1Decode`].
//!
//! ## Host boundary
//!
//! The [`host`] module exposes status-code entry points that take every
//! host-supplied input as an `Option` and never return an error value.

mod chroma;
mod codec;
mod coefficients;
mod config;
mod convert;
mod decoder;
mod encoder;
mod error;
pub mod host;
mod image;
mod planar;
mod plane;
mod progress;
#[cfg(feature = "decode")]
mod rav1d_decoder;
#[cfg(feature = "encode")]
mod rav1e_encoder;
mod raster;
mod rgb_to_yuv;
mod yuv_convert;

pub use codec::{Av1Decode, Av1Encode, CodecError, ImageKind};
pub use coefficients::{YuvCoefficients, yuv_coefficients};
pub use config::DecoderConfig;
pub use decoder::ImageDecompressor;
pub use encoder::{CompressedImage, EncoderOptions, ImageCompressor, OutputAllocator};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{DecoderStatus, EncoderStatus, Error, Result};
pub use image::{
    ChromaSubsampling, ColorConversionInfo, ColorPrimaries, ColorRange, DecodeInfo,
    MatrixCoefficients, TransferCharacteristics,
};
pub use planar::{
    HeapAllocator, IMAGE_ALIGN, ImageAllocator, PixelFormat, PlaneIndex, PlanarImage, ScopedImage,
    alpha_image, color_image,
};
pub use plane::{Plane, PlaneMut};
pub use progress::ProgressContext;
#[cfg(feature = "decode")]
pub use rav1d_decoder::Rav1dDecoder;
#[cfg(feature = "encode")]
pub use rav1e_encoder::Rav1eEncoder;
pub use raster::{BYTES_PER_PIXEL, Raster, RasterMut};

/// Encode a raster with rav1e and default color information
///
/// Alpha is encoded into a second bitstream when `with_alpha` is set.
/// Compressed buffers are plain `Vec<u8>`s.
#[cfg(feature = "encode")]
pub fn encode(
    image: &Raster<'_>,
    options: &EncoderOptions,
    with_alpha: bool,
) -> Result<CompressedImage<Vec<u8>>> {
    let mut compressor = ImageCompressor::new(Rav1eEncoder::new());
    let mut keep_going = |_: u32, _: u32| true;
    let mut progress = ProgressContext::new(1, &mut keep_going);
    let mut output = |size: usize| Some(vec![0u8; size]);
    compressor.compress(
        image,
        options,
        &ColorConversionInfo::default(),
        &mut progress,
        &mut output,
        with_alpha,
    )
}

/// Decode a color bitstream with rav1d into `output`
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "decode")]
/// # fn main() -> avif_planar::Result<()> {
/// let av1 = std::fs::read("color.obu").unwrap();
/// let mut pixels = vec![0u8; 32 * 32 * 4];
/// let mut output = avif_planar::RasterMut::new(&mut pixels, 32, 32, 32 * 4)?;
/// avif_planar::decode_color(&av1, &mut output)?;
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "decode"))]
/// # fn main() {}
/// ```
#[cfg(feature = "decode")]
pub fn decode_color(data: &[u8], output: &mut RasterMut<'_>) -> Result<DecodeInfo> {
    decode_color_with(data, &DecoderConfig::default(), None, output, &Unstoppable)
}

/// Decode a color bitstream with custom settings and cancellation support
///
/// # Arguments
///
/// * `data` - Raw AV1 bitstream
/// * `config` - Decoder configuration
/// * `container_color_info` - Color description from the container, if any
/// * `output` - Destination raster, no larger than the frame
/// * `stop` - Cancellation token (use `Unstoppable` if not needed)
#[cfg(feature = "decode")]
pub fn decode_color_with(
    data: &[u8],
    config: &DecoderConfig,
    container_color_info: Option<&ColorConversionInfo>,
    output: &mut RasterMut<'_>,
    stop: &impl Stop,
) -> Result<DecodeInfo> {
    ImageDecompressor::new(Rav1dDecoder::new(config.clone())).decompress_color(
        data,
        container_color_info,
        output,
        stop,
    )
}

/// Decode an alpha bitstream with rav1d into the alpha channel of `output`
#[cfg(feature = "decode")]
pub fn decode_alpha(data: &[u8], output: &mut RasterMut<'_>) -> Result<DecodeInfo> {
    ImageDecompressor::new(Rav1dDecoder::default()).decompress_alpha(data, output, &Unstoppable)
}
