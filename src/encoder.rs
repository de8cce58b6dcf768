//! Still-image compression orchestration
//!
//! Provides [`EncoderOptions`] for configuring encoding and
//! [`ImageCompressor`] for turning a BGRA raster into one AV1 bitstream
//! for color and, when requested, a second one for alpha.

use crate::Result;
use crate::codec::{Av1Encode, ImageKind};
use crate::error::Error;
use crate::image::{ChromaSubsampling, ColorConversionInfo};
use crate::planar::{HeapAllocator, ImageAllocator, alpha_image, color_image};
use crate::progress::ProgressContext;
use crate::raster::Raster;
use whereat::at;

/// Configuration for still-image encoding
///
/// Uses a builder pattern matching [`crate::DecoderConfig`]. Quality and
/// speed are passed to the codec untouched.
///
/// # Example
///
/// ```
/// use avif_planar::{ChromaSubsampling, EncoderOptions};
///
/// let options = EncoderOptions::new()
///     .quality(80.0)
///     .chroma_subsampling(ChromaSubsampling::Cs444);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderOptions {
    pub(crate) quality: f32,
    pub(crate) alpha_quality: Option<f32>,
    pub(crate) speed: u8,
    pub(crate) chroma_subsampling: ChromaSubsampling,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            quality: 75.0,
            alpha_quality: None,
            speed: 6,
            chroma_subsampling: ChromaSubsampling::default(),
        }
    }
}

impl EncoderOptions {
    /// Create encoder options with default settings
    ///
    /// Defaults: quality 75, speed 6, 4:2:0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set encoding quality (1.0 = worst, 100.0 = best)
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Set separate quality for the alpha image
    ///
    /// If not set, uses the same quality as color.
    pub fn alpha_quality(mut self, quality: f32) -> Self {
        self.alpha_quality = Some(quality);
        self
    }

    /// Set encoding speed (0 = slowest/best, 10 = fastest/worst)
    pub fn speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    /// Set the chroma subsampling of the color image
    pub fn chroma_subsampling(mut self, subsampling: ChromaSubsampling) -> Self {
        self.chroma_subsampling = subsampling;
        self
    }

    /// Quality to use for an image of the given kind
    pub fn quality_for(&self, kind: ImageKind) -> f32 {
        match kind {
            ImageKind::Color => self.quality,
            ImageKind::Alpha => self.alpha_quality.unwrap_or(self.quality),
        }
    }
}

/// Produces caller-owned buffers for compressed bitstreams
///
/// Buffers are handed to the caller as soon as they are filled and are
/// never read or freed by this crate afterwards. Closures of the form
/// `FnMut(usize) -> Option<B>` implement this trait.
pub trait OutputAllocator {
    type Buffer: AsMut<[u8]>;

    /// A buffer of exactly `size` bytes, or `None` when memory is unavailable
    fn allocate(&mut self, size: usize) -> Option<Self::Buffer>;
}

impl<B: AsMut<[u8]>, F: FnMut(usize) -> Option<B>> OutputAllocator for F {
    type Buffer = B;

    fn allocate(&mut self, size: usize) -> Option<B> {
        self(size)
    }
}

/// Compressed bitstreams of one still image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage<B> {
    /// AV1 bitstream of the color image
    pub color: B,
    /// AV1 bitstream of the alpha image, when requested
    pub alpha: Option<B>,
}

/// Compresses rasters through an AV1 encoder
///
/// Planar images are obtained from the allocator `A` and released before
/// [`compress`](Self::compress) returns, on success and on every error.
#[derive(Debug)]
pub struct ImageCompressor<E, A = HeapAllocator> {
    codec: E,
    allocator: A,
}

impl<E: Av1Encode> ImageCompressor<E> {
    pub fn new(codec: E) -> Self {
        Self::with_allocator(codec, HeapAllocator)
    }
}

impl<E: Av1Encode, A: ImageAllocator> ImageCompressor<E, A> {
    /// Use a custom planar image allocator
    pub fn with_allocator(codec: E, allocator: A) -> Self {
        Self { codec, allocator }
    }

    pub fn codec(&self) -> &E {
        &self.codec
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Compress a raster into a color bitstream and, if `with_alpha`, an
    /// alpha bitstream
    ///
    /// `progress` is ticked once before any work. If its callback returns
    /// `false` this fails with [`Error::UserCancelled`] without allocating
    /// or touching the codec.
    pub fn compress<O: OutputAllocator>(
        &mut self,
        image: &Raster<'_>,
        options: &EncoderOptions,
        color_info: &ColorConversionInfo,
        progress: &mut ProgressContext<'_>,
        output: &mut O,
        with_alpha: bool,
    ) -> Result<CompressedImage<O::Buffer>> {
        progress.report().map_err(|e| at(Error::from(e)))?;
        self.compress_planes(image, options, color_info, output, with_alpha)
    }

    /// Everything after the progress tick
    pub(crate) fn compress_planes<O: OutputAllocator>(
        &mut self,
        image: &Raster<'_>,
        options: &EncoderOptions,
        color_info: &ColorConversionInfo,
        output: &mut O,
        with_alpha: bool,
    ) -> Result<CompressedImage<O::Buffer>> {
        log::debug!(
            "compressing {}x{} raster, {:?}, alpha: {}",
            image.width(),
            image.height(),
            options.chroma_subsampling,
            with_alpha
        );

        let color = color_image(&self.allocator, image, color_info, options.chroma_subsampling)?;
        let alpha = if with_alpha {
            Some(alpha_image(&self.allocator, image)?)
        } else {
            None
        };

        let color_stream = self
            .codec
            .compress(&color, ImageKind::Color, options)
            .map_err(|e| at(Error::from(e)))?;
        let alpha_stream = match &alpha {
            Some(alpha) => Some(
                self.codec
                    .compress(alpha, ImageKind::Alpha, options)
                    .map_err(|e| at(Error::from(e)))?,
            ),
            None => None,
        };
        drop(alpha);
        drop(color);

        log::debug!(
            "compressed color: {} bytes, alpha: {:?} bytes",
            color_stream.len(),
            alpha_stream.as_ref().map(Vec::len)
        );

        let color = copy_to_output(output, &color_stream)?;
        let alpha = match alpha_stream {
            Some(stream) => Some(copy_to_output(output, &stream)?),
            None => None,
        };
        Ok(CompressedImage { color, alpha })
    }
}

fn copy_to_output<O: OutputAllocator>(output: &mut O, stream: &[u8]) -> Result<O::Buffer> {
    let mut buffer = output
        .allocate(stream.len())
        .ok_or_else(|| at(Error::OutOfMemory))?;
    let dst = buffer.as_mut();
    if dst.len() != stream.len() {
        return Err(at(Error::OutOfMemory));
    }
    dst.copy_from_slice(stream);
    Ok(buffer)
}
