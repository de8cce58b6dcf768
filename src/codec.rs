//! AV1 codec seam
//!
//! The orchestrators treat the codec as a black box: planar images go in,
//! raw AV1 bitstreams come out, and the reverse for decoding. Any failure
//! the codec reports is carried through as a [`CodecError`].

use crate::encoder::EncoderOptions;
use crate::planar::PlanarImage;

/// Failure reported by an AV1 codec backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Codec context could not be created or configured
    #[error("Codec initialization failed: {0}")]
    Init(String),

    /// Compression failed
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Bitstream could not be decoded
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Decoded frame is not 8 bits per sample
    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u8),

    /// Codec ran out of memory
    #[error("Codec out of memory")]
    OutOfMemory,
}

/// Which part of a still image a planar image carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Color planes
    Color,
    /// Alpha stored as a monochrome luma plane
    Alpha,
}

/// Compresses planar images into raw AV1 bitstreams
pub trait Av1Encode {
    /// Compress one still image
    fn compress(
        &mut self,
        image: &PlanarImage,
        kind: ImageKind,
        options: &EncoderOptions,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Decompresses raw AV1 bitstreams into planar images
pub trait Av1Decode {
    /// Decompress the first frame of `data`
    fn decompress(&mut self, data: &[u8]) -> Result<PlanarImage, CodecError>;
}

impl<T: Av1Encode + ?Sized> Av1Encode for &mut T {
    fn compress(
        &mut self,
        image: &PlanarImage,
        kind: ImageKind,
        options: &EncoderOptions,
    ) -> Result<Vec<u8>, CodecError> {
        (**self).compress(image, kind, options)
    }
}

impl<T: Av1Decode + ?Sized> Av1Decode for &mut T {
    fn decompress(&mut self, data: &[u8]) -> Result<PlanarImage, CodecError> {
        (**self).decompress(data)
    }
}
