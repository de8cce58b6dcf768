//! Error types and host status codes

use crate::codec::CodecError;
use crate::image::MatrixCoefficients;
use enough::StopReason;

/// Error type for conversion and codec marshaling operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required input was absent
    #[error("Required parameter missing: {0}")]
    NullParameter(&'static str),

    /// Chroma subsampling code not recognized
    #[error("Unknown YUV format code {0}")]
    UnknownYuvFormat(i32),

    /// Matrix coefficients with no known coefficient set
    #[error("Unsupported color matrix {0:?}")]
    UnsupportedColorMatrix(MatrixCoefficients),

    /// Raster descriptor violates its invariants
    #[error("Invalid image: {0}")]
    InvalidImage(&'static str),

    /// Decoded frame does not cover the destination raster
    #[error("Decoded image is {actual_width}x{actual_height}, output needs {width}x{height}")]
    ImageSizeMismatch {
        /// Destination width
        width: u32,
        /// Destination height
        height: u32,
        /// Decoded frame width
        actual_width: u32,
        /// Decoded frame height
        actual_height: u32,
    },

    /// Planar image or output buffer allocation failed
    #[error("Out of memory")]
    OutOfMemory,

    /// Progress callback asked to stop before work began
    #[error("Operation cancelled: {0:?}")]
    UserCancelled(StopReason),

    /// Failure reported by the AV1 codec, passed through unchanged
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<StopReason> for Error {
    fn from(reason: StopReason) -> Self {
        Error::UserCancelled(reason)
    }
}

/// Result type for avif-planar operations with location tracking
pub type Result<T, E = whereat::At<Error>> = core::result::Result<T, E>;

/// Terminal status of a compression call at the host boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EncoderStatus {
    Ok = 0,
    NullParameter,
    OutOfMemory,
    UnknownYuvFormat,
    UnsupportedColorMatrix,
    InvalidImage,
    CodecInitFailed,
    EncodeFailed,
    UserCancelled,
}

/// Terminal status of a decompression call at the host boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DecoderStatus {
    Ok = 0,
    NullParameter,
    OutOfMemory,
    UnknownYuvFormat,
    UnsupportedColorMatrix,
    UnsupportedBitDepth,
    InvalidImage,
    ImageSizeMismatch,
    CodecInitFailed,
    DecodeFailed,
    UserCancelled,
}

impl From<&Error> for EncoderStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::NullParameter(_) => EncoderStatus::NullParameter,
            Error::UnknownYuvFormat(_) => EncoderStatus::UnknownYuvFormat,
            Error::UnsupportedColorMatrix(_) => EncoderStatus::UnsupportedColorMatrix,
            Error::InvalidImage(_) | Error::ImageSizeMismatch { .. } => {
                EncoderStatus::InvalidImage
            }
            Error::OutOfMemory | Error::Codec(CodecError::OutOfMemory) => {
                EncoderStatus::OutOfMemory
            }
            Error::UserCancelled(_) => EncoderStatus::UserCancelled,
            Error::Codec(CodecError::Init(_)) => EncoderStatus::CodecInitFailed,
            Error::Codec(_) => EncoderStatus::EncodeFailed,
        }
    }
}

impl From<&Error> for DecoderStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::NullParameter(_) => DecoderStatus::NullParameter,
            Error::UnknownYuvFormat(_) => DecoderStatus::UnknownYuvFormat,
            Error::UnsupportedColorMatrix(_) => DecoderStatus::UnsupportedColorMatrix,
            Error::InvalidImage(_) => DecoderStatus::InvalidImage,
            Error::ImageSizeMismatch { .. } => DecoderStatus::ImageSizeMismatch,
            Error::OutOfMemory | Error::Codec(CodecError::OutOfMemory) => {
                DecoderStatus::OutOfMemory
            }
            Error::UserCancelled(_) => DecoderStatus::UserCancelled,
            Error::Codec(CodecError::Init(_)) => DecoderStatus::CodecInitFailed,
            Error::Codec(CodecError::UnsupportedBitDepth(_)) => DecoderStatus::UnsupportedBitDepth,
            Error::Codec(_) => DecoderStatus::DecodeFailed,
        }
    }
}
