//! Error types for PNG decoding.

use core::fmt;
use miniz_oxide::inflate::TINFLStatus;

/// The main error type for PNG decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The leading 8-byte signature did not match.
    BadSignature,
    /// A chunk's declared length overruns the remaining input.
    UnexpectedEof,
    /// A data chunk or the end of the stream was reached before a complete
    /// header chunk.
    IncompleteHeader,
    /// The compression method or filter method field in the header is nonzero.
    UnsupportedCompression,
    /// The image is interlaced.
    UnsupportedInterlace,
    /// The bit depth is not 8.
    UnsupportedBitDepth(u8),
    /// The color type is neither truecolor nor truecolor with alpha.
    UnsupportedColorMode(u8),
    /// A scanline carries a filter type tag outside 0-4.
    UnsupportedFilterType(u8),
    /// The inflated image data does not have the expected length.
    LengthMismatch,
    /// The compressed image data is corrupt.
    Inflate(TINFLStatus),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSignature => write!(f, "invalid PNG signature"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::IncompleteHeader => write!(f, "image data without a complete header"),
            Self::UnsupportedCompression => write!(f, "unsupported compression or filter method"),
            Self::UnsupportedInterlace => write!(f, "interlaced images are not supported"),
            Self::UnsupportedBitDepth(depth) => write!(f, "unsupported bit depth {depth}"),
            Self::UnsupportedColorMode(color) => write!(f, "unsupported color type {color}"),
            Self::UnsupportedFilterType(tag) => write!(f, "unsupported scanline filter type {tag}"),
            Self::LengthMismatch => write!(f, "inflated image data has the wrong length"),
            Self::Inflate(status) => write!(f, "corrupt compressed data: {status:?}"),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Result type for PNG decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;
