//! Crate-level error type.
//!
//! Each failure class is its own variant so callers can tell a carrier that
//! is too small apart from a wrong key.

use thiserror::Error;

use crate::crypto::{CompressionError, PayloadError};
use crate::stego::StegoError;

/// Errors returned by [`encode`](crate::encode) and [`decode`](crate::decode).
#[derive(Error, Debug)]
pub enum Error {
    /// The payload needs more bits than the carrier offers.
    #[error("Message is too large for this image. Required: {required} bits, Available: {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// Wrong key or corrupted ciphertext. Deliberately vague.
    #[error("Failed to extract data. Ensure the key is correct and file is valid.")]
    Decryption,

    /// The image does not carry a plausible length header.
    #[error("No valid secret message found in this image")]
    NoPayloadFound,

    /// The image ends before the declared payload does.
    #[error("Hidden data is truncated: need {required} bits, only {available} available")]
    TruncatedData { required: usize, available: usize },

    #[error("Encryption key must not be empty")]
    EmptyKey,

    #[error("Payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl Error {
    /// Short guidance for the user, per failure class.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } | Self::PayloadTooLarge { .. } => {
                "Try a larger carrier image or a shorter message."
            }
            Self::Decryption => {
                "Check the key, and make sure the image was not re-saved or converted."
            }
            Self::NoPayloadFound => {
                "This image does not appear to contain hidden data. Use the lossless PNG produced by encode."
            }
            Self::TruncatedData { .. } => {
                "The image is smaller than when the data was hidden. Use the original, uncropped file."
            }
            Self::EmptyKey => "Provide a non-empty key.",
            Self::DimensionMismatch { .. } | Self::InvalidDimensions { .. } => {
                "The pixel data does not match the image dimensions."
            }
            Self::ShapeMismatch { .. } => {
                "Compare the stego image with the carrier it was made from."
            }
            Self::Compression(_) | Self::Encryption(_) => {
                "Internal error while protecting the payload."
            }
        }
    }
}

impl From<StegoError> for Error {
    fn from(err: StegoError) -> Self {
        match err {
            StegoError::CapacityExceeded {
                required,
                available,
            } => Self::CapacityExceeded {
                required,
                available,
            },
            StegoError::NoPayloadFound { .. } => Self::NoPayloadFound,
            StegoError::TruncatedData {
                required,
                available,
            } => Self::TruncatedData {
                required,
                available,
            },
            StegoError::PayloadTooLarge { len, max } => Self::PayloadTooLarge { len, max },
            StegoError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            StegoError::ShapeMismatch {
                expected_width,
                expected_height,
                actual_width,
                actual_height,
            } => Self::ShapeMismatch {
                expected_width,
                expected_height,
                actual_width,
                actual_height,
            },
            StegoError::InvalidDimensions { width, height } => {
                Self::InvalidDimensions { width, height }
            }
        }
    }
}

impl From<PayloadError> for Error {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::EmptyKey => Self::EmptyKey,
            PayloadError::Compression(e) => Self::Compression(e),
            PayloadError::Encryption(e) => Self::Encryption(e.to_string()),
            PayloadError::Decryption => Self::Decryption,
        }
    }
}
