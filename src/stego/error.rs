//! Errors raised by the pixel buffer, bit packer and LSB codec.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a pixel buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The carrier cannot hold the payload. Nothing was written.
    #[error("Message is too large for this image. Required: {required} bits, Available: {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// The length header is zero or above the configured ceiling.
    #[error("No valid secret message found in this image (declared length {declared})")]
    NoPayloadFound { declared: u32 },

    /// The buffer ran out of eligible samples before the declared payload was read.
    #[error("Hidden data is truncated: need {required} bits, only {available} available")]
    TruncatedData { required: usize, available: usize },

    /// The payload exceeds the configured ceiling and could never be extracted.
    #[error("Payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: usize, max: usize },

    /// Sample count does not match the declared dimensions.
    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Two images that must be compared have different shapes.
    #[error("Image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Width or height is zero, or their product overflows.
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
