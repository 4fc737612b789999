//! Payload compression.
//!
//! Secrets are zlib-wrapped DEFLATE streams, so text compresses before it is
//! encrypted (ciphertext does not compress).

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Read;
use thiserror::Error;

/// Default zlib level, matching the usual `deflate` default.
pub const DEFAULT_LEVEL: u32 = 6;

/// Compression errors.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("zlib compression failed: {0}")]
    CompressionFailed(String),

    #[error("zlib stream is corrupt or incomplete: {0}")]
    DecompressionFailed(String),
}

/// Compresses data at the given level (0-9, clamped).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = ZlibEncoder::new(data, Compression::new(level.min(9)));
    let mut compressed = Vec::new();

    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;

    Ok(compressed)
}

/// Decompresses data produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    if data.is_empty() {
        return Err(CompressionError::DecompressionFailed(
            "no input".to_string(),
        ));
    }

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| CompressionError::DecompressionFailed(e.to_string()))?;

    Ok(decompressed)
}
