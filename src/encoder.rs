//! Secret encoding.
//!
//! This module orchestrates the encoding process:
//! 1. Compress and encrypt the secret (payload codec)
//! 2. Frame the blob behind a 32-bit length header
//! 3. Embed the frame into a copy of the carrier (LSB)
//! 4. Measure fidelity against the untouched carrier
//! 5. Optionally extract the payload again and compare it with the blob

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::metrics::{self, byte_accuracy, SecurityReport};
use crate::stego::{max_payload_len, LsbCodec, PixelBuffer};
use crate::Error;

/// Output of a successful [`encode`]. Never modified after creation.
#[derive(Debug, Clone)]
pub struct StegoResult {
    pixels: PixelBuffer,
    report: SecurityReport,
    source: Option<String>,
}

impl StegoResult {
    /// Tags the result with the carrier's file name.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    /// The stego image.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn report(&self) -> &SecurityReport {
        &self.report
    }

    /// File name of the carrier this result was produced from, if known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// How much a carrier can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Eligible (RGB) samples, one bit each.
    pub available_bits: usize,
    /// Largest encrypted blob, in bytes, the carrier accepts.
    pub max_blob_bytes: usize,
}

/// Reports the capacity of `carrier`, honoring the payload ceiling.
pub fn capacity(carrier: &PixelBuffer, config: &Config) -> Capacity {
    let codec = config.lsb_codec();
    Capacity {
        available_bits: codec.capacity_bits(carrier),
        max_blob_bytes: max_payload_len(carrier.pixel_count()).min(config.max_payload_bytes),
    }
}

/// Hides `secret` in `carrier` under `key` with the default configuration.
pub fn encode(carrier: &PixelBuffer, secret: &str, key: &str) -> Result<StegoResult, Error> {
    encode_with_config(carrier, secret, key, &Config::default())
}

/// Hides `secret` in `carrier` under `key`.
///
/// `carrier` is never modified; the stego image is a new buffer. On error no
/// image is produced.
pub fn encode_with_config(
    carrier: &PixelBuffer,
    secret: &str,
    key: &str,
    config: &Config,
) -> Result<StegoResult, Error> {
    let blob = config.payload_codec().pack(secret, key)?;

    let lsb = config.lsb_codec();
    let bits = lsb.packer().to_bits(blob.as_bytes())?;

    let mut working = carrier.clone();
    lsb.embed_bits(&mut working, &bits)?;

    let mut report = metrics::compute(carrier, &working)?;

    if config.verify_embedding {
        let accuracy = extraction_accuracy(&lsb, &working, blob.as_bytes());
        debug!(accuracy, "verified embedded payload");
        report = report.with_accuracy(accuracy);
    }

    info!(
        width = carrier.width(),
        height = carrier.height(),
        blob_bytes = blob.len(),
        psnr = report.psnr,
        "encoded secret into carrier"
    );

    Ok(StegoResult {
        pixels: working,
        report,
        source: None,
    })
}

/// Self-check: runs the extractor over `stego` and scores the result against
/// `expected`. An unreadable frame scores 0.
fn extraction_accuracy(lsb: &LsbCodec, stego: &PixelBuffer, expected: &[u8]) -> f64 {
    match lsb.extract(stego) {
        Ok(extracted) => byte_accuracy(expected, &extracted),
        Err(e) => {
            warn!(error = %e, "embedded payload could not be read back");
            0.0
        }
    }
}
