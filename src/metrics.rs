//! Fidelity metrics for stego images.
//!
//! MSE is measured over the R, G and B samples only, matching the channels
//! the embedder writes to. PSNR and the security index are derived from it.

use serde::{Deserialize, Serialize};

use crate::stego::pixels::sample_count;
use crate::stego::{is_eligible, PixelBuffer, StegoError, CHANNELS, ELIGIBLE_CHANNELS};

/// PSNR reported for identical images.
pub const PSNR_CEILING: f64 = 100.0;

/// Peak sample value for 8-bit channels.
const MAX_SAMPLE: f64 = 255.0;

/// PSNR (dB) at which the security index starts rising above zero.
const SECURITY_FLOOR_DB: f64 = 30.0;

/// Security index points gained per dB above the floor.
const SECURITY_SLOPE: f64 = 2.0;

/// Fidelity and security figures for one embedding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    /// Peak signal-to-noise ratio in dB.
    pub psnr: f64,
    /// Mean squared error over RGB samples.
    pub mse: f64,
    /// Percentage of payload bits read back intact.
    pub accuracy: f64,
    /// PSNR mapped onto 0..=100.
    pub security_index: f64,
}

impl SecurityReport {
    /// Builds a report from an MSE value, assuming a perfect read-back.
    pub fn from_mse(mse: f64) -> Self {
        let psnr = psnr(mse);
        Self {
            psnr,
            mse,
            accuracy: 100.0,
            security_index: security_index(psnr),
        }
    }

    /// Replaces the optimistic accuracy with a measured one.
    pub fn with_accuracy(self, accuracy: f64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 100.0),
            ..self
        }
    }

    pub fn psnr_rating(&self) -> PsnrRating {
        PsnrRating::from_psnr(self.psnr)
    }

    pub fn mse_rating(&self) -> MseRating {
        MseRating::from_mse(self.mse)
    }
}

/// Qualitative PSNR bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PsnrRating {
    Exceptional,
    High,
    Medium,
}

impl PsnrRating {
    pub fn from_psnr(psnr: f64) -> Self {
        if psnr > 45.0 {
            Self::Exceptional
        } else if psnr > 40.0 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exceptional => "Exceptional",
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

/// Qualitative MSE bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MseRating {
    Low,
    Noticeable,
}

impl MseRating {
    pub fn from_mse(mse: f64) -> Self {
        if mse < 0.1 {
            Self::Low
        } else {
            Self::Noticeable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Noticeable => "Noticeable",
        }
    }
}

/// PSNR for a given MSE; [`PSNR_CEILING`] when the MSE is zero.
pub fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        PSNR_CEILING
    } else {
        10.0 * (MAX_SAMPLE * MAX_SAMPLE / mse).log10()
    }
}

/// `clamp((psnr - 30) * 2, 0, 100)`.
pub fn security_index(psnr: f64) -> f64 {
    ((psnr - SECURITY_FLOOR_DB) * SECURITY_SLOPE).clamp(0.0, 100.0)
}

/// Compares two images of the same dimensions.
pub fn compute(
    original: &PixelBuffer,
    modified: &PixelBuffer,
) -> Result<SecurityReport, StegoError> {
    if original.width() != modified.width() || original.height() != modified.height() {
        return Err(StegoError::ShapeMismatch {
            expected_width: original.width(),
            expected_height: original.height(),
            actual_width: modified.width(),
            actual_height: modified.height(),
        });
    }
    compute_raw(
        original.as_bytes(),
        modified.as_bytes(),
        original.width(),
        original.height(),
    )
}

/// Compares two raw RGBA sample slices of `width x height` pixels.
pub fn compute_raw(
    original: &[u8],
    modified: &[u8],
    width: u32,
    height: u32,
) -> Result<SecurityReport, StegoError> {
    let expected = sample_count(width, height)?;
    let rgb_samples = expected / CHANNELS * ELIGIBLE_CHANNELS;
    for actual in [original.len(), modified.len()] {
        if actual != expected {
            return Err(StegoError::DimensionMismatch { expected, actual });
        }
    }

    let squared_error: u64 = original
        .iter()
        .zip(modified)
        .enumerate()
        .filter(|(index, _)| is_eligible(*index))
        .map(|(_, (&a, &b))| {
            let diff = i64::from(a) - i64::from(b);
            (diff * diff) as u64
        })
        .sum();

    let mse = squared_error as f64 / rgb_samples as f64;
    Ok(SecurityReport::from_mse(mse))
}

/// Percentage of positions where `expected` and `actual` agree.
///
/// Missing bits on either side count as mismatches. Two empty sequences
/// agree completely.
pub fn bit_accuracy<E, A>(expected: E, actual: A) -> f64
where
    E: IntoIterator<Item = u8>,
    A: IntoIterator<Item = u8>,
{
    let mut expected = expected.into_iter();
    let mut actual = actual.into_iter();
    let mut total = 0usize;
    let mut matched = 0usize;

    loop {
        match (expected.next(), actual.next()) {
            (None, None) => break,
            (Some(e), Some(a)) => {
                total += 1;
                if e & 1 == a & 1 {
                    matched += 1;
                }
            }
            (Some(_), None) => total += 1,
            // Extra bits past the expected sequence are not part of the payload.
            (None, Some(_)) => break,
        }
    }

    if total == 0 {
        100.0
    } else {
        matched as f64 * 100.0 / total as f64
    }
}

/// [`bit_accuracy`] over two byte strings, comparing them MSB-first.
pub fn byte_accuracy(expected: &[u8], actual: &[u8]) -> f64 {
    bit_accuracy(msb_bits(expected), msb_bits(actual))
}

fn msb_bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}
