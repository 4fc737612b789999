//! Human-readable summaries of a [`SecurityReport`].
//!
//! Narrative generation is an injected collaborator. The codec never depends
//! on it: [`narrate`] swallows any failure and returns a placeholder.

use thiserror::Error;
use tracing::warn;

use crate::config::DEFAULT_NARRATIVE_PLACEHOLDER;
use crate::metrics::{MseRating, PsnrRating, SecurityReport};

/// Errors a narrative backend may report.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative service unavailable: {0}")]
    Unavailable(String),

    #[error("Narrative service returned no text")]
    Empty,
}

/// Something that can describe a report in prose.
pub trait NarrativeService {
    fn summarize(&self, report: &SecurityReport) -> Result<String, NarrativeError>;
}

/// Asks `service` for a summary, treating blank text as [`NarrativeError::Empty`].
pub fn summarize_checked(
    service: &dyn NarrativeService,
    report: &SecurityReport,
) -> Result<String, NarrativeError> {
    let text = service.summarize(report)?;
    if text.trim().is_empty() {
        return Err(NarrativeError::Empty);
    }
    Ok(text)
}

/// Asks `service` for a summary, falling back to `placeholder` on any error
/// or empty answer.
pub fn narrate_or(
    service: &dyn NarrativeService,
    report: &SecurityReport,
    placeholder: &str,
) -> String {
    summarize_checked(service, report).unwrap_or_else(|e| {
        warn!(error = %e, "narrative generation failed");
        placeholder.to_string()
    })
}

/// [`narrate_or`] with the default placeholder.
pub fn narrate(service: &dyn NarrativeService, report: &SecurityReport) -> String {
    narrate_or(service, report, DEFAULT_NARRATIVE_PLACEHOLDER)
}

/// The briefing prompt sent to a remote language model.
pub fn analysis_prompt(report: &SecurityReport) -> String {
    format!(
        "Analyze the following steganography performance metrics for Project Kavach (a defense system):\n\
         - Peak Signal-to-Noise Ratio (PSNR): {:.2} dB\n\
         - Mean Squared Error (MSE): {:.4}\n\
         - Extraction Accuracy: {}%\n\
         - Security Robustness Index: {}/100\n\
         \n\
         Provide a professional, technical summary (max 150 words) evaluating the stealth quality, \
         detectability by statistical steganalysis tools, and recommendations for improvement. \
         Use a tone suitable for a cybersecurity briefing.",
        report.psnr, report.mse, report.accuracy, report.security_index
    )
}

/// Local, deterministic summary built from the metric bands.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAnalyst;

impl NarrativeService for OfflineAnalyst {
    fn summarize(&self, report: &SecurityReport) -> Result<String, NarrativeError> {
        let stealth = match report.psnr_rating() {
            PsnrRating::Exceptional => {
                "Visual distortion is far below the threshold of perception."
            }
            PsnrRating::High => "Distortion is imperceptible under normal viewing.",
            PsnrRating::Medium => {
                "Distortion may be visible on flat regions; consider a larger carrier."
            }
        };
        let noise = match report.mse_rating() {
            MseRating::Low => "The embedding footprint is small.",
            MseRating::Noticeable => {
                "A large share of samples changed, which raises the odds of detection by \
                 chi-square or RS steganalysis."
            }
        };

        Ok(format!(
            "PSNR {:.2} dB ({}), MSE {:.4} ({}). {} {} Extraction accuracy {:.2}%, security index {:.0}/100. \
             Sequential LSB embedding is fragile: share the stego image only in a lossless format.",
            report.psnr,
            report.psnr_rating().label(),
            report.mse,
            report.mse_rating().label(),
            stealth,
            noise,
            report.accuracy,
            report.security_index,
        ))
    }
}
