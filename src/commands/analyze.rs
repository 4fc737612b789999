//! Analyze command - fidelity metrics between two images.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kavach::narrative::narrate_or;
use kavach::raster::load_pixels;
use kavach::{compute, Config, OfflineAnalyst};

use super::{print_report, CommandExecutor};

/// Compare an original image with a modified one (MSE, PSNR, security index).
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// The untouched carrier
    #[arg(long)]
    pub original: PathBuf,

    /// The stego image
    #[arg(long)]
    pub modified: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Append a prose analysis of the report
    #[arg(long)]
    pub analysis: bool,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self, config: &Config) -> Result<()> {
        let original = load_pixels(&self.original)
            .with_context(|| format!("Failed to read {}", self.original.display()))?;
        let modified = load_pixels(&self.modified)
            .with_context(|| format!("Failed to read {}", self.modified.display()))?;

        let report = compute(&original, &modified).context("Images are not comparable")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            let source = self.original.display().to_string();
            print_report(&report, Some(&source));
        }

        if self.analysis {
            println!();
            println!(
                "{}",
                narrate_or(&OfflineAnalyst, &report, &config.narrative_placeholder)
            );
        }

        Ok(())
    }
}
