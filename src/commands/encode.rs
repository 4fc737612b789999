//! Encode command - hide a secret in a carrier image.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use kavach::narrative::narrate_or;
use kavach::raster::{load_pixels, save_png};
use kavach::{encode_with_config, Config, OfflineAnalyst};

use super::{print_report, CommandExecutor};

/// Hide a secret message in a carrier image.
///
/// The secret is compressed, encrypted with the key, and written into the
/// least significant bits of the carrier's RGB samples. The output is always
/// PNG; converting it to a lossy format destroys the hidden data.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Carrier image (PNG, BMP, JPEG, ...)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Secret text (mutually exclusive with --file; reads stdin if neither is given)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// Read the secret text from a UTF-8 file
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Encryption key
    #[arg(short, long)]
    pub key: String,

    /// Where to write the stego image (PNG)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Append a prose analysis of the report
    #[arg(long)]
    pub analysis: bool,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self, config: &Config) -> Result<()> {
        if self.key.is_empty() {
            bail!("Key cannot be empty");
        }

        let secret = self.read_secret()?;

        let carrier = load_pixels(&self.carrier)
            .with_context(|| format!("Failed to read carrier from {}", self.carrier.display()))?;

        let source = self
            .carrier
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.carrier.display().to_string());

        let result = encode_with_config(&carrier, &secret, &self.key, config)?.with_source(source);

        save_png(result.pixels(), &self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        let report = result.report();
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
        } else {
            print_report(report, result.source());
            println!();
            println!("Stego image written to {}", self.output.display());
        }

        if self.analysis {
            println!();
            println!(
                "{}",
                narrate_or(&OfflineAnalyst, report, &config.narrative_placeholder)
            );
        }

        Ok(())
    }
}

impl EncodeCommand {
    fn read_secret(&self) -> Result<String> {
        if let Some(message) = &self.message {
            return Ok(message.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read secret from {}", path.display()));
        }

        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read secret from stdin")?;
        Ok(buffer)
    }
}
