//! Decode command - recover a secret from a stego image.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use kavach::raster::load_pixels;
use kavach::{decode_with_config, Config};

use super::CommandExecutor;

/// Recover a secret message from a stego image.
///
/// The image must be the exact PNG written by `encode`. Unlike a
/// deniable scheme, a wrong key is reported as an error.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Stego image produced by `encode`
    #[arg(short, long)]
    pub image: PathBuf,

    /// Decryption key (must match the encoding key)
    #[arg(short, long)]
    pub key: String,

    /// Write the secret to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self, config: &Config) -> Result<()> {
        if self.key.is_empty() {
            bail!("Key cannot be empty");
        }

        let stego = load_pixels(&self.image)
            .with_context(|| format!("Failed to read image from {}", self.image.display()))?;

        let secret = decode_with_config(&stego, &self.key, config)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, secret.as_bytes())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Secret written to {} ({} bytes)", path.display(), secret.len());
            }
            None => println!("{}", secret),
        }

        Ok(())
    }
}
