//! Capacity command - how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kavach::raster::load_pixels;
use kavach::{capacity, Config};

use super::CommandExecutor;

/// Show how many bits and bytes a carrier image can hold.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier image
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &Config) -> Result<()> {
        let carrier = load_pixels(&self.carrier)
            .with_context(|| format!("Failed to read carrier from {}", self.carrier.display()))?;

        let cap = capacity(&carrier, config);

        println!("Carrier Capacity");
        println!("================");
        println!("  Dimensions:     {}x{}", carrier.width(), carrier.height());
        println!("  Available bits: {}", cap.available_bits);
        println!("  Max blob size:  {} bytes", cap.max_blob_bytes);
        println!();
        println!("  Compression usually shrinks text; encryption adds about 53 bytes.");

        Ok(())
    }
}
