//! Kavach - encrypted LSB steganography for images
//!
//! A CLI tool that hides encrypted text in lossless images and reports the
//! distortion it caused.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use commands::{AnalyzeCommand, CapacityCommand, CommandExecutor, DecodeCommand, EncodeCommand};
use kavach::Config;

/// Kavach - encrypted LSB steganography for images
///
/// Secrets are compressed, encrypted with a key, and hidden in the least
/// significant bits of a carrier image. Keep stego images in PNG: any lossy
/// re-encoding destroys the hidden data.
#[derive(Parser)]
#[command(name = "kavach")]
#[command(version)]
#[command(about = "Hide encrypted text in images and measure the distortion")]
#[command(long_about = None)]
struct Cli {
    /// Config file (default: ~/.kavach/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a secret message in a carrier image
    Encode(EncodeCommand),

    /// Recover a secret message from a stego image
    Decode(DecodeCommand),

    /// Show how much a carrier image can hold
    Capacity(CapacityCommand),

    /// Compare an original and a modified image
    Analyze(AnalyzeCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Encode(cmd) => cmd,
            Commands::Decode(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
            Commands::Analyze(cmd) => cmd,
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };
        EnvFilter::default().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    cli.command.executor().execute(&config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(kind) = err.downcast_ref::<kavach::Error>() {
                eprintln!("Hint: {}", kind.hint());
            }
            ExitCode::FAILURE
        }
    }
}
