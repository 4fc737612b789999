//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod analyze;
mod capacity;
mod decode;
mod encode;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;

use anyhow::Result;
use kavach::{Config, SecurityReport};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &Config) -> Result<()>;
}

/// Prints a report as an aligned table.
fn print_report(report: &SecurityReport, source: Option<&str>) {
    println!("Kavach Security Report");
    println!("======================");
    if let Some(source) = source {
        println!("  Source:         {}", source);
    }
    println!(
        "  PSNR:           {:.2} dB ({})",
        report.psnr,
        report.psnr_rating().label()
    );
    println!(
        "  MSE:            {:.6} ({})",
        report.mse,
        report.mse_rating().label()
    );
    println!("  Accuracy:       {:.2}%", report.accuracy);
    println!("  Security index: {:.1}/100", report.security_index);
}
