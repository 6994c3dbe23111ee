//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use enigma::utils::format::DEFAULT_GROUP;

/// Rotor cipher machine simulator.
#[derive(Parser, Debug, Clone)]
#[command(name = "enigma")]
#[command(about = "Encrypts and decrypts messages with a simulated rotor cipher machine")]
#[command(version)]
pub struct Cli {
    /// Machine description file (alphabet, slot and pawl counts, rotors).
    pub config: PathBuf,

    /// File holding settings and message lines; standard input if absent.
    pub input: Option<PathBuf>,

    /// File receiving the converted messages; standard output if absent.
    pub output: Option<PathBuf>,

    /// Trace the signal path of every character (implies --log-level trace).
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Symbols per output group; 0 disables grouping.
    #[arg(long, default_value_t = DEFAULT_GROUP)]
    pub group: usize,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the log filter directive to use when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &str {
        if self.verbose {
            "trace"
        } else {
            &self.log_level
        }
    }
}
