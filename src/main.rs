//! Rotor cipher machine command-line tool.
//!
//! Reads a machine description, then converts the settings and message
//! lines of the input file (or standard input).

mod cli;
mod session;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use enigma::config::MachineConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::session::Options;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    tracing::info!("enigma v{}", env!("CARGO_PKG_VERSION"));

    let text = fs::read_to_string(&cli.config)
        .with_context(|| format!("cannot read configuration {}", cli.config.display()))?;
    let config = MachineConfig::parse(&text)
        .with_context(|| format!("bad configuration {}", cli.config.display()))?;
    let mut machine = config.build_machine()?;

    let options = Options {
        group: cli.group,
        verbose: cli.verbose,
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create output {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let output = BufWriter::new(output);

    match &cli.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open input {}", path.display()))?;
            session::process(&mut machine, BufReader::new(file), output, options)
        }
        None => session::process(&mut machine, io::stdin().lock(), output, options),
    }
}
