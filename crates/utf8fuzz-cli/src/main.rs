//! `utf8fuzz`: runs every decoding call shape over one input file and aborts
//! if any two of them disagree.
//!
//! ```text
//! utf8fuzz crash-0001.bin
//! RUST_LOG=debug utf8fuzz corpus/mixed.txt
//! ```
//!
//! Malformed UTF-8 in the file is expected. Only a disagreement between call
//! shapes ends the process with `abort`, so file-driven fuzzers see a crash.

mod input;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utf8fuzz::{Oracle, OracleOptions};

#[derive(Parser, Debug)]
#[command(name = "utf8fuzz", version)]
#[command(about = "Cross-check UTF-8 decoding APIs on one input file", long_about = None)]
struct Cli {
    /// File to decode; a leading UTF-8 BOM is stripped
    input: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let bytes = input::load(&cli.input)?;

    info!("-- BEGIN TEST --");
    match Oracle::new(&bytes, OracleOptions::default()).run() {
        Ok(report) => {
            info!("{report}");
            info!("-- END TEST - SUCCESS --");
            Ok(())
        }
        Err(violation) => {
            error!(check = %violation.check, offset = ?violation.byte_offset(), "{violation}");
            std::process::abort();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
