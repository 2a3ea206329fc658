// Tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod decode;
mod flash;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Fault recorder development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash the demo firmware to the STM32H743 Nucleo via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Build the demo that deliberately faults after boot
        #[arg(long)]
        fault_demo: bool,
    },
    /// Check the recorder for every supported architecture target
    Check,
    /// Run all host tests (unit, integration and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Decode a fault record dumped from a target
    ///
    /// Accepts a raw 140-byte little-endian image, or the text output of
    /// `probe-rs read b32 <FAULT_RECORD address> 35`.
    Decode {
        /// Dumped record
        input: PathBuf,
        /// Architecture the record was captured on
        #[arg(long, default_value = "armv7em")]
        arch: String,
        /// Record was captured by a Secure-world recorder
        #[arg(long)]
        secure: bool,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Flash {
            release,
            fault_demo,
        } => flash::run(release, fault_demo),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Decode {
            input,
            arch,
            secure,
            json,
        } => decode::run(&input, &arch, secure, json),
    }
}
