//! # as2 CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use as2_cli::extract::{run_extract, ExtractArgs};
use as2_cli::open::{run_open, OpenArgs};
use as2_cli::send::{run_send, SendArgs};

/// AS2 sender.
///
/// Packages a file as an AS2 message (optionally signed and encrypted with
/// S/MIME) and POSTs it to a trading partner. Partner settings come from
/// `AS2_*` environment variables; flags override them.
#[derive(Parser, Debug)]
#[command(name = "as2", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a file to the configured partner.
    Send(SendArgs),

    /// Extract the first part of a multipart body (no signature check).
    Extract(ExtractArgs),

    /// Decrypt and extract a received AS2 body.
    Open(OpenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("as2 CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Send(args) => run_send(&args),
        Commands::Extract(args) => run_extract(&args),
        Commands::Open(args) => run_open(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
