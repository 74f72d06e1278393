//! # Extract Subcommand
//!
//! Structural extraction of the first part of a multipart body. The
//! signature part, if any, is NOT verified; `--signature-out` saves it for
//! separate verification.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use as2_mime::{extract_payload, extract_signature};

/// Arguments for `as2 extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Multipart body to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The body's Content-Type header value (must carry a boundary).
    #[arg(long)]
    pub content_type: String,

    /// Write the payload here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also write the decoded signature part here.
    #[arg(long)]
    pub signature_out: Option<PathBuf>,
}

/// Execute `as2 extract`.
pub fn run_extract(args: &ExtractArgs) -> Result<u8> {
    let message = std::fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;

    let payload = extract_payload(&message, &args.content_type)
        .with_context(|| format!("failed to extract payload from {}", args.file.display()))?;
    tracing::debug!(payload_len = payload.len(), "extracted payload");
    crate::write_output(args.out.as_deref(), payload)?;

    if let Some(path) = &args.signature_out {
        let signature = extract_signature(&message, &args.content_type).context("failed to extract signature")?;
        std::fs::write(path, &signature).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(0)
}
