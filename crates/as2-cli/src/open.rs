//! # Open Subcommand
//!
//! Decrypts (when enveloped) and extracts (when signed) a received AS2
//! body with our own certificate and key. Signatures are reported, not
//! verified.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use as2_client::unpack;
use as2_crypto::{OpensslCli, SigningIdentity};

/// Arguments for `as2 open`.
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Received body.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The body's Content-Type header value.
    #[arg(long)]
    pub content_type: String,

    /// Our certificate.
    #[arg(long)]
    pub cert: PathBuf,

    /// Our private key, if separate from the certificate.
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Name of the environment variable holding the key password.
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,

    /// Write the payload here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Path to the openssl executable.
    #[arg(long, default_value = "openssl")]
    pub openssl: PathBuf,
}

/// Execute `as2 open`.
pub fn run_open(args: &OpenArgs) -> Result<u8> {
    let body = std::fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut identity = SigningIdentity::new(args.cert.clone());
    if let Some(key) = &args.key {
        identity = identity.with_private_key(key.clone());
    }
    if let Some(var) = &args.password_env {
        let password = std::env::var(var).with_context(|| format!("environment variable {var} is not set"))?;
        identity = identity.with_secret(password);
    }

    let crypto = OpensslCli::with_program(&args.openssl);
    let opened = unpack(&body, &args.content_type, Some(&identity), &crypto)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    crate::write_output(args.out.as_deref(), &opened.payload)?;

    let cipher = opened.cipher.map_or_else(|| "none".to_string(), |c| c.to_string());
    let signature = match &opened.signature {
        Some(sig) => format!("present, {} bytes, NOT verified", sig.len()),
        None => "none".to_string(),
    };
    eprintln!("OK: {} payload bytes", opened.payload.len());
    eprintln!("  Content-Type: {}", opened.content_type);
    eprintln!("  Cipher:       {cipher}");
    eprintln!("  Signature:    {signature}");
    Ok(0)
}
