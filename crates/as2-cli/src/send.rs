//! # Send Subcommand
//!
//! Reads a file, applies the configured signing and encryption, and
//! posts it to the partner. With `--dry-run` the prepared message is
//! written to disk (or summarized) instead of being sent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use as2_client::{As2Config, As2Sender, Encryption, HttpTransport, PreparedMessage, Transaction};
use as2_crypto::OpensslCli;

/// Arguments for `as2 send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// File to send.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Partner URL (overrides AS2_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Our AS2 identifier (overrides AS2_FROM).
    #[arg(long)]
    pub from: Option<String>,

    /// Partner AS2 identifier (overrides AS2_TO).
    #[arg(long)]
    pub to: Option<String>,

    /// Name announced in Subject and Content-Disposition. Defaults to the
    /// file's own name.
    #[arg(long)]
    pub filename: Option<String>,

    /// Signing certificate (overrides AS2_SIGNING_CERT).
    #[arg(long)]
    pub sign_cert: Option<PathBuf>,

    /// Signing private key, if separate from the certificate.
    #[arg(long)]
    pub sign_key: Option<PathBuf>,

    /// Name of the environment variable holding the signing key password.
    #[arg(long, value_name = "VAR")]
    pub sign_password_env: Option<String>,

    /// Partner certificate; enables encryption (overrides AS2_RECIPIENT_CERT).
    #[arg(long)]
    pub recipient_cert: Option<PathBuf>,

    /// Content cipher: 3DES or RC2 (overrides AS2_CIPHER).
    #[arg(long)]
    pub cipher: Option<String>,

    /// Request timeout in milliseconds (overrides AS2_TIMEOUT_MS).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Path to the openssl executable.
    #[arg(long, default_value = "openssl")]
    pub openssl: PathBuf,

    /// Prepare the message but do not send it.
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, write body.bin and headers.json here.
    #[arg(long, requires = "dry_run")]
    pub out: Option<PathBuf>,
}

/// Execute `as2 send`.
pub fn run_send(args: &SendArgs) -> Result<u8> {
    if !args.file.is_file() {
        bail!("file not found: {}", args.file.display());
    }
    let content = std::fs::read(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let filename = match &args.filename {
        Some(name) => name.clone(),
        None => args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("cannot derive a filename from the path")?,
    };

    let overrides = flag_overrides(args)?;
    let config = As2Config::from_lookup(|var| overrides.get(var).cloned().or_else(|| std::env::var(var).ok()))
        .context("invalid AS2 configuration")?;
    tracing::debug!(?config, "resolved configuration");

    let mut transaction = Transaction::new(config.url.clone(), filename, content, config.from.clone(), config.to.clone());
    if let Some(identity) = config.signing.clone() {
        transaction = transaction.with_signing(identity);
    }
    if let Some(recipient) = config.recipient.clone() {
        transaction = transaction.with_encryption(Encryption::new(recipient, config.cipher));
    }

    let crypto = OpensslCli::with_program(&args.openssl);

    if args.dry_run {
        let prepared = transaction.prepare(&crypto).context("failed to prepare message")?;
        return report_dry_run(&prepared, args.out.as_deref());
    }

    let transport = HttpTransport::new(&config.transport).context("failed to build HTTP client")?;
    let sender = As2Sender::new(crypto, transport);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let _guard = runtime.enter();

    let receipt = sender
        .send(&transaction)
        .with_context(|| format!("failed to send {} to {}", transaction.filename, transaction.url))?;

    println!("OK: {} accepted with HTTP {}", receipt.message_id, receipt.status);
    println!("  Content-Type: {}", receipt.content_type);
    println!("  Body: {} bytes", receipt.body_len);
    Ok(0)
}

/// Translate flags into `AS2_*` variables that take precedence over the
/// environment.
fn flag_overrides(args: &SendArgs) -> Result<HashMap<&'static str, String>> {
    let mut vars = HashMap::new();
    let path = |p: &Path| p.to_string_lossy().into_owned();

    if let Some(url) = &args.url {
        vars.insert("AS2_URL", url.clone());
    }
    if let Some(from) = &args.from {
        vars.insert("AS2_FROM", from.clone());
    }
    if let Some(to) = &args.to {
        vars.insert("AS2_TO", to.clone());
    }
    if let Some(cert) = &args.sign_cert {
        vars.insert("AS2_SIGNING_CERT", path(cert));
    }
    if let Some(key) = &args.sign_key {
        vars.insert("AS2_SIGNING_KEY", path(key));
    }
    if let Some(var) = &args.sign_password_env {
        let password = std::env::var(var).with_context(|| format!("environment variable {var} is not set"))?;
        vars.insert("AS2_SIGNING_PASSWORD", password);
    }
    if let Some(cert) = &args.recipient_cert {
        vars.insert("AS2_RECIPIENT_CERT", path(cert));
    }
    if let Some(cipher) = &args.cipher {
        vars.insert("AS2_CIPHER", cipher.clone());
    }
    if let Some(ms) = args.timeout_ms {
        vars.insert("AS2_TIMEOUT_MS", ms.to_string());
    }
    Ok(vars)
}

fn report_dry_run(prepared: &PreparedMessage, out: Option<&Path>) -> Result<u8> {
    let headers = serde_json::to_string_pretty(&prepared.headers).context("failed to serialize headers")?;

    match out {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            let body_path = dir.join("body.bin");
            let headers_path = dir.join("headers.json");
            std::fs::write(&body_path, &prepared.body)
                .with_context(|| format!("failed to write {}", body_path.display()))?;
            std::fs::write(&headers_path, &headers)
                .with_context(|| format!("failed to write {}", headers_path.display()))?;
            println!("OK: prepared {} (not sent)", prepared.message_id);
            println!("  Body:    {}", body_path.display());
            println!("  Headers: {}", headers_path.display());
        }
        None => {
            println!("{headers}");
            println!("OK: prepared {} ({} bytes, not sent)", prepared.message_id, prepared.body.len());
        }
    }
    Ok(0)
}
