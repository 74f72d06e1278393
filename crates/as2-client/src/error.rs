//! AS2 client error types.

use as2_core::ValidationError;
use as2_crypto::CryptoError;
use as2_mime::MimeError;

use crate::config::ConfigError;

/// Errors from the HTTP collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The blocking transport was called outside a Tokio runtime.
    #[error("no async runtime available for HTTP request")]
    NoRuntime,
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    /// The proxy address or credentials were rejected.
    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),
    /// No response within the configured timeout.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    /// Connection refused, DNS failure, TLS failure, ...
    #[error("connection failed: {0}")]
    Connection(String),
    /// A header name or value cannot be sent over HTTP.
    #[error("header {name} cannot be sent over HTTP")]
    InvalidHeader { name: String },
    /// The partner answered with a non-2xx status.
    #[error("partner returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Any failure of an AS2 transaction.
#[derive(Debug, thiserror::Error)]
pub enum As2Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Mime(#[from] MimeError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
