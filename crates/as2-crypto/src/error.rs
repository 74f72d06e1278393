//! CMS backend errors.

use thiserror::Error;

/// A signing, enveloping or decryption call failed.
///
/// Propagated to the caller as-is; the send pipeline does not interpret
/// backend failures.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The backend ran but rejected the request (bad certificate, wrong
    /// password, corrupt ciphertext, ...).
    #[error("{operation} failed: {reason}")]
    Backend {
        /// The CMS operation that failed.
        operation: &'static str,
        /// Backend diagnostic output.
        reason: String,
    },

    /// The backend could not be started or talked to.
    #[error("{operation}: I/O error: {source}")]
    Io {
        /// The CMS operation in progress.
        operation: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A required key or certificate is not available.
    #[error("missing key material: {0}")]
    MissingKeyMaterial(String),

    /// The message was encrypted with an algorithm outside the supported set.
    #[error("unsupported content-encryption algorithm: {0}")]
    UnsupportedCipher(String),
}
