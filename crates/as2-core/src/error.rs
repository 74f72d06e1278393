//! # Validation Errors
//!
//! Raised before any collaborator (signer, enveloper, HTTP client) is
//! invoked. Validation failures are never retried: the same input fails
//! the same way every time.

use thiserror::Error;

/// A transaction input was rejected before any work was attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The filename is empty.
    #[error("filename must not be empty")]
    EmptyFilename,

    /// The content to send is empty.
    #[error("content must not be empty")]
    EmptyContent,

    /// An AS2 participant identifier is empty.
    #[error("AS2 identifier must not be empty")]
    EmptyIdentifier,

    /// A value destined for an HTTP or MIME header contains a line break
    /// or other control character.
    #[error("invalid value for {field}: {value:?}")]
    InvalidHeaderValue {
        /// Header or field the value was intended for.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Encryption was requested but the recipient identity carries no
    /// certificate reference.
    #[error("encryption requested but no recipient certificate was specified")]
    MissingRecipientCertificate,

    /// The cipher name is not one of the supported content-encryption
    /// algorithms.
    #[error("cipher must be 3DES or RC2, got {0:?}")]
    UnknownCipher(String),
}
