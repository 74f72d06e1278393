//! # as2-crypto: S/MIME Collaborator Interface
//!
//! The AS2 sender never computes a signature or encrypts a byte itself.
//! It hands buffers to a CMS backend through the traits defined here and
//! treats the results as opaque DER.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`CmsSigner`] and [`CmsEnveloper`], plus the
//!   [`CmsBackend`] umbrella the send pipeline is generic over.
//!
//! - **OpenSSL** (`openssl.rs`): [`OpensslCli`] drives `openssl cms` as a
//!   child process. Certificates and keys stay on disk; payloads travel
//!   over stdin/stdout.
//!
//! - **Mock** (`mock.rs`, feature `mock`): [`MockCms`] is deterministic,
//!   reversible and records every call, so tests can assert exactly which
//!   collaborator operations a pipeline performed.
//!
//! ## Key Material
//!
//! Identities carry *references* (file paths) plus an optional unlock
//! secret. The secret is held in `Zeroizing<String>`, redacted from
//! `Debug`, and never placed on a command line.
//!
//! ## Crate Policy
//!
//! - Depends only on `as2-core` internally.
//! - Backend failures surface as [`CryptoError`] unchanged; nothing here
//!   retries or reinterprets them.

pub mod cipher;
pub mod error;
pub mod identity;
#[cfg(feature = "mock")]
pub mod mock;
pub mod openssl;
pub mod traits;

pub use cipher::Cipher;
pub use error::CryptoError;
pub use identity::{CertificateRef, RecipientIdentity, SigningIdentity};
#[cfg(feature = "mock")]
pub use mock::{CmsCall, MockCms};
pub use openssl::OpensslCli;
pub use traits::{CmsBackend, CmsEnveloper, CmsSigner, Unenveloped};
