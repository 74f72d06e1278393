//! # as2-client: AS2 Send Pipeline
//!
//! Turns a file into an AS2 HTTP request and posts it:
//!
//! ```text
//! Transaction ──validate──▶ orchestrator::package ──▶ TransactionHeaders ──▶ Transport::post
//!                            (wrap → sign → encrypt)
//! ```
//!
//! ## Modules
//!
//! - [`transaction`]: the per-send value object and its up-front checks.
//! - [`orchestrator`]: decides between plain, signed, encrypted and
//!   signed-then-encrypted bodies, and the inverse `unpack`.
//! - [`headers`]: the AS2 HTTP header set.
//! - [`transport`]: the HTTP collaborator trait and its `reqwest`
//!   implementation.
//! - [`sender`]: ties the above together, one attempt per call.
//! - [`config`]: environment-driven configuration.
//!
//! ## Concurrency
//!
//! Every boundary, message id and buffer is transaction-local. One
//! [`As2Sender`] may serve many threads at once.
//!
//! ## Retries
//!
//! None. A failed post surfaces immediately as [`As2Error::Transport`];
//! retry policy belongs to the caller.

pub mod config;
pub mod error;
pub mod headers;
pub mod orchestrator;
pub mod sender;
pub mod transaction;
pub mod transport;

pub use config::{As2Config, ConfigError, ProxySettings, TransportConfig};
pub use error::{As2Error, TransportError};
pub use headers::{base_content_type, HeaderSet, TransactionHeaders};
pub use orchestrator::{package, unpack, Packaged, Unpacked};
pub use sender::{As2Sender, SendReceipt};
pub use transaction::{Encryption, PreparedMessage, Transaction};
pub use transport::{HttpTransport, StatusCode, Transport};
