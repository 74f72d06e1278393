//! # as2-core: Foundational Types for the AS2 Sender
//!
//! Leaf crate of the workspace. Defines the identifiers that flow into
//! AS2 HTTP headers and the validation errors raised before any network
//! or cryptographic work begins.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for header-bound identifiers.** `As2Id` and
//!    `MessageId` are validated at construction, so a value that reaches
//!    a header builder can never smuggle a line break into the request.
//!
//! 2. **Request-scoped values only.** Nothing here holds process-wide
//!    state; every `MessageId` is generated fresh per transaction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `as2-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;

pub use error::ValidationError;
pub use identity::{ensure_header_safe, As2Id, MessageId};
