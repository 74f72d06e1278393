//! # as2-mime: MIME Envelope Layer
//!
//! Builds and takes apart the MIME structures an AS2 message travels in.
//! Every byte written here ends up on the wire, so the layout is fixed:
//! CRLF line endings, `CRLF--boundary CRLF` between parts, and
//! `CRLF--boundary--CRLF` after the last part.
//!
//! ## Modules
//!
//! - [`bytes`]: buffer concatenation with a single allocation.
//! - [`header`]: `Content-Type` / `Content-Transfer-Encoding` /
//!   `Content-Disposition` header blocks.
//! - [`boundary`]: random multipart boundary tokens.
//! - [`content_type`]: `type/subtype; key="value"` parsing.
//! - [`envelope`]: single-part and multi-part body assembly.
//! - [`signed`]: the `multipart/signed` layout wrapping a detached
//!   PKCS#7 signature.
//! - [`extract`]: structural payload extraction from a multipart body.
//!
//! ## Crate Policy
//!
//! - Pure functions over byte slices. No I/O, no global state.
//! - Extraction never validates signatures; see [`extract`].

pub mod boundary;
pub mod bytes;
pub mod content_type;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod header;
pub mod signed;

pub use boundary::Boundary;
pub use bytes::concat;
pub use content_type::ContentType;
pub use envelope::{BuiltEnvelope, ContentPart, MimeEnvelope};
pub use error::MimeError;
pub use extract::{extract_payload, extract_signature};
pub use header::{format_header, MimeHeader};
pub use signed::SignedEnvelope;

/// MIME and AS2 line terminator.
pub const CRLF: &str = "\r\n";

/// Separator between a header block and the body it describes.
pub const MESSAGE_SEPARATOR: &[u8] = b"\r\n\r\n";
