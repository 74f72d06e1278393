//! MIME layer error types.

use thiserror::Error;

/// A MIME structure could not be built or parsed.
///
/// Parse variants carry the content type or byte position that failed so
/// a malformed peer message can be diagnosed from the error alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MimeError {
    /// The content type has no `boundary` parameter.
    #[error("no boundary parameter in content type {content_type:?}")]
    MissingBoundary {
        /// The content type that was searched.
        content_type: String,
    },

    /// The content type does not follow `type/subtype *(; key=value)`.
    #[error("malformed content type {content_type:?}: {reason}")]
    MalformedContentType {
        /// The offending content type.
        content_type: String,
        /// What the parser tripped over.
        reason: String,
    },

    /// A boundary token violates RFC 2046 syntax.
    #[error("invalid boundary {0:?}")]
    InvalidBoundary(String),

    /// The boundary marker never occurs at the start of a line.
    #[error("boundary marker {boundary:?} not found in message")]
    BoundaryNotFound {
        /// The dash-prefixed marker that was searched for.
        boundary: String,
    },

    /// A part starts with MIME headers but the blank line ending them is
    /// missing.
    #[error("no blank line after part headers starting at byte {position}")]
    MissingHeaderSeparator {
        /// Byte offset of the part whose header block is unterminated.
        position: usize,
    },

    /// A part has no following boundary delimiter (truncated message).
    #[error("part starting at byte {position} is not terminated by {boundary:?}")]
    UnterminatedPart {
        /// The dash-prefixed marker that was expected.
        boundary: String,
        /// Byte offset where the unterminated part begins.
        position: usize,
    },

    /// The message closes before the requested part.
    #[error("message has no part at index {index}")]
    PartNotFound {
        /// Zero-based index of the missing part.
        index: usize,
    },

    /// The signature part claims base64 but does not decode.
    #[error("signature part is not valid base64: {0}")]
    InvalidSignatureEncoding(String),

    /// An envelope was requested with no parts.
    #[error("a MIME envelope needs at least one part")]
    EmptyEnvelope,
}
