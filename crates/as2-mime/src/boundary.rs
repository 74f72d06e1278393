//! # Multipart Boundaries
//!
//! A boundary delimits the parts of a multipart body. Fresh boundaries
//! are `_` + 32 hex digits of a random v4 UUID + `_`, so a collision with
//! payload bytes is negligible. The builder writes the `--` prefix; the
//! token itself never carries it.

use std::fmt;

use uuid::Uuid;

use crate::error::MimeError;
use crate::CRLF;

/// RFC 2046 caps boundaries at 70 characters.
const MAX_BOUNDARY_LEN: usize = 70;

/// A validated multipart boundary token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Generate a fresh random boundary.
    pub fn generate() -> Self {
        Self(format!("_{}_", Uuid::new_v4().simple()))
    }

    /// Validate a caller-supplied boundary.
    ///
    /// Accepts 1..=70 characters from the RFC 2046 `bchars` set, not
    /// ending in a space and not starting with `--`.
    pub fn new(token: impl Into<String>) -> Result<Self, MimeError> {
        let token = token.into();
        let valid = !token.is_empty()
            && token.len() <= MAX_BOUNDARY_LEN
            && !token.starts_with("--")
            && !token.ends_with(' ')
            && token.bytes().all(is_bchar);
        if !valid {
            return Err(MimeError::InvalidBoundary(token));
        }
        Ok(Self(token))
    }

    /// The bare token, as written into the `boundary=` parameter.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `--token`, the marker that opens each part.
    pub fn dash_boundary(&self) -> String {
        format!("--{}", self.0)
    }

    /// `CRLF--token CRLF`, written before every part.
    pub fn delimiter(&self) -> String {
        format!("{CRLF}--{}{CRLF}", self.0)
    }

    /// `CRLF--token--CRLF`, written after the last part.
    pub fn close_delimiter(&self) -> String {
        format!("{CRLF}--{}--{CRLF}", self.0)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_bchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?' | b' '
        )
}
