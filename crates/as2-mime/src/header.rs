//! # MIME Header Blocks
//!
//! Renders the header block that precedes a MIME body:
//!
//! ```text
//! Content-Type: <type>CRLF
//! [Content-Transfer-Encoding: <encoding>CRLF]
//! [Content-Disposition: <disposition>CRLF]
//! CRLF
//! ```
//!
//! Optional fields are written only when present and non-empty. The
//! block always ends with exactly one blank line.

use std::fmt;

use crate::CRLF;

/// A MIME header block for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeHeader<'a> {
    content_type: &'a str,
    transfer_encoding: Option<&'a str>,
    disposition: Option<&'a str>,
}

impl<'a> MimeHeader<'a> {
    /// Header block with only a `Content-Type` line.
    pub fn new(content_type: &'a str) -> Self {
        Self {
            content_type,
            transfer_encoding: None,
            disposition: None,
        }
    }

    /// Add a `Content-Transfer-Encoding` line. Empty strings are ignored.
    pub fn with_transfer_encoding(mut self, encoding: Option<&'a str>) -> Self {
        self.transfer_encoding = encoding.filter(|e| !e.is_empty());
        self
    }

    /// Add a `Content-Disposition` line. Empty strings are ignored.
    pub fn with_disposition(mut self, disposition: Option<&'a str>) -> Self {
        self.disposition = disposition.filter(|d| !d.is_empty());
        self
    }

    /// Render the block, blank separator line included.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MimeHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Content-Type: {}{CRLF}", self.content_type)?;
        if let Some(encoding) = self.transfer_encoding {
            write!(f, "Content-Transfer-Encoding: {encoding}{CRLF}")?;
        }
        if let Some(disposition) = self.disposition {
            write!(f, "Content-Disposition: {disposition}{CRLF}")?;
        }
        f.write_str(CRLF)
    }
}

/// Render a header block from its three fields.
pub fn format_header(
    content_type: &str,
    transfer_encoding: Option<&str>,
    disposition: Option<&str>,
) -> String {
    MimeHeader::new(content_type)
        .with_transfer_encoding(transfer_encoding)
        .with_disposition(disposition)
        .render()
}
