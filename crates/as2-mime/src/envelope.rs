//! # MIME Envelope Assembly
//!
//! Builds a MIME body out of one or more content parts.
//!
//! ## Layout
//!
//! One part: the header block followed directly by the part bytes. No
//! boundary parameter, no boundary markers.
//!
//! Two or more parts: a fresh boundary is generated and appended to the
//! content type as `; boundary="<token>"`. The body is the header block,
//! then `CRLF--token CRLF` + part bytes for each part, then
//! `CRLF--token--CRLF`.
//!
//! In both cases `header_len` counts the header block only.
//!
//! Part bytes are written verbatim. A first part that begins with CRLF
//! or a `Content-*` line is later read back by
//! [`extract_payload`](crate::extract_payload) as having a header block,
//! so it does not round-trip byte-for-byte.

use crate::boundary::Boundary;
use crate::bytes::concat;
use crate::error::MimeError;
use crate::header::format_header;

/// The output of an envelope build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltEnvelope {
    /// Header block followed by the body.
    pub body: Vec<u8>,
    /// Byte length of the header block, blank line included. Excludes
    /// boundary markers.
    pub header_len: usize,
    /// The content type written into the header block (with the
    /// `boundary` parameter for multipart envelopes).
    pub content_type: String,
    /// The boundary delimiting the parts, if there is more than one.
    pub boundary: Option<Boundary>,
}

impl BuiltEnvelope {
    /// The bytes after the header block.
    pub fn content(&self) -> &[u8] {
        &self.body[self.header_len..]
    }
}

/// Entry points for building MIME envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeEnvelope;

impl MimeEnvelope {
    /// Build an envelope, generating a fresh boundary when `parts` has
    /// more than one element.
    ///
    /// A first part starting with CRLF or a `Content-*` field is extracted
    /// back without those leading bytes.
    pub fn build(
        content_type: &str,
        transfer_encoding: Option<&str>,
        disposition: Option<&str>,
        parts: &[&[u8]],
    ) -> Result<BuiltEnvelope, MimeError> {
        Self::build_with_boundary(
            content_type,
            transfer_encoding,
            disposition,
            parts,
            Boundary::generate(),
        )
    }

    /// Build an envelope with a caller-chosen boundary. The boundary is
    /// unused when `parts` has exactly one element.
    pub fn build_with_boundary(
        content_type: &str,
        transfer_encoding: Option<&str>,
        disposition: Option<&str>,
        parts: &[&[u8]],
        boundary: Boundary,
    ) -> Result<BuiltEnvelope, MimeError> {
        match parts {
            [] => Err(MimeError::EmptyEnvelope),
            [single] => Ok(single_part(content_type, transfer_encoding, disposition, single)),
            _ => Ok(multi_part(
                content_type,
                transfer_encoding,
                disposition,
                parts,
                boundary,
            )),
        }
    }
}

fn single_part(
    content_type: &str,
    transfer_encoding: Option<&str>,
    disposition: Option<&str>,
    part: &[u8],
) -> BuiltEnvelope {
    let header = format_header(content_type, transfer_encoding, disposition);
    BuiltEnvelope {
        body: concat(&[header.as_bytes(), part]),
        header_len: header.len(),
        content_type: content_type.to_string(),
        boundary: None,
    }
}

fn multi_part(
    content_type: &str,
    transfer_encoding: Option<&str>,
    disposition: Option<&str>,
    parts: &[&[u8]],
    boundary: Boundary,
) -> BuiltEnvelope {
    let content_type = format!("{content_type}; boundary=\"{boundary}\"");
    let header = format_header(&content_type, transfer_encoding, disposition);
    let delimiter = boundary.delimiter();
    let close = boundary.close_delimiter();

    let mut pieces: Vec<&[u8]> = Vec::with_capacity(parts.len() * 2 + 2);
    pieces.push(header.as_bytes());
    for part in parts {
        pieces.push(delimiter.as_bytes());
        pieces.push(part);
    }
    pieces.push(close.as_bytes());

    BuiltEnvelope {
        body: concat(&pieces),
        header_len: header.len(),
        content_type,
        boundary: Some(boundary),
    }
}

/// An opaque byte buffer tagged with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPart {
    content_type: String,
    data: Vec<u8>,
}

impl ContentPart {
    /// Tag `data` with `content_type`.
    pub fn new(content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// The declared content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Wrap the part in its own single-part MIME header block.
    pub fn to_mime(&self, transfer_encoding: Option<&str>, disposition: Option<&str>) -> BuiltEnvelope {
        single_part(&self.content_type, transfer_encoding, disposition, &self.data)
    }
}
