//! # Payload Extraction
//!
//! Pulls the payload out of a multipart body, typically a received
//! `multipart/signed` message, given only its `Content-Type`.
//!
//! ## Algorithm
//!
//! 1. Parse the `boundary` parameter from the content type and prefix it
//!    with `--` unless it already starts that way.
//! 2. Find the first line that starts with that marker.
//! 3. The part begins on the next line and ends right before the next
//!    `CRLF--boundary` delimiter.
//! 4. If the part opens with MIME headers (`Content-*` / `MIME-Version`),
//!    skip through the first blank line. A part without headers is
//!    returned whole.
//!
//! A marker only counts when it is followed by CRLF, spaces or tabs, or
//! `--`, so boundary `b` never matches a line starting `--bb`.
//!
//! A part that itself begins with CRLF, or with a `Content-*` line, is
//! read as carrying a header block. Such parts do not survive a
//! build/extract round trip byte-for-byte.
//!
//! ## Limitation
//!
//! This is structural extraction only. **No signature is validated.**
//! Callers that need authenticity must verify the detached signature
//! (see [`extract_signature`]) through their crypto backend as a separate
//! step.

use base64::Engine;

use crate::content_type::ContentType;
use crate::error::MimeError;
use crate::MESSAGE_SEPARATOR;

/// Return the first part's payload. Does not validate any signature.
///
/// A first part beginning with CRLF or a `Content-*` field is taken to
/// start with headers, which are skipped.
pub fn extract_payload<'m>(message: &'m [u8], content_type: &str) -> Result<&'m [u8], MimeError> {
    let dash = dash_boundary(content_type)?;
    let (start, end) = locate_part(message, &dash, 0)?;
    let (body_start, _) = split_headers(message, start, end)?;
    Ok(&message[body_start..end])
}

/// Return the decoded signature from the second part of a
/// `multipart/signed` body.
///
/// Base64 bodies are decoded (line breaks ignored); any other transfer
/// encoding is returned as-is.
pub fn extract_signature(message: &[u8], content_type: &str) -> Result<Vec<u8>, MimeError> {
    let dash = dash_boundary(content_type)?;
    let (start, end) = locate_part(message, &dash, 1)?;
    let (body_start, headers) = split_headers(message, start, end)?;
    let body = &message[body_start..end];

    let is_base64 = header_value(headers, "content-transfer-encoding")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Ok(body.to_vec());
    }

    let compact: Vec<u8> = body.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| MimeError::InvalidSignatureEncoding(e.to_string()))
}

/// `--boundary` from the content type's `boundary` parameter.
fn dash_boundary(content_type: &str) -> Result<Vec<u8>, MimeError> {
    let parsed = ContentType::parse(content_type)?;
    let boundary = parsed.boundary().map_err(|_| MimeError::MissingBoundary {
        content_type: content_type.to_string(),
    })?;
    if boundary.starts_with("--") {
        Ok(boundary.as_bytes().to_vec())
    } else {
        Ok(format!("--{boundary}").into_bytes())
    }
}

/// Byte range `[start, end)` of part `index`, headers included.
fn locate_part(message: &[u8], dash: &[u8], index: usize) -> Result<(usize, usize), MimeError> {
    let marker = || String::from_utf8_lossy(dash).into_owned();

    let mut delimiter = b"\r\n".to_vec();
    delimiter.extend_from_slice(dash);

    let mut marker_at = find_at_line_start(message, dash).ok_or_else(|| MimeError::BoundaryNotFound {
        boundary: marker(),
    })?;

    for i in 0..=index {
        let after_marker = marker_at + dash.len();
        if message[after_marker..].starts_with(b"--") {
            return Err(MimeError::PartNotFound { index });
        }
        let start = find(message, b"\r\n", after_marker)
            .map(|p| p + 2)
            .ok_or_else(|| MimeError::UnterminatedPart {
                boundary: marker(),
                position: after_marker,
            })?;
        let end = find_marker(message, &delimiter, start).ok_or_else(|| MimeError::UnterminatedPart {
            boundary: marker(),
            position: start,
        })?;
        if i == index {
            return Ok((start, end));
        }
        // Skip the CRLF that belongs to the delimiter.
        marker_at = end + 2;
    }
    Err(MimeError::PartNotFound { index })
}

/// Split a part into (body offset, header bytes).
fn split_headers(message: &[u8], start: usize, end: usize) -> Result<(usize, &[u8]), MimeError> {
    let part = &message[start..end];
    if part.starts_with(b"\r\n") {
        return Ok((start + 2, &part[..0]));
    }
    if !starts_with_mime_header(part) {
        return Ok((start, &part[..0]));
    }
    match find(part, MESSAGE_SEPARATOR, 0) {
        Some(sep) => Ok((start + sep + MESSAGE_SEPARATOR.len(), &part[..sep])),
        None => Err(MimeError::MissingHeaderSeparator { position: start }),
    }
}

/// Only `Content-*` and `MIME-Version` fields carry meaning inside a body
/// part, so only those mark the start of a header block.
fn starts_with_mime_header(part: &[u8]) -> bool {
    let Some(colon) = part.iter().position(|&b| b == b':') else {
        return false;
    };
    let name = &part[..colon];
    if name.iter().any(|&b| b == b'\r' || b == b'\n' || !b.is_ascii_graphic()) {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    lower.starts_with(b"content-") || lower == b"mime-version"
}

/// Value of the first header named `name` (case-insensitive).
fn header_value<'h>(headers: &'h [u8], name: &str) -> Option<&'h str> {
    std::str::from_utf8(headers).ok()?.split("\r\n").find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then_some(value)
    })
}

/// First occurrence of `dash` at the start of the message or right after
/// a line feed.
fn find_at_line_start(message: &[u8], dash: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = find_marker(message, dash, from) {
        if pos == 0 || message[pos - 1] == b'\n' {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Next occurrence of a boundary marker that ends where RFC 2046 allows:
/// before CRLF, linear whitespace, `--`, or the end of the message.
fn find_marker(message: &[u8], marker: &[u8], from: usize) -> Option<usize> {
    let mut from = from;
    while let Some(pos) = find(message, marker, from) {
        let rest = &message[pos + marker.len()..];
        let terminated = rest.is_empty()
            || rest.starts_with(b"\r\n")
            || rest.starts_with(b"--")
            || matches!(rest[0], b' ' | b'\t');
        if terminated {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
