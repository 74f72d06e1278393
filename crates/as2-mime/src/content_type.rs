//! # Content-Type Parsing
//!
//! A small parser over the `Content-Type` grammar:
//!
//! ```text
//! content-type = type "/" subtype *( ";" key "=" value )
//! value        = token / quoted-string
//! ```
//!
//! Parameters are split on `;` only outside quoted strings, so a quoted
//! value that happens to contain `; boundary="..."` cannot be mistaken for
//! the real `boundary` parameter. Keys compare case-insensitively; values
//! keep their case.

use crate::error::MimeError;

/// A parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    mime_type: String,
    params: Vec<(String, String)>,
}

impl ContentType {
    /// Parse a raw `Content-Type` value.
    pub fn parse(raw: &str) -> Result<Self, MimeError> {
        let malformed = |reason: &str| MimeError::MalformedContentType {
            content_type: raw.to_string(),
            reason: reason.to_string(),
        };

        let segments = split_unquoted(raw, b';').ok_or_else(|| malformed("unterminated quoted string"))?;
        let mut segments = segments.into_iter();

        let mime_type = segments.next().unwrap_or_default().trim();
        match mime_type.split_once('/') {
            Some((ty, sub)) if !ty.trim().is_empty() && !sub.trim().is_empty() => {}
            _ => return Err(malformed("expected type/subtype")),
        }

        let mut params = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| malformed("parameter without '='"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed("parameter with empty name"));
            }
            let value = unquote(value.trim()).ok_or_else(|| malformed("badly quoted parameter value"))?;
            params.push((key.to_ascii_lowercase(), value));
        }

        Ok(Self {
            mime_type: mime_type.to_ascii_lowercase(),
            params,
        })
    }

    /// Lowercased `type/subtype`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// True when the media type equals `mime_type` (case-insensitive).
    pub fn is(&self, mime_type: &str) -> bool {
        self.mime_type.eq_ignore_ascii_case(mime_type)
    }

    /// Look up a parameter by name (case-insensitive).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in declaration order, keys lowercased.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The `boundary` parameter, unquoted.
    pub fn boundary(&self) -> Result<&str, MimeError> {
        match self.param("boundary") {
            Some(b) if !b.is_empty() => Ok(b),
            _ => Err(MimeError::MissingBoundary {
                content_type: self.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.mime_type)?;
        for (key, value) in &self.params {
            write!(f, "; {key}=\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ContentType {
    type Err = MimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split on `sep` outside double-quoted strings. `None` when a quote is
/// left open.
fn split_unquoted(s: &str, sep: u8) -> Option<Vec<&str>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b if b == sep && !in_quotes => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if in_quotes {
        return None;
    }
    out.push(&s[start..]);
    Some(out)
}

/// Strip surrounding quotes and resolve backslash escapes. Unquoted
/// tokens are returned as-is.
fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return if value.contains('"') { None } else { Some(value.to_string()) };
    };
    let inner = inner.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return None,
            c => out.push(c),
        }
    }
    Some(out)
}
