//! # AS2 Transaction Headers
//!
//! Builds the HTTP header set for one AS2 transmission. Names are written
//! with the capitalization AS2 peers conventionally expect; lookups are
//! case-insensitive.
//!
//! | header | when |
//! |---|---|
//! | `Mime-Version: 1.0`, `AS2-Version: 1.2` | always |
//! | `AS2-From`, `AS2-To`, `Subject`, `Message-Id` | always |
//! | `EDIINT-Features: multiple-attachments` | signed |
//! | `Content-Transfer-Encoding: binary`, `Content-Disposition: inline; filename="..."` | neither signed nor encrypted |
//! | `Content-Type`, `Content-Length` | always, describing the final body |

use std::path::Path;

use as2_core::{ensure_header_safe, As2Id, MessageId, ValidationError};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Base content type for XML documents.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Base content type for everything else.
pub const EDI_CONTENT_TYPE: &str = "application/EDIFACT";

/// `application/xml` for `.xml` files, `application/EDIFACT` otherwise.
pub fn base_content_type(filename: &str) -> &'static str {
    let is_xml = Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if is_xml {
        XML_CONTENT_TYPE
    } else {
        EDI_CONTENT_TYPE
    }
}

/// `Subject` header value for a file.
pub fn subject(filename: &str) -> String {
    format!("{filename} transmission.")
}

/// `Content-Disposition` value for an unsigned, unencrypted file.
pub fn inline_disposition(filename: &str) -> String {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    format!("inline; filename=\"{escaped}\"")
}

/// Ordered list of HTTP headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any existing header of the same name
    /// (case-insensitive) in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for HeaderSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Inputs to the header set of one transaction.
#[derive(Debug, Clone, Copy)]
pub struct TransactionHeaders<'a> {
    pub from: &'a As2Id,
    pub to: &'a As2Id,
    pub filename: &'a str,
    pub message_id: &'a MessageId,
    /// Content type of the final body.
    pub content_type: &'a str,
    /// Byte length of the final body.
    pub content_length: usize,
    pub signed: bool,
    pub encrypted: bool,
}

impl TransactionHeaders<'_> {
    /// Build the header set.
    ///
    /// Fails when the filename is empty or cannot be written on a header
    /// line.
    pub fn build(&self) -> Result<HeaderSet, ValidationError> {
        if self.filename.is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        ensure_header_safe("filename", self.filename)?;
        ensure_header_safe("Content-Type", self.content_type)?;

        let mut headers = HeaderSet::new();
        headers.insert("Mime-Version", "1.0");
        headers.insert("AS2-Version", "1.2");
        headers.insert("AS2-From", self.from.as_str());
        headers.insert("AS2-To", self.to.as_str());
        headers.insert("Subject", subject(self.filename));
        headers.insert("Message-Id", self.message_id.as_str());

        if self.signed {
            headers.insert("EDIINT-Features", "multiple-attachments");
        }
        if !self.signed && !self.encrypted {
            headers.insert("Content-Transfer-Encoding", "binary");
            headers.insert("Content-Disposition", inline_disposition(self.filename));
        }

        headers.insert("Content-Type", self.content_type);
        headers.insert("Content-Length", self.content_length.to_string());
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (As2Id, As2Id, MessageId) {
        (As2Id::new("ACME").unwrap(), As2Id::new("GLOBEX").unwrap(), MessageId::generate())
    }

    #[test]
    fn xml_extension_selects_xml() {
        assert_eq!(base_content_type("invoice.xml"), "application/xml");
        assert_eq!(base_content_type("INVOICE.XML"), "application/xml");
        assert_eq!(base_content_type("orders.edi"), "application/EDIFACT");
        assert_eq!(base_content_type("xml"), "application/EDIFACT");
        assert_eq!(base_content_type("noext"), "application/EDIFACT");
    }

    #[test]
    fn plain_transaction_headers() {
        let (from, to, id) = ids();
        let headers = TransactionHeaders {
            from: &from,
            to: &to,
            filename: "invoice.xml",
            message_id: &id,
            content_type: "application/xml",
            content_length: 42,
            signed: false,
            encrypted: false,
        }
        .build()
        .unwrap();

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            [
                "Mime-Version",
                "AS2-Version",
                "AS2-From",
                "AS2-To",
                "Subject",
                "Message-Id",
                "Content-Transfer-Encoding",
                "Content-Disposition",
                "Content-Type",
                "Content-Length",
            ]
        );
        assert_eq!(headers.get("subject"), Some("invoice.xml transmission."));
        assert_eq!(headers.get("Content-Disposition"), Some("inline; filename=\"invoice.xml\""));
        assert_eq!(headers.get("Content-Transfer-Encoding"), Some("binary"));
        assert_eq!(headers.get("Content-Length"), Some("42"));
        assert_eq!(headers.get("Message-Id"), Some(id.as_str()));
        assert!(!headers.contains("EDIINT-Features"));
    }

    #[test]
    fn signed_adds_features_and_drops_disposition() {
        let (from, to, id) = ids();
        let headers = TransactionHeaders {
            from: &from,
            to: &to,
            filename: "orders.edi",
            message_id: &id,
            content_type: "multipart/signed; boundary=\"b\"",
            content_length: 1,
            signed: true,
            encrypted: false,
        }
        .build()
        .unwrap();
        assert_eq!(headers.get("EDIINT-Features"), Some("multiple-attachments"));
        assert!(!headers.contains("Content-Disposition"));
        assert!(!headers.contains("Content-Transfer-Encoding"));
    }

    #[test]
    fn encrypted_only_has_neither_features_nor_disposition() {
        let (from, to, id) = ids();
        let headers = TransactionHeaders {
            from: &from,
            to: &to,
            filename: "orders.edi",
            message_id: &id,
            content_type: "application/pkcs7-mime; smime-type=enveloped-data; name=\"smime.p7m\"",
            content_length: 1,
            signed: false,
            encrypted: true,
        }
        .build()
        .unwrap();
        assert!(!headers.contains("EDIINT-Features"));
        assert!(!headers.contains("Content-Disposition"));
    }

    #[test]
    fn filename_quotes_are_escaped() {
        assert_eq!(inline_disposition("a\"b\\c.xml"), "inline; filename=\"a\\\"b\\\\c.xml\"");
    }

    #[test]
    fn empty_or_multiline_filename_rejected() {
        let (from, to, id) = ids();
        let mut tx = TransactionHeaders {
            from: &from,
            to: &to,
            filename: "",
            message_id: &id,
            content_type: "application/xml",
            content_length: 1,
            signed: false,
            encrypted: false,
        };
        assert_eq!(tx.build(), Err(ValidationError::EmptyFilename));
        tx.filename = "a.xml\r\nX-Evil: 1";
        assert!(matches!(tx.build(), Err(ValidationError::InvalidHeaderValue { field: "filename", .. })));
    }

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut headers = HeaderSet::new();
        headers.insert("Content-Type", "a/b");
        headers.insert("content-type", "c/d");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("c/d"));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut headers = HeaderSet::new();
        headers.insert("B", "2");
        headers.insert("A", "1");
        assert_eq!(serde_json::to_string(&headers).unwrap(), r#"{"B":"2","A":"1"}"#);
    }
}
