//! # multipart/signed Layout
//!
//! Wraps an already-MIME-encoded part and its detached PKCS#7 signature
//! into the two-part body AS2 peers expect:
//!
//! ```text
//! CRLF--b CRLF
//! <signed part: headers, blank line, content>
//! CRLF--b CRLF
//! Content-Type: application/pkcs7-signature; name="smime.p7s" CRLF
//! Content-Transfer-Encoding: base64 CRLF
//! Content-Disposition: attachment; filename=smime.p7s CRLF
//! CRLF
//! <base64 signature, 76-column lines> CRLF CRLF
//! --b-- CRLF
//! ```
//!
//! The signature must be computed over exactly the signed-part bytes
//! written between the first two delimiters.

use base64::Engine;

use crate::boundary::Boundary;
use crate::bytes::concat;
use crate::header::format_header;
use crate::{CRLF, MESSAGE_SEPARATOR};

/// Content type of the signature part.
pub const SIGNATURE_CONTENT_TYPE: &str = "application/pkcs7-signature; name=\"smime.p7s\"";

/// Disposition of the signature part.
pub const SIGNATURE_DISPOSITION: &str = "attachment; filename=smime.p7s";

/// Digest algorithm advertised in the `micalg` parameter.
pub const MICALG: &str = "sha1";

/// RFC 2045 line limit for base64 bodies.
const BASE64_LINE_LEN: usize = 76;

/// A signed body plus the content type that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    /// The multipart/signed body.
    pub body: Vec<u8>,
    /// `multipart/signed; protocol=...; micalg=...; boundary=...`.
    pub content_type: String,
    /// Boundary separating the signed part from the signature.
    pub boundary: Boundary,
}

impl SignedEnvelope {
    /// Assemble the body from the signed part and its DER signature.
    pub fn assemble(signed_part: &[u8], signature: &[u8], boundary: Boundary) -> Self {
        let delimiter = boundary.delimiter();
        let signature_header = format_header(
            SIGNATURE_CONTENT_TYPE,
            Some("base64"),
            Some(SIGNATURE_DISPOSITION),
        );
        let encoded = base64_lines(signature);
        let close = format!("{}--{CRLF}", boundary.dash_boundary());

        let body = concat(&[
            delimiter.as_bytes(),
            signed_part,
            delimiter.as_bytes(),
            signature_header.as_bytes(),
            encoded.as_bytes(),
            MESSAGE_SEPARATOR,
            close.as_bytes(),
        ]);

        Self {
            body,
            content_type: signed_content_type(&boundary),
            boundary,
        }
    }
}

/// The top-level content type of a multipart/signed body.
pub fn signed_content_type(boundary: &Boundary) -> String {
    format!(
        "multipart/signed; protocol=\"application/pkcs7-signature\"; micalg=\"{MICALG}\"; boundary=\"{boundary}\""
    )
}

/// Standard base64 split into CRLF-separated lines. No trailing CRLF.
fn base64_lines(data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    encoded
        .as_bytes()
        .chunks(BASE64_LINE_LEN)
        // base64 output is ASCII, so every chunk boundary is a char boundary.
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_layout() {
        let boundary = Boundary::new("SIG").unwrap();
        let part = b"Content-Type: application/xml\r\nContent-Transfer-Encoding: binary\r\n\r\n<a/>";
        let env = SignedEnvelope::assemble(part, b"\x30\x03\x02\x01\x01", boundary);
        let expected = "\r\n--SIG\r\n\
                        Content-Type: application/xml\r\nContent-Transfer-Encoding: binary\r\n\r\n<a/>\
                        \r\n--SIG\r\n\
                        Content-Type: application/pkcs7-signature; name=\"smime.p7s\"\r\n\
                        Content-Transfer-Encoding: base64\r\n\
                        Content-Disposition: attachment; filename=smime.p7s\r\n\
                        \r\n\
                        MAMCAQE=\r\n\r\n\
                        --SIG--\r\n";
        assert_eq!(String::from_utf8(env.body).unwrap(), expected);
    }

    #[test]
    fn content_type_names_protocol_micalg_and_boundary() {
        let env = SignedEnvelope::assemble(b"x", b"y", Boundary::new("b1").unwrap());
        assert_eq!(
            env.content_type,
            "multipart/signed; protocol=\"application/pkcs7-signature\"; micalg=\"sha1\"; boundary=\"b1\""
        );
    }

    #[test]
    fn long_signatures_wrap_at_76_columns() {
        let sig = vec![0xabu8; 200];
        let lines = base64_lines(&sig);
        let split: Vec<&str> = lines.split("\r\n").collect();
        assert!(split.len() > 1);
        assert!(split[..split.len() - 1].iter().all(|l| l.len() == 76));
        let joined: String = split.concat();
        assert_eq!(
            base64::engine::general_purpose::STANDARD.decode(joined).unwrap(),
            sig
        );
    }

    #[test]
    fn signed_part_is_extractable() {
        let part = b"Content-Type: application/EDIFACT\r\nContent-Transfer-Encoding: binary\r\n\r\nUNB+UNOA:1'";
        let env = SignedEnvelope::assemble(part, b"sig", Boundary::generate());
        let payload = crate::extract_payload(&env.body, &env.content_type).unwrap();
        assert_eq!(payload, b"UNB+UNOA:1'");
        let signature = crate::extract_signature(&env.body, &env.content_type).unwrap();
        assert_eq!(signature, b"sig");
    }
}
