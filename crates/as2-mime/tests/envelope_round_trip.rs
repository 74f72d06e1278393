//! # Envelope Build / Extract Round Trips
//!
//! Everything [`MimeEnvelope::build`] writes must come back out of
//! [`extract_payload`] byte-for-byte, using nothing but the content type
//! the builder returned.

use as2_mime::{
    extract_payload, format_header, Boundary, ContentType, MimeEnvelope, MimeError, SignedEnvelope,
};
use proptest::prelude::*;

#[test]
fn report_with_two_parts_yields_first() {
    let env = MimeEnvelope::build("multipart/report", None, None, &[b"AAA", b"BBB"]).unwrap();
    assert_eq!(extract_payload(&env.body, &env.content_type).unwrap(), b"AAA");
}

#[test]
fn content_type_without_boundary_fails() {
    let env = MimeEnvelope::build("multipart/report", None, None, &[b"AAA", b"BBB"]).unwrap();
    let err = extract_payload(&env.body, "multipart/report").unwrap_err();
    assert!(matches!(err, MimeError::MissingBoundary { .. }), "{err:?}");
}

#[test]
fn signed_envelope_yields_signed_content() {
    let inner = MimeEnvelope::build("application/xml", Some("binary"), None, &[b"<invoice/>"]).unwrap();
    let signed = SignedEnvelope::assemble(&inner.body, &[0x30, 0x80, 0x06], Boundary::generate());
    let payload = extract_payload(&signed.body, &signed.content_type).unwrap();
    assert_eq!(payload, b"<invoice/>");
}

fn plain_part() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,'+?\r\n]{0,200}".prop_filter("leading CRLF reads as an empty header block", |s| {
        !s.starts_with("\r\n")
    })
}

proptest! {
    /// The first part comes back exactly for any number of parts.
    #[test]
    fn first_part_round_trips(
        first in plain_part(),
        rest in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..5),
    ) {
        let mut parts: Vec<&[u8]> = vec![first.as_bytes()];
        parts.extend(rest.iter().map(Vec::as_slice));
        let env = MimeEnvelope::build("multipart/mixed", None, None, &parts).unwrap();
        let payload = extract_payload(&env.body, &env.content_type).unwrap();
        prop_assert_eq!(payload, first.as_bytes());
    }

    /// A first part carrying its own header block yields just its body.
    #[test]
    fn first_part_headers_are_skipped(body in plain_part()) {
        let part = format!("Content-Type: text/plain\r\n\r\n{body}");
        let env = MimeEnvelope::build("multipart/mixed", None, None, &[part.as_bytes(), b"x"]).unwrap();
        let payload = extract_payload(&env.body, &env.content_type).unwrap();
        prop_assert_eq!(payload, body.as_bytes());
    }

    /// The token in the content type is the one delimiting the body.
    #[test]
    fn boundary_parameter_matches_body(n in 2usize..6) {
        let parts: Vec<&[u8]> = std::iter::repeat(b"part".as_slice()).take(n).collect();
        let env = MimeEnvelope::build("multipart/mixed", None, None, &parts).unwrap();
        let ct = ContentType::parse(&env.content_type).unwrap();
        let token = ct.boundary().unwrap();
        prop_assert_eq!(Some(token), env.boundary.as_ref().map(Boundary::as_str));

        let body = String::from_utf8(env.body.clone()).unwrap();
        let delimiter = format!("\r\n--{token}\r\n");
        prop_assert_eq!(body.matches(&delimiter).count(), n);
        let close = format!("\r\n--{token}--\r\n");
        prop_assert!(body.ends_with(&close));
    }

    /// Single-part header length is the formatted header alone.
    #[test]
    fn single_part_header_len(
        content in prop::collection::vec(any::<u8>(), 0..256),
        encoding in prop::option::of("[a-z0-9-]{1,12}"),
    ) {
        let env = MimeEnvelope::build("application/EDIFACT", encoding.as_deref(), None, &[content.as_slice()]).unwrap();
        let header = format_header("application/EDIFACT", encoding.as_deref(), None);
        prop_assert_eq!(env.header_len, header.len());
        prop_assert_eq!(env.content(), content.as_slice());
        prop_assert!(env.boundary.is_none());
    }
}
