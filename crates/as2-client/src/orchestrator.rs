//! # Sign / Encrypt Orchestration
//!
//! Decides what happens to the content before it goes on the wire:
//!
//! | signing | recipient | body | content type |
//! |---|---|---|---|
//! | no | no | content unchanged | base content type |
//! | yes | no | MIME-wrapped content + detached signature | `multipart/signed; ...` |
//! | no | yes | `Content-Type` line + content, enveloped | `application/pkcs7-mime; ...` |
//! | yes | yes | signed body as above, then enveloped | `application/pkcs7-mime; ...` |
//!
//! Encryption always wraps the signature, never the reverse.
//!
//! [`unpack`] runs the pipeline backwards over a body the caller already
//! holds. It extracts the signed payload structurally and does **not**
//! verify the signature.

use as2_core::ValidationError;
use as2_crypto::{Cipher, CmsBackend, CmsEnveloper, RecipientIdentity, SigningIdentity};
use as2_mime::{concat, extract_payload, extract_signature, Boundary, ContentType, MimeEnvelope, MimeError, SignedEnvelope};

use crate::error::As2Error;

/// Content type of an enveloped (encrypted) body.
pub const ENVELOPED_CONTENT_TYPE: &str = "application/pkcs7-mime; smime-type=enveloped-data; name=\"smime.p7m\"";

/// Result of [`package`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packaged {
    pub body: Vec<u8>,
    /// Matches the operations actually performed.
    pub content_type: String,
    pub signed: bool,
    pub encrypted: bool,
}

/// Sign and/or encrypt `content` as the decision table dictates.
///
/// The recipient certificate reference is checked before any backend call.
pub fn package<C: CmsBackend + ?Sized>(
    content: &[u8],
    base_content_type: &str,
    signing: Option<&SigningIdentity>,
    encryption: Option<(&RecipientIdentity, Cipher)>,
    crypto: &C,
) -> Result<Packaged, As2Error> {
    if let Some((recipient, _)) = encryption {
        if !recipient.certificate().is_resolvable() {
            return Err(ValidationError::MissingRecipientCertificate.into());
        }
    }

    let mut body = content.to_vec();
    let mut content_type = base_content_type.to_string();

    if let Some(identity) = signing {
        let wrapped = MimeEnvelope::build(&content_type, Some("binary"), None, &[content])?;
        let signature = crypto.sign(&wrapped.body, identity)?;
        let signed = SignedEnvelope::assemble(&wrapped.body, &signature, Boundary::generate());
        tracing::debug!(
            wrapped_len = wrapped.body.len(),
            signature_len = signature.len(),
            "signed content"
        );
        body = signed.body;
        content_type = signed.content_type;
    }

    if let Some((recipient, cipher)) = encryption {
        let header_line = format!("Content-Type: {content_type}\r\n");
        let plaintext = concat(&[header_line.as_bytes(), body.as_slice()]);
        body = crypto.envelope(&plaintext, recipient, cipher)?;
        content_type = ENVELOPED_CONTENT_TYPE.to_string();
        tracing::debug!(%cipher, enveloped_len = body.len(), "encrypted content");
    }

    Ok(Packaged {
        body,
        content_type,
        signed: signing.is_some(),
        encrypted: encryption.is_some(),
    })
}

/// Result of [`unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpacked {
    /// The innermost payload bytes.
    pub payload: Vec<u8>,
    /// Content type of the layer the payload was taken from.
    pub content_type: String,
    /// Cipher used by the sender, when the body was encrypted.
    pub cipher: Option<Cipher>,
    /// Detached signature, when the body was signed. Not verified.
    pub signature: Option<Vec<u8>>,
}

/// Decrypt (if enveloped) and extract (if signed) a received body.
///
/// `identity` supplies the decryption key and is only required for
/// enveloped bodies.
pub fn unpack<C: CmsEnveloper + ?Sized>(
    body: &[u8],
    content_type: &str,
    identity: Option<&SigningIdentity>,
    crypto: &C,
) -> Result<Unpacked, As2Error> {
    let mut content_type = content_type.to_string();
    let mut body = body.to_vec();
    let mut cipher = None;

    if ContentType::parse(&content_type)?.is("application/pkcs7-mime") {
        let identity = identity.ok_or_else(|| {
            as2_crypto::CryptoError::MissingKeyMaterial("a decryption identity is required for enveloped data".into())
        })?;
        let opened = crypto.unenvelope(&body, identity)?;
        let (inner_type, rest) = split_content_type_line(&opened.plaintext)?;
        content_type = inner_type;
        body = rest.to_vec();
        cipher = Some(opened.cipher);
    }

    let mut signature = None;
    if ContentType::parse(&content_type)?.is("multipart/signed") {
        signature = Some(extract_signature(&body, &content_type)?);
        body = extract_payload(&body, &content_type)?.to_vec();
    }

    Ok(Unpacked {
        payload: body,
        content_type,
        cipher,
        signature,
    })
}

/// Split off the synthetic `Content-Type:` line written before encryption.
fn split_content_type_line(plaintext: &[u8]) -> Result<(String, &[u8]), MimeError> {
    let malformed = |reason: &str| MimeError::MalformedContentType {
        content_type: String::from_utf8_lossy(&plaintext[..plaintext.len().min(80)]).into_owned(),
        reason: reason.to_string(),
    };

    let line_end = plaintext
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| malformed("decrypted content has no header line"))?;
    let line = std::str::from_utf8(&plaintext[..line_end])
        .map_err(|_| malformed("header line is not UTF-8"))?
        .trim_end_matches('\r');
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| malformed("header line has no ':'"))?;
    if !name.trim().eq_ignore_ascii_case("content-type") {
        return Err(malformed("decrypted content does not start with Content-Type"));
    }
    Ok((value.trim().to_string(), &plaintext[line_end + 1..]))
}
