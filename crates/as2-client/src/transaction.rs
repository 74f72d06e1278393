//! # AS2 Transaction
//!
//! One send attempt: where, what, from whom, to whom, and how to protect
//! it. Built fresh for every send; [`Transaction::prepare`] generates a new
//! message id and boundary each time it runs.

use as2_core::{ensure_header_safe, As2Id, MessageId, ValidationError};
use as2_crypto::{Cipher, CmsBackend, RecipientIdentity, SigningIdentity};
use url::Url;

use crate::error::As2Error;
use crate::headers::{base_content_type, HeaderSet, TransactionHeaders};
use crate::orchestrator::package;

/// Encryption request: partner certificate plus content cipher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encryption {
    pub recipient: RecipientIdentity,
    pub cipher: Cipher,
}

impl Encryption {
    pub fn new(recipient: RecipientIdentity, cipher: Cipher) -> Self {
        Self { recipient, cipher }
    }

    /// Parse the cipher by name (`3DES`, `RC2`, ...).
    pub fn with_cipher_name(recipient: RecipientIdentity, cipher: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(recipient, cipher.parse()?))
    }
}

/// Everything needed for one AS2 send.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub url: Url,
    pub filename: String,
    pub content: Vec<u8>,
    pub from: As2Id,
    pub to: As2Id,
    pub signing: Option<SigningIdentity>,
    pub encryption: Option<Encryption>,
}

/// A transaction rendered into wire form, ready to post.
#[derive(Debug, Clone)]
pub struct PreparedMessage {
    pub headers: HeaderSet,
    pub body: Vec<u8>,
    pub content_type: String,
    pub message_id: MessageId,
    pub signed: bool,
    pub encrypted: bool,
}

impl Transaction {
    /// An unsigned, unencrypted transaction.
    pub fn new(url: Url, filename: impl Into<String>, content: impl Into<Vec<u8>>, from: As2Id, to: As2Id) -> Self {
        Self {
            url,
            filename: filename.into(),
            content: content.into(),
            from,
            to,
            signing: None,
            encryption: None,
        }
    }

    pub fn with_signing(mut self, identity: SigningIdentity) -> Self {
        self.signing = Some(identity);
        self
    }

    pub fn with_encryption(mut self, encryption: Encryption) -> Self {
        self.encryption = Some(encryption);
        self
    }

    /// Check every input that can be checked without a collaborator.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filename.is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        if self.content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        ensure_header_safe("filename", &self.filename)?;
        if let Some(encryption) = &self.encryption {
            if !encryption.recipient.certificate().is_resolvable() {
                return Err(ValidationError::MissingRecipientCertificate);
            }
        }
        Ok(())
    }

    /// The base content type implied by the filename.
    pub fn base_content_type(&self) -> &'static str {
        base_content_type(&self.filename)
    }

    /// Validate, package and build headers. No network I/O.
    pub fn prepare<C: CmsBackend + ?Sized>(&self, crypto: &C) -> Result<PreparedMessage, As2Error> {
        self.validate()?;

        let packaged = package(
            &self.content,
            self.base_content_type(),
            self.signing.as_ref(),
            self.encryption.as_ref().map(|e| (&e.recipient, e.cipher)),
            crypto,
        )?;

        let message_id = MessageId::generate();
        let headers = TransactionHeaders {
            from: &self.from,
            to: &self.to,
            filename: &self.filename,
            message_id: &message_id,
            content_type: &packaged.content_type,
            content_length: packaged.body.len(),
            signed: packaged.signed,
            encrypted: packaged.encrypted,
        }
        .build()?;

        Ok(PreparedMessage {
            headers,
            body: packaged.body,
            content_type: packaged.content_type,
            message_id,
            signed: packaged.signed,
            encrypted: packaged.encrypted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use as2_crypto::MockCms;

    fn tx(filename: &str, content: &[u8]) -> Transaction {
        Transaction::new(
            Url::parse("https://partner.example/as2").unwrap(),
            filename,
            content,
            As2Id::new("ACME").unwrap(),
            As2Id::new("GLOBEX").unwrap(),
        )
    }

    #[test]
    fn empty_filename_and_content_rejected() {
        assert_eq!(tx("", b"x").validate(), Err(ValidationError::EmptyFilename));
        assert_eq!(tx("a.xml", b"").validate(), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn prepare_validates_before_packaging() {
        let cms = MockCms::new();
        let err = tx("", b"x").with_signing(SigningIdentity::new("me.pem")).prepare(&cms).unwrap_err();
        assert!(matches!(err, As2Error::Validation(ValidationError::EmptyFilename)));
        assert_eq!(cms.call_count(), 0);
    }

    #[test]
    fn missing_recipient_certificate_rejected() {
        let t = tx("a.edi", b"x").with_encryption(Encryption::new(RecipientIdentity::new(""), Cipher::TripleDes));
        assert_eq!(t.validate(), Err(ValidationError::MissingRecipientCertificate));
    }

    #[test]
    fn unknown_cipher_name_rejected() {
        let err = Encryption::with_cipher_name(RecipientIdentity::new("p.pem"), "blowfish").unwrap_err();
        assert_eq!(err, ValidationError::UnknownCipher("blowfish".into()));
    }

    #[test]
    fn invoice_xml_goes_out_unchanged() {
        let cms = MockCms::new();
        let prepared = tx("invoice.xml", b"<Invoice/>").prepare(&cms).unwrap();
        assert_eq!(prepared.body, b"<Invoice/>");
        assert_eq!(prepared.content_type, "application/xml");
        assert_eq!(prepared.headers.get("Content-Type"), Some("application/xml"));
        assert_eq!(prepared.headers.get("Content-Transfer-Encoding"), Some("binary"));
        assert_eq!(
            prepared.headers.get("Content-Disposition"),
            Some("inline; filename=\"invoice.xml\"")
        );
        assert_eq!(prepared.headers.get("Content-Length"), Some("10"));
        assert_eq!(prepared.headers.get("Message-Id"), Some(prepared.message_id.as_str()));
    }

    #[test]
    fn every_prepare_gets_a_fresh_message_id() {
        let cms = MockCms::new();
        let t = tx("a.edi", b"UNA");
        let a = t.prepare(&cms).unwrap();
        let b = t.prepare(&cms).unwrap();
        assert_ne!(a.message_id, b.message_id);
    }

    #[test]
    fn signed_content_length_matches_body() {
        let cms = MockCms::new();
        let prepared = tx("a.edi", b"UNA")
            .with_signing(SigningIdentity::new("me.pem"))
            .prepare(&cms)
            .unwrap();
        assert!(prepared.signed);
        assert_eq!(
            prepared.headers.get("Content-Length"),
            Some(prepared.body.len().to_string().as_str())
        );
        assert_eq!(prepared.headers.get("EDIINT-Features"), Some("multiple-attachments"));
    }
}
