//! # CMS Collaborator Traits
//!
//! The send pipeline is generic over these traits so that the OpenSSL
//! backend and the mock are interchangeable at compile time. Both bounds
//! include `Send + Sync`: one backend value may serve concurrent
//! transactions.

use crate::cipher::Cipher;
use crate::error::CryptoError;
use crate::identity::{RecipientIdentity, SigningIdentity};

/// Computes detached PKCS#7 signatures.
pub trait CmsSigner: Send + Sync {
    /// Sign `data`, returning a DER-encoded detached `SignedData`.
    fn sign(&self, data: &[u8], identity: &SigningIdentity) -> Result<Vec<u8>, CryptoError>;
}

/// Encrypts for a recipient, and decrypts with an explicit key.
pub trait CmsEnveloper: Send + Sync {
    /// Encrypt `data` for `recipient`, returning DER-encoded `EnvelopedData`.
    fn envelope(
        &self,
        data: &[u8],
        recipient: &RecipientIdentity,
        cipher: Cipher,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt DER `EnvelopedData` with the key in `identity`.
    fn unenvelope(&self, data: &[u8], identity: &SigningIdentity) -> Result<Unenveloped, CryptoError>;
}

/// Both halves of the collaborator interface.
pub trait CmsBackend: CmsSigner + CmsEnveloper {}

impl<T: CmsSigner + CmsEnveloper + ?Sized> CmsBackend for T {}

/// Output of [`CmsEnveloper::unenvelope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unenveloped {
    pub plaintext: Vec<u8>,
    /// The algorithm the sender chose.
    pub cipher: Cipher,
}
