//! # Certificate and Key References
//!
//! Identities are references to material on disk, never the material
//! itself. The pipeline passes them through to the backend untouched.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

/// Path to a PEM or DER certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateRef(PathBuf);

impl CertificateRef {
    /// Wrap a certificate path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The referenced path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// True when the reference names an existing file.
    pub fn is_resolvable(&self) -> bool {
        !self.0.as_os_str().is_empty() && self.0.is_file()
    }
}

impl From<PathBuf> for CertificateRef {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for CertificateRef {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// The sender's own certificate and private key.
///
/// Used for signing outbound messages and as the explicit key capability
/// when decrypting. `private_key` may be omitted when the certificate file
/// also contains the key.
#[derive(Clone)]
pub struct SigningIdentity {
    certificate: CertificateRef,
    private_key: Option<PathBuf>,
    secret: Option<Zeroizing<String>>,
}

impl SigningIdentity {
    /// An identity whose key lives alongside the certificate.
    pub fn new(certificate: impl Into<CertificateRef>) -> Self {
        Self {
            certificate: certificate.into(),
            private_key: None,
            secret: None,
        }
    }

    /// Use a separate private key file.
    pub fn with_private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key = Some(path.into());
        self
    }

    /// Password that unlocks the private key.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(Zeroizing::new(secret.into()));
        self
    }

    pub fn certificate(&self) -> &CertificateRef {
        &self.certificate
    }

    pub fn private_key(&self) -> Option<&Path> {
        self.private_key.as_deref()
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_ref().map(|s| s.as_str())
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("certificate", &self.certificate)
            .field("private_key", &self.private_key)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The trading partner's public certificate, used for encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientIdentity {
    certificate: CertificateRef,
}

impl RecipientIdentity {
    pub fn new(certificate: impl Into<CertificateRef>) -> Self {
        Self {
            certificate: certificate.into(),
        }
    }

    pub fn certificate(&self) -> &CertificateRef {
        &self.certificate
    }
}
