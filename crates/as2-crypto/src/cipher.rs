//! # Content-Encryption Ciphers
//!
//! AS2 peers commonly accept two CMS content-encryption algorithms:
//! triple-DES and RC2. Anything else is rejected at parse time, before a
//! backend is ever invoked.

use as2_core::ValidationError;

/// A supported content-encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cipher {
    /// DES-EDE3-CBC.
    #[default]
    TripleDes,
    /// RC2-CBC, 128-bit key.
    Rc2,
}

impl Cipher {
    /// Canonical short name (`3DES` / `RC2`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TripleDes => "3DES",
            Self::Rc2 => "RC2",
        }
    }

    /// OpenSSL cipher name, usable as an `openssl cms` option.
    pub fn openssl_name(self) -> &'static str {
        match self {
            Self::TripleDes => "des-ede3-cbc",
            Self::Rc2 => "rc2-cbc",
        }
    }

    /// OpenSSL 3 ships RC2 only in its legacy provider, which must be
    /// loaded explicitly next to the default one.
    pub fn needs_legacy_provider(self) -> bool {
        matches!(self, Self::Rc2)
    }

    /// Algorithm OID as it appears in `contentEncryptionAlgorithm`.
    pub fn oid(self) -> &'static str {
        match self {
            Self::TripleDes => "1.2.840.113549.3.7",
            Self::Rc2 => "1.2.840.113549.3.2",
        }
    }

    /// Map an OpenSSL algorithm name or dotted OID back to a cipher.
    pub fn from_algorithm(name: &str) -> Option<Self> {
        let name = name.trim();
        [Self::TripleDes, Self::Rc2]
            .into_iter()
            .find(|c| name.eq_ignore_ascii_case(c.openssl_name()) || name == c.oid())
    }
}

impl std::fmt::Display for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Cipher {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "3DES" | "DES3" | "TRIPLE-DES" | "DES-EDE3-CBC" => Ok(Self::TripleDes),
            "RC2" | "RC2-CBC" => Ok(Self::Rc2),
            _ => Err(ValidationError::UnknownCipher(s.to_string())),
        }
    }
}
