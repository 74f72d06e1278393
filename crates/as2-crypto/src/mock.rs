//! # Recording Mock Backend
//!
//! A deterministic stand-in for a real CMS library. Output is NOT
//! cryptographically meaningful:
//!
//! - a "signature" is a fixed tag plus an FNV-1a digest of the input;
//! - an "envelope" is a tag naming the cipher plus the input XOR-ed with a
//!   constant, so [`CmsEnveloper::unenvelope`] can reverse it.
//!
//! Every call is recorded with its input bytes, which lets tests assert
//! exactly which collaborator operations a pipeline performed and in what
//! order.

use parking_lot::Mutex;

use crate::cipher::Cipher;
use crate::error::CryptoError;
use crate::identity::{RecipientIdentity, SigningIdentity};
use crate::traits::{CmsEnveloper, CmsSigner, Unenveloped};

const SIGNATURE_TAG: &[u8] = b"MOCK-SIG:";
const ENVELOPE_TAG: &[u8] = b"MOCK-CMS:";
const MASK: u8 = 0x5a;

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmsCall {
    Sign { data: Vec<u8> },
    Envelope { data: Vec<u8>, cipher: Cipher },
    Unenvelope { data: Vec<u8> },
}

/// Deterministic, reversible CMS backend that records its calls.
#[derive(Debug, Default)]
pub struct MockCms {
    calls: Mutex<Vec<CmsCall>>,
    failure: Option<String>,
}

impl MockCms {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every operation fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// Snapshot of all calls so far, oldest first.
    pub fn calls(&self) -> Vec<CmsCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn sign_count(&self) -> usize {
        self.count(|c| matches!(c, CmsCall::Sign { .. }))
    }

    pub fn envelope_count(&self) -> usize {
        self.count(|c| matches!(c, CmsCall::Envelope { .. }))
    }

    /// The signature [`CmsSigner::sign`] returns for `data`.
    pub fn signature_for(data: &[u8]) -> Vec<u8> {
        let mut out = SIGNATURE_TAG.to_vec();
        out.extend_from_slice(&fnv1a(data).to_be_bytes());
        out
    }

    fn count(&self, pred: impl Fn(&CmsCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, operation: &'static str, call: CmsCall) -> Result<(), CryptoError> {
        self.calls.lock().push(call);
        match &self.failure {
            Some(reason) => Err(CryptoError::Backend {
                operation,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl CmsSigner for MockCms {
    fn sign(&self, data: &[u8], _identity: &SigningIdentity) -> Result<Vec<u8>, CryptoError> {
        self.record("sign", CmsCall::Sign { data: data.to_vec() })?;
        Ok(Self::signature_for(data))
    }
}

impl CmsEnveloper for MockCms {
    fn envelope(
        &self,
        data: &[u8],
        _recipient: &RecipientIdentity,
        cipher: Cipher,
    ) -> Result<Vec<u8>, CryptoError> {
        self.record(
            "envelope",
            CmsCall::Envelope {
                data: data.to_vec(),
                cipher,
            },
        )?;
        let mut out = ENVELOPE_TAG.to_vec();
        out.extend_from_slice(cipher.as_str().as_bytes());
        out.push(b':');
        out.extend(data.iter().map(|b| b ^ MASK));
        Ok(out)
    }

    fn unenvelope(&self, data: &[u8], _identity: &SigningIdentity) -> Result<Unenveloped, CryptoError> {
        self.record("unenvelope", CmsCall::Unenvelope { data: data.to_vec() })?;
        let corrupt = || CryptoError::Backend {
            operation: "unenvelope",
            reason: "not a mock envelope".to_string(),
        };
        let rest = data.strip_prefix(ENVELOPE_TAG).ok_or_else(corrupt)?;
        let colon = rest.iter().position(|&b| b == b':').ok_or_else(corrupt)?;
        let name = std::str::from_utf8(&rest[..colon]).map_err(|_| corrupt())?;
        let cipher = name
            .parse::<Cipher>()
            .map_err(|_| CryptoError::UnsupportedCipher(name.to_string()))?;
        Ok(Unenveloped {
            plaintext: rest[colon + 1..].iter().map(|b| b ^ MASK).collect(),
            cipher,
        })
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    data.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
