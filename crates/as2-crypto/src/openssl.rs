//! # OpenSSL Command-Line Backend
//!
//! Runs `openssl cms` as a child process for each operation:
//!
//! | operation | invocation |
//! |---|---|
//! | sign | `cms -sign -binary -md sha1 -outform DER -signer CERT [-inkey KEY]` |
//! | envelope | `cms -encrypt -binary -outform DER -<cipher> CERT` |
//! | unenvelope | `cms -cmsout -print -noout -inform DER`, then `cms -decrypt -binary -inform DER -recip CERT [-inkey KEY]` |
//!
//! RC2 operations add `-provider legacy -provider default`; OpenSSL 3
//! does not offer RC2 otherwise.
//!
//! Payloads go over stdin and come back on stdout, so no plaintext is
//! written to disk. A key password is handed over through the child's
//! environment (`-passin env:...`) and never appears in its argument list.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::cipher::Cipher;
use crate::error::CryptoError;
use crate::identity::{RecipientIdentity, SigningIdentity};
use crate::traits::{CmsEnveloper, CmsSigner, Unenveloped};

/// Environment variable carrying the key password into the child.
const PASSIN_VAR: &str = "AS2_CMS_PASSIN";

/// CMS backend backed by the `openssl` executable.
#[derive(Debug, Clone)]
pub struct OpensslCli {
    program: PathBuf,
}

impl Default for OpensslCli {
    fn default() -> Self {
        Self::new()
    }
}

impl OpensslCli {
    /// Use `openssl` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("openssl"),
        }
    }

    /// Use a specific `openssl` binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// True when the executable runs and reports a version.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(
        &self,
        operation: &'static str,
        args: Vec<OsString>,
        secret: Option<&str>,
        input: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        tracing::debug!(operation, input_len = input.len(), "invoking openssl cms");

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(secret) = secret {
            command.env(PASSIN_VAR, secret);
        }

        let mut child = command.spawn().map_err(|source| CryptoError::Io { operation, source })?;
        let mut stdin = child.stdin.take().ok_or_else(|| CryptoError::Io {
            operation,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "child stdin unavailable"),
        })?;

        // Feed stdin from a second thread so a large output cannot
        // deadlock against a full input pipe.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            let written = writer.join();
            (output, written)
        });

        let output = output.map_err(|source| CryptoError::Io { operation, source })?;
        if !output.status.success() {
            let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(operation, status = ?output.status, "openssl cms failed");
            return Err(CryptoError::Backend {
                operation,
                reason: if reason.is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    reason
                },
            });
        }
        match written {
            Ok(Ok(())) => Ok(output.stdout),
            Ok(Err(source)) => Err(CryptoError::Io { operation, source }),
            Err(_) => Err(CryptoError::Backend {
                operation,
                reason: "stdin writer thread panicked".to_string(),
            }),
        }
    }
}

/// `-inkey` / `-passin` arguments for an identity.
fn key_args(identity: &SigningIdentity) -> Vec<OsString> {
    let mut args = Vec::new();
    if let Some(key) = identity.private_key() {
        args.push("-inkey".into());
        args.push(key.into());
    }
    if identity.secret().is_some() {
        args.push("-passin".into());
        args.push(format!("env:{PASSIN_VAR}").into());
    }
    args
}

/// Provider arguments for `cipher`. Empty unless the legacy provider is
/// needed.
fn provider_args(cipher: Cipher) -> Vec<OsString> {
    if !cipher.needs_legacy_provider() {
        return Vec::new();
    }
    ["-provider", "legacy", "-provider", "default"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn require_certificate(identity_cert: &std::path::Path, what: &str) -> Result<(), CryptoError> {
    if identity_cert.as_os_str().is_empty() {
        return Err(CryptoError::MissingKeyMaterial(format!("{what} certificate path is empty")));
    }
    Ok(())
}

impl CmsSigner for OpensslCli {
    fn sign(&self, data: &[u8], identity: &SigningIdentity) -> Result<Vec<u8>, CryptoError> {
        let cert = identity.certificate().path();
        require_certificate(cert, "signing")?;

        let mut args: Vec<OsString> = ["cms", "-sign", "-binary", "-md", "sha1", "-outform", "DER", "-signer"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(cert.into());
        args.extend(key_args(identity));

        self.run("sign", args, identity.secret(), data)
    }
}

impl CmsEnveloper for OpensslCli {
    fn envelope(
        &self,
        data: &[u8],
        recipient: &RecipientIdentity,
        cipher: Cipher,
    ) -> Result<Vec<u8>, CryptoError> {
        let cert = recipient.certificate().path();
        require_certificate(cert, "recipient")?;

        let mut args: Vec<OsString> = ["cms", "-encrypt", "-binary", "-outform", "DER"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.extend(provider_args(cipher));
        args.push(format!("-{}", cipher.openssl_name()).into());
        args.push(cert.into());

        self.run("envelope", args, None, data)
    }

    fn unenvelope(&self, data: &[u8], identity: &SigningIdentity) -> Result<Unenveloped, CryptoError> {
        let cert = identity.certificate().path();
        require_certificate(cert, "decryption")?;

        let inspect: Vec<OsString> = ["cms", "-cmsout", "-print", "-noout", "-inform", "DER"]
            .into_iter()
            .map(OsString::from)
            .collect();
        let printed = self.run("inspect", inspect, None, data)?;
        let cipher = cipher_from_cms_print(&String::from_utf8_lossy(&printed))?;

        let mut args: Vec<OsString> = ["cms", "-decrypt", "-binary", "-inform", "DER"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.extend(provider_args(cipher));
        args.push("-recip".into());
        args.push(cert.into());
        args.extend(key_args(identity));

        let plaintext = self.run("unenvelope", args, identity.secret(), data)?;
        Ok(Unenveloped { plaintext, cipher })
    }
}

/// Pull the content-encryption algorithm out of `cms -cmsout -print`.
///
/// The relevant fragment looks like:
///
/// ```text
/// contentEncryptionAlgorithm:
///   algorithm: des-ede3-cbc (1.2.840.113549.3.7)
/// ```
fn cipher_from_cms_print(printed: &str) -> Result<Cipher, CryptoError> {
    let algorithm = printed
        .lines()
        .skip_while(|line| !line.contains("contentEncryptionAlgorithm"))
        .find_map(|line| line.trim().strip_prefix("algorithm:"))
        .map(str::trim)
        .ok_or_else(|| CryptoError::Backend {
            operation: "inspect",
            reason: "no contentEncryptionAlgorithm in CMS structure".to_string(),
        })?;

    let name = algorithm.split_whitespace().next().unwrap_or_default();
    let oid = algorithm
        .split_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .unwrap_or_default();

    Cipher::from_algorithm(name)
        .or_else(|| Cipher::from_algorithm(oid))
        .ok_or_else(|| CryptoError::UnsupportedCipher(algorithm.to_string()))
}
