//! AS2 client configuration.
//!
//! Everything a send needs besides the file itself: the partner URL and
//! identifiers, HTTP timeout and proxy, and the optional signing and
//! encryption material. Loaded from `AS2_*` environment variables; CLI
//! flags override individual fields after loading.

use std::time::Duration;

use as2_core::{As2Id, ValidationError};
use as2_crypto::{Cipher, RecipientIdentity, SigningIdentity};
use url::Url;
use zeroize::Zeroizing;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("as2-send/", env!("CARGO_PKG_VERSION"));

/// HTTP proxy settings. No proxy means a direct connection.
///
/// Custom `Debug` implementation redacts the password.
#[derive(Clone)]
pub struct ProxySettings {
    /// Proxy address, e.g. `http://proxy.corp:8080`.
    pub name: String,
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    /// Windows-style domain; sent as `DOMAIN\username`.
    pub domain: Option<String>,
}

impl ProxySettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: None,
            password: None,
            domain: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// User name for proxy basic auth, domain-qualified when a domain is set.
    pub fn auth_username(&self) -> Option<String> {
        let user = self.username.as_deref().filter(|u| !u.is_empty())?;
        match self.domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => Some(format!("{domain}\\{user}")),
            None => Some(user.to_string()),
        }
    }
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("domain", &self.domain)
            .finish()
    }
}

/// Settings for the HTTP collaborator.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub proxy: Option<ProxySettings>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Full configuration for sending to one trading partner.
///
/// `Debug` is safe to log: secrets inside the signing identity and proxy
/// settings are redacted by their own `Debug` implementations.
#[derive(Debug, Clone)]
pub struct As2Config {
    pub url: Url,
    pub from: As2Id,
    pub to: As2Id,
    pub transport: TransportConfig,
    /// Signing identity; `None` disables signing.
    pub signing: Option<SigningIdentity>,
    /// Partner certificate; `None` disables encryption.
    pub recipient: Option<RecipientIdentity>,
    pub cipher: Cipher,
}

impl As2Config {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `AS2_URL` (required)
    /// - `AS2_FROM`, `AS2_TO` (required)
    /// - `AS2_TIMEOUT_MS` (default: 30000)
    /// - `AS2_USER_AGENT` (default: `as2-send/<version>`)
    /// - `AS2_PROXY_NAME`, `AS2_PROXY_USERNAME`, `AS2_PROXY_PASSWORD`, `AS2_PROXY_DOMAIN`
    /// - `AS2_SIGNING_CERT`, `AS2_SIGNING_KEY`, `AS2_SIGNING_PASSWORD`
    /// - `AS2_RECIPIENT_CERT`
    /// - `AS2_CIPHER` (default: `3DES`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let raw_url = require("AS2_URL")?;
        let url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl(raw_url.clone(), e.to_string()))?;

        let from = As2Id::new(require("AS2_FROM")?).map_err(|source| ConfigError::Invalid { var: "AS2_FROM", source })?;
        let to = As2Id::new(require("AS2_TO")?).map_err(|source| ConfigError::Invalid { var: "AS2_TO", source })?;

        let timeout_ms = match get("AS2_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "AS2_TIMEOUT_MS",
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let proxy = match get("AS2_PROXY_NAME") {
            Some(name) => {
                let mut proxy = ProxySettings::new(name);
                proxy.username = get("AS2_PROXY_USERNAME");
                proxy.password = get("AS2_PROXY_PASSWORD").map(Zeroizing::new);
                proxy.domain = get("AS2_PROXY_DOMAIN");
                Some(proxy)
            }
            None if get("AS2_PROXY_USERNAME").is_some() || get("AS2_PROXY_PASSWORD").is_some() => {
                return Err(ConfigError::Missing("AS2_PROXY_NAME"));
            }
            None => None,
        };

        let signing = match get("AS2_SIGNING_CERT") {
            Some(cert) => {
                let mut identity = SigningIdentity::new(cert.as_str());
                if let Some(key) = get("AS2_SIGNING_KEY") {
                    identity = identity.with_private_key(key);
                }
                if let Some(password) = get("AS2_SIGNING_PASSWORD") {
                    identity = identity.with_secret(password);
                }
                Some(identity)
            }
            None => None,
        };

        let recipient = get("AS2_RECIPIENT_CERT").map(|cert| RecipientIdentity::new(cert.as_str()));

        let cipher = match get("AS2_CIPHER") {
            Some(name) => name
                .parse::<Cipher>()
                .map_err(|source| ConfigError::Invalid { var: "AS2_CIPHER", source })?,
            None => Cipher::default(),
        };

        Ok(Self {
            url,
            from,
            to,
            transport: TransportConfig {
                timeout: Duration::from_millis(timeout_ms),
                proxy,
                user_agent: get("AS2_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            signing,
            recipient,
            cipher,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL {0:?}: {1}")]
    InvalidUrl(String, String),
    #[error("{var} is not a number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("invalid {var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: ValidationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var: &str| map.get(var).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("AS2_URL", "https://partner.example/as2"),
        ("AS2_FROM", "ACME"),
        ("AS2_TO", "GLOBEX"),
    ];

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = As2Config::from_lookup(lookup(MINIMAL)).unwrap();
        assert_eq!(cfg.url.as_str(), "https://partner.example/as2");
        assert_eq!(cfg.from.as_str(), "ACME");
        assert_eq!(cfg.to.as_str(), "GLOBEX");
        assert_eq!(cfg.transport.timeout, Duration::from_millis(30_000));
        assert!(cfg.transport.proxy.is_none());
        assert!(cfg.transport.user_agent.starts_with("as2-send/"));
        assert!(cfg.signing.is_none());
        assert!(cfg.recipient.is_none());
        assert_eq!(cfg.cipher, Cipher::TripleDes);
    }

    #[test]
    fn missing_url_is_reported_by_name() {
        let err = As2Config::from_lookup(lookup(&[("AS2_FROM", "A"), ("AS2_TO", "B")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AS2_URL")));
    }

    #[test]
    fn full_config() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend_from_slice(&[
            ("AS2_TIMEOUT_MS", "5000"),
            ("AS2_PROXY_NAME", "http://proxy.corp:8080"),
            ("AS2_PROXY_USERNAME", "svc"),
            ("AS2_PROXY_PASSWORD", "pw"),
            ("AS2_PROXY_DOMAIN", "CORP"),
            ("AS2_SIGNING_CERT", "/etc/as2/me.pem"),
            ("AS2_SIGNING_PASSWORD", "hunter2"),
            ("AS2_RECIPIENT_CERT", "/etc/as2/globex.pem"),
            ("AS2_CIPHER", "rc2"),
        ]);
        let cfg = As2Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.transport.timeout, Duration::from_millis(5000));
        let proxy = cfg.transport.proxy.as_ref().unwrap();
        assert_eq!(proxy.auth_username().as_deref(), Some("CORP\\svc"));
        assert_eq!(cfg.signing.as_ref().unwrap().secret(), Some("hunter2"));
        assert_eq!(
            cfg.recipient.as_ref().unwrap().certificate().path(),
            std::path::Path::new("/etc/as2/globex.pem")
        );
        assert_eq!(cfg.cipher, Cipher::Rc2);

        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"), "{dbg}");
        assert!(!dbg.contains("\"pw\""), "{dbg}");
    }

    #[test]
    fn unknown_cipher_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("AS2_CIPHER", "AES"));
        let err = As2Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "AS2_CIPHER",
                source: ValidationError::UnknownCipher(_)
            }
        ));
    }

    #[test]
    fn proxy_credentials_without_name_are_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("AS2_PROXY_USERNAME", "svc"));
        assert!(matches!(
            As2Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Missing("AS2_PROXY_NAME"))
        ));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("AS2_TIMEOUT_MS", "soon"));
        assert!(matches!(
            As2Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidNumber { var: "AS2_TIMEOUT_MS", .. })
        ));
    }

    #[test]
    fn proxy_without_domain_uses_plain_username() {
        let proxy = ProxySettings::new("proxy:3128").with_credentials("svc", "pw");
        assert_eq!(proxy.auth_username().as_deref(), Some("svc"));
        assert!(ProxySettings::new("proxy:3128").auth_username().is_none());
        assert!(!format!("{proxy:?}").contains("\"pw\""));
    }
}
