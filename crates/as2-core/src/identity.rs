//! # AS2 Identifier Newtypes
//!
//! `As2Id` names a trading partner (`AS2-From` / `AS2-To`); `MessageId`
//! names one transmission (`Message-Id`). Both end up verbatim in HTTP
//! headers, so both reject control characters at construction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// An AS2 participant identifier.
///
/// Arbitrary text chosen by the trading partners. The only constraints
/// are that it is non-empty and fits on a single header line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct As2Id(String);

impl As2Id {
    /// Validate and wrap a participant identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        ensure_header_safe("AS2 identifier", &id)?;
        Ok(Self(id))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for As2Id {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<As2Id> for String {
    fn from(id: As2Id) -> Self {
        id.0
    }
}

impl std::str::FromStr for As2Id {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for As2Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `Message-Id` header value, including the surrounding angle brackets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a fresh message identifier.
    ///
    /// Format: `<AS2_{yyyyMMddHHmmss}_{uuid}>` with a UTC timestamp and a
    /// random v4 UUID in simple (unhyphenated) form. The timestamp keeps
    /// ids sortable in partner logs; the UUID keeps them unique when many
    /// transactions start within the same second.
    pub fn generate() -> Self {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        Self(format!("<AS2_{stamp}_{}>", Uuid::new_v4().simple()))
    }

    /// Access the full header value, brackets included.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject values that cannot be written on a single header line.
pub fn ensure_header_safe(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
