//! Primitive types and newtypes for type-safe API interactions.
//!
//! Strongly-typed wrappers around the string identifiers ScienceDirect
//! uses, so a PII and a DOI cannot be mixed up at compile time.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Publisher Item Identifier, Elsevier's primary article key.
///
/// # Example
///
/// ```
/// use scidirect::Pii;
///
/// let pii = Pii::new("S0021925821005226");
/// assert_eq!(pii.as_str(), "S0021925821005226");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pii(String);

impl Pii {
    /// Create a new PII from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the PII as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Pii {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Pii {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pii {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A Digital Object Identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Doi(String);

impl Doi {
    /// Create a new DOI from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the DOI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Doi {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Doi {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// API credentials: the Elsevier API key with an optional
/// institutional token.
///
/// Both values are opaque to this crate and are only ever sent as
/// request headers (`X-ELS-APIKey`, `X-ELS-Insttoken`), never in a
/// URL or body. They are wrapped in [`SecretString`] so they do not
/// leak through `Debug` output or logs.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) api_key: SecretString,
    pub(crate) inst_token: Option<SecretString>,
}

impl Credentials {
    /// Create credentials from an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            inst_token: None,
        }
    }

    /// Attach an institutional token.
    pub fn with_inst_token(mut self, token: impl Into<String>) -> Self {
        self.inst_token = Some(SecretString::from(token.into()));
        self
    }

    /// Load credentials from `SCIDIRECT_API_KEY` and (optionally)
    /// `SCIDIRECT_INST_TOKEN` environment variables.
    pub fn from_env() -> crate::Result<Self> {
        let api_key = std::env::var("SCIDIRECT_API_KEY").map_err(|_| {
            crate::Error::InvalidInput("SCIDIRECT_API_KEY is not set".to_string())
        })?;
        let mut creds = Self::new(api_key);
        if let Ok(token) = std::env::var("SCIDIRECT_INST_TOKEN") {
            creds = creds.with_inst_token(token);
        }
        Ok(creds)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("inst_token", &self.inst_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_roundtrip() {
        let pii = Pii::new("S0021925821005226");
        assert_eq!(pii.to_string(), "S0021925821005226");
        let json = serde_json::to_string(&pii).unwrap();
        assert_eq!(json, "\"S0021925821005226\"");
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials::new("secret-key").with_inst_token("secret-token");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-token"));
    }
}
