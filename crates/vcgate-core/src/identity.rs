//! # Decentralized Identifiers
//!
//! `Did` wraps a validated `did:<method>:<method-specific-id>` string. DID
//! URLs (a DID followed by `#fragment`, `?query`, or `/path`) appear as JWS
//! `kid` values; [`Did::from_did_url`] strips them back to the DID so the
//! signer of a token can be compared against its `iss` claim.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// A syntactically valid decentralized identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// Parse a DID, rejecting DID URLs and malformed strings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::SchemaValidation` if the string is not of the form
    /// `did:<method>:<method-specific-id>` with a lowercase alphanumeric
    /// method name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::SchemaValidation(format!("invalid DID {s:?}: {reason}"));

        let rest = s.strip_prefix("did:").ok_or_else(|| invalid("missing did: prefix"))?;
        let (method, id) = rest
            .split_once(':')
            .ok_or_else(|| invalid("missing method-specific id"))?;
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(invalid("method must be lowercase alphanumeric"));
        }
        if id.is_empty() {
            return Err(invalid("empty method-specific id"));
        }
        if id.contains(['#', '?', '/']) {
            return Err(invalid("DID URL components are not allowed here"));
        }
        Ok(Self(s.to_string()))
    }

    /// Parse the DID portion of a DID URL such as `did:key:z6Mk...#z6Mk...`.
    pub fn from_did_url(url: &str) -> Result<Self, CoreError> {
        let end = url.find(['#', '?', '/']).unwrap_or(url.len());
        Self::parse(&url[..end])
    }

    /// The DID method name (`key` for `did:key:...`).
    pub fn method(&self) -> &str {
        self.0[4..].split(':').next().unwrap_or_default()
    }

    /// The method-specific identifier.
    pub fn method_specific_id(&self) -> &str {
        let after_method = 4 + self.method().len() + 1;
        &self.0[after_method..]
    }

    /// Access the DID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
