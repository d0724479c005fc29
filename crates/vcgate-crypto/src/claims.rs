//! # Registered Claims
//!
//! The JWT claims ([RFC 7519 §4.1]) shared by every token type: who issued
//! it, who it is about, who it is for, and when it is valid. Token-specific
//! claims (`vc`, `vp`, `presentation_definition`) are flattened alongside
//! them through [`JwtClaims`].
//!
//! [RFC 7519 §4.1]: https://www.rfc-editor.org/rfc/rfc7519#section-4.1

use serde::{Deserialize, Serialize};
use vcgate_core::{Did, Timestamp};

/// The `aud` claim: one recipient or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single recipient.
    One(String),
    /// Several recipients.
    Many(Vec<String>),
}

impl Audience {
    /// Whether `recipient` is among the audience.
    pub fn contains(&self, recipient: &str) -> bool {
        match self {
            Audience::One(aud) => aud == recipient,
            Audience::Many(auds) => auds.iter().any(|aud| aud == recipient),
        }
    }

    /// All recipients.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Audience::One(aud) => vec![aud.clone()],
            Audience::Many(auds) => auds.clone(),
        }
    }
}

impl From<&Did> for Audience {
    fn from(did: &Did) -> Self {
        Audience::One(did.to_string())
    }
}

/// Registered JWT claims. All but `iss` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer.
    pub iss: Did,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Token identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issued at (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Not before (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Expiry (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl RegisteredClaims {
    /// Claims carrying only the issuer.
    pub fn new(iss: &Did) -> Self {
        Self {
            iss: iss.clone(),
            sub: None,
            aud: None,
            jti: None,
            iat: None,
            nbf: None,
            exp: None,
        }
    }

    /// Set `sub`.
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set `aud` to a single recipient.
    pub fn audience(mut self, aud: &Did) -> Self {
        self.aud = Some(aud.into());
        self
    }

    /// Set `jti`.
    pub fn id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set `iat` and `nbf` to the same instant.
    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.iat = Some(at.epoch_secs());
        self.nbf = Some(at.epoch_secs());
        self
    }

    /// Set `exp`.
    pub fn expires_at(mut self, at: Timestamp) -> Self {
        self.exp = Some(at.epoch_secs());
        self
    }
}

/// Registered claims plus token-specific claims, flattened into one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims<T> {
    /// Envelope claims.
    #[serde(flatten)]
    pub registered: RegisteredClaims,
    /// Token-specific claims.
    #[serde(flatten)]
    pub body: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn did(s: &str) -> Did {
        Did::parse(s).unwrap()
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Body {
        nonce: String,
    }

    #[test]
    fn flattened_claims_serialize_as_one_object() {
        let at = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let claims = JwtClaims {
            registered: RegisteredClaims::new(&did("did:key:zIssuer"))
                .audience(&did("did:key:zHolder"))
                .id("urn:uuid:1")
                .issued_at(at)
                .expires_at(at.plus_secs(300)),
            body: Body { nonce: "n-1".into() },
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({
                "iss": "did:key:zIssuer",
                "aud": "did:key:zHolder",
                "jti": "urn:uuid:1",
                "iat": at.epoch_secs(),
                "nbf": at.epoch_secs(),
                "exp": at.epoch_secs() + 300,
                "nonce": "n-1"
            })
        );
        let back: JwtClaims<Body> = serde_json::from_value(value).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn audience_accepts_string_or_array() {
        let one: Audience = serde_json::from_value(json!("did:key:zA")).unwrap();
        let many: Audience = serde_json::from_value(json!(["did:key:zA", "did:key:zB"])).unwrap();
        assert!(one.contains("did:key:zA"));
        assert!(many.contains("did:key:zB"));
        assert!(!one.contains("did:key:zB"));
        assert_eq!(many.to_vec().len(), 2);
    }

    #[test]
    fn missing_issuer_is_rejected() {
        let result = serde_json::from_value::<JwtClaims<Body>>(json!({"nonce": "x"}));
        assert!(result.is_err());
    }
}
