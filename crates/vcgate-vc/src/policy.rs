//! Token lifetime and clock-skew policy.

use serde::{Deserialize, Serialize};

/// Validity windows for the tokens this crate issues, and the clock skew
/// tolerated when verifying.
///
/// Every field has a default, so a partial YAML or JSON document (or an
/// empty one) deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenPolicy {
    /// Lifetime of a presentation request, in seconds.
    pub request_ttl_secs: u64,
    /// Lifetime of a presentation submission, in seconds.
    pub presentation_ttl_secs: u64,
    /// Clock skew tolerated on `exp`, `nbf` and `iat`, in seconds.
    pub leeway_secs: u64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            request_ttl_secs: 300,
            presentation_ttl_secs: 300,
            leeway_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let policy: TokenPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, TokenPolicy::default());
        assert_eq!(policy.request_ttl_secs, 300);
        assert_eq!(policy.leeway_secs, 30);
    }

    #[test]
    fn partial_document_overrides_one_field() {
        let policy: TokenPolicy = serde_json::from_str(r#"{"leeway_secs": 5}"#).unwrap();
        assert_eq!(policy.leeway_secs, 5);
        assert_eq!(policy.presentation_ttl_secs, 300);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<TokenPolicy>(r#"{"ttl": 5}"#).is_err());
    }
}
