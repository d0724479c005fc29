//! Errors for credential issuance, presentation exchange and access
//! validation.

use thiserror::Error;
use vcgate_core::{CanonicalizationError, CryptoError, ResolutionError};

/// Every failure of the credential pipeline, tagged by the stage that
/// rejected the input.
#[derive(Error, Debug)]
pub enum VcError {
    /// A credential or presentation is structurally invalid.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// A credential or presentation token failed verification.
    #[error("signature verification failed: {0}")]
    Signature(CryptoError),

    /// The presentation request token failed verification.
    #[error("presentation request verification failed: {0}")]
    RequestSignature(CryptoError),

    /// The presentation request could not be built.
    #[error("presentation request construction failed: {0}")]
    RequestConstruction(String),

    /// The presentation submission could not be built.
    #[error("presentation submission construction failed: {0}")]
    SubmissionConstruction(String),

    /// A verification key could not be resolved.
    #[error("key resolution failed: {0}")]
    Resolution(ResolutionError),

    /// No credential carries the required role.
    #[error("required role {required} not found: {reason}")]
    RoleNotFound {
        /// The role that was required, as `value@lang`.
        required: String,
        /// Where the search stopped.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Canonicalization of token claims failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl VcError {
    /// Classify a token verification failure.
    ///
    /// Resolution failures keep their own variant; everything else about a
    /// credential or presentation token is a signature failure.
    pub fn from_token(err: CryptoError) -> Self {
        match err {
            CryptoError::Resolution(e) => VcError::Resolution(e),
            other => VcError::Signature(other),
        }
    }

    /// Classify a failure while signing a token this process produces.
    pub(crate) fn from_signing(err: CryptoError) -> Self {
        match err {
            CryptoError::Canonicalization(e) => VcError::Canonicalization(e),
            other => VcError::Signature(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_failures_keep_their_variant() {
        let err = VcError::from_token(CryptoError::Resolution(ResolutionError::NotFound(
            "did:web:gone.example".into(),
        )));
        assert!(matches!(err, VcError::Resolution(_)));
    }

    #[test]
    fn other_token_failures_are_signature_errors() {
        for err in [
            CryptoError::VerificationFailed("bad".into()),
            CryptoError::MalformedToken("x".into()),
            CryptoError::Expired { exp: 1, now: 2 },
            CryptoError::IssuerMismatch {
                iss: "a".into(),
                signer: "b".into(),
            },
        ] {
            assert!(matches!(VcError::from_token(err), VcError::Signature(_)));
        }
    }

    #[test]
    fn role_not_found_names_the_role() {
        let err = VcError::RoleNotFound {
            required: "Teaching Assistant@en".into(),
            reason: "credential 0 has no roles".into(),
        };
        assert!(err.to_string().contains("Teaching Assistant@en"));
    }
}
