//! # Error Types: Structured Error Hierarchy
//!
//! Errors shared by every layer below the credential model. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Cryptographic errors fail loudly with the stage that rejected the token.
//! - Resolution errors are kept distinct from signature errors so callers can
//!   tell "unknown key" apart from "bad signature".

use thiserror::Error;

/// Errors from the foundational types (timestamps, identifiers).
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value does not have the required structure.
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Failure to map an identifier to verification key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The identifier is not a syntactically valid DID or DID URL.
    #[error("invalid DID {did:?}: {reason}")]
    InvalidDid {
        /// The identifier as supplied.
        did: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The resolver does not handle this DID method.
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    /// The resolver handles the method but knows no key for the identifier.
    #[error("no verification key found for {0}")]
    NotFound(String),
}

/// Error in signing, token decoding, or token verification.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// The token is not a well-formed compact JWS.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The token header names an algorithm this crate does not verify.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The token `exp` lies in the past.
    #[error("token expired at {exp} (now {now})")]
    Expired {
        /// Expiry as a Unix timestamp.
        exp: i64,
        /// Verification time as a Unix timestamp.
        now: i64,
    },

    /// The token `nbf` or `iat` lies in the future.
    #[error("token not valid before {nbf} (now {now})")]
    NotYetValid {
        /// Earliest validity as a Unix timestamp.
        nbf: i64,
        /// Verification time as a Unix timestamp.
        now: i64,
    },

    /// The token audience does not include the verifier.
    #[error("audience mismatch: expected {expected}, token is for {found:?}")]
    AudienceMismatch {
        /// The audience the verifier is bound to.
        expected: String,
        /// The audience values carried by the token.
        found: Vec<String>,
    },

    /// The signing key does not belong to the token issuer.
    #[error("issuer mismatch: token claims iss {iss} but was signed by {signer}")]
    IssuerMismatch {
        /// The `iss` claim.
        iss: String,
        /// The DID behind the header `kid`.
        signer: String,
    },

    /// The signing key could not be resolved.
    #[error("key resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Canonical serialization of the claims failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
