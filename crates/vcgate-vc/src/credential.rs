//! # Verifiable Credential structure and JWT encoding
//!
//! Defines [`VerifiableCredential`] following the W3C VC Data Model 1.1
//! and its JWT encoding: the credential travels under the `vc` claim of a
//! compact JWS whose `iss` is the issuer, `sub` the subject and `jti` a
//! fresh identifier assigned at signing time.
//!
//! ## Invariants
//!
//! - A credential passes [`VerifiableCredential::validate`] before it is
//!   signed and again after it is verified.
//! - The `issuer` inside the credential equals the token `iss`, which the
//!   verifier has already bound to the signing key.

use serde::{Deserialize, Serialize};
use vcgate_core::{ClaimSet, Timestamp};
use vcgate_crypto::{jws, verify_token, JwtClaims, Resolver, Validation};

use crate::error::VcError;

/// The base JSON-LD context every credential and presentation carries.
pub const BASE_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// The base credential type tag.
pub const BASE_TYPE: &str = "VerifiableCredential";

/// A W3C Verifiable Credential.
///
/// The envelope is rigid; `credential_subject` is an arbitrary claim tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier. Distinct from the token `jti`.
    pub id: String,

    /// Credential type tags. MUST include `"VerifiableCredential"`.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// Identifier of the issuer.
    pub issuer: String,

    /// When the credential was issued (RFC 3339).
    #[serde(rename = "issuanceDate")]
    pub issuance_date: String,

    /// The claims about the subject.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: ClaimSet,
}

impl VerifiableCredential {
    /// Check structural well-formedness.
    ///
    /// # Errors
    ///
    /// Returns `VcError::SchemaValidation` naming the first violated rule:
    /// empty context, missing base context, empty id, missing base type,
    /// missing domain type, empty issuer, or unparseable issuance date.
    pub fn validate(&self) -> Result<(), VcError> {
        let fail = |msg: &str| Err(VcError::SchemaValidation(format!("credential {msg}")));

        if self.context.is_empty() {
            return fail("@context is empty");
        }
        if self.context.first().map(String::as_str) != Some(BASE_CONTEXT) {
            return fail(format!("@context must start with {BASE_CONTEXT}").as_str());
        }
        if self.id.trim().is_empty() {
            return fail("id is empty");
        }
        if !self.credential_type.iter().any(|t| t == BASE_TYPE) {
            return fail(format!("type must include {BASE_TYPE}").as_str());
        }
        if !self.credential_type.iter().any(|t| t != BASE_TYPE && !t.is_empty()) {
            return fail("type must include a domain type besides the base type");
        }
        if self.issuer.trim().is_empty() {
            return fail("issuer is empty");
        }
        Timestamp::parse_lenient(&self.issuance_date)
            .map_err(|e| VcError::SchemaValidation(format!("credential issuanceDate: {e}")))?;
        Ok(())
    }

    /// Whether the credential carries `type_tag`.
    pub fn has_type(&self, type_tag: &str) -> bool {
        self.credential_type.iter().any(|t| t == type_tag)
    }
}

/// The token-specific claims of a credential JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// The credential.
    pub vc: VerifiableCredential,
}

/// Full claims of a credential JWT.
pub type CredentialJwtClaims = JwtClaims<CredentialClaims>;

/// Parse a credential token without verifying it.
///
/// Only for tokens whose signature was checked elsewhere, or for display.
pub fn parse_credential(token: &str) -> Result<CredentialJwtClaims, VcError> {
    jws::decode_unverified::<CredentialJwtClaims>(token)
        .map(|jwt| jwt.claims)
        .map_err(VcError::Signature)
}

/// Verify a credential token against its issuer's key.
///
/// Credential tokens carry no audience; `leeway_secs` applies to their
/// `nbf`/`iat`/`exp`.
///
/// # Errors
///
/// - `Signature` if the token is malformed, tampered, or signed by a key
///   other than its issuer's.
/// - `Resolution` if the issuer's key cannot be resolved.
/// - `SchemaValidation` if the embedded credential is structurally invalid.
pub fn verify_credential(
    token: &str,
    resolver: &dyn Resolver,
    leeway_secs: u64,
    now: Timestamp,
) -> Result<CredentialJwtClaims, VcError> {
    let validation = Validation {
        audience: None,
        leeway_secs,
    };
    let claims = verify_token::<CredentialClaims>(token, resolver, &validation, now)
        .map_err(VcError::from_token)?
        .claims;

    let vc = &claims.body.vc;
    vc.validate()?;
    if vc.issuer != claims.registered.iss.as_str() {
        return Err(VcError::SchemaValidation(format!(
            "credential issuer {} does not match token iss {}",
            vc.issuer, claims.registered.iss
        )));
    }
    Ok(claims)
}
