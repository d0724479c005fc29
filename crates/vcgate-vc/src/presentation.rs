//! # Verifiable Presentation structure and JWT encoding
//!
//! A holder discloses credentials by wrapping their tokens, unchanged, in a
//! [`VerifiablePresentation`] carried under the `vp` claim of a token the
//! holder signs. The presentation names the request it answers through its
//! `presentation_submission`.

use serde::{Deserialize, Serialize};
use vcgate_crypto::JwtClaims;

use crate::credential::BASE_CONTEXT;
use crate::error::VcError;
use crate::exchange::{PresentationDefinition, PresentationSubmission};

/// The base presentation type tag.
pub const PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A W3C Verifiable Presentation with embedded JWT credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiablePresentation {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Presentation identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Presentation type tags. MUST include `"VerifiablePresentation"`.
    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,

    /// Identifier of the holder.
    pub holder: String,

    /// Credential tokens, in submission order.
    #[serde(rename = "verifiableCredential")]
    pub verifiable_credential: Vec<String>,

    /// Descriptor-to-credential mapping.
    pub presentation_submission: PresentationSubmission,
}

impl VerifiablePresentation {
    /// Check structural well-formedness.
    ///
    /// # Errors
    ///
    /// Returns `VcError::SchemaValidation` for a missing base context or
    /// type, an empty holder, no credentials, or a descriptor map entry
    /// that does not point at a credential in range.
    pub fn validate(&self) -> Result<(), VcError> {
        let fail = |msg: String| Err(VcError::SchemaValidation(format!("presentation {msg}")));

        if self.context.first().map(String::as_str) != Some(BASE_CONTEXT) {
            return fail(format!("@context must start with {BASE_CONTEXT}"));
        }
        if !self.presentation_type.iter().any(|t| t == PRESENTATION_TYPE) {
            return fail(format!("type must include {PRESENTATION_TYPE}"));
        }
        if self.holder.trim().is_empty() {
            return fail("holder is empty".into());
        }
        if self.verifiable_credential.is_empty() {
            return fail("carries no credentials".into());
        }
        for entry in &self.presentation_submission.descriptor_map {
            match entry.position() {
                Some(i) if i < self.verifiable_credential.len() => {}
                _ => {
                    return fail(format!(
                        "descriptor {} points at {} outside {} credentials",
                        entry.id,
                        entry.path,
                        self.verifiable_credential.len()
                    ))
                }
            }
        }
        Ok(())
    }
}

/// The token-specific claims of a presentation JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationClaims {
    /// The presentation.
    pub vp: VerifiablePresentation,
}

/// Full claims of a presentation JWT.
pub type PresentationJwtClaims = JwtClaims<PresentationClaims>;

/// The token-specific claims of a presentation request JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestClaims {
    /// What the relying party requires.
    pub presentation_definition: PresentationDefinition,
}

/// Full claims of a presentation request JWT.
pub type RequestJwtClaims = JwtClaims<RequestClaims>;
