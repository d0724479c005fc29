//! # Access Validation
//!
//! The relying party's policy: access requires the role
//! `{value: "Teaching Assistant", lang: "en"}`.
//!
//! ```text
//! Unverified ──verify──▶ SignatureVerified ──extract──▶ ClaimsExtracted ──match──▶ Granted
//!      │                        │                             │
//!      └────────────────────────┴─────────────────────────────┴──────────────────▶ Denied(reason)
//! ```
//!
//! Where the role is looked up depends on the request that was sent:
//!
//! - [`RequestShape::Single`]: the combined credential may nest its `roles`
//!   list anywhere in the subject; it is found by depth-first search and
//!   any entry may match.
//! - [`RequestShape::Combined`]: the membership credential holds exactly one
//!   role under `IdentityReference.roles`, which must match.
//!
//! A missing role list is a denial, never a grant.
//!
//! Before any role is read, every requested descriptor must be answered by
//! a credential signed by the trusted issuer and carrying the descriptor's
//! credential type. A holder cannot vouch for its own role.

use vcgate_core::{find_sequence_in, Did, LocalizedName};
use vcgate_crypto::{Resolver, Verifier};

use crate::credential::CredentialJwtClaims;
use crate::error::VcError;
use crate::request::RequestShape;
use crate::verify::{verify_presentation, VerifiedPresentation};

/// Value of the role that grants access.
pub const REQUIRED_ROLE_VALUE: &str = "Teaching Assistant";

/// Language of the role that grants access.
pub const REQUIRED_ROLE_LANG: &str = "en";

/// The role that grants access.
pub fn required_role() -> LocalizedName {
    LocalizedName::new(REQUIRED_ROLE_VALUE, REQUIRED_ROLE_LANG)
}

/// Outcome of an access check.
#[derive(Debug)]
pub enum AccessDecision {
    /// The presentation proves the required role.
    Granted,
    /// Access refused, with the stage that refused it.
    Denied(VcError),
}

impl AccessDecision {
    /// Whether access was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    /// The denial reason, if denied.
    pub fn reason(&self) -> Option<&VcError> {
        match self {
            AccessDecision::Granted => None,
            AccessDecision::Denied(reason) => Some(reason),
        }
    }
}

/// Verify a presentation and decide access for the request that produced it.
///
/// `trusted_issuer` is the issuer the request named; credentials from any
/// other issuer are refused.
pub fn validate_access(
    verifier: &Verifier,
    resolver: &dyn Resolver,
    trusted_issuer: &Did,
    presentation_jwt: &str,
    shape: &RequestShape,
) -> AccessDecision {
    let decision = verify_presentation(verifier, resolver, presentation_jwt).and_then(|presentation| {
        check_role(&presentation, shape, trusted_issuer, &required_role())
    });

    match decision {
        Ok(()) => {
            tracing::info!(shape = shape.name(), issuer = %trusted_issuer, "access granted");
            AccessDecision::Granted
        }
        Err(reason) => {
            tracing::warn!(shape = shape.name(), issuer = %trusted_issuer, %reason, "access denied");
            AccessDecision::Denied(reason)
        }
    }
}

/// Check a verified presentation for `required`.
///
/// # Errors
///
/// - `SchemaValidation` if the credential count or mapping does not fit
///   `shape`, or a mapped credential was not issued by `trusted_issuer` or
///   lacks its descriptor's type.
/// - `RoleNotFound` if the role list is missing or does not contain
///   `required`.
pub fn check_role(
    presentation: &VerifiedPresentation,
    shape: &RequestShape,
    trusted_issuer: &Did,
    required: &LocalizedName,
) -> Result<(), VcError> {
    if presentation.credentials.len() != shape.descriptor_count() {
        return Err(VcError::SchemaValidation(format!(
            "{} request expects {} credentials, presentation carries {}",
            shape.name(),
            shape.descriptor_count(),
            presentation.credentials.len()
        )));
    }
    for (descriptor_id, credential_type) in shape.descriptors() {
        let credential = mapped(presentation, descriptor_id)?;
        if &credential.registered.iss != trusted_issuer {
            return Err(VcError::SchemaValidation(format!(
                "credential for {descriptor_id} was issued by {}, not {trusted_issuer}",
                credential.registered.iss
            )));
        }
        if !credential.body.vc.has_type(credential_type) {
            return Err(VcError::SchemaValidation(format!(
                "credential for {descriptor_id} is not an {credential_type}"
            )));
        }
    }
    let not_found = |reason: String| VcError::RoleNotFound {
        required: required.to_string(),
        reason,
    };

    match shape {
        RequestShape::Single { descriptor_id } => {
            let credential = mapped(presentation, descriptor_id)?;
            let roles = find_sequence_in(&credential.body.vc.credential_subject, "roles")
                .ok_or_else(|| not_found(format!("credential for {descriptor_id} has no roles")))?;
            if roles.iter().any(|role| required.matches(role)) {
                Ok(())
            } else {
                Err(not_found(format!(
                    "none of {} roles in credential for {descriptor_id} match",
                    roles.len()
                )))
            }
        }
        RequestShape::Combined {
            membership_descriptor_id,
            ..
        } => {
            let credential = mapped(presentation, membership_descriptor_id)?;
            let roles = credential
                .body
                .vc
                .credential_subject
                .get("IdentityReference")
                .and_then(|reference| reference.get("roles"))
                .and_then(|roles| roles.as_sequence())
                .ok_or_else(|| {
                    not_found(format!(
                        "membership credential for {membership_descriptor_id} has no IdentityReference.roles"
                    ))
                })?;
            match roles {
                [role] if required.matches(role) => Ok(()),
                [role] => Err(not_found(format!(
                    "membership role is {}",
                    LocalizedName::from_claim(role)
                        .map(|name| name.to_string())
                        .unwrap_or_else(|| "not a localized name".into())
                ))),
                [] => Err(not_found("membership credential lists no role".into())),
                more => Err(VcError::SchemaValidation(format!(
                    "membership credential must hold exactly one role, holds {}",
                    more.len()
                ))),
            }
        }
    }
}

fn mapped<'a>(
    presentation: &'a VerifiedPresentation,
    descriptor_id: &str,
) -> Result<&'a CredentialJwtClaims, VcError> {
    presentation.credential_for(descriptor_id).ok_or_else(|| {
        VcError::SchemaValidation(format!("no credential mapped to descriptor {descriptor_id}"))
    })
}
