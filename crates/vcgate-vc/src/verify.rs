//! # Presentation Verification
//!
//! The relying party's side of the exchange. A presentation is trusted only
//! when every layer verifies:
//!
//! 1. The outer token: signed by the holder's key, addressed to the relying
//!    party, inside its validity window.
//! 2. The presentation structure: base context and type, `holder` equal to
//!    the token `iss`, descriptor map positions in range.
//! 3. Every embedded credential token: signed by its issuer's key as
//!    resolved through the resolver, structurally valid, `issuer` equal to
//!    the token `iss`.
//! 4. Every embedded credential is about the holder: its `sub`, and its
//!    `credentialSubject.id` when present, name the presentation holder.
//!
//! Which issuers and credential types are acceptable is the access
//! policy's concern, see [`crate::access`].

use vcgate_core::{Did, Timestamp};
use vcgate_crypto::{Resolver, Verifier};

use crate::credential::{verify_credential, CredentialJwtClaims};
use crate::error::VcError;
use crate::exchange::PresentationSubmission;
use crate::presentation::PresentationClaims;

/// A presentation whose every signature has been checked.
#[derive(Debug, Clone)]
pub struct VerifiedPresentation {
    /// The relying party the presentation is addressed to.
    pub relying_party: Did,
    /// The holder who signed it.
    pub holder: Did,
    /// The presentation id, if present.
    pub id: Option<String>,
    /// Descriptor-to-credential mapping.
    pub submission: PresentationSubmission,
    /// Embedded credentials, in presentation order, each verified.
    pub credentials: Vec<CredentialJwtClaims>,
}

impl VerifiedPresentation {
    /// The credential mapped to `descriptor_id`.
    pub fn credential_for(&self, descriptor_id: &str) -> Option<&CredentialJwtClaims> {
        self.submission
            .position_of(descriptor_id)
            .and_then(|i| self.credentials.get(i))
    }
}

/// Verify a presentation token and every credential inside it.
///
/// `rp_verifier` is bound to the relying party's identifier and resolves the
/// holder's key; `resolver` resolves issuer keys for the embedded
/// credentials.
///
/// # Errors
///
/// - `Signature` for a malformed, tampered, expired, or misaddressed outer
///   token, or a forged embedded credential.
/// - `Resolution` if a holder or issuer key cannot be resolved.
/// - `SchemaValidation` for structural defects, or an embedded credential
///   issued to someone other than the holder.
pub fn verify_presentation(
    rp_verifier: &Verifier,
    resolver: &dyn Resolver,
    presentation_jwt: &str,
) -> Result<VerifiedPresentation, VcError> {
    let relying_party = rp_verifier
        .audience()
        .cloned()
        .ok_or_else(|| VcError::SchemaValidation("presentation verifier has no audience".into()))?;

    let now = Timestamp::now();
    let outer = rp_verifier
        .verify_at::<PresentationClaims>(presentation_jwt, now)
        .map_err(VcError::from_token)?
        .claims;

    let vp = outer.body.vp;
    vp.validate()?;
    let holder = Did::parse(&vp.holder)
        .map_err(|e| VcError::SchemaValidation(format!("presentation holder: {e}")))?;
    if holder != outer.registered.iss {
        return Err(VcError::SchemaValidation(format!(
            "presentation holder {holder} did not sign it (iss {})",
            outer.registered.iss
        )));
    }
    tracing::debug!(
        presentation = %serde_json::to_string(&vp)?,
        length = presentation_jwt.len(),
        "presentation signature verified"
    );

    let credentials = vp
        .verifiable_credential
        .iter()
        .enumerate()
        .map(|(index, token)| {
            verify_credential(token, resolver, rp_verifier.leeway_secs(), now)
                .and_then(|credential| held_by(credential, &holder))
                .map_err(|e| {
                    tracing::warn!(index, error = %e, "embedded credential rejected");
                    e
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        %holder,
        %relying_party,
        credentials = credentials.len(),
        "presentation verified"
    );
    Ok(VerifiedPresentation {
        relying_party,
        holder,
        id: vp.id,
        submission: vp.presentation_submission,
        credentials,
    })
}

/// Require `credential` to be issued to `holder`.
fn held_by(credential: CredentialJwtClaims, holder: &Did) -> Result<CredentialJwtClaims, VcError> {
    let sub = credential.registered.sub.as_deref();
    if sub != Some(holder.as_str()) {
        return Err(VcError::SchemaValidation(format!(
            "credential subject {} is not the holder {holder}",
            sub.unwrap_or("<none>")
        )));
    }
    if let Some(id) = credential.body.vc.credential_subject.get("id") {
        if id.as_text() != Some(holder.as_str()) {
            return Err(VcError::SchemaValidation(format!(
                "credentialSubject.id does not name the holder {holder}"
            )));
        }
    }
    Ok(credential)
}
