//! # Presentation Requests
//!
//! A relying party asks a holder for credentials with a signed presentation
//! request: a JWT whose `presentation_definition` claim holds one input
//! descriptor per required credential. Each descriptor pins the credential
//! issuer (const filter on the issuer field) and the credential type.
//!
//! The request is addressed to the holder (`aud`) and short-lived (`exp`).

use std::collections::HashSet;

use uuid::Uuid;
use vcgate_core::{Did, Timestamp};
use vcgate_crypto::{jws, RegisteredClaims, Signer};

use crate::error::VcError;
use crate::exchange::{Constraints, Field, Filter, InputDescriptor, PresentationDefinition};
use crate::policy::TokenPolicy;
use crate::presentation::{RequestClaims, RequestJwtClaims};
use crate::shape::{ALUMNI_CREDENTIAL, ALUMNI_MEMBER_CREDENTIAL};

/// Which credentials a request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    /// One credential carrying identity and roles together.
    Single {
        /// Descriptor id of the combined credential.
        descriptor_id: String,
    },
    /// An identity credential and a membership credential.
    Combined {
        /// Descriptor id of the identity credential.
        identity_descriptor_id: String,
        /// Descriptor id of the membership credential.
        membership_descriptor_id: String,
    },
}

impl RequestShape {
    /// `(descriptor id, credential type)` pairs, in request order.
    pub fn descriptors(&self) -> Vec<(&str, &'static str)> {
        match self {
            RequestShape::Single { descriptor_id } => vec![(descriptor_id.as_str(), ALUMNI_CREDENTIAL)],
            RequestShape::Combined {
                identity_descriptor_id,
                membership_descriptor_id,
            } => vec![
                (identity_descriptor_id.as_str(), ALUMNI_CREDENTIAL),
                (membership_descriptor_id.as_str(), ALUMNI_MEMBER_CREDENTIAL),
            ],
        }
    }

    /// Number of credentials the request asks for.
    pub fn descriptor_count(&self) -> usize {
        match self {
            RequestShape::Single { .. } => 1,
            RequestShape::Combined { .. } => 2,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RequestShape::Single { .. } => "single",
            RequestShape::Combined { .. } => "combined",
        }
    }
}

/// Build the presentation definition for `shape`, every descriptor pinned
/// to `target_issuer`.
///
/// # Errors
///
/// `RequestConstruction` if the request id, a descriptor id, or the issuer
/// is empty, or if descriptor ids collide.
pub fn presentation_definition(
    request_id: &str,
    shape: &RequestShape,
    target_issuer: &str,
) -> Result<PresentationDefinition, VcError> {
    let fail = |msg: String| Err(VcError::RequestConstruction(msg));

    if request_id.trim().is_empty() {
        return fail("request id is empty".into());
    }
    if target_issuer.trim().is_empty() {
        return fail("target issuer is empty".into());
    }
    let mut seen = HashSet::new();
    for (id, _) in shape.descriptors() {
        if id.trim().is_empty() {
            return fail("input descriptor id is empty".into());
        }
        if !seen.insert(id) {
            return fail(format!("input descriptor id {id:?} is used twice"));
        }
    }

    let input_descriptors = shape
        .descriptors()
        .into_iter()
        .map(|(id, credential_type)| InputDescriptor {
            id: id.to_string(),
            name: Some(credential_type.to_string()),
            purpose: Some(format!("a {credential_type} issued by {target_issuer}")),
            format: None,
            constraints: Constraints {
                fields: vec![
                    Field {
                        path: vec!["$.issuer".into(), "$.vc.issuer".into(), "$.iss".into()],
                        filter: Some(Filter::const_string(target_issuer)),
                        purpose: Some("the credential must come from the trusted issuer".into()),
                    },
                    Field {
                        path: vec!["$.type".into(), "$.vc.type".into()],
                        filter: Some(Filter::array_containing(credential_type)),
                        purpose: None,
                    },
                ],
            },
        })
        .collect();

    Ok(PresentationDefinition {
        id: request_id.to_string(),
        input_descriptors,
        name: None,
        purpose: None,
    })
}

/// Build and sign a presentation request with the default [`TokenPolicy`].
pub fn build_presentation_request(
    request_id: &str,
    shape: &RequestShape,
    target_issuer: &str,
    rp: &dyn Signer,
    holder: &Did,
) -> Result<String, VcError> {
    build_presentation_request_with(&TokenPolicy::default(), request_id, shape, target_issuer, rp, holder)
}

/// Build and sign a presentation request.
///
/// The token is issued by `rp`, addressed to `holder`, and expires after
/// `policy.request_ttl_secs`.
///
/// # Errors
///
/// `RequestConstruction` as for [`presentation_definition`]; signing
/// failures as `Canonicalization` or `Signature`.
pub fn build_presentation_request_with(
    policy: &TokenPolicy,
    request_id: &str,
    shape: &RequestShape,
    target_issuer: &str,
    rp: &dyn Signer,
    holder: &Did,
) -> Result<String, VcError> {
    let definition = presentation_definition(request_id, shape, target_issuer)?;
    tracing::debug!(
        definition = %serde_json::to_string(&definition)?,
        "presentation definition"
    );

    let now = Timestamp::now();
    let claims = RequestJwtClaims {
        registered: RegisteredClaims::new(rp.did())
            .audience(holder)
            .id(format!("urn:uuid:{}", Uuid::new_v4()))
            .issued_at(now)
            .expires_at(now.plus_secs(policy.request_ttl_secs)),
        body: RequestClaims {
            presentation_definition: definition,
        },
    };
    let token = jws::encode(&claims, rp).map_err(VcError::from_signing)?;

    tracing::info!(
        request_id,
        shape = shape.name(),
        relying_party = %rp.did(),
        %holder,
        "presentation request signed"
    );
    Ok(token)
}
