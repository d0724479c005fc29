//! Presentation submission: the holder's signed answer to a request.

use uuid::Uuid;
use vcgate_core::Timestamp;
use vcgate_crypto::{jws, RegisteredClaims, Signer, Verifier};

use crate::credential::BASE_CONTEXT;
use crate::error::VcError;
use crate::exchange::{DescriptorMap, PresentationSubmission};
use crate::policy::TokenPolicy;
use crate::presentation::{
    PresentationClaims, PresentationJwtClaims, RequestClaims, VerifiablePresentation, PRESENTATION_TYPE,
};

/// Answer a presentation request with the default [`TokenPolicy`].
pub fn build_presentation_submission(
    request_jwt: &str,
    requester: &Verifier,
    holder: &dyn Signer,
    credential_tokens: &[String],
) -> Result<String, VcError> {
    build_presentation_submission_with(&TokenPolicy::default(), request_jwt, requester, holder, credential_tokens)
}

/// Answer a presentation request.
///
/// `requester` verifies the request: it must be signed by the relying
/// party and addressed to the holder. Credential tokens are embedded as
/// given; the `n`th token answers the `n`th input descriptor. The result is
/// signed by `holder` and addressed to the request's issuer.
///
/// # Errors
///
/// - `RequestSignature` if the request does not verify.
/// - `SubmissionConstruction` if `requester` is bound to another holder, or
///   if the token count differs from the descriptor count.
pub fn build_presentation_submission_with(
    policy: &TokenPolicy,
    request_jwt: &str,
    requester: &Verifier,
    holder: &dyn Signer,
    credential_tokens: &[String],
) -> Result<String, VcError> {
    if let Some(audience) = requester.audience() {
        if audience != holder.did() {
            return Err(VcError::SubmissionConstruction(format!(
                "request verifier is bound to {audience}, not to holder {}",
                holder.did()
            )));
        }
    }

    let request = requester
        .verify::<RequestClaims>(request_jwt)
        .map_err(VcError::RequestSignature)?
        .claims;
    let relying_party = request.registered.iss;
    let definition = request.body.presentation_definition;

    let descriptor_ids = definition.descriptor_ids();
    if descriptor_ids.is_empty() || credential_tokens.len() != descriptor_ids.len() {
        return Err(VcError::SubmissionConstruction(format!(
            "request {} has {} input descriptors but {} credentials were supplied",
            definition.id,
            descriptor_ids.len(),
            credential_tokens.len()
        )));
    }

    let descriptor_map = descriptor_ids
        .iter()
        .enumerate()
        .map(|(index, id)| DescriptorMap::jwt_vc(*id, index))
        .collect();

    let vp = VerifiablePresentation {
        context: vec![BASE_CONTEXT.to_string()],
        id: Some(format!("urn:uuid:{}", Uuid::new_v4())),
        presentation_type: vec![PRESENTATION_TYPE.to_string()],
        holder: holder.did().to_string(),
        verifiable_credential: credential_tokens.to_vec(),
        presentation_submission: PresentationSubmission {
            id: Uuid::new_v4().to_string(),
            definition_id: definition.id.clone(),
            descriptor_map,
        },
    };

    let now = Timestamp::now();
    let claims = PresentationJwtClaims {
        registered: RegisteredClaims::new(holder.did())
            .audience(&relying_party)
            .id(format!("urn:uuid:{}", Uuid::new_v4()))
            .issued_at(now)
            .expires_at(now.plus_secs(policy.presentation_ttl_secs)),
        body: PresentationClaims { vp },
    };
    let token = jws::encode(&claims, holder).map_err(VcError::from_signing)?;

    tracing::info!(
        definition_id = %definition.id,
        holder = %holder.did(),
        %relying_party,
        credentials = credential_tokens.len(),
        "presentation submission signed"
    );
    Ok(token)
}
