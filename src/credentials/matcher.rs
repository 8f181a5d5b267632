// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential filtering for share requests.
//!
//! A credential is kept when the full `type` list of at least one
//! requirement is contained in the credential's own `type` list. Each
//! credential is kept at most once and the input order is preserved.

use super::{CredentialRequirement, ShareRequestClaims, TypedCredential};
use crate::auth::decode_unverified;
use crate::error::WalletResult;

/// Read the ordered requirements from a share request token.
pub fn credential_requirements(request_token: &str) -> WalletResult<Vec<CredentialRequirement>> {
    let claims: ShareRequestClaims = decode_unverified(request_token)?;
    Ok(claims.interaction_token.credential_requirements)
}

/// `true` when every requirement type appears in the credential types.
pub fn is_type_match(credential_types: &[&str], requirement_types: &[String]) -> bool {
    requirement_types
        .iter()
        .all(|required| credential_types.contains(&required.as_str()))
}

/// Keep the credentials that satisfy the share request.
///
/// Without a request token (or with an empty one) the credentials are
/// returned unchanged.
///
/// # Arguments
/// * `request_token` - Share request JWT; its signature is not checked
/// * `credentials` - Decrypted credentials, in caller order
///
/// # Returns
/// * `Ok(Vec<C>)` - Matching credentials, each at most once, in input order
/// * `Err(WalletError::InvalidToken)` - If the token or its requirements cannot be read
pub fn filter_credentials<C: TypedCredential>(
    request_token: Option<&str>,
    credentials: Vec<C>,
) -> WalletResult<Vec<C>> {
    let Some(token) = request_token.filter(|t| !t.trim().is_empty()) else {
        return Ok(credentials);
    };

    let requirements = credential_requirements(token)?;

    let matched: Vec<C> = credentials
        .into_iter()
        .filter(|credential| {
            let types = credential.credential_types();
            requirements
                .iter()
                .any(|requirement| is_type_match(&types, &requirement.types))
        })
        .collect();

    tracing::debug!(
        requirements = requirements.len(),
        matched = matched.len(),
        "Filtered credentials for share request"
    );

    Ok(matched)
}
