// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unverified JWT claim extraction.
//!
//! Tokens handled here are read locally for routing data only (the user
//! subject, the presentation request). Their signatures are verified by the
//! services that issued or consume them, never by this crate.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{WalletError, WalletResult};

/// Claims read from a user-pool bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct BearerClaims {
    /// Subject (stable user ID)
    pub sub: String,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: Option<i64>,

    /// Pool username, when the pool includes it
    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
}

/// Decode the payload of `token` without verifying its signature.
///
/// Standard JOSE algorithms go through `jsonwebtoken`. Tokens signed with
/// algorithms it does not know (`ES256K` presentation requests) fall back to
/// decoding the payload segment directly.
pub fn decode_unverified<T: DeserializeOwned>(token: &str) -> WalletResult<T> {
    match jsonwebtoken::dangerous::insecure_decode::<T>(token) {
        Ok(data) => Ok(data.claims),
        Err(err) => decode_payload_segment(token)
            .map_err(|_| WalletError::InvalidToken(err.to_string())),
    }
}

fn decode_payload_segment<T: DeserializeOwned>(token: &str) -> WalletResult<T> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
        _ => {
            return Err(WalletError::InvalidToken(
                "expected three dot-separated segments".to_string(),
            ))
        }
    };

    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('='))
        .map_err(|e| WalletError::InvalidToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| WalletError::InvalidToken(format!("unexpected payload: {e}")))
}

/// Read the stable user identifier (`sub`) from a bearer token.
pub fn subject_from_bearer(token: &str) -> WalletResult<String> {
    let claims: BearerClaims = decode_unverified(token)?;
    if claims.sub.trim().is_empty() {
        return Err(WalletError::InvalidToken("token has an empty subject".to_string()));
    }
    Ok(claims.sub)
}
