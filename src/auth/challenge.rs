// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vault challenge-response handshake.
//!
//! ## Flow
//!
//! 1. `POST /auth/request-token?did=did:ethr:0x<address>` returns `{ token }`
//! 2. The challenge is signed as a personal message with the derived key
//! 3. `POST /auth/validate-token` with `{ accessToken, signature, did }`
//! 4. The validated challenge is used as the bearer value for data calls
//!
//! There is no session cache: every authenticated operation runs the full
//! handshake. Validation is never attempted when the challenge request
//! fails.

use serde_json::{json, Value};

use crate::error::{AuthStep, WalletError, WalletResult};
use crate::keys::{ChallengeSigner, DerivedIdentity};
use crate::services::http::{join_url, HttpError, HttpExecutor, HttpRequest};

const REQUEST_TOKEN_PATH: &str = "auth/request-token";
const VALIDATE_TOKEN_PATH: &str = "auth/validate-token";

/// Handshake progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    ChallengeRequested,
    Signed,
    Authenticated,
    /// Absorbing for the current run.
    Failed,
}

/// A validated vault challenge, presented as `Authorization: Bearer`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken([REDACTED])")
    }
}

/// Runs the handshake against one vault.
pub struct VaultAuthenticator<'a, H, S> {
    vault_url: &'a str,
    http: &'a H,
    signer: &'a S,
    state: AuthState,
}

impl<'a, H: HttpExecutor, S: ChallengeSigner> VaultAuthenticator<'a, H, S> {
    pub fn new(vault_url: &'a str, http: &'a H, signer: &'a S) -> Self {
        Self {
            vault_url,
            http,
            signer,
            state: AuthState::Idle,
        }
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Run a fresh handshake for `identity` and return the bearer value.
    ///
    /// The state is reset to [`AuthState::Idle`] first, so a previous
    /// failure never leaks into this run.
    ///
    /// # Arguments
    /// * `identity` - Derived vault identity; its DID is sent with the challenge request
    ///
    /// # Returns
    /// * `Ok(BearerToken)` - The validated challenge, for `Authorization: Bearer`
    /// * `Err(WalletError::AuthenticationFailed)` - If either round trip is rejected,
    ///   carrying the upstream status
    /// * `Err(_)` - If signing the challenge fails
    pub async fn authenticate(&mut self, identity: &DerivedIdentity) -> WalletResult<BearerToken> {
        self.state = AuthState::Idle;
        let did = identity.did();

        match self.run(identity, &did).await {
            Ok(token) => Ok(token),
            Err(err) => {
                tracing::warn!(did = %did, from = ?self.state, error = %err, "Vault authentication failed");
                self.transition(AuthState::Failed);
                Err(err)
            }
        }
    }

    async fn run(&mut self, identity: &DerivedIdentity, did: &str) -> WalletResult<BearerToken> {
        let challenge = self.request_challenge(did).await?;
        self.transition(AuthState::ChallengeRequested);

        let signature = self.signer.sign_challenge(&challenge, identity)?;
        self.transition(AuthState::Signed);

        self.validate(&challenge, &signature, did).await?;
        self.transition(AuthState::Authenticated);

        tracing::debug!(did = %did, "Vault session authenticated");
        Ok(BearerToken(challenge))
    }

    async fn request_challenge(&self, did: &str) -> WalletResult<String> {
        let url = join_url(self.vault_url, REQUEST_TOKEN_PATH);
        let request = HttpRequest::post(&url).query("did", did).json(json!({}));

        let body = self
            .http
            .execute(request)
            .await
            .map_err(|source| WalletError::AuthenticationFailed {
                step: AuthStep::RequestChallenge,
                source,
            })?;

        body.get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| WalletError::AuthenticationFailed {
                step: AuthStep::RequestChallenge,
                source: HttpError::transport(url, "challenge response did not include a token"),
            })
    }

    async fn validate(&self, challenge: &str, signature: &str, did: &str) -> WalletResult<()> {
        let url = join_url(self.vault_url, VALIDATE_TOKEN_PATH);
        let request = HttpRequest::post(url).json(json!({
            "accessToken": challenge,
            "signature": signature,
            "did": did,
        }));

        self.http
            .execute(request)
            .await
            .map_err(|source| WalletError::AuthenticationFailed {
                step: AuthStep::ValidateSignature,
                source,
            })?;
        Ok(())
    }

    fn transition(&mut self, next: AuthState) {
        tracing::debug!(from = ?self.state, to = ?next, "Vault handshake transition");
        self.state = next;
    }
}
