// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypted credential blobs in the remote vault.
//!
//! Every operation authenticates first (see [`VaultAuthenticator`]); the
//! signing identity is derived from the seed again on each call. The vault
//! exposes a fixed range of slots, `0..=99`, per identity.
//!
//! ## Error mapping
//!
//! | Operation | Upstream failure | Result |
//! |-----------|------------------|--------|
//! | fetch | 404 | [`WalletError::NotFound`] |
//! | fetch | other | [`WalletError::Http`] (unchanged) |
//! | save / delete | any | [`WalletError::RemoteOperationFailed`] |

use serde_json::{json, Value};

use crate::auth::{BearerToken, VaultAuthenticator};
use crate::credentials::EncryptedBlob;
use crate::error::{WalletError, WalletResult};
use crate::keys::{derive_identity, ChallengeSigner, MasterSeed};
use crate::services::http::{join_url, HttpExecutor, HttpRequest};

/// First credential slot.
pub const FIRST_SLOT: u32 = 0;

/// Last credential slot; the vault keeps at most 100 blobs per identity.
pub const LAST_SLOT: u32 = 99;

const DATA_PATH: &str = "data";

/// Authenticated access to the credential vault.
pub struct VaultStore<'a, H, S> {
    vault_url: &'a str,
    seed: &'a MasterSeed,
    http: &'a H,
    signer: &'a S,
}

impl<'a, H: HttpExecutor, S: ChallengeSigner> VaultStore<'a, H, S> {
    pub fn new(vault_url: &'a str, seed: &'a MasterSeed, http: &'a H, signer: &'a S) -> Self {
        Self {
            vault_url,
            seed,
            http,
            signer,
        }
    }

    /// Run a full handshake and return the bearer value.
    pub async fn authorize(&self) -> WalletResult<BearerToken> {
        let identity = derive_identity(self.seed)?;
        VaultAuthenticator::new(self.vault_url, self.http, self.signer)
            .authenticate(&identity)
            .await
    }

    /// Upload each cyphertext in order under a single handshake.
    ///
    /// Uploads are sequential and not atomic: on failure, blobs uploaded
    /// before the failing one stay in the vault. Upload failures are
    /// wrapped as [`WalletError::RemoteOperationFailed`].
    pub async fn save_credentials(&self, cyphertexts: &[String]) -> WalletResult<Vec<Value>> {
        let token = self.authorize().await?;
        let url = join_url(self.vault_url, DATA_PATH);

        let mut responses = Vec::with_capacity(cyphertexts.len());
        for (position, cyphertext) in cyphertexts.iter().enumerate() {
            let request = HttpRequest::post(&url)
                .bearer(token.as_str())
                .json(json!({ "cyphertext": cyphertext }));

            let body = self
                .http
                .execute(request)
                .await
                .inspect_err(|e| {
                    tracing::warn!(position, saved = responses.len(), error = %e, "Credential upload failed");
                })
                .map_err(WalletError::RemoteOperationFailed)?;
            responses.push(body);
        }

        tracing::debug!(saved = responses.len(), "Saved credentials to vault");
        Ok(responses)
    }

    /// Fetch every stored blob, skipping deleted slots.
    pub async fn fetch_encrypted_credentials(&self) -> WalletResult<Vec<EncryptedBlob>> {
        let token = self.authorize().await?;
        let request = HttpRequest::get(self.range_url(FIRST_SLOT, LAST_SLOT)).bearer(token.as_str());

        let body = match self.http.execute(request).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Err(WalletError::NotFound(e)),
            Err(e) => return Err(WalletError::Http(e)),
        };

        let blobs: Vec<EncryptedBlob> = match body {
            Value::Null => Vec::new(),
            body => serde_json::from_value(body)
                .map_err(|e| WalletError::InvalidResponse(format!("unexpected vault data: {e}")))?,
        };

        let stored: Vec<EncryptedBlob> = blobs.into_iter().filter(|b| !b.is_tombstone()).collect();
        tracing::debug!(count = stored.len(), "Fetched credentials from vault");
        Ok(stored)
    }

    /// Delete the blob in slot `index`.
    pub async fn delete_credential_by_index(&self, index: u32) -> WalletResult<()> {
        self.delete_range(index, index).await
    }

    /// Delete every slot.
    pub async fn delete_all_credentials(&self) -> WalletResult<()> {
        self.delete_range(FIRST_SLOT, LAST_SLOT).await
    }

    async fn delete_range(&self, start: u32, end: u32) -> WalletResult<()> {
        let token = self.authorize().await?;
        let request = HttpRequest::delete(self.range_url(start, end)).bearer(token.as_str());

        self.http
            .execute(request)
            .await
            .map_err(WalletError::RemoteOperationFailed)?;

        tracing::debug!(start, end, "Deleted vault slots");
        Ok(())
    }

    /// `start` and `end` are inclusive.
    fn range_url(&self, start: u32, end: u32) -> String {
        join_url(self.vault_url, &format!("{DATA_PATH}/{start}/{end}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{DerivedIdentity, PersonalMessageSigner};
    use crate::testing::{RecordingExecutor, TEST_SEED_HEX, VAULT_URL};
    use reqwest::Method;

    struct StubSigner;

    impl ChallengeSigner for StubSigner {
        fn sign_challenge(&self, _challenge: &str, _identity: &DerivedIdentity) -> WalletResult<String> {
            Ok("signature".to_string())
        }
    }

    fn seed() -> MasterSeed {
        MasterSeed::from_hex(TEST_SEED_HEX).unwrap()
    }

    #[tokio::test]
    async fn save_authenticates_once_and_uploads_in_order() {
        let seed = seed();
        let http = RecordingExecutor::new()
            .handshake("challenge")
            .respond(json!({ "id": 0 }))
            .respond(json!({ "id": 1 }));
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let responses = store
            .save_credentials(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();
        assert_eq!(responses, vec![json!({ "id": 0 }), json!({ "id": 1 })]);

        let requests = http.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[2].url, "https://vault.test/data");
        assert_eq!(requests[2].body, Some(json!({ "cyphertext": "first" })));
        assert_eq!(requests[3].body, Some(json!({ "cyphertext": "second" })));
        for request in &requests[2..] {
            assert_eq!(request.method, Method::POST);
            assert_eq!(request.header_value("Authorization"), Some("Bearer challenge"));
        }
    }

    #[tokio::test]
    async fn save_failure_keeps_earlier_uploads_and_is_wrapped() {
        let seed = seed();
        let http = RecordingExecutor::new()
            .handshake("challenge")
            .respond(json!({ "id": 0 }))
            .fail(500);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let err = store
            .save_credentials(&["first".to_string(), "second".to_string(), "third".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::RemoteOperationFailed(_)));
        assert_eq!(err.error_code(), "COR-0");
        assert_eq!(err.status(), Some(500));
        assert_eq!(http.requests().len(), 4);
        assert_eq!(http.urls()[3], "https://vault.test/data");
    }

    #[tokio::test]
    async fn save_with_no_items_still_authenticates() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge");
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        assert!(store.save_credentials(&[]).await.unwrap().is_empty());
        assert_eq!(http.requests().len(), 2);
    }

    #[tokio::test]
    async fn fetch_reads_full_range_and_drops_tombstones() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").respond(json!([
            { "id": 0, "cyphertext": "a" },
            { "id": 1, "cyphertext": null },
            { "id": 2, "cyphertext": "c" }
        ]));
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let blobs = store.fetch_encrypted_credentials().await.unwrap();
        assert_eq!(blobs.len(), 2);
        assert!(blobs.iter().all(|b| b.cyphertext.is_some()));
        assert_eq!(blobs[0].id, Some(0));
        assert_eq!(blobs[1].id, Some(2));

        let request = &http.requests()[2];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://vault.test/data/0/99");
        assert_eq!(request.header_value("Authorization"), Some("Bearer challenge"));
    }

    #[tokio::test]
    async fn fetch_maps_404_to_not_found() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").fail(404);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let err = store.fetch_encrypted_credentials().await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound(_)));
        assert_eq!(err.error_code(), "COR-14");
    }

    #[tokio::test]
    async fn fetch_propagates_other_failures_unchanged() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").fail(503);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let err = store.fetch_encrypted_credentials().await.unwrap_err();
        assert!(matches!(err, WalletError::Http(_)));
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn delete_by_index_targets_single_slot() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").respond(json!({}));
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        store.delete_credential_by_index(7).await.unwrap();

        let request = &http.requests()[2];
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url, "https://vault.test/data/7/7");
    }

    #[tokio::test]
    async fn delete_all_targets_full_range() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").respond(Value::Null);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        store.delete_all_credentials().await.unwrap();
        assert_eq!(http.requests()[2].url, "https://vault.test/data/0/99");
    }

    #[tokio::test]
    async fn delete_failure_is_wrapped() {
        let seed = seed();
        let http = RecordingExecutor::new().handshake("challenge").fail(500);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let err = store.delete_credential_by_index(3).await.unwrap_err();
        assert!(matches!(err, WalletError::RemoteOperationFailed(_)));
        assert_eq!(err.error_code(), "COR-0");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn authentication_failures_are_not_wrapped() {
        let seed = seed();
        let http = RecordingExecutor::new().fail(403);
        let store = VaultStore::new(VAULT_URL, &seed, &http, &StubSigner);

        let err = store.delete_all_credentials().await.unwrap_err();
        assert!(matches!(err, WalletError::AuthenticationFailed { .. }));
        assert_eq!(err.status(), Some(403));
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn each_operation_runs_its_own_handshake() {
        let seed = seed();
        let http = RecordingExecutor::new()
            .handshake("one")
            .respond(json!([]))
            .handshake("two")
            .respond(json!({}));
        let store = VaultStore::new(VAULT_URL, &seed, &http, &PersonalMessageSigner);

        store.fetch_encrypted_credentials().await.unwrap();
        store.delete_credential_by_index(0).await.unwrap();

        let requests = http.requests();
        assert_eq!(requests.len(), 6);
        assert_eq!(requests[2].header_value("Authorization"), Some("Bearer one"));
        assert_eq!(requests[5].header_value("Authorization"), Some("Bearer two"));
    }
}
