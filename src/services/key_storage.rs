// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key-storage service client.
//!
//! Holds the user's encrypted seed backup and fronts the issuer for the
//! sign-up credential flow. Calls are authorized with the raw user-pool
//! token in a lower-case `authorization` header (no `Bearer` prefix).

use serde_json::{json, Map, Value};

use super::http::{join_url, HttpExecutor, HttpRequest};
use crate::error::{WalletError, WalletResult};
use crate::storage::seed::{decode_encryption_key, SeedCipher};

const READ_KEY_PATH: &str = "api/v1/keys/readMyKey";
const STORE_KEY_PATH: &str = "api/v1/keys/storeMyKey";
const ADMIN_CONFIRM_USER_PATH: &str = "api/v1/userManagement/adminConfirmUser";
const ADMIN_DELETE_UNCONFIRMED_USER_PATH: &str = "api/v1/userManagement/adminDeleteUnconfirmedUser";
const CREDENTIAL_OFFER_PATH: &str = "api/v1/issuer/getCredentialOffer";
const SIGNED_CREDENTIAL_PATH: &str = "api/v1/issuer/getSignedCredential";

/// SDK-side options that are never forwarded to the issuer.
const LOCAL_ONLY_OPTIONS: &[&str] = &[
    "cognitoUser",
    "cognitoUserTokens",
    "skipBackupEncryptedSeed",
    "skipBackupCredentials",
    "issueSignupCredential",
    "metricsUrl",
    "apiKey",
];

/// Client for the key-storage REST API.
pub struct KeyStorageClient<'a, H> {
    base_url: &'a str,
    http: &'a H,
}

impl<'a, H: HttpExecutor> KeyStorageClient<'a, H> {
    pub fn new(base_url: &'a str, http: &'a H) -> Self {
        Self { base_url, http }
    }

    /// Read the user's encrypted seed backup.
    pub async fn pull_encrypted_seed(&self, access_token: &str) -> WalletResult<String> {
        let request = HttpRequest::get(self.url(READ_KEY_PATH)).header("authorization", access_token);
        let body = self.http.execute(request).await?;
        required_str(&body, "encryptedSeed")
    }

    /// Encrypt `seed_hex` with the hex `encryption_key` and store the backup.
    pub async fn store_encrypted_seed(
        &self,
        cipher: &impl SeedCipher,
        access_token: &str,
        seed_hex: &str,
        encryption_key: &str,
    ) -> WalletResult<()> {
        let key = decode_encryption_key(encryption_key)?;
        let encrypted_seed = cipher.encrypt_seed(seed_hex, &key)?;

        let request = HttpRequest::post(self.url(STORE_KEY_PATH))
            .header("authorization", access_token)
            .json(json!({ "encryptedSeed": encrypted_seed }));
        self.http.execute(request).await?;

        tracing::info!("Stored encrypted seed backup");
        Ok(())
    }

    pub async fn admin_confirm_user(&self, username: &str) -> WalletResult<()> {
        self.post_username(ADMIN_CONFIRM_USER_PATH, username).await
    }

    pub async fn admin_delete_unconfirmed_user(&self, username: &str) -> WalletResult<()> {
        self.post_username(ADMIN_DELETE_UNCONFIRMED_USER_PATH, username).await
    }

    /// Fetch the sign-up credential offer token.
    pub async fn get_credential_offer(&self, id_token: &str) -> WalletResult<String> {
        let request =
            HttpRequest::get(self.url(CREDENTIAL_OFFER_PATH)).header("authorization", id_token);
        let body = self.http.execute(request).await?;
        required_str(&body, "offerToken")
    }

    /// Exchange a signed offer response for the issued credentials.
    pub async fn get_signed_credentials(
        &self,
        id_token: &str,
        credential_offer_response_token: &str,
        options: Map<String, Value>,
    ) -> WalletResult<Vec<Value>> {
        let mut params = Map::new();
        params.insert(
            "credentialOfferResponseToken".to_string(),
            Value::String(credential_offer_response_token.to_string()),
        );
        let options = issuer_options(options);
        if !options.is_empty() {
            params.insert("options".to_string(), Value::Object(options));
        }

        let request = HttpRequest::post(self.url(SIGNED_CREDENTIAL_PATH))
            .header("authorization", id_token)
            .json(Value::Object(params));
        let body = self.http.execute(request).await?;

        match body.get("signedCredentials") {
            Some(Value::Array(credentials)) => Ok(credentials.clone()),
            _ => Err(WalletError::InvalidResponse(
                "response did not include signedCredentials".to_string(),
            )),
        }
    }

    async fn post_username(&self, path: &str, username: &str) -> WalletResult<()> {
        let request = HttpRequest::post(self.url(path)).json(json!({ "username": username }));
        self.http.execute(request).await?;
        tracing::info!(path, "User management request accepted");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        join_url(self.base_url, path)
    }
}

fn issuer_options(mut options: Map<String, Value>) -> Map<String, Value> {
    for key in LOCAL_ONLY_OPTIONS {
        options.remove(*key);
    }
    options
}

fn required_str(body: &Value, field: &str) -> WalletResult<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WalletError::InvalidResponse(format!("response did not include {field}")))
}
