// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Storage Client
//!
//! [`VaultClient`] ties one wallet seed to its configured services. It owns
//! its collaborators (HTTP executor, challenge signer, seed cipher) and
//! holds no session state: vault operations derive the identity and run a
//! full handshake on every call.
//!
//! ```text
//! VaultClient
//!   ├── KeyStorageClient   encrypted seed backup, issuer helpers
//!   ├── VaultStore         challenge-response + credential slots
//!   └── filter_credentials local share-request matching
//! ```

use serde_json::{Map, Value};

use crate::config::VaultConfig;
use crate::credentials::{filter_credentials, EncryptedBlob, TypedCredential};
use crate::error::WalletResult;
use crate::keys::{derive_identity, ChallengeSigner, DerivedIdentity, MasterSeed, PersonalMessageSigner};
use crate::services::http::{HttpExecutor, ReqwestExecutor};
use crate::services::key_storage::KeyStorageClient;
use crate::storage::seed::{self, password_key, AesGcmSeedCipher, DecryptedSeed, SeedCipher};
use crate::storage::vault::VaultStore;

/// Wallet storage operations for a single seed.
pub struct VaultClient<H = ReqwestExecutor, S = PersonalMessageSigner, C = AesGcmSeedCipher> {
    config: VaultConfig,
    seed: DecryptedSeed,
    http: H,
    signer: S,
    cipher: C,
}

impl VaultClient {
    /// Client with the production executor, signer and cipher.
    pub fn new(config: VaultConfig, seed: MasterSeed) -> WalletResult<Self> {
        config.validate()?;
        Self::with_executor(config, seed, ReqwestExecutor::new()?)
    }

    /// Unlock a locally held encrypted seed with the wallet password.
    pub fn from_encrypted_seed(
        config: VaultConfig,
        encrypted_seed: &str,
        password: &str,
    ) -> WalletResult<Self> {
        config.validate()?;
        let cipher = AesGcmSeedCipher::new();
        let seed = open_encrypted_seed(&cipher, encrypted_seed, password)?;
        Ok(Self {
            config,
            seed,
            http: ReqwestExecutor::new()?,
            signer: PersonalMessageSigner,
            cipher,
        })
    }
}

impl<H: HttpExecutor> VaultClient<H> {
    /// Client over a caller-provided executor.
    ///
    /// Fails with [`crate::WalletError::Config`] when `config` does not validate.
    pub fn with_executor(config: VaultConfig, seed: MasterSeed, http: H) -> WalletResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed: DecryptedSeed {
                seed,
                did_method: None,
            },
            http,
            signer: PersonalMessageSigner,
            cipher: AesGcmSeedCipher::new(),
        })
    }
}

impl<H, S, C> VaultClient<H, S, C>
where
    H: HttpExecutor,
    S: ChallengeSigner,
    C: SeedCipher,
{
    pub fn with_signer<S2: ChallengeSigner>(self, signer: S2) -> VaultClient<H, S2, C> {
        VaultClient {
            config: self.config,
            seed: self.seed,
            http: self.http,
            signer,
            cipher: self.cipher,
        }
    }

    pub fn with_cipher<C2: SeedCipher>(self, cipher: C2) -> VaultClient<H, S, C2> {
        VaultClient {
            config: self.config,
            seed: self.seed,
            http: self.http,
            signer: self.signer,
            cipher,
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// DID method recorded alongside the seed, if any.
    pub fn did_method(&self) -> Option<&str> {
        self.seed.did_method.as_deref()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn identity(&self) -> WalletResult<DerivedIdentity> {
        derive_identity(&self.seed.seed)
    }

    pub fn did(&self) -> WalletResult<String> {
        Ok(self.identity()?.did())
    }

    // =========================================================================
    // Seed backup
    // =========================================================================

    pub async fn pull_encrypted_seed(&self, access_token: &str) -> WalletResult<String> {
        self.key_storage().pull_encrypted_seed(access_token).await
    }

    /// Back up this wallet's seed under `encryption_key` (hex).
    pub async fn store_encrypted_seed(
        &self,
        access_token: &str,
        encryption_key: &str,
    ) -> WalletResult<()> {
        self.key_storage()
            .store_encrypted_seed(&self.cipher, access_token, &self.seed.envelope(), encryption_key)
            .await
    }

    pub fn encryption_key_from_bearer(&self, bearer_token: &str) -> WalletResult<String> {
        seed::encryption_key_from_bearer(bearer_token)
    }

    // =========================================================================
    // Vault
    // =========================================================================

    pub async fn save_credentials(&self, cyphertexts: &[String]) -> WalletResult<Vec<Value>> {
        self.vault().save_credentials(cyphertexts).await
    }

    pub async fn fetch_encrypted_credentials(&self) -> WalletResult<Vec<EncryptedBlob>> {
        self.vault().fetch_encrypted_credentials().await
    }

    pub async fn delete_credential_by_index(&self, index: u32) -> WalletResult<()> {
        self.vault().delete_credential_by_index(index).await
    }

    pub async fn delete_all_credentials(&self) -> WalletResult<()> {
        self.vault().delete_all_credentials().await
    }

    pub fn filter_credentials<T: TypedCredential>(
        &self,
        request_token: Option<&str>,
        credentials: Vec<T>,
    ) -> WalletResult<Vec<T>> {
        filter_credentials(request_token, credentials)
    }

    // =========================================================================
    // User management and issuance
    // =========================================================================

    pub async fn admin_confirm_user(&self, username: &str) -> WalletResult<()> {
        self.key_storage().admin_confirm_user(username).await
    }

    pub async fn admin_delete_unconfirmed_user(&self, username: &str) -> WalletResult<()> {
        self.key_storage().admin_delete_unconfirmed_user(username).await
    }

    pub async fn get_credential_offer(&self, id_token: &str) -> WalletResult<String> {
        self.key_storage().get_credential_offer(id_token).await
    }

    pub async fn get_signed_credentials(
        &self,
        id_token: &str,
        credential_offer_response_token: &str,
        options: Map<String, Value>,
    ) -> WalletResult<Vec<Value>> {
        self.key_storage()
            .get_signed_credentials(id_token, credential_offer_response_token, options)
            .await
    }

    fn vault(&self) -> VaultStore<'_, H, S> {
        VaultStore::new(&self.config.vault_url, &self.seed.seed, &self.http, &self.signer)
    }

    fn key_storage(&self) -> KeyStorageClient<'_, H> {
        KeyStorageClient::new(&self.config.key_storage_url, &self.http)
    }
}

/// Decrypt a password-protected seed envelope.
pub fn open_encrypted_seed(
    cipher: &impl SeedCipher,
    encrypted_seed: &str,
    password: &str,
) -> WalletResult<DecryptedSeed> {
    let envelope = cipher.decrypt_seed(encrypted_seed, &password_key(password))?;
    DecryptedSeed::parse(&envelope)
}
