// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Service endpoints used by [`crate::client::VaultClient`]. Values are
//! passed explicitly; [`VaultConfig::from_env`] is a convenience for the
//! binary and for deployments that configure through the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `KEY_STORAGE_URL` | Key-storage service base URL | staging |
//! | `VAULT_URL` | Credential vault base URL | staging |
//! | `COGNITO_CLIENT_ID` | User-pool app client id | unset |
//! | `COGNITO_USER_POOL_ID` | User-pool id | unset |
//! | `REGISTRY_URL` | DID registry base URL | unset |
//! | `ISSUER_URL` | Credential issuer base URL | unset |
//! | `VERIFIER_URL` | Credential verifier base URL | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! Blank values count as unset.

use url::Url;

use crate::error::{WalletError, WalletResult};

pub const KEY_STORAGE_URL_ENV: &str = "KEY_STORAGE_URL";
pub const VAULT_URL_ENV: &str = "VAULT_URL";
pub const CLIENT_ID_ENV: &str = "COGNITO_CLIENT_ID";
pub const USER_POOL_ID_ENV: &str = "COGNITO_USER_POOL_ID";
pub const REGISTRY_URL_ENV: &str = "REGISTRY_URL";
pub const ISSUER_URL_ENV: &str = "ISSUER_URL";
pub const VERIFIER_URL_ENV: &str = "VERIFIER_URL";

/// Staging key-storage service.
pub const STAGING_KEY_STORAGE_URL: &str = "https://affinity-key-storage.staging.affinity-project.org";

/// Staging credential vault.
pub const STAGING_VAULT_URL: &str = "https://affinity-vault-us-east-2.staging.affinity-project.org";

/// Endpoints and identifiers for the wallet storage services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub key_storage_url: String,
    pub vault_url: String,
    pub client_id: Option<String>,
    pub user_pool_id: Option<String>,
    pub registry_url: Option<String>,
    pub issuer_url: Option<String>,
    pub verifier_url: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_storage_url: STAGING_KEY_STORAGE_URL.to_string(),
            vault_url: STAGING_VAULT_URL.to_string(),
            client_id: None,
            user_pool_id: None,
            registry_url: None,
            issuer_url: None,
            verifier_url: None,
        }
    }
}

impl VaultConfig {
    /// Build from the environment, falling back to staging endpoints.
    pub fn from_env() -> WalletResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WalletResult<Self> {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let config = Self {
            key_storage_url: value(KEY_STORAGE_URL_ENV).unwrap_or(defaults.key_storage_url),
            vault_url: value(VAULT_URL_ENV).unwrap_or(defaults.vault_url),
            client_id: value(CLIENT_ID_ENV),
            user_pool_id: value(USER_POOL_ID_ENV),
            registry_url: value(REGISTRY_URL_ENV),
            issuer_url: value(ISSUER_URL_ENV),
            verifier_url: value(VERIFIER_URL_ENV),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every configured URL is absolute http(s).
    pub fn validate(&self) -> WalletResult<()> {
        check_url("key_storage_url", &self.key_storage_url)?;
        check_url("vault_url", &self.vault_url)?;

        let optional = [
            ("registry_url", &self.registry_url),
            ("issuer_url", &self.issuer_url),
            ("verifier_url", &self.verifier_url),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                check_url(name, value)?;
            }
        }
        Ok(())
    }
}

fn check_url(name: &str, value: &str) -> WalletResult<()> {
    let parsed =
        Url::parse(value).map_err(|e| WalletError::Config(format!("{name} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(WalletError::Config(format!(
            "{name} must use http or https, got {scheme}"
        ))),
    }
}
