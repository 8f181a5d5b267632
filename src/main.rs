// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;
use std::process::ExitCode;

use wallet_storage_core::logging::init_tracing;
use wallet_storage_core::{MasterSeed, VaultClient, VaultConfig, WalletError, WalletResult};

const SEED_ENV: &str = "WALLET_SEED_HEX";
const FETCH_ENV: &str = "VAULT_FETCH";

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "wallet-storage failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> WalletResult<()> {
    let config = VaultConfig::from_env()?;
    tracing::info!(vault = %config.vault_url, key_storage = %config.key_storage_url, "Loaded configuration");

    let seed_hex =
        env::var(SEED_ENV).map_err(|_| WalletError::Config(format!("{SEED_ENV} must be set")))?;
    let client = VaultClient::new(config, MasterSeed::from_hex(seed_hex.trim())?)?;

    let did = client.did()?;
    println!("{did}");

    if fetch_requested(env::var(FETCH_ENV).ok().as_deref()) {
        let blobs = client.fetch_encrypted_credentials().await?;
        println!("{} stored credential(s)", blobs.len());
    }

    Ok(())
}

/// `VAULT_FETCH=1` enables the vault round trip.
fn fetch_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_only_when_flag_is_one() {
        assert!(fetch_requested(Some("1")));
        assert!(fetch_requested(Some(" 1 ")));
        assert!(!fetch_requested(Some("0")));
        assert!(!fetch_requested(Some("true")));
        assert!(!fetch_requested(None));
    }

    #[tokio::test]
    async fn missing_seed_is_a_config_error() {
        // The seed variable is never set in the test environment.
        if env::var(SEED_ENV).is_ok() {
            return;
        }
        let err = run().await.unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
        assert_eq!(err.error_code(), "config_error");
    }
}
