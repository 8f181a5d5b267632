// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Storage Core - Vault Authentication & Credential Matching
//!
//! Client-side core of an identity wallet. Derives the vault signing
//! identity from the master seed, authenticates against the encrypted
//! credential vault with a signed challenge, and filters credentials for
//! presentation requests.
//!
//! ## Modules
//!
//! - `keys` - Identity derivation and personal-message signing
//! - `auth` - Vault challenge-response handshake, unverified JWT claims
//! - `storage` - Seed encryption and vault credential slots
//! - `credentials` - Credential models and share-request matching
//! - `services` - HTTP executor seam and key-storage API
//! - `client` - `VaultClient`, the configured entry point

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod keys;
pub mod logging;
pub mod services;
pub mod storage;

#[cfg(test)]
mod testing;

pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::{WalletError, WalletResult};
pub use keys::{derive_identity, DerivedIdentity, MasterSeed};
