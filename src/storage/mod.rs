// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Storage
//!
//! Two stores back a wallet:
//!
//! - the key-storage service keeps the encrypted master seed ([`seed`])
//! - the vault keeps encrypted credential blobs in numbered slots ([`vault`])
//!
//! Nothing in this module decrypts credentials; blobs are opaque cyphertext.

pub mod seed;
pub mod vault;

pub use seed::{
    decode_encryption_key, derive_encryption_key, encryption_key_from_bearer, password_key,
    AesGcmSeedCipher, DecryptedSeed, SeedCipher,
};
pub use vault::{VaultStore, FIRST_SLOT, LAST_SLOT};
