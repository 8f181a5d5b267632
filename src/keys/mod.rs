// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vault signing identity.
//!
//! This module provides functionality for:
//! - Deriving the secp256k1 identity from the master seed
//! - Signing vault challenges as personal messages

pub mod derivation;
pub mod signing;

pub use derivation::{
    derive_identity, identity_from_private_key, DerivedIdentity, MasterSeed, VAULT_IDENTITY_PATH,
};
pub use signing::{
    hash_personal_message, sign_personal_message, ChallengeSigner, PersonalMessageSigner,
};
