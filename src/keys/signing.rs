// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Personal-message signing for the vault handshake.
//!
//! Challenges are signed as EIP-191 personal messages:
//! `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`,
//! with a recoverable secp256k1 signature encoded as `0x ‖ r ‖ s ‖ v`
//! where `v` is 27 or 28.

use alloy::{
    primitives::{eip191_hash_message, B256},
    signers::{local::PrivateKeySigner, SignerSync},
};

use super::DerivedIdentity;
use crate::error::{WalletError, WalletResult};

/// Digest signed for a personal message.
pub fn hash_personal_message(message: &[u8]) -> B256 {
    eip191_hash_message(message)
}

/// Create a signer from the identity's private key.
pub fn signer_from_identity(identity: &DerivedIdentity) -> WalletResult<PrivateKeySigner> {
    PrivateKeySigner::from_slice(identity.private_key())
        .map_err(|e| WalletError::InvalidSeed(format!("Invalid signing key: {e}")))
}

/// Sign `message` as a personal message and return the `r ‖ s ‖ v` hex
/// string (`0x`-prefixed).
pub fn sign_personal_message(message: &[u8], identity: &DerivedIdentity) -> WalletResult<String> {
    let signer = signer_from_identity(identity)?;
    let signature = signer
        .sign_message_sync(message)
        .map_err(|e| WalletError::InvalidSeed(format!("Signing failed: {e}")))?;
    Ok(alloy::hex::encode_prefixed(signature.as_bytes()))
}

/// Signs vault challenges on behalf of a derived identity.
pub trait ChallengeSigner: Send + Sync {
    fn sign_challenge(&self, challenge: &str, identity: &DerivedIdentity) -> WalletResult<String>;
}

/// Production [`ChallengeSigner`]: EIP-191 personal-message signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalMessageSigner;

impl ChallengeSigner for PersonalMessageSigner {
    fn sign_challenge(&self, challenge: &str, identity: &DerivedIdentity) -> WalletResult<String> {
        sign_personal_message(challenge.as_bytes(), identity)
    }
}
