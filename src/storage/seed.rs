// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Master seed encryption for off-device backup.
//!
//! The backup key is the hex SHA-256 of the user's stable identifier (the
//! `sub` claim of their user-pool token), computed locally. The key-storage
//! service only ever sees the resulting ciphertext.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use crate::auth::subject_from_bearer;
use crate::error::{WalletError, WalletResult};
use crate::keys::MasterSeed;

/// Separator between the seed hex and the DID method in a decrypted seed.
const DID_METHOD_SEPARATOR: &str = "++";

/// Hex SHA-256 of a stable user identifier.
pub fn derive_encryption_key(stable_user_id: &str) -> String {
    alloy::hex::encode(Sha256::digest(stable_user_id.as_bytes()))
}

/// Backup key for the user owning `bearer_token`.
pub fn encryption_key_from_bearer(bearer_token: &str) -> WalletResult<String> {
    let user_id = subject_from_bearer(bearer_token)?;
    Ok(derive_encryption_key(&user_id))
}

/// Key that unlocks the locally held encrypted seed.
pub fn password_key(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Decode a hex encryption key as produced by [`derive_encryption_key`].
pub fn decode_encryption_key(key_hex: &str) -> WalletResult<Vec<u8>> {
    alloy::hex::decode(key_hex)
        .map_err(|e| WalletError::Cipher(format!("encryption key is not hex: {e}")))
}

/// Symmetric cipher for the master seed.
///
/// The same key must always round-trip the same seed.
pub trait SeedCipher: Send + Sync {
    fn encrypt_seed(&self, seed_hex: &str, key: &[u8]) -> WalletResult<String>;

    fn decrypt_seed(&self, encrypted_seed: &str, key: &[u8]) -> WalletResult<String>;
}

/// AES-256-GCM [`SeedCipher`].
///
/// Output is hex(`nonce ‖ ciphertext ‖ tag`) with a random 96-bit nonce.
#[derive(Debug, Clone)]
pub struct AesGcmSeedCipher {
    rng: SystemRandom,
}

impl AesGcmSeedCipher {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn key(key: &[u8]) -> WalletResult<LessSafeKey> {
        if key.len() != AES_256_GCM.key_len() {
            return Err(WalletError::Cipher(format!(
                "key must be {} bytes, got {}",
                AES_256_GCM.key_len(),
                key.len()
            )));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| WalletError::Cipher("unusable key".to_string()))?;
        Ok(LessSafeKey::new(unbound))
    }
}

impl Default for AesGcmSeedCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedCipher for AesGcmSeedCipher {
    fn encrypt_seed(&self, seed_hex: &str, key: &[u8]) -> WalletResult<String> {
        let key = Self::key(key)?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| WalletError::Cipher("nonce generation failed".to_string()))?;

        let mut in_out = seed_hex.as_bytes().to_vec();
        key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
            .map_err(|_| WalletError::Cipher("encryption failed".to_string()))?;

        let mut output = nonce.to_vec();
        output.extend_from_slice(&in_out);
        Ok(alloy::hex::encode(output))
    }

    fn decrypt_seed(&self, encrypted_seed: &str, key: &[u8]) -> WalletResult<String> {
        let key = Self::key(key)?;

        let bytes = alloy::hex::decode(encrypted_seed.trim())
            .map_err(|e| WalletError::Cipher(format!("encrypted seed is not hex: {e}")))?;
        if bytes.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(WalletError::Cipher("encrypted seed is truncated".to_string()));
        }

        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce)
            .map_err(|_| WalletError::Cipher("invalid nonce".to_string()))?;

        let mut in_out = sealed.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| WalletError::Cipher("decryption failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| WalletError::Cipher("decrypted seed is not UTF-8".to_string()))
    }
}

/// Decrypted wallet seed envelope: `<seedHex>` or `<seedHex>++<didMethod>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedSeed {
    pub seed: MasterSeed,
    pub did_method: Option<String>,
}

impl DecryptedSeed {
    pub fn parse(envelope: &str) -> WalletResult<Self> {
        let (seed_hex, did_method) = match envelope.split_once(DID_METHOD_SEPARATOR) {
            Some((seed_hex, method)) if !method.is_empty() => (seed_hex, Some(method.to_string())),
            Some((seed_hex, _)) => (seed_hex, None),
            None => (envelope, None),
        };
        Ok(Self {
            seed: MasterSeed::from_hex(seed_hex)?,
            did_method,
        })
    }

    /// Inverse of [`DecryptedSeed::parse`].
    pub fn envelope(&self) -> String {
        match &self.did_method {
            Some(method) => format!("{}{DID_METHOD_SEPARATOR}{method}", self.seed.to_hex()),
            None => self.seed.to_hex(),
        }
    }
}
