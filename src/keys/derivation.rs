// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic vault identity derivation.
//!
//! The master seed is run through BIP-32 along a fixed hardened path to get
//! a secp256k1 private key. The public key is the uncompressed SEC1 point
//! without its `0x04` prefix and the address is the last 20 bytes of its
//! Keccak-256 hash, as on Ethereum.

use alloy::primitives::{keccak256, Address};
use bip32::{DerivationPath, XPrv};
use k256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};

use crate::error::{WalletError, WalletResult};

/// Derivation path of the vault signing identity.
pub const VAULT_IDENTITY_PATH: &str = "m/73'/0'/0'/0";

/// Seed length bounds accepted by BIP-32, in bytes.
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Raw master seed.
///
/// `Debug` output is redacted; the seed never leaves this process
/// unencrypted.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterSeed(Vec<u8>);

impl MasterSeed {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> WalletResult<Self> {
        let bytes = bytes.into();
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&bytes.len()) {
            return Err(WalletError::InvalidSeed(format!(
                "seed must be {MIN_SEED_LEN}-{MAX_SEED_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Parse a hex-encoded seed (`0x` prefix optional).
    pub fn from_hex(seed_hex: &str) -> WalletResult<Self> {
        let bytes = alloy::hex::decode(seed_hex.trim())
            .map_err(|e| WalletError::InvalidSeed(format!("invalid hex: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        alloy::hex::encode(&self.0)
    }
}

impl std::fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterSeed([REDACTED; {}])", self.0.len())
    }
}

/// Signing identity derived from a [`MasterSeed`].
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    private_key: [u8; 32],
    public_key: [u8; 64],
    address: Address,
}

impl DerivedIdentity {
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// Uncompressed public key without the SEC1 prefix byte.
    pub fn public_key(&self) -> &[u8; 64] {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lower-case hex address without `0x`.
    pub fn address_hex(&self) -> String {
        alloy::hex::encode(self.address.as_slice())
    }

    /// `did:ethr:0x<address-hex>`
    pub fn did(&self) -> String {
        format!("did:ethr:0x{}", self.address_hex())
    }
}

impl std::fmt::Debug for DerivedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derive the vault signing identity from `seed`.
///
/// Walks the BIP-32 path [`VAULT_IDENTITY_PATH`] and builds the secp256k1
/// key pair and Ethereum-style address at the leaf. Pure and deterministic:
/// the same seed always yields the same identity.
///
/// # Arguments
/// * `seed` - Master seed, 16 to 64 bytes
///
/// # Returns
/// * `Ok(DerivedIdentity)` - Private key, 64-byte public key and address
/// * `Err(WalletError::InvalidSeed)` - If the path cannot be derived from `seed`
pub fn derive_identity(seed: &MasterSeed) -> WalletResult<DerivedIdentity> {
    let path: DerivationPath = VAULT_IDENTITY_PATH
        .parse()
        .map_err(|e| WalletError::InvalidSeed(format!("invalid derivation path: {e}")))?;

    let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)
        .map_err(|e| WalletError::InvalidSeed(format!("key derivation failed: {e}")))?;

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&xprv.private_key().to_bytes());

    identity_from_private_key(private_key)
}

/// Build an identity from an already derived private key.
pub fn identity_from_private_key(private_key: [u8; 32]) -> WalletResult<DerivedIdentity> {
    let secret = SecretKey::from_slice(&private_key)
        .map_err(|e| WalletError::InvalidSeed(format!("invalid private key: {e}")))?;

    let encoded = secret.public_key().to_encoded_point(false);
    let mut public_key = [0u8; 64];
    public_key.copy_from_slice(&encoded.as_bytes()[1..]);

    let hash = keccak256(public_key);
    let address = Address::from_slice(&hash[12..]);

    Ok(DerivedIdentity {
        private_key,
        public_key,
        address,
    })
}
