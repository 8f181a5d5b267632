// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Models
//!
//! Data structures exchanged with the vault and with presentation requests.
//!
//! - [`EncryptedBlob`]: a vault slot; a `null` cyphertext marks a deleted slot
//! - [`Credential`]: a decrypted verifiable credential, typed by its `type` list
//! - [`CredentialRequirement`]: one entry of a presentation request

pub mod matcher;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use matcher::{credential_requirements, filter_credentials, is_type_match};

/// Encrypted credential slot as stored by the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Slot index assigned by the vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Encrypted credential; `None` once the slot has been deleted.
    pub cyphertext: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EncryptedBlob {
    pub fn is_tombstone(&self) -> bool {
        self.cyphertext.is_none()
    }
}

/// Decrypted verifiable credential.
///
/// Only `type` is interpreted; the remaining members are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Type requirement from a credential share request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequirement {
    #[serde(rename = "type")]
    pub types: Vec<String>,
}

/// Payload of a credential share request token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequestClaims {
    pub interaction_token: InteractionToken,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionToken {
    pub credential_requirements: Vec<CredentialRequirement>,
    #[serde(default, rename = "callbackURL")]
    pub callback_url: Option<String>,
}

/// A credential that can be matched against type requirements.
pub trait TypedCredential {
    fn credential_types(&self) -> Vec<&str>;
}

impl TypedCredential for Credential {
    fn credential_types(&self) -> Vec<&str> {
        self.types.iter().map(String::as_str).collect()
    }
}

/// Raw JSON credentials; `type` may be a string or an array of strings.
impl TypedCredential for Value {
    fn credential_types(&self) -> Vec<&str> {
        match self.get("type") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(single)) => vec![single.as_str()],
            _ => Vec::new(),
        }
    }
}
