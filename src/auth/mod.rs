// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Vault authentication and local token inspection.
//!
//! ## Auth Flow
//!
//! 1. The vault identity is derived from the master seed (`keys`)
//! 2. The vault issues a challenge for the identity's DID
//! 3. The challenge is signed and submitted for validation
//! 4. The validated challenge becomes the `Authorization: Bearer` value
//!
//! User-pool bearer tokens are only decoded locally to read the `sub`
//! claim; signature verification is left to the services that accept them.

pub mod challenge;
pub mod claims;

pub use challenge::{AuthState, BearerToken, VaultAuthenticator};
pub use claims::{decode_unverified, subject_from_bearer, BearerClaims};
