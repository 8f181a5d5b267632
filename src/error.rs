// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for wallet storage operations.
//!
//! Generic vault CRUD failures are wrapped with a fixed error code so callers
//! get a stable surface. Failures on the authentication path are reported
//! as [`WalletError::AuthenticationFailed`] with the upstream status attached
//! and no CRUD code.

use crate::services::http::HttpError;

/// Error code attached to a vault delete that the vault rejected.
pub const REMOTE_OPERATION_FAILED_CODE: &str = "COR-0";

/// Error code attached to a 404 while fetching credential blobs.
pub const CREDENTIALS_NOT_FOUND_CODE: &str = "COR-14";

/// The handshake step that was rejected by the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    /// `POST /auth/request-token`
    RequestChallenge,
    /// `POST /auth/validate-token`
    ValidateSignature,
}

impl std::fmt::Display for AuthStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStep::RequestChallenge => write!(f, "challenge request"),
            AuthStep::ValidateSignature => write!(f, "signature validation"),
        }
    }
}

/// Errors returned by the wallet storage core.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Vault authentication failed during {step}: {source}")]
    AuthenticationFailed {
        step: AuthStep,
        #[source]
        source: HttpError,
    },

    #[error("Stored credentials not found: {0}")]
    NotFound(#[source] HttpError),

    #[error("Remote vault operation failed: {0}")]
    RemoteOperationFailed(#[source] HttpError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Seed cipher failure: {0}")]
    Cipher(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WalletError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            WalletError::InvalidSeed(_) => "invalid_seed",
            WalletError::AuthenticationFailed { .. } => "authentication_failed",
            WalletError::NotFound(_) => CREDENTIALS_NOT_FOUND_CODE,
            WalletError::RemoteOperationFailed(_) => REMOTE_OPERATION_FAILED_CODE,
            WalletError::Http(_) => "http_error",
            WalletError::InvalidToken(_) => "invalid_token",
            WalletError::InvalidResponse(_) => "invalid_response",
            WalletError::Cipher(_) => "cipher_error",
            WalletError::Config(_) => "config_error",
        }
    }

    /// Upstream HTTP status, when the error originated from a remote call.
    pub fn status(&self) -> Option<u16> {
        match self {
            WalletError::AuthenticationFailed { source, .. }
            | WalletError::NotFound(source)
            | WalletError::RemoteOperationFailed(source)
            | WalletError::Http(source) => source.status,
            _ => None,
        }
    }
}

/// Result type for wallet storage operations.
pub type WalletResult<T> = Result<T, WalletError>;
