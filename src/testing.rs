// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by the in-module test suites.

use std::collections::VecDeque;
use std::sync::Mutex;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use crate::services::http::{HttpError, HttpExecutor, HttpRequest};

pub const VAULT_URL: &str = "https://vault.test";
pub const KEY_STORAGE_URL: &str = "https://keys.test";

/// Seed used across the suites; 64 hex characters of `e`.
pub const TEST_SEED_HEX: &str = "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// Address derived from [`TEST_SEED_HEX`] along `m/73'/0'/0'/0`.
pub const TEST_ADDRESS_HEX: &str = "5251d959911f5ec774e222273dbe9d379b0f4211";

/// Executor that replays scripted responses in order and records every
/// request it receives.
#[derive(Default)]
pub struct RecordingExecutor {
    responses: Mutex<VecDeque<Result<Value, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(HttpError::status("scripted", status, "scripted failure")));
        self
    }

    /// Scripts a successful challenge-response handshake issuing `challenge`.
    pub fn handshake(self, challenge: &str) -> Self {
        self.respond(json!({ "token": challenge })).respond(json!({}))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl HttpExecutor for RecordingExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<Value, HttpError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(err)) => Err(HttpError { url, ..err }),
            None => Err(HttpError::transport(url, "no scripted response")),
        }
    }
}

pub const RS256: &str = "RS256";

/// Build an unsigned JWT with the given payload (signature is not checked).
pub fn unsigned_jwt(alg: &str, payload: &Value) -> String {
    let header = json!({ "alg": alg, "typ": "JWT" }).to_string();
    let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
    let claims_b64 = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header_b64}.{claims_b64}.fake_signature")
}

/// Presentation request token asking for each of `requirements`.
pub fn share_request_token(requirements: &[&[&str]]) -> String {
    let requirements: Vec<Value> = requirements
        .iter()
        .map(|types| json!({ "type": types }))
        .collect();
    unsigned_jwt("ES256K", &json!({
        "iss": "did:ethr:0xverifier",
        "interactionToken": {
            "credentialRequirements": requirements,
            "callbackURL": "https://verifier.test/callback"
        },
        "typ": "credentialRequest"
    }))
}
