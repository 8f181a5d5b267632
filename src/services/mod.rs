// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote service plumbing: the HTTP executor seam and the key-storage API.

pub mod http;
pub mod key_storage;

pub use http::{HttpError, HttpExecutor, HttpRequest, ReqwestExecutor};
pub use key_storage::KeyStorageClient;
