// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract payload wrapper shared by commands and queries.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A contract payload as carried on the wire.
///
/// Only `Plain` is produced by this client. `Encrypted` is reserved for
/// payloads sealed to the enclave key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// JSON text of the contract-level message.
    Plain(String),
    Encrypted(Vec<u8>),
}

/// Errors raised while opening a payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Encrypted payloads are not supported")]
    Encrypted,

    #[error("Invalid payload JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Payload {
    /// JSON-encode `message` into a `Plain` payload.
    pub fn plain<T: Serialize + ?Sized>(message: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string(message).map(Self::Plain)
    }

    /// Decode the inner JSON of a `Plain` payload.
    pub fn open<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        match self {
            Self::Plain(text) => Ok(serde_json::from_str(text)?),
            Self::Encrypted(_) => Err(PayloadError::Encrypted),
        }
    }
}
