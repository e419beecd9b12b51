// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! pRuntime (enclave runtime) HTTP protocol.
//!
//! Every call is `POST {endpoint}/{method}` with an [`Envelope`] body and
//! answers with `{"status": .., "payload": ..}`.

pub mod client;
pub mod envelope;
pub mod payload;

pub use client::{PRuntimeClient, PRuntimeError};
pub use envelope::{decode_envelope, encode_envelope, Envelope, EnvelopeError, Nonce};
pub use payload::{Payload, PayloadError};
