// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Substrate chain integration.
//!
//! This module provides functionality for:
//! - Deriving sr25519 operator keys and formatting SS58 addresses
//! - Reading chain state (head, timestamp, storage items)
//! - Signing and submitting confidential contract commands

pub mod client;
pub mod signing;
pub mod ss58;
pub mod submit;
pub mod value;

pub use client::{ChainClient, ChainError, ChainHead, SignedExtrinsic, SubstrateClient};
pub use signing::{KeyError, KeyManager, OperatorKey, Sr25519Keyring};
pub use submit::{signing_key, CommandSubmitter, SubmissionState, SubmitError, TxReceipt};
