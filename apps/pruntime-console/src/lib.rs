// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! pRuntime Console - operator CLI for confidential contracts
//!
//! Commands mutate confidential contract state and travel on-chain as signed
//! extrinsics. Queries are read-only and go straight to the pRuntime HTTP API.
//!
//! ## Modules
//!
//! - `blockchain` - Substrate node client, sr25519 keys, command submission
//! - `commands` - Subcommand dispatch and exit-code mapping
//! - `contracts` - Contract ids and contract-specific payloads
//! - `encoding` - Operator input parsing (amounts, hex, addresses)
//! - `pruntime` - pRuntime envelope protocol and HTTP client

pub mod blockchain;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod pruntime;
