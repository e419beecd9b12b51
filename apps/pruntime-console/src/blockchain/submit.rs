// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Submission of confidential contract commands as signed extrinsics.
//!
//! A command moves through `Built → Signed → Submitted → Accepted | Rejected`.
//! Rejections are reported as-is; nothing is retried here.

use serde::Serialize;

use super::client::{ChainClient, ChainError};
use super::signing::{KeyError, KeyManager, OperatorKey};
use crate::contracts::ContractId;
use crate::pruntime::Payload;

/// Lifecycle of a pushed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Built,
    Signed,
    Submitted,
    Accepted,
    Rejected,
}

/// Receipt for a command accepted by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub contract_id: ContractId,
    pub tx_hash: String,
    /// SS58 address of the signing account.
    pub signer: String,
    pub state: SubmissionState,
}

/// Errors that can end a command submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Cannot encode command: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid signing key: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("Signing failed: {0}")]
    Signing(ChainError),

    #[error("Command rejected by the chain: {0}")]
    Rejected(ChainError),
}

/// Wraps commands for `push_command` and submits them.
pub struct CommandSubmitter<'a, C: ?Sized, K: ?Sized> {
    chain: &'a C,
    keys: &'a K,
}

impl<'a, C, K> CommandSubmitter<'a, C, K>
where
    C: ChainClient + ?Sized,
    K: KeyManager + ?Sized,
{
    pub fn new(chain: &'a C, keys: &'a K) -> Self {
        Self { chain, keys }
    }

    /// Encode `command`, sign it with the key behind `suri` and submit it.
    ///
    /// The key is resolved before the chain is contacted, so a bad `suri`
    /// never produces network traffic.
    pub async fn submit_command<T: Serialize + ?Sized>(
        &self,
        contract_id: ContractId,
        command: &T,
        suri: &str,
    ) -> Result<TxReceipt, SubmitError> {
        let payload = encode_command(command)?;
        let key = signing_key(self.keys, suri)?;
        self.push(contract_id, payload, &key).await
    }

    /// Like [`Self::submit_command`], for a key resolved with [`signing_key`].
    pub async fn submit_as<T: Serialize + ?Sized>(
        &self,
        contract_id: ContractId,
        command: &T,
        key: &OperatorKey,
    ) -> Result<TxReceipt, SubmitError> {
        let payload = encode_command(command)?;
        self.push(contract_id, payload, key).await
    }

    async fn push(
        &self,
        contract_id: ContractId,
        payload: String,
        key: &OperatorKey,
    ) -> Result<TxReceipt, SubmitError> {
        tracing::debug!(%contract_id, state = ?SubmissionState::Built, %payload, "command built");

        let extrinsic = self
            .chain
            .sign_push_command(contract_id, &payload, key)
            .await
            .map_err(SubmitError::Signing)?;
        tracing::debug!(%contract_id, state = ?SubmissionState::Signed, signer = %key.address(), "command signed");

        tracing::debug!(%contract_id, state = ?SubmissionState::Submitted, "submitting command");
        match self.chain.submit(extrinsic).await {
            Ok(tx_hash) => {
                tracing::info!(%contract_id, %tx_hash, state = ?SubmissionState::Accepted, "command accepted");
                Ok(TxReceipt {
                    contract_id,
                    tx_hash,
                    signer: key.address(),
                    state: SubmissionState::Accepted,
                })
            }
            Err(e) => {
                tracing::warn!(%contract_id, error = %e, state = ?SubmissionState::Rejected, "command rejected");
                Err(SubmitError::Rejected(e))
            }
        }
    }
}

/// Resolve the signing key behind `suri`.
///
/// # Arguments
/// * `keys` - Key source
/// * `suri` - Secret URI such as `//Alice` or a mnemonic with derivation path
///
/// # Returns
/// * `Ok(OperatorKey)` - The signing key
/// * `Err(SubmitError::InvalidKey)` - If the URI does not yield a key
pub fn signing_key<K: KeyManager + ?Sized>(
    keys: &K,
    suri: &str,
) -> Result<OperatorKey, SubmitError> {
    Ok(keys.key_from_suri(suri)?)
}

/// `{"Plain": "<command json>"}`, itself JSON-encoded.
pub fn encode_command<T: Serialize + ?Sized>(command: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Payload::plain(command)?)
}
