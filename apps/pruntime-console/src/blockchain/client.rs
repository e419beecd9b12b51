// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Substrate node client for chain state and command extrinsics.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as Json;
use subxt::{
    backend::rpc::{rpc_params, RpcClient},
    ext::scale_value::Value,
    tx::SubmittableExtrinsic,
    OnlineClient, PolkadotConfig,
};
use url::Url;

use super::signing::OperatorKey;
use super::value;
use crate::contracts::ContractId;
use crate::encoding::normalize_hex;

/// Pallet hosting the confidential contract entry point.
pub const PHALA_PALLET: &str = "Phala";

/// Call that forwards a command payload to a confidential contract.
pub const PUSH_COMMAND_CALL: &str = "push_command";

/// Latest block as seen by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainHead {
    pub number: u64,
    /// `0x`-prefixed block hash.
    pub hash: String,
    /// `Timestamp::Now` at this block, in milliseconds.
    pub timestamp: Option<u64>,
}

/// A signed, SCALE-encoded extrinsic ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtrinsic(pub Vec<u8>);

/// Blockchain operations used by the console.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Build and sign `Phala::push_command(contract_id, payload)`.
    async fn sign_push_command(
        &self,
        contract_id: ContractId,
        payload: &str,
        key: &OperatorKey,
    ) -> Result<SignedExtrinsic, ChainError>;

    /// Submit a signed extrinsic, returning its hash once the node accepts it.
    async fn submit(&self, extrinsic: SignedExtrinsic) -> Result<String, ChainError>;

    /// Latest block with its `Timestamp.Now` value, if the pallet exists.
    async fn chain_head(&self) -> Result<ChainHead, ChainError>;

    /// Raw `system_syncState` result.
    async fn sync_state(&self) -> Result<Json, ChainError>;

    /// Read a storage item at the latest block. Absent items yield `None`.
    async fn storage(
        &self,
        pallet: &str,
        entry: &str,
        keys: Vec<Vec<u8>>,
    ) -> Result<Option<Json>, ChainError>;
}

/// Websocket client for a Substrate node.
pub struct SubstrateClient {
    api: OnlineClient<PolkadotConfig>,
    rpc: RpcClient,
}

impl SubstrateClient {
    /// Connect to the node and fetch its metadata.
    pub async fn connect(endpoint: &Url) -> Result<Self, ChainError> {
        tracing::debug!(%endpoint, "connecting to substrate node");

        let rpc = RpcClient::from_insecure_url(endpoint.as_str())
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;
        let api = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc.clone())
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        Ok(Self { api, rpc })
    }
}

#[async_trait]
impl ChainClient for SubstrateClient {
    async fn sign_push_command(
        &self,
        contract_id: ContractId,
        payload: &str,
        key: &OperatorKey,
    ) -> Result<SignedExtrinsic, ChainError> {
        let call = subxt::dynamic::tx(
            PHALA_PALLET,
            PUSH_COMMAND_CALL,
            vec![
                Value::u128(u32::from(contract_id).into()),
                Value::from_bytes(payload.as_bytes()),
            ],
        );

        let signed = self
            .api
            .tx()
            .create_signed(&call, key.pair(), Default::default())
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to sign extrinsic: {e}")))?;

        Ok(SignedExtrinsic(signed.encoded().to_vec()))
    }

    async fn submit(&self, extrinsic: SignedExtrinsic) -> Result<String, ChainError> {
        let hash = SubmittableExtrinsic::from_bytes(self.api.clone(), extrinsic.0)
            .submit()
            .await
            .map_err(|e| ChainError::Rejected(e.to_string()))?;

        Ok(normalize_hex(&hex::encode(hash)))
    }

    async fn chain_head(&self) -> Result<ChainHead, ChainError> {
        let block = self
            .api
            .blocks()
            .at_latest()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let now = subxt::dynamic::storage("Timestamp", "Now", Vec::<Value>::new());
        let timestamp = block
            .storage()
            .fetch(&now)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .map(|thunk| thunk.as_type::<u64>())
            .transpose()
            .map_err(|e| ChainError::Decode(e.to_string()))?;

        Ok(ChainHead {
            number: u64::from(block.number()),
            hash: normalize_hex(&hex::encode(block.hash())),
            timestamp,
        })
    }

    async fn sync_state(&self) -> Result<Json, ChainError> {
        self.rpc
            .request::<Json>("system_syncState", rpc_params![])
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn storage(
        &self,
        pallet: &str,
        entry: &str,
        keys: Vec<Vec<u8>>,
    ) -> Result<Option<Json>, ChainError> {
        let keys: Vec<Value> = keys.into_iter().map(Value::from_bytes).collect();
        let address = subxt::dynamic::storage(pallet, entry, keys);

        let found = self
            .api
            .storage()
            .at_latest()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .fetch(&address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let metadata = self.api.metadata();
        let types = metadata.types();
        let shape = |type_id: &u32| value::registry_shape(types, *type_id);

        found
            .map(|thunk| thunk.to_value().map(|decoded| value::to_json(&decoded, &shape)))
            .transpose()
            .map_err(|e| ChainError::Decode(e.to_string()))
    }
}

/// Errors that can occur while talking to the node.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Cannot connect to node: {0}")]
    Connection(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Cannot decode chain data: {0}")]
    Decode(String),

    #[error("Extrinsic rejected: {0}")]
    Rejected(String),
}
