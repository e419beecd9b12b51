// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the pRuntime API.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use super::envelope::{decode_envelope, encode_envelope, EnvelopeError, Nonce};
use super::payload::{Payload, PayloadError};
use crate::contracts::ContractId;

const METHOD_GET_INFO: &str = "get_info";
const METHOD_QUERY: &str = "query";

/// Errors that can occur while calling pRuntime.
#[derive(Debug, thiserror::Error)]
pub enum PRuntimeError {
    #[error("Cannot reach pRuntime: {0}")]
    Transport(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Invalid query result: {0}")]
    Payload(#[from] PayloadError),

    #[error("Cannot encode request: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Body of a contract query before it is wrapped in [`Payload::Plain`].
#[derive(Debug, Serialize)]
struct QueryBody<'a, R: ?Sized> {
    contract_id: ContractId,
    nonce: Nonce,
    request: &'a R,
}

/// Anonymous pRuntime client.
///
/// Queries are not signed; the enclave answers whoever asks, so results are
/// not tamper-evident.
#[derive(Debug, Clone)]
pub struct PRuntimeClient {
    endpoint: Url,
    http: Client,
}

impl PRuntimeClient {
    pub fn new(endpoint: Url) -> Result<Self, PRuntimeError> {
        let http = Client::builder()
            .build()
            .map_err(|e| PRuntimeError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Call `method` with `input` and decode the `ok` payload.
    pub async fn request<I, O>(&self, method: &str, input: I) -> Result<O, PRuntimeError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let url = self.method_url(method);
        let envelope = encode_envelope(input);
        tracing::debug!(%url, nonce = %envelope.nonce.id, "pRuntime request");

        let response = self
            .http
            .post(url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| PRuntimeError::Transport(e.to_string()))?;

        // Non-2xx bodies still go through the envelope so the raw
        // error detail reaches the operator.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PRuntimeError::Transport(e.to_string()))?;
        tracing::debug!(%status, nonce = %envelope.nonce.id, "pRuntime response");

        Ok(decode_envelope(&body)?)
    }

    /// Runtime status (`get_info`).
    pub async fn get_info(&self) -> Result<Value, PRuntimeError> {
        self.request(METHOD_GET_INFO, json!({})).await
    }

    /// Send a read-only query to a confidential contract.
    ///
    /// The request travels as `{"query_payload": json({"Plain": json(body)})}`
    /// and the answer comes back as a `Plain` payload that is decoded once
    /// more before it is returned.
    pub async fn query<R: Serialize + ?Sized>(
        &self,
        contract_id: ContractId,
        request: &R,
    ) -> Result<Value, PRuntimeError> {
        let body = QueryBody {
            contract_id,
            nonce: Nonce::random(),
            request,
        };
        let query_payload = serde_json::to_string(&Payload::plain(&body)?)?;

        let reply: Payload = self
            .request(METHOD_QUERY, json!({ "query_payload": query_payload }))
            .await?;
        Ok(reply.open()?)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.endpoint.as_str().trim_end_matches('/'), method)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, routing::post, Json, Router};
    use tokio::net::TcpListener;

    use super::*;
    use crate::contracts::pdiem::{PdiemRequest, PDIEM_CONTRACT_ID};

    type Seen = Arc<Mutex<Vec<(String, Value)>>>;

    /// Spawn a fake pRuntime answering every method with `reply`.
    async fn mock_pruntime(reply: Value) -> (Url, Seen) {
        let seen: Seen = Arc::default();

        async fn handle(
            State((reply, seen, method)): State<(Value, Seen, String)>,
            Json(body): Json<Value>,
        ) -> Json<Value> {
            seen.lock().unwrap().push((method, body));
            Json(reply)
        }

        let app = Router::new()
            .route(
                "/query",
                post(handle).with_state((reply.clone(), seen.clone(), "query".to_string())),
            )
            .route(
                "/get_info",
                post(handle).with_state((reply, seen.clone(), "get_info".to_string())),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}").parse().unwrap(), seen)
    }

    fn ok_reply(payload: &Value) -> Value {
        json!({"status": "ok", "payload": payload.to_string()})
    }

    #[test]
    fn method_url_ignores_trailing_slash() {
        let client = PRuntimeClient::new("http://localhost:8000/".parse().unwrap()).unwrap();
        assert_eq!(client.method_url("get_info"), "http://localhost:8000/get_info");
    }

    #[tokio::test]
    async fn query_unwraps_both_payload_layers() {
        let result = json!({"balances": [{"address": "0x01", "amount": 10}]});
        let plain = json!({"Plain": result.to_string()});
        let (endpoint, seen) = mock_pruntime(ok_reply(&plain)).await;

        let client = PRuntimeClient::new(endpoint).unwrap();
        let answer = client
            .query(PDIEM_CONTRACT_ID, &PdiemRequest::AccountData)
            .await
            .unwrap();
        assert_eq!(answer, result);

        let seen = seen.lock().unwrap();
        let (method, body) = &seen[0];
        assert_eq!(method, "query");
        assert!(body["nonce"]["id"].as_u64().unwrap() < 65_536);

        let outer: Payload =
            serde_json::from_str(body["input"]["query_payload"].as_str().unwrap()).unwrap();
        let inner: Value = outer.open().unwrap();
        assert_eq!(inner["contract_id"], json!(5));
        assert_eq!(inner["request"], json!("AccountData"));
        assert!(inner["nonce"].as_u64().unwrap() < 65_536);
    }

    #[tokio::test]
    async fn get_info_returns_decoded_payload() {
        let info = json!({"blocknum": 12, "initialized": true});
        let (endpoint, seen) = mock_pruntime(ok_reply(&info)).await;

        let client = PRuntimeClient::new(endpoint).unwrap();
        assert_eq!(client.get_info().await.unwrap(), info);
        assert_eq!(seen.lock().unwrap()[0].1["input"], json!({}));
    }

    #[tokio::test]
    async fn error_status_surfaces_raw_envelope() {
        let reply = json!({"status": "error", "payload": "{\"message\":\"not initialized\"}"});
        let (endpoint, _) = mock_pruntime(reply.clone()).await;

        let client = PRuntimeClient::new(endpoint).unwrap();
        match client.get_info().await {
            Err(PRuntimeError::Envelope(EnvelopeError::Rejected { raw })) => {
                assert_eq!(serde_json::from_str::<Value>(&raw).unwrap(), reply);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn encrypted_query_reply_is_rejected() {
        let reply = ok_reply(&json!({"Encrypted": [1, 2, 3]}));
        let (endpoint, _) = mock_pruntime(reply).await;

        let client = PRuntimeClient::new(endpoint).unwrap();
        let err = client
            .query(PDIEM_CONTRACT_ID, &PdiemRequest::VerifiedTransactions)
            .await
            .unwrap_err();
        assert!(matches!(err, PRuntimeError::Payload(PayloadError::Encrypted)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PRuntimeClient::new(format!("http://{addr}").parse().unwrap()).unwrap();
        assert!(matches!(
            client.get_info().await,
            Err(PRuntimeError::Transport(_))
        ));
    }
}
