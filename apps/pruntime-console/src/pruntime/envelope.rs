// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request/response envelope for pRuntime calls.

use std::fmt;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Status value marking a successful response.
pub const STATUS_OK: &str = "ok";

/// Per-request correlation id in `[0, 65536)`.
///
/// The enclave does not check nonces; they only tie a request to its log
/// lines. Collisions are expected and harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(u16);

impl Nonce {
    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// `{"id": nonce}` as pRuntime expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceField {
    pub id: Nonce,
}

/// Outbound request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub input: T,
    pub nonce: NonceField,
}

/// Inbound response body.
#[derive(Debug, Clone, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Failures decoding a pRuntime response. Both keep the raw body.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// pRuntime answered with a non-`ok` status.
    #[error("pRuntime returned an error: {raw}")]
    Rejected { raw: String },

    /// The body was not an envelope, or an `ok` payload was not JSON.
    #[error("Malformed pRuntime response ({reason}): {raw}")]
    Malformed { reason: String, raw: String },
}

impl EnvelopeError {
    /// The response body exactly as received.
    pub fn raw(&self) -> &str {
        match self {
            Self::Rejected { raw } | Self::Malformed { raw, .. } => raw,
        }
    }
}

/// Wrap `input` with a fresh nonce.
pub fn encode_envelope<T: Serialize>(input: T) -> Envelope<T> {
    Envelope {
        input,
        nonce: NonceField {
            id: Nonce::random(),
        },
    }
}

/// Unwrap a response body.
///
/// With `status == "ok"` the `payload` string is JSON-decoded into `T`.
/// Any other status fails with [`EnvelopeError::Rejected`] carrying the
/// whole body.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, EnvelopeError> {
    let malformed = |reason: String| EnvelopeError::Malformed {
        reason,
        raw: body.to_string(),
    };

    let response: Response = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    if response.status != STATUS_OK {
        return Err(EnvelopeError::Rejected {
            raw: body.to_string(),
        });
    }

    match response.payload {
        Some(serde_json::Value::String(payload)) => {
            serde_json::from_str(&payload).map_err(|e| malformed(e.to_string()))
        }
        Some(_) => Err(malformed("payload is not a string".to_string())),
        None => Err(malformed("missing payload".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    /// Answers like pRuntime would: echo the input back as an `ok` payload.
    fn ok_responder<T: Serialize>(envelope: &Envelope<T>) -> String {
        json!({
            "status": "ok",
            "payload": serde_json::to_string(&envelope.input).unwrap(),
        })
        .to_string()
    }

    #[test]
    fn envelope_wire_shape() {
        let envelope = encode_envelope(json!({"query_payload": "x"}));
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["input"], json!({"query_payload": "x"}));
        assert_eq!(wire["nonce"]["id"], json!(envelope.nonce.id.get()));
    }

    #[test]
    fn decode_inverts_encode_through_ok_responder() {
        let payloads = [
            json!(null),
            json!(42),
            json!("text"),
            json!([1, "two", {"three": 3}]),
            json!({"nested": {"list": [true, false], "n": -1.5}}),
        ];
        for payload in payloads {
            let envelope = encode_envelope(payload.clone());
            let decoded: Value = decode_envelope(&ok_responder(&envelope)).unwrap();
            assert_eq!(decoded, payload);
        }
    }

    #[test]
    fn non_ok_status_is_an_envelope_error_with_raw_body() {
        for status in ["error", "", "OK", "pending"] {
            let body = json!({"status": status, "payload": "{\"reason\":\"boom\"}"}).to_string();
            match decode_envelope::<Value>(&body) {
                Err(EnvelopeError::Rejected { raw }) => assert_eq!(raw, body),
                other => panic!("status `{status}` gave {other:?}"),
            }
        }
    }

    #[test]
    fn error_status_with_non_string_payload_is_still_rejected() {
        let body = r#"{"status":"error","payload":{"detail":7}}"#;
        let err = decode_envelope::<Value>(body).unwrap_err();
        assert!(matches!(err, EnvelopeError::Rejected { .. }));
        assert_eq!(err.raw(), body);
    }

    #[test]
    fn garbage_bodies_are_malformed() {
        for body in ["", "not json", r#"{"payload":"1"}"#, r#"{"status":"ok"}"#] {
            let err = decode_envelope::<Value>(body).unwrap_err();
            assert!(matches!(err, EnvelopeError::Malformed { .. }), "{body}");
            assert_eq!(err.raw(), body);
        }
    }

    #[test]
    fn ok_payload_that_is_not_json_is_malformed() {
        let body = r#"{"status":"ok","payload":"{broken"}"#;
        assert!(matches!(
            decode_envelope::<Value>(body),
            Err(EnvelopeError::Malformed { .. })
        ));
    }

    #[test]
    fn nonces_stay_in_range_and_may_repeat() {
        let nonces: Vec<u32> = (0..10_000).map(|_| u32::from(Nonce::random().get())).collect();
        assert!(nonces.iter().all(|n| *n < 65_536));
    }
}
