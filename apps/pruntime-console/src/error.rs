// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::Serialize;

use crate::blockchain::{ChainError, SubmitError};
use crate::config::ConfigError;
use crate::encoding::FormatError;
use crate::pruntime::{EnvelopeError, PRuntimeError};

/// Any failure that ends a console invocation.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    PRuntime(#[from] PRuntimeError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Cannot render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Diagnostic printed on stderr with `--json`.
#[derive(Serialize)]
pub struct ErrorBody {
    /// Coarse category, see [`ConsoleError::kind`].
    pub kind: &'static str,
    pub error: String,
    /// Raw pRuntime response, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ConsoleError {
    /// Coarse category used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Format(_) => "format",
            Self::PRuntime(PRuntimeError::Transport(_)) => "transport",
            Self::PRuntime(PRuntimeError::Envelope(_)) => "envelope",
            Self::PRuntime(_) => "payload",
            Self::Chain(ChainError::Connection(_)) => "transport",
            Self::Chain(_) => "chain",
            Self::Submit(_) => "submit",
            Self::Output(_) => "output",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let response = match self {
            Self::PRuntime(PRuntimeError::Envelope(envelope)) => Some(envelope.raw().to_string()),
            _ => None,
        };
        ErrorBody {
            kind: self.kind(),
            error: self.to_string(),
            response,
        }
    }
}

impl From<EnvelopeError> for ConsoleError {
    fn from(err: EnvelopeError) -> Self {
        Self::PRuntime(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_error_taxonomy() {
        let transport = ConsoleError::from(PRuntimeError::Transport("refused".into()));
        assert_eq!(transport.kind(), "transport");

        let node_down = ConsoleError::from(ChainError::Connection("refused".into()));
        assert_eq!(node_down.kind(), "transport");

        let format = ConsoleError::from(FormatError::InvalidAmount("x".into()));
        assert_eq!(format.kind(), "format");

        let submit = ConsoleError::from(SubmitError::Rejected(ChainError::Rejected("bad".into())));
        assert_eq!(submit.kind(), "submit");

        let bad_key = ConsoleError::from(SubmitError::InvalidKey(
            crate::blockchain::KeyError::InvalidSuri("x".into()),
        ));
        assert_eq!(bad_key.kind(), "submit");
    }

    #[test]
    fn envelope_errors_keep_raw_response() {
        let raw = r#"{"status":"error","payload":"boom"}"#;
        let err = ConsoleError::from(EnvelopeError::Rejected {
            raw: raw.to_string(),
        });
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["kind"], "envelope");
        assert_eq!(body["response"], raw);
    }

    #[test]
    fn body_omits_missing_response() {
        let err = ConsoleError::from(FormatError::InvalidJson("eof".into()));
        let body = serde_json::to_string(&err.body()).unwrap();
        assert_eq!(
            body,
            r#"{"kind":"format","error":"Invalid JSON argument: eof"}"#
        );
    }
}
