// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Subcommand dispatch.
//!
//! Every subcommand resolves to a [`Report`] or a [`ConsoleError`].
//! [`finish`] is the only place either becomes output and an exit code.

pub mod output;

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::blockchain::{
    signing_key, ss58, ChainClient, ChainError, CommandSubmitter, KeyManager, Sr25519Keyring,
    SubstrateClient,
};
use crate::config::{EndpointConfig, OutputFormat};
use crate::contracts::pdiem::{PdiemCommand, PdiemRequest, PDIEM_CONTRACT_ID};
use crate::encoding::{
    decode_public_key, normalize_hex, parse_asset_amount, parse_contract_id, parse_json_argument,
    verify_address_or_key,
};
use crate::error::ConsoleError;
use crate::pruntime::PRuntimeClient;

/// The operation succeeded.
pub const EXIT_SUCCESS: i32 = 0;
/// Explicit semantic failure (invalid address, stale chain).
pub const EXIT_FAILURE: i32 = -1;
/// Any error raised by a component.
pub const EXIT_ERROR: i32 = 1;

/// The chain counts as in sync while its timestamp lags wall-clock by at
/// most this much.
pub const MAX_CHAIN_LAG: Duration = Duration::from_secs(50 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Push a command to a confidential contract
    PushCommand {
        /// Target contract id
        contract_id: String,
        /// Command payload (JSON)
        plain_command: String,
        /// Sender's secret URI
        #[arg(short, long)]
        suri: String,
    },

    /// Check whether the chain head is recent
    ChainSyncState,

    /// Show the free balance of an account
    FreeBalance {
        /// SS58 address or hex public key
        account: String,
    },

    /// Show registry and mining state of a worker
    InspectWorker {
        /// Worker public key (hex or SS58)
        pubkey: String,
    },

    /// Show pRuntime status
    GetInfo,

    /// Send a read-only query to a confidential contract
    Query {
        /// Target contract id
        contract_id: String,
        /// Query payload (JSON)
        plain_query: String,
    },

    /// Show pDiem account balances
    PdiemBalances,

    /// Show verified pDiem transactions
    PdiemTx,

    /// Create a pDiem account
    PdiemNewAccount {
        /// Sequence number of the new account
        seq_number: u64,
        /// Sender's secret URI
        #[arg(short, long)]
        suri: String,
    },

    /// Withdraw XUS from pDiem to a Diem address
    PdiemWithdraw {
        /// Destination Diem address (hex)
        dest: String,
        /// Amount, e.g. "12.5 XUS"
        amount: String,
        /// Sender's secret URI
        #[arg(short, long)]
        suri: String,
    },

    /// Check that the input is a valid address or secret URI
    Verify {
        /// SS58 address, hex public key, or secret URI
        input: String,
    },
}

impl Command {
    /// Subcommand name as typed on the command line. Safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PushCommand { .. } => "push-command",
            Self::ChainSyncState => "chain-sync-state",
            Self::FreeBalance { .. } => "free-balance",
            Self::InspectWorker { .. } => "inspect-worker",
            Self::GetInfo => "get-info",
            Self::Query { .. } => "query",
            Self::PdiemBalances => "pdiem-balances",
            Self::PdiemTx => "pdiem-tx",
            Self::PdiemNewAccount { .. } => "pdiem-new-account",
            Self::PdiemWithdraw { .. } => "pdiem-withdraw",
            Self::Verify { .. } => "verify",
        }
    }
}

/// Whether a completed operation answered positively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Maps to [`EXIT_SUCCESS`].
    Success,
    /// The operation completed but its answer is negative. Maps to
    /// [`EXIT_FAILURE`].
    Failure,
}

/// What an operation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub outcome: Outcome,
    pub body: Value,
}

impl Report {
    /// A successful report carrying `body`.
    ///
    /// # Errors
    /// `ConsoleError::Output` if `body` cannot be represented as JSON.
    pub fn success<T: Serialize>(body: T) -> Result<Self, ConsoleError> {
        Ok(Self {
            outcome: Outcome::Success,
            body: serde_json::to_value(body)?,
        })
    }

    /// A semantic failure report. `body` still explains the answer.
    pub fn failure<T: Serialize>(body: T) -> Result<Self, ConsoleError> {
        Ok(Self {
            outcome: Outcome::Failure,
            body: serde_json::to_value(body)?,
        })
    }
}

/// Exit code for an operation result.
///
/// # Returns
/// * [`EXIT_SUCCESS`] - `Ok` with [`Outcome::Success`]
/// * [`EXIT_FAILURE`] - `Ok` with [`Outcome::Failure`]
/// * [`EXIT_ERROR`] - Any `Err`
pub fn exit_code(result: &Result<Report, ConsoleError>) -> i32 {
    match result {
        Ok(Report {
            outcome: Outcome::Success,
            ..
        }) => EXIT_SUCCESS,
        Ok(Report {
            outcome: Outcome::Failure,
            ..
        }) => EXIT_FAILURE,
        Err(_) => EXIT_ERROR,
    }
}

/// Print a result and return the process exit code.
///
/// Reports go to `out`, diagnostics to `err`.
pub fn finish(
    result: &Result<Report, ConsoleError>,
    format: OutputFormat,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    let code = exit_code(result);

    let written = match result {
        Ok(report) => match output::render(&report.body, format) {
            Ok(text) => writeln!(out, "{text}"),
            Err(e) => writeln!(err, "Error: cannot render output: {e}"),
        },
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "command failed");
            match format {
                OutputFormat::Json => match serde_json::to_string_pretty(&e.body()) {
                    Ok(text) => writeln!(err, "{text}"),
                    Err(_) => writeln!(err, "Error: {e}"),
                },
                OutputFormat::Human => writeln!(err, "Error: {e}"),
            }
        }
    };

    match written {
        Ok(()) => code,
        // Nothing left to report to.
        Err(_) => EXIT_ERROR,
    }
}

/// Collaborators shared by all subcommands of one invocation.
pub struct Console {
    config: EndpointConfig,
    pruntime: PRuntimeClient,
    keys: Box<dyn KeyManager>,
    chain: OnceCell<Box<dyn ChainClient>>,
}

impl Console {
    /// Production wiring: sr25519 keyring, node connection opened on first use.
    pub fn new(config: EndpointConfig) -> Result<Self, ConsoleError> {
        Self::with_collaborators(config, Box::new(Sr25519Keyring), None)
    }

    /// Wiring with explicit collaborators. A `None` chain is connected lazily.
    pub fn with_collaborators(
        config: EndpointConfig,
        keys: Box<dyn KeyManager>,
        chain: Option<Box<dyn ChainClient>>,
    ) -> Result<Self, ConsoleError> {
        let pruntime = PRuntimeClient::new(config.pruntime_endpoint().clone())?;
        Ok(Self {
            config,
            pruntime,
            keys,
            chain: OnceCell::new_with(chain),
        })
    }

    /// Configuration this console was built with.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    async fn chain(&self) -> Result<&dyn ChainClient, ChainError> {
        let chain = self
            .chain
            .get_or_try_init(|| async {
                let client = SubstrateClient::connect(self.config.substrate_ws_endpoint()).await?;
                Ok::<Box<dyn ChainClient>, ChainError>(Box::new(client))
            })
            .await?;
        Ok(chain.as_ref())
    }

    async fn submit<T: Serialize + ?Sized>(
        &self,
        contract_id: crate::contracts::ContractId,
        command: &T,
        suri: &str,
    ) -> Result<Report, ConsoleError> {
        // Resolve the key before connecting so a bad suri costs no I/O.
        let key = signing_key(self.keys.as_ref(), suri)?;
        let chain = self.chain().await?;
        let receipt = CommandSubmitter::new(chain, self.keys.as_ref())
            .submit_as(contract_id, command, &key)
            .await?;
        Report::success(receipt)
    }

    /// Run one subcommand.
    pub async fn execute(&self, command: Command) -> Result<Report, ConsoleError> {
        // Never log the command itself; several variants carry a secret URI.
        tracing::debug!(command = command.name(), "executing");

        match command {
            Command::PushCommand {
                contract_id,
                plain_command,
                suri,
            } => {
                let contract_id = parse_contract_id(&contract_id)?;
                let command = parse_json_argument(&plain_command)?;
                self.submit(contract_id, &command, &suri).await
            }

            Command::ChainSyncState => self.chain_sync_state().await,

            Command::FreeBalance { account } => {
                let public = decode_public_key(&account)?;
                let info = self
                    .chain()
                    .await?
                    .storage("System", "Account", vec![public.to_vec()])
                    .await?;
                let free = info
                    .as_ref()
                    .and_then(|info| info.pointer("/data/free"))
                    .cloned()
                    .unwrap_or_else(|| json!(0));
                Report::success(json!({
                    "account": ss58::encode(&public, ss58::PHALA_PREFIX),
                    "free": free,
                }))
            }

            Command::InspectWorker { pubkey } => self.inspect_worker(&pubkey).await,

            Command::GetInfo => Report::success(self.pruntime.get_info().await?),

            Command::Query {
                contract_id,
                plain_query,
            } => {
                let contract_id = parse_contract_id(&contract_id)?;
                let request = parse_json_argument(&plain_query)?;
                Report::success(self.pruntime.query(contract_id, &request).await?)
            }

            Command::PdiemBalances => Report::success(
                self.pruntime
                    .query(PDIEM_CONTRACT_ID, &PdiemRequest::AccountData)
                    .await?,
            ),

            Command::PdiemTx => Report::success(
                self.pruntime
                    .query(PDIEM_CONTRACT_ID, &PdiemRequest::VerifiedTransactions)
                    .await?,
            ),

            Command::PdiemNewAccount { seq_number, suri } => {
                let command = PdiemCommand::NewAccount { seq_number };
                self.submit(PDIEM_CONTRACT_ID, &command, &suri).await
            }

            Command::PdiemWithdraw { dest, amount, suri } => {
                let command = PdiemCommand::TransferXus {
                    to: normalize_hex(&dest),
                    amount: parse_asset_amount(&amount)?,
                };
                self.submit(PDIEM_CONTRACT_ID, &command, &suri).await
            }

            Command::Verify { input } => {
                let verification = verify_address_or_key(self.keys.as_ref(), &input);
                if verification.ok {
                    Report::success(verification)
                } else {
                    Report::failure(verification)
                }
            }
        }
    }

    async fn chain_sync_state(&self) -> Result<Report, ConsoleError> {
        let chain = self.chain().await?;
        let head = chain.chain_head().await?;
        let sync_state = chain.sync_state().await?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        let lag_ms = head.timestamp.map(|ts| now_ms - ts as i64);
        let synced = head
            .timestamp
            .is_some_and(|ts| is_fresh(ts, now_ms, MAX_CHAIN_LAG));

        let body = json!({
            "head": head,
            "syncState": sync_state,
            "lagSeconds": lag_ms.map(|lag| lag / 1000),
            "synced": synced,
        });

        if synced {
            Report::success(body)
        } else {
            tracing::warn!(?lag_ms, "chain head is stale");
            Report::failure(body)
        }
    }

    async fn inspect_worker(&self, pubkey: &str) -> Result<Report, ConsoleError> {
        let public = decode_public_key(pubkey)?;
        let chain = self.chain().await?;

        let worker = chain
            .storage("PhalaRegistry", "Workers", vec![public.to_vec()])
            .await?;
        let miner = chain
            .storage("PhalaMining", "WorkerBindings", vec![public.to_vec()])
            .await?;

        let miner_account = miner
            .as_ref()
            .and_then(Value::as_str)
            .map(decode_public_key)
            .transpose()?;

        let (miner_info, stake) = match miner_account {
            Some(account) => (
                chain
                    .storage("PhalaMining", "Miners", vec![account.to_vec()])
                    .await?,
                chain
                    .storage("PhalaMining", "Stakes", vec![account.to_vec()])
                    .await?,
            ),
            None => (None, None),
        };

        Report::success(json!({
            "worker": worker,
            "miner": miner_account.map(|account| ss58::encode(&account, ss58::PHALA_PREFIX)),
            "minerInfo": miner_info,
            "stake": stake.unwrap_or_else(|| json!(0)),
        }))
    }
}

/// Whether an on-chain timestamp (ms) is within `max_lag` of `now_ms`.
///
/// A timestamp ahead of the local clock counts as fresh.
pub fn is_fresh(on_chain_ms: u64, now_ms: i64, max_lag: Duration) -> bool {
    let lag = now_ms.saturating_sub(on_chain_ms as i64);
    lag <= max_lag.as_millis() as i64
}
