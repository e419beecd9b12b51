// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! pDiem asset-settlement contract payloads.

use serde::{Deserialize, Serialize};

use super::ContractId;

/// Fixed id of the pDiem contract.
pub const PDIEM_CONTRACT_ID: ContractId = match ContractId::new(5) {
    Some(id) => id,
    None => unreachable!(),
};

/// Mutating pDiem instructions, submitted on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdiemCommand {
    NewAccount {
        seq_number: u64,
    },
    #[serde(rename = "TransferXUS")]
    TransferXus {
        /// Destination address, `0x`-prefixed hex.
        to: String,
        /// Amount in minor units.
        amount: u128,
    },
}

/// Read-only pDiem queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdiemRequest {
    AccountData,
    VerifiedTransactions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_use_contract_wire_names() {
        let new_account = PdiemCommand::NewAccount { seq_number: 3 };
        assert_eq!(
            serde_json::to_value(&new_account).unwrap(),
            json!({"NewAccount": {"seq_number": 3}})
        );

        let transfer = PdiemCommand::TransferXus {
            to: "0xabcd".to_string(),
            amount: 500_000,
        };
        assert_eq!(
            serde_json::to_value(&transfer).unwrap(),
            json!({"TransferXUS": {"to": "0xabcd", "amount": 500_000}})
        );
    }

    #[test]
    fn requests_are_bare_strings() {
        assert_eq!(
            serde_json::to_value(PdiemRequest::AccountData).unwrap(),
            json!("AccountData")
        );
        assert_eq!(
            serde_json::to_value(PdiemRequest::VerifiedTransactions).unwrap(),
            json!("VerifiedTransactions")
        );
    }

    #[test]
    fn pdiem_contract_is_five() {
        assert_eq!(u32::from(PDIEM_CONTRACT_ID), 5);
    }
}
