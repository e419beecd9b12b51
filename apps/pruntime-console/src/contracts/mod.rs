// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Confidential contract identifiers and contract-specific payloads.

pub mod pdiem;

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Identifier of a confidential contract hosted by pRuntime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(NonZeroU32);

impl ContractId {
    /// Returns `None` for zero.
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl From<ContractId> for u32 {
    fn from(id: ContractId) -> Self {
        id.0.get()
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_number() {
        let id = ContractId::new(5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        assert_eq!(id.to_string(), "5");
        assert!(ContractId::new(0).is_none());
    }
}
