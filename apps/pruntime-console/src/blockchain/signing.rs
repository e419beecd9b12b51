// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Operator key handling.
//!
//! Keys are sr25519 pairs derived from a secret URI (`//Alice`,
//! `<mnemonic>//hard/soft///password`, or a `0x` raw seed). Addresses are
//! shown with the Phala SS58 prefix.

use std::fmt;
use std::str::FromStr;

use subxt_signer::{sr25519::Keypair, SecretUri};

use super::ss58;

/// Errors raised while deriving an operator key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid secret URI: {0}")]
    InvalidSuri(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),
}

/// Signing key material plus its derived public identity.
#[derive(Clone)]
pub struct OperatorKey {
    pair: Keypair,
}

impl OperatorKey {
    /// Raw sr25519 public key (the on-chain account id).
    pub fn public_key(&self) -> [u8; 32] {
        self.pair.public_key().0
    }

    /// SS58 address with the Phala network prefix.
    pub fn address(&self) -> String {
        ss58::encode(&self.public_key(), ss58::PHALA_PREFIX)
    }

    pub fn pair(&self) -> &Keypair {
        &self.pair
    }
}

impl From<Keypair> for OperatorKey {
    fn from(pair: Keypair) -> Self {
        Self { pair }
    }
}

impl fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Source of operator signing keys.
pub trait KeyManager: Send + Sync {
    fn key_from_suri(&self, suri: &str) -> Result<OperatorKey, KeyError>;
}

/// sr25519 keyring following Substrate's derivation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sr25519Keyring;

impl KeyManager for Sr25519Keyring {
    fn key_from_suri(&self, suri: &str) -> Result<OperatorKey, KeyError> {
        let uri = SecretUri::from_str(suri).map_err(|e| KeyError::InvalidSuri(e.to_string()))?;
        let pair = Keypair::from_uri(&uri).map_err(|e| KeyError::Derivation(e.to_string()))?;
        Ok(pair.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_alice_from_dev_uri() {
        let key = Sr25519Keyring.key_from_suri("//Alice").unwrap();
        assert_eq!(
            ss58::encode(&key.public_key(), 42),
            "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"
        );
        assert_eq!(
            ss58::decode(&key.address()),
            Ok((ss58::PHALA_PREFIX, key.public_key()))
        );
    }

    #[test]
    fn rejects_garbage_uris() {
        assert!(Sr25519Keyring.key_from_suri("not-a-key-or-address").is_err());
        assert!(Sr25519Keyring.key_from_suri("0xnothex").is_err());
    }

    #[test]
    fn debug_output_hides_secret_material() {
        let key = Sr25519Keyring.key_from_suri("//Bob").unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains(&key.address()));
        assert!(!debug.contains("secret"));
    }
}
