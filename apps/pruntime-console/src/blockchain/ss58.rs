// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SS58 address encoding for 32-byte account ids.
//!
//! `base58(prefix || public_key || blake2b_512("SS58PRE" || prefix || public_key)[..2])`

use blake2::{Blake2b512, Digest};

/// Network prefix used when formatting addresses.
pub const PHALA_PREFIX: u16 = 30;

const CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const KEY_LEN: usize = 32;

/// Reasons an address fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ss58Error {
    /// The text contains characters outside the base58 alphabet.
    #[error("not valid base58")]
    BadBase58,

    /// The decoded payload is not prefix + 32-byte key + checksum.
    #[error("unexpected length {0}")]
    BadLength(usize),

    /// The first byte marks a prefix range reserved by the format.
    #[error("reserved network prefix")]
    ReservedPrefix,

    /// The trailing checksum does not match the prefix and key.
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Encode a public key for the given network prefix (0..16384).
pub fn encode(public: &[u8; KEY_LEN], prefix: u16) -> String {
    let ident = prefix & 0b0011_1111_1111_1111;
    let mut data = match ident {
        0..=63 => vec![ident as u8],
        _ => {
            let first = ((ident & 0b0000_0000_1111_1100) as u8 >> 2) | 0b0100_0000;
            let second = (ident >> 8) as u8 | ((ident & 0b0000_0000_0000_0011) as u8) << 6;
            vec![first, second]
        }
    };
    data.extend_from_slice(public);
    let hash = checksum(&data);
    data.extend_from_slice(&hash[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

/// Decode an address into its network prefix and public key.
pub fn decode(address: &str) -> Result<(u16, [u8; KEY_LEN]), Ss58Error> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|_| Ss58Error::BadBase58)?;
    if data.len() < 2 {
        return Err(Ss58Error::BadLength(data.len()));
    }

    let (prefix_len, ident) = match data[0] {
        0..=63 => (1, u16::from(data[0])),
        64..=127 => {
            let lower = (data[0] << 2) | (data[1] >> 6);
            let upper = data[1] & 0b0011_1111;
            (2, u16::from(lower) | (u16::from(upper) << 8))
        }
        _ => return Err(Ss58Error::ReservedPrefix),
    };

    if data.len() != prefix_len + KEY_LEN + CHECKSUM_LEN {
        return Err(Ss58Error::BadLength(data.len()));
    }

    let body_len = prefix_len + KEY_LEN;
    let hash = checksum(&data[..body_len]);
    if data[body_len..] != hash[..CHECKSUM_LEN] {
        return Err(Ss58Error::BadChecksum);
    }

    let mut public = [0u8; KEY_LEN];
    public.copy_from_slice(&data[prefix_len..body_len]);
    Ok((ident, public))
}

fn checksum(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREAMBLE);
    hasher.update(data);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Alice's well-known sr25519 public key.
    const ALICE: [u8; 32] = [
        0xd4, 0x35, 0x93, 0xc7, 0x15, 0xfd, 0xd3, 0x1c, 0x61, 0x14, 0x1a, 0xbd, 0x04, 0xa9, 0x9f,
        0xd6, 0x82, 0x2c, 0x85, 0x58, 0x85, 0x4c, 0xcd, 0xe3, 0x9a, 0x56, 0x84, 0xe7, 0xa5, 0x6d,
        0xa2, 0x7d,
    ];

    #[test]
    fn encodes_known_generic_substrate_address() {
        assert_eq!(
            encode(&ALICE, 42),
            "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"
        );
    }

    #[test]
    fn decode_inverts_encode_for_phala_prefix() {
        let address = encode(&ALICE, PHALA_PREFIX);
        assert_eq!(decode(&address), Ok((PHALA_PREFIX, ALICE)));
    }

    #[test]
    fn two_byte_prefixes_survive_a_round_trip() {
        let address = encode(&ALICE, 1284);
        assert_eq!(decode(&address), Ok((1284, ALICE)));
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut bytes = bs58::decode(encode(&ALICE, 42)).into_vec().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let tampered = bs58::encode(bytes).into_string();
        assert_eq!(decode(&tampered), Err(Ss58Error::BadChecksum));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode("not-an-address"), Err(Ss58Error::BadBase58));
        assert!(matches!(decode("abc"), Err(Ss58Error::BadLength(_))));
    }
}
