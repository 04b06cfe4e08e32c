//! Multihash representation of key material.
//!
//! A multihash is `varint(tag) ++ len ++ payload`, hex encoded. The tag
//! bytes come from the official multicodec table; the textual form keeps
//! the tag lowercase and the payload uppercase, which is how every
//! sample configuration spells its keys.

use core::{fmt, str::FromStr};

use crate::{Algorithm, KeyParseError, NoSuchAlgorithm, PrivateKey, PublicKey};

/// Multicodec tag of an ed25519 public key.
const ED_25519_PUB: u64 = 0xed;
/// Multicodec tag of a secp256k1 public key.
const SECP_256_K1_PUB: u64 = 0xe7;
/// Multicodec tag of an ed25519 private key.
const ED_25519_PRIV: u64 = 0x1300;
/// Multicodec tag of a secp256k1 private key.
const SECP_256_K1_PRIV: u64 = 0x1301;

/// Key class a multihash tag encodes, next to its algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyClass {
    Public,
    Private,
}

/// Parsed multihash: a tagged payload that still has to be narrowed to
/// a [`PublicKey`] or [`PrivateKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multihash {
    algorithm: Algorithm,
    class: KeyClass,
    payload: Vec<u8>,
}

impl Multihash {
    pub(crate) fn public(algorithm: Algorithm, payload: &[u8]) -> Self {
        Self {
            algorithm,
            class: KeyClass::Public,
            payload: payload.to_vec(),
        }
    }

    pub(crate) fn private(algorithm: Algorithm, payload: &[u8]) -> Self {
        Self {
            algorithm,
            class: KeyClass::Private,
            payload: payload.to_vec(),
        }
    }

    /// Narrow to a public key.
    ///
    /// # Errors
    /// Fails if the tag encodes a private key.
    pub fn try_into_public(self) -> Result<PublicKey, KeyParseError> {
        match self.class {
            KeyClass::Public => Ok(PublicKey {
                algorithm: self.algorithm,
                payload: self.payload,
            }),
            KeyClass::Private => Err(KeyParseError {
                reason: "Expected a public key multihash, got a private key tag",
            }),
        }
    }

    /// Narrow to a private key.
    ///
    /// # Errors
    /// Fails if the tag encodes a public key.
    pub fn try_into_private(self) -> Result<PrivateKey, KeyParseError> {
        match self.class {
            KeyClass::Private => Ok(PrivateKey {
                algorithm: self.algorithm,
                payload: self.payload,
            }),
            KeyClass::Public => Err(KeyParseError {
                reason: "Expected a private key multihash, got a public key tag",
            }),
        }
    }

    fn tag(&self) -> u64 {
        match (self.algorithm, self.class) {
            (Algorithm::Ed25519, KeyClass::Public) => ED_25519_PUB,
            (Algorithm::Ed25519, KeyClass::Private) => ED_25519_PRIV,
            (Algorithm::Secp256k1, KeyClass::Public) => SECP_256_K1_PUB,
            (Algorithm::Secp256k1, KeyClass::Private) => SECP_256_K1_PRIV,
        }
    }

    fn classify(tag: u64) -> Result<(Algorithm, KeyClass), NoSuchAlgorithm> {
        match tag {
            ED_25519_PUB => Ok((Algorithm::Ed25519, KeyClass::Public)),
            ED_25519_PRIV => Ok((Algorithm::Ed25519, KeyClass::Private)),
            SECP_256_K1_PUB => Ok((Algorithm::Secp256k1, KeyClass::Public)),
            SECP_256_K1_PRIV => Ok((Algorithm::Secp256k1, KeyClass::Private)),
            _ => Err(NoSuchAlgorithm),
        }
    }
}

impl fmt::Display for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefix = varint_encode(self.tag());
        prefix.push(
            u8::try_from(self.payload.len()).expect("Key payloads are far below 256 bytes"),
        );
        write!(
            f,
            "{}{}",
            hex::encode(prefix),
            hex::encode_upper(&self.payload)
        )
    }
}

impl FromStr for Multihash {
    type Err = KeyParseError;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(candidate).map_err(|_err| KeyParseError {
            reason: "Multihash is not valid hex",
        })?;
        let (tag, rest) = varint_decode(&bytes).ok_or(KeyParseError {
            reason: "Multihash tag is malformed",
        })?;
        let (algorithm, class) = Multihash::classify(tag).map_err(|NoSuchAlgorithm| {
            KeyParseError {
                reason: "Multihash tag does not name a supported algorithm",
            }
        })?;
        let (&len, payload) = rest.split_first().ok_or(KeyParseError {
            reason: "Multihash is missing its length byte",
        })?;
        if usize::from(len) != payload.len() {
            return Err(KeyParseError {
                reason: "Multihash length byte disagrees with the payload",
            });
        }
        if payload.is_empty() {
            return Err(KeyParseError {
                reason: "Multihash payload is empty",
            });
        }
        Ok(Self {
            algorithm,
            class,
            payload: payload.to_vec(),
        })
    }
}

/// Encode `value` as an unsigned multiformats varint.
fn varint_encode(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(2);
    loop {
        let byte = u8::try_from(value & 0x7f).expect("Masked to 7 bits");
        value >>= 7_u32;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Decode an unsigned multiformats varint from the head of `bytes`,
/// returning the value and the remaining bytes.
fn varint_decode(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let mut value: u64 = 0;
    for (idx, &byte) in bytes.iter().enumerate() {
        // 9 continuation bytes would overflow the shift below.
        if idx > 8 {
            return None;
        }
        value |= u64::from(byte & 0x7f) << (idx * 7);
        if byte & 0x80 == 0 {
            return Some((value, &bytes[idx + 1..]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_roundtrip() {
        for value in [0x00, 0x7f, 0x80, 0xed, 0x1300, u64::from(u32::MAX)] {
            let encoded = varint_encode(value);
            let (decoded, rest) = varint_decode(&encoded).expect("Valid");
            assert_eq!(decoded, value);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn known_tags_produce_known_prefixes() {
        assert_eq!(hex::encode(varint_encode(ED_25519_PUB)), "ed01");
        assert_eq!(hex::encode(varint_encode(ED_25519_PRIV)), "8026");
    }
}
