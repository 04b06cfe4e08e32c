//! Key material used to identify ledger accounts.
//!
//! Keys are carried around in the multihash textual format
//! (e.g. `ed0120E2EC…` for an ed25519 public key). This crate only
//! parses, prints and generates key material; producing and verifying
//! signatures is delegated to the node operators' tooling and is not
//! part of the ledger surface.

mod multihash;

use core::{fmt, str::FromStr};

use parity_scale_codec::{Decode, Encode, Input};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

pub use self::multihash::Multihash;

/// Length in bytes of an ed25519 key payload.
pub const KEY_PAYLOAD_LENGTH: usize = 32;

/// Error returned when a key fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct KeyParseError {
    /// Why the candidate was rejected.
    pub reason: &'static str,
}

/// Error returned when a multihash tag does not map to a known algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no such algorithm")]
pub struct NoSuchAlgorithm;

/// Signature scheme a key belongs to.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Encode,
    Decode,
    Serialize,
    Deserialize,
)]
pub enum Algorithm {
    /// Ed25519, the scheme every sample key in this repository uses.
    #[default]
    #[display(fmt = "ed25519")]
    Ed25519,
    /// Secp256k1.
    #[display(fmt = "secp256k1")]
    Secp256k1,
}

impl FromStr for Algorithm {
    type Err = NoSuchAlgorithm;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        match candidate {
            "ed25519" => Ok(Self::Ed25519),
            "secp256k1" => Ok(Self::Secp256k1),
            _ => Err(NoSuchAlgorithm),
        }
    }
}

/// Public key of an account.
///
/// Displays as the multihash of its payload; two keys are equal exactly
/// when their multihashes are.
#[derive(
    Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, DeserializeFromStr, SerializeDisplay,
)]
pub struct PublicKey {
    /// Scheme under which the payload was produced.
    pub algorithm: Algorithm,
    /// Raw key bytes.
    pub payload: Vec<u8>,
}

impl PublicKey {
    /// Construct from raw parts without going through the textual form.
    pub fn new(algorithm: Algorithm, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            payload: payload.into(),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Multihash::public(self.algorithm, &self.payload))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self, self.algorithm)
    }
}

impl FromStr for PublicKey {
    type Err = KeyParseError;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        let multihash: Multihash = candidate.parse()?;
        multihash.try_into_public()
    }
}

impl Decode for PublicKey {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let algorithm = Algorithm::decode(input)?;
        let payload = <Vec<u8>>::decode(input)?;
        if payload.len() != KEY_PAYLOAD_LENGTH {
            return Err("Wrong public key payload length".into());
        }
        Ok(Self { algorithm, payload })
    }
}

/// Private counterpart of a [`PublicKey`].
///
/// Kept opaque: it is configuration material the client carries, not
/// something the ledger ever inspects.
#[derive(Clone, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct PrivateKey {
    /// Scheme under which the payload was produced.
    pub algorithm: Algorithm,
    /// Raw key bytes.
    pub payload: Vec<u8>,
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Multihash::private(self.algorithm, &self.payload))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Deliberately redacted.
        write!(f, "<private key ({})>", self.algorithm)
    }
}

impl FromStr for PrivateKey {
    type Err = KeyParseError;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        let multihash: Multihash = candidate.parse()?;
        multihash.try_into_private()
    }
}

/// Pair of matching keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl KeyPair {
    /// Construct from already-parsed keys.
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    /// Generate a fresh ed25519 pair.
    ///
    /// Only suitable for test identities: the payloads are random bytes,
    /// which is all an unsigned embedded ledger needs from them.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let mut public = vec![0_u8; KEY_PAYLOAD_LENGTH];
        let mut private = vec![0_u8; KEY_PAYLOAD_LENGTH];
        rng.fill_bytes(&mut public);
        rng.fill_bytes(&mut private);
        Self {
            public_key: PublicKey::new(Algorithm::Ed25519, public),
            private_key: PrivateKey {
                algorithm: Algorithm::Ed25519,
                payload: private,
            },
        }
    }

    /// Public half of the pair.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Private half of the pair.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl From<KeyPair> for (PublicKey, PrivateKey) {
    fn from(pair: KeyPair) -> Self {
        (pair.public_key, pair.private_key)
    }
}

/// The prelude re-exports most commonly used items from this crate.
pub mod prelude {
    pub use super::{Algorithm, KeyPair, PrivateKey, PublicKey};
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_PUBLIC: &str =
        "ed0120E2ECD69DA5833EC10FB3DFAED83A07E5B9CBE9BC39484F0F7DDEC8B46253428B";

    #[test]
    fn public_key_multihash_roundtrip() {
        let key: PublicKey = GENESIS_PUBLIC.parse().expect("Valid");
        assert_eq!(key.algorithm, Algorithm::Ed25519);
        assert_eq!(key.payload.len(), KEY_PAYLOAD_LENGTH);
        assert_eq!(key.to_string(), GENESIS_PUBLIC);
    }

    #[test]
    fn public_key_parse_is_case_insensitive_on_payload() {
        let upper: PublicKey = GENESIS_PUBLIC.parse().expect("Valid");
        let lower: PublicKey = GENESIS_PUBLIC.to_lowercase().parse().expect("Valid");
        assert_eq!(upper, lower);
    }

    #[test]
    fn private_key_tag_differs_from_public() {
        let pair = KeyPair::random();
        let public = pair.public_key().to_string();
        let private = pair.private_key().to_string();
        assert!(public.starts_with("ed0120"));
        assert!(private.starts_with("802620"));
    }

    #[test]
    fn mangled_multihash_is_rejected() {
        assert!("ed0120".parse::<PublicKey>().is_err());
        assert!("zz0120AA".parse::<PublicKey>().is_err());
        assert!("".parse::<PublicKey>().is_err());
    }

    #[test]
    fn serde_uses_multihash_form() {
        let key: PublicKey = GENESIS_PUBLIC.parse().expect("Valid");
        let json = serde_json::to_string(&key).expect("Valid");
        assert_eq!(json, format!("\"{GENESIS_PUBLIC}\""));
        let back: PublicKey = serde_json::from_str(&json).expect("Valid");
        assert_eq!(back, key);
    }
}
