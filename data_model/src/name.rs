//! [`Name`] — the building block of every identifier on the ledger.

use core::{borrow::Borrow, str::FromStr};

use parity_scale_codec::{Decode, Encode, Input};
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Type of Takara entity names, such as a
/// [`Domain`](crate::domain::Domain) name or an asset definition name.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Encode,
    Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Name(String);

impl Name {
    /// Check if `candidate` string would be a valid [`Name`].
    ///
    /// # Errors
    /// Fails if not a valid [`Name`].
    fn validate_str(candidate: &str) -> Result<(), ParseError> {
        const FORBIDDEN_CHARS: [char; 3] = ['@', '#', '$'];

        if candidate.is_empty() {
            return Err(ParseError {
                reason: "Empty `Name`",
            });
        }
        if candidate.chars().any(char::is_whitespace) {
            return Err(ParseError {
                reason: "White space not allowed in `Name` constructs",
            });
        }
        if candidate.chars().any(|ch| FORBIDDEN_CHARS.contains(&ch)) {
            return Err(ParseError {
                reason: "The `@`, `#` and `$` characters are reserved for \
                         `account@domain` and `asset#domain` constructs",
            });
        }
        Ok(())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_ref()
    }
}

impl FromStr for Name {
    type Err = ParseError;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        Self::validate_str(candidate)?;
        Ok(Self(candidate.to_owned()))
    }
}

impl TryFrom<String> for Name {
    type Error = ParseError;

    fn try_from(candidate: String) -> Result<Self, Self::Error> {
        Self::validate_str(&candidate)?;
        Ok(Self(candidate))
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let candidate = String::deserialize(deserializer)?;
        Self::validate_str(&candidate).map_err(D::Error::custom)?;

        Ok(Self(candidate))
    }
}

impl Decode for Name {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let name = String::decode(input)?;
        Self::validate_str(&name).map_err(|error| parity_scale_codec::Error::from(error.reason))?;
        Ok(Self(name))
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::Name;
}

#[cfg(test)]
mod tests {
    use parity_scale_codec::DecodeAll;

    use super::*;

    const INVALID_NAMES: [&str; 5] = ["", " ", "@", "#", "two words"];

    #[test]
    fn deserialize_name() {
        for invalid_name in INVALID_NAMES {
            let invalid_name = Name(invalid_name.to_owned());
            let serialized = serde_json::to_string(&invalid_name).expect("Valid");
            let name = serde_json::from_str::<Name>(serialized.as_str());

            assert!(name.is_err());
        }
    }

    #[test]
    fn decode_name() {
        for invalid_name in INVALID_NAMES {
            let invalid_name = Name(invalid_name.to_owned());
            let bytes = invalid_name.encode();
            let name = Name::decode_all(&mut &bytes[..]);

            assert!(name.is_err());
        }
    }

    #[test]
    fn parse_name() {
        assert!("nft_number_1_for_genesis".parse::<Name>().is_ok());
        assert!("rose".parse::<Name>().is_ok());
        assert!("a@b".parse::<Name>().is_err());
    }
}
