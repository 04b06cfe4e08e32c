//! Structures, traits and impls related to `Account`s.

use core::{fmt, str::FromStr};
use std::collections::btree_map;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use takara_crypto::PublicKey;

use crate::{
    asset::{Asset, AssetId, AssetsMap},
    domain::DomainId,
    metadata::Metadata,
    HasMetadata, Identifiable, ParseError, Registered,
};

/// API to work with collections of [`AccountId`] : [`Account`] mappings.
pub type AccountsMap = btree_map::BTreeMap<AccountId, Account>;

/// Identification of an [`Account`]: the public key it is authorized by
/// plus the domain it lives in, spelled `signatory@domain`.
///
/// # Examples
///
/// ```rust
/// use takara_data_model::account::AccountId;
///
/// let id: AccountId =
///     "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland"
///         .parse()
///         .expect("Valid");
/// ```
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Constructor,
    getset::Getters,
    Decode,
    Encode,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[display(fmt = "{signatory}@{domain_id}")]
#[getset(get = "pub")]
pub struct AccountId {
    /// [`PublicKey`] the account is authorized by.
    pub signatory: PublicKey,
    /// [`Domain`](crate::domain::Domain) the account belongs to.
    pub domain_id: DomainId,
}

/// Account entity: the authority on whose behalf instructions execute,
/// and the holder of [`Asset`]s.
#[derive(Debug, Clone, Decode, Encode, Deserialize, Serialize)]
pub struct Account {
    /// Identification of this [`Account`].
    pub id: AccountId,
    /// Assets in this [`Account`].
    pub assets: AssetsMap,
    /// Metadata of this account as a key-value store.
    pub metadata: Metadata,
}

id_eq_ord!(Account);

/// Builder which should be submitted in a transaction to create a new
/// [`Account`].
#[derive(Debug, Clone, Decode, Encode, Deserialize, Serialize)]
pub struct NewAccount {
    /// Identification.
    pub id: AccountId,
    /// Metadata that should be submitted with the builder.
    pub metadata: Metadata,
}

id_eq_ord!(NewAccount);

impl Account {
    /// Construct a builder for an [`Account`] identifiable by `id`.
    pub fn new(id: AccountId) -> <Self as Registered>::With {
        NewAccount {
            id,
            metadata: Metadata::default(),
        }
    }

    /// Return a reference to the [`Asset`] corresponding to the asset id.
    pub fn asset(&self, asset_id: &AssetId) -> Option<&Asset> {
        self.assets.get(asset_id)
    }

    /// Get an iterator over the [`Asset`]s of the account.
    pub fn assets(&self) -> impl ExactSizeIterator<Item = &Asset> {
        self.assets.values()
    }

    /// Add an [`Asset`] to the account, returning the previous asset
    /// stored under the same id.
    pub fn add_asset(&mut self, asset: Asset) -> Option<Asset> {
        self.assets.insert(asset.id.clone(), asset)
    }

    /// Remove an [`Asset`] from the account and return it.
    pub fn remove_asset(&mut self, asset_id: &AssetId) -> Option<Asset> {
        self.assets.remove(asset_id)
    }
}

impl NewAccount {
    /// Add [`Metadata`] to the account builder, replacing any previously
    /// defined metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Finish the builder.
    pub fn build(self) -> Account {
        Account {
            id: self.id,
            assets: AssetsMap::default(),
            metadata: self.metadata,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.id)
    }
}

impl HasMetadata for Account {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Identifiable for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Identifiable for NewAccount {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Registered for Account {
    type With = NewAccount;
}

/// Account identification is represented by a `signatory@domain` string.
impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let split = string.rsplit_once('@');
        match split {
            Some(("", _)) => Err(ParseError {
                reason: "`AccountId` cannot be empty",
            }),
            Some((signatory, domain_id)) if !signatory.is_empty() && !domain_id.is_empty() => {
                Ok(Self {
                    signatory: signatory.parse().map_err(|_err| ParseError {
                        reason: "The signatory part of an `AccountId` \
                                 should be a valid multihash public key",
                    })?,
                    domain_id: domain_id.parse()?,
                })
            }
            _ => Err(ParseError {
                reason: "`AccountId` should have format `signatory@domain`",
            }),
        }
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{Account, AccountId, NewAccount};
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATORY: &str =
        "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03";

    #[test]
    fn account_id_roundtrips() {
        let raw = format!("{SIGNATORY}@wonderland");
        let id: AccountId = raw.parse().expect("Valid");
        assert_eq!(id.domain_id, "wonderland".parse().expect("Valid"));
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn account_id_requires_both_parts() {
        assert!("@wonderland".parse::<AccountId>().is_err());
        assert!(format!("{SIGNATORY}@").parse::<AccountId>().is_err());
        assert!("just_a_name".parse::<AccountId>().is_err());
        assert!("not_a_key@wonderland".parse::<AccountId>().is_err());
    }
}
