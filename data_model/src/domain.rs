//! Structures, traits and impls related to `Domain`s.

use core::fmt;
use std::collections::btree_map;

use getset::Getters;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    account::{Account, AccountId, AccountsMap},
    asset::{AssetDefinition, AssetDefinitionId, AssetDefinitionsMap},
    metadata::Metadata,
    HasMetadata, Identifiable, Name, Registered,
};

/// API to work with collections of [`DomainId`] : [`Domain`] mappings.
pub type DomainsMap = btree_map::BTreeMap<DomainId, Domain>;

/// Identification of a [`Domain`].
#[derive(
    Debug,
    derive_more::Display,
    derive_more::FromStr,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Constructor,
    Getters,
    Decode,
    Encode,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[display(fmt = "{name}")]
#[getset(get = "pub")]
#[repr(transparent)]
pub struct DomainId {
    /// [`Name`] unique to the domain.
    pub name: Name,
}

/// Named group of [`Account`]s and [`AssetDefinition`]s.
#[derive(Debug, Clone, Decode, Encode, Deserialize, Serialize)]
pub struct Domain {
    /// Identification of this [`Domain`].
    pub id: DomainId,
    /// [`Account`]s of the domain.
    pub accounts: AccountsMap,
    /// [`Asset`](crate::asset::Asset) definitions registered in the domain.
    pub asset_definitions: AssetDefinitionsMap,
    /// Metadata of this domain as a key-value store.
    pub metadata: Metadata,
}

id_eq_ord!(Domain);

/// Builder which should be submitted in a transaction to create a new
/// [`Domain`].
#[derive(Debug, Clone, Decode, Encode, Deserialize, Serialize)]
pub struct NewDomain {
    /// The identification associated with the domain builder.
    pub id: DomainId,
    /// Metadata associated with the domain builder.
    pub metadata: Metadata,
}

id_eq_ord!(NewDomain);

impl Domain {
    /// Construct a builder for a [`Domain`] identifiable by `id`.
    pub fn new(id: DomainId) -> <Self as Registered>::With {
        NewDomain {
            id,
            metadata: Metadata::default(),
        }
    }

    /// Return a reference to the [`Account`] corresponding to the account id.
    pub fn account(&self, account_id: &AccountId) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    /// Return a mutable reference to the [`Account`] corresponding to the
    /// account id.
    pub fn account_mut(&mut self, account_id: &AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(account_id)
    }

    /// Add an [`Account`] to the domain, returning the previous account
    /// stored under the same id.
    pub fn add_account(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.id.clone(), account)
    }

    /// Remove an [`Account`] from the domain and return it.
    pub fn remove_account(&mut self, account_id: &AccountId) -> Option<Account> {
        self.accounts.remove(account_id)
    }

    /// Get an iterator over the [`Account`]s of the domain.
    pub fn accounts(&self) -> impl ExactSizeIterator<Item = &Account> {
        self.accounts.values()
    }

    /// Return a reference to the [`AssetDefinition`] corresponding to the
    /// definition id.
    pub fn asset_definition(&self, definition_id: &AssetDefinitionId) -> Option<&AssetDefinition> {
        self.asset_definitions.get(definition_id)
    }

    /// Return a mutable reference to the [`AssetDefinition`]
    /// corresponding to the definition id.
    pub fn asset_definition_mut(
        &mut self,
        definition_id: &AssetDefinitionId,
    ) -> Option<&mut AssetDefinition> {
        self.asset_definitions.get_mut(definition_id)
    }

    /// Add an [`AssetDefinition`] to the domain, returning the previous
    /// definition stored under the same id.
    pub fn define_asset(&mut self, definition: AssetDefinition) -> Option<AssetDefinition> {
        self.asset_definitions
            .insert(definition.id.clone(), definition)
    }

    /// Remove an [`AssetDefinition`] from the domain and return it.
    pub fn remove_asset_definition(
        &mut self,
        definition_id: &AssetDefinitionId,
    ) -> Option<AssetDefinition> {
        self.asset_definitions.remove(definition_id)
    }

    /// Get an iterator over the [`AssetDefinition`]s of the domain.
    pub fn asset_definitions(&self) -> impl ExactSizeIterator<Item = &AssetDefinition> {
        self.asset_definitions.values()
    }
}

impl NewDomain {
    /// Add [`Metadata`] to the domain builder, replacing any previously
    /// defined metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Finish the builder.
    pub fn build(self) -> Domain {
        Domain {
            id: self.id,
            accounts: AccountsMap::default(),
            asset_definitions: AssetDefinitionsMap::default(),
            metadata: self.metadata,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasMetadata for Domain {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Identifiable for Domain {
    type Id = DomainId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Identifiable for NewDomain {
    type Id = DomainId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Registered for Domain {
    type With = NewDomain;
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{Domain, DomainId, NewDomain};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_id_parses_plain_name() {
        let id: DomainId = "wonderland".parse().expect("Valid");
        assert_eq!(id.to_string(), "wonderland");
        assert!("wonder land".parse::<DomainId>().is_err());
    }
}
