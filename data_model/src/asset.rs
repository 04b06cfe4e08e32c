//! This module contains [`Asset`] structure and related traits and
//! instruction implementations.

use core::{fmt, str::FromStr};
use std::collections::btree_map;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::EnumString;

use crate::{
    account::AccountId, domain::DomainId, metadata::Metadata, HasMetadata, Identifiable, Name,
    ParseError, Registered,
};

/// API to work with collections of [`AssetId`] : [`Asset`] mappings.
pub type AssetsMap = btree_map::BTreeMap<AssetId, Asset>;

/// API to work with collections of [`AssetDefinitionId`] :
/// [`AssetDefinition`] mappings.
pub type AssetDefinitionsMap = btree_map::BTreeMap<AssetDefinitionId, AssetDefinition>;

/// Identification of an asset definition: asset name plus the domain the
/// definition is registered in.
///
/// # Examples
///
/// ```rust
/// use takara_data_model::asset::AssetDefinitionId;
///
/// let definition_id = "rose#wonderland".parse::<AssetDefinitionId>().expect("Valid");
/// ```
#[derive(
    derive_more::Display,
    Debug,
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
#[display(fmt = "{name}#{domain_id}")]
#[getset(get = "pub")]
pub struct AssetDefinitionId {
    /// Asset name.
    pub name: Name,
    /// Domain id.
    pub domain_id: DomainId,
}

/// Identification of an asset: the definition it instantiates plus the
/// account holding it.
#[derive(
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
#[getset(get = "pub")]
pub struct AssetId {
    /// Entity identification.
    pub definition_id: AssetDefinitionId,
    /// Account identification.
    pub account_id: AccountId,
}

/// Asset definition defines the shape of the asset's value.
#[derive(Debug, Clone, getset::CopyGetters, Decode, Encode, Deserialize, Serialize)]
pub struct AssetDefinition {
    /// An identification of the [`AssetDefinition`].
    pub id: AssetDefinitionId,
    /// Type of [`AssetValue`].
    #[getset(get_copy = "pub")]
    pub value_type: AssetValueType,
    /// Is the asset mintable.
    #[getset(get_copy = "pub")]
    pub mintable: Mintable,
    /// Metadata of this asset definition as a key-value store.
    pub metadata: Metadata,
    /// The account that owns this asset definition. Usually the
    /// [`Account`](crate::account::Account) that registered it.
    pub owned_by: AccountId,
}

id_eq_ord!(AssetDefinition);

/// Asset represents some sort of commodity or value held by an account.
#[derive(Debug, Clone, getset::Getters, Decode, Encode, Deserialize, Serialize)]
pub struct Asset {
    /// Component identification.
    pub id: AssetId,
    /// Asset's quantity or store.
    #[getset(get = "pub")]
    pub value: AssetValue,
}

id_eq_ord!(Asset);

/// Builder which can be submitted in a transaction to create a new
/// [`AssetDefinition`].
#[derive(Debug, Clone, Decode, Encode, Deserialize, Serialize)]
pub struct NewAssetDefinition {
    /// The identification associated with the asset definition builder.
    pub id: AssetDefinitionId,
    /// The value type associated with the asset definition builder.
    pub value_type: AssetValueType,
    /// The mintability associated with the asset definition builder.
    pub mintable: Mintable,
    /// Metadata associated with the asset definition builder.
    pub metadata: Metadata,
}

id_eq_ord!(NewAssetDefinition);

/// Asset's inner value type.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumString,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
#[repr(u8)]
pub enum AssetValueType {
    /// Asset's quantity.
    #[display(fmt = "q")]
    Quantity,
    /// Asset's big quantity.
    #[display(fmt = "Q")]
    BigQuantity,
    /// Asset's key-value structured data.
    #[display(fmt = "s")]
    Store,
}

/// Asset's inner value.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::From,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
pub enum AssetValue {
    /// Asset's quantity.
    #[display(fmt = "{_0}q")]
    Quantity(u32),
    /// Asset's big quantity.
    #[display(fmt = "{_0}Q")]
    BigQuantity(u128),
    /// Asset's key-value structured data.
    #[display(fmt = "store")]
    Store(Metadata),
}

/// An asset's mintability scheme. `Infinitely` means elastic supply;
/// `Once` is a fixed issuance minted exactly one time (the shape NFTs
/// take here).
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
#[repr(u8)]
pub enum Mintable {
    /// Regular asset with elastic supply. Can be minted and burned.
    #[display(fmt = "+")]
    Infinitely,
    /// Non-mintable asset (token), with a fixed supply. Can be burned,
    /// and minted **once**.
    #[display(fmt = "=")]
    Once,
    /// Non-mintable asset (token), with a fixed supply. Can be burned,
    /// but not minted.
    #[display(fmt = "-")]
    Not,
}

/// Numeric value of an asset, used as a query output.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::From,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
pub enum NumericValue {
    /// `u32` value.
    #[display(fmt = "{_0}")]
    U32(u32),
    /// `u128` value.
    #[display(fmt = "{_0}")]
    U128(u128),
}

impl AssetDefinition {
    /// Construct a builder for an [`AssetDefinition`] identifiable by `id`.
    pub fn new(id: AssetDefinitionId, value_type: AssetValueType) -> <Self as Registered>::With {
        NewAssetDefinition::new(id, value_type)
    }

    /// Construct a builder for a quantity [`AssetDefinition`].
    pub fn quantity(id: AssetDefinitionId) -> <Self as Registered>::With {
        NewAssetDefinition::new(id, AssetValueType::Quantity)
    }

    /// Construct a builder for a big-quantity [`AssetDefinition`].
    pub fn big_quantity(id: AssetDefinitionId) -> <Self as Registered>::With {
        NewAssetDefinition::new(id, AssetValueType::BigQuantity)
    }

    /// Construct a builder for a store [`AssetDefinition`].
    pub fn store(id: AssetDefinitionId) -> <Self as Registered>::With {
        NewAssetDefinition::new(id, AssetValueType::Store)
    }
}

impl Asset {
    /// Constructor.
    pub fn new(id: AssetId, value: impl Into<AssetValue>) -> <Self as Registered>::With {
        Self {
            id,
            value: value.into(),
        }
    }
}

impl NewAssetDefinition {
    /// Create a [`NewAssetDefinition`], reserved for internal use.
    fn new(id: AssetDefinitionId, value_type: AssetValueType) -> Self {
        Self {
            id,
            value_type,
            mintable: Mintable::Infinitely,
            metadata: Metadata::default(),
        }
    }

    /// Set mintability to [`Mintable::Once`].
    #[must_use]
    pub fn mintable_once(mut self) -> Self {
        self.mintable = Mintable::Once;
        self
    }

    /// Add [`Metadata`] to the asset definition, replacing any previously
    /// defined value.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Finish the builder, recording `owned_by` as the owning account.
    pub fn build(self, owned_by: AccountId) -> AssetDefinition {
        AssetDefinition {
            id: self.id,
            value_type: self.value_type,
            mintable: self.mintable,
            metadata: self.metadata,
            owned_by,
        }
    }
}

impl AssetValue {
    /// Return the type of this value.
    pub const fn value_type(&self) -> AssetValueType {
        match *self {
            Self::Quantity(_) => AssetValueType::Quantity,
            Self::BigQuantity(_) => AssetValueType::BigQuantity,
            Self::Store(_) => AssetValueType::Store,
        }
    }

    /// Return `true` if this value is a zero quantity. Stores are never
    /// considered zero.
    pub const fn is_zero_value(&self) -> bool {
        match *self {
            Self::Quantity(q) => q == 0_u32,
            Self::BigQuantity(q) => q == 0_u128,
            Self::Store(_) => false,
        }
    }
}

impl TryFrom<AssetValue> for NumericValue {
    type Error = crate::isi::error::AssetTypeError;

    fn try_from(value: AssetValue) -> Result<Self, Self::Error> {
        match value {
            AssetValue::Quantity(value) => Ok(NumericValue::U32(value)),
            AssetValue::BigQuantity(value) => Ok(NumericValue::U128(value)),
            AssetValue::Store(_) => Err(crate::isi::error::AssetTypeError {
                expected: AssetValueType::Quantity,
                got: AssetValueType::Store,
            }),
        }
    }
}

/// Asset definition identification is represented by a `name#domain`
/// string.
impl FromStr for AssetDefinitionId {
    type Err = ParseError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let mut split = string.split('#');
        match (split.next(), split.next(), split.next()) {
            (Some(""), _, _) => Err(ParseError {
                reason: "Asset definition id cannot be empty",
            }),
            (Some(name), Some(domain_id), None) if !domain_id.is_empty() => Ok(Self {
                name: name.parse()?,
                domain_id: domain_id.parse()?,
            }),
            _ => Err(ParseError {
                reason: "Asset definition id should have format `asset#domain`",
            }),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.definition_id.domain_id == self.account_id.domain_id {
            write!(f, "{}##{}", self.definition_id.name, self.account_id)
        } else {
            write!(f, "{}#{}", self.definition_id, self.account_id)
        }
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Asset identification, represented by
/// `name#asset_domain#signatory@account_domain`. If the domains of the
/// asset and the account match, the name can be shortened to
/// `asset##signatory@domain`.
impl FromStr for AssetId {
    type Err = ParseError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let Some((definition_candidate, account_candidate)) = string.rsplit_once('#') else {
            return Err(ParseError {
                reason: "`AssetId` should contain at least one `#` character",
            });
        };
        let account_id: AccountId = account_candidate.parse().map_err(|_err| ParseError {
            reason: "The account part of an `AssetId` should have the form \
                     `signatory@domain`",
        })?;
        let definition_id = if let Ok(definition_id) = definition_candidate.parse() {
            definition_id
        } else if let Some((name, "")) = definition_candidate.rsplit_once('#') {
            AssetDefinitionId::new(name.parse()?, account_id.domain_id.clone())
        } else {
            return Err(ParseError {
                reason: "The definition part of an `AssetId` should have the form \
                         `name#domain` or `name#` to inherit the account domain",
            });
        };
        Ok(Self {
            definition_id,
            account_id,
        })
    }
}

impl HasMetadata for AssetDefinition {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl HasMetadata for NewAssetDefinition {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl fmt::Display for AssetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.id, self.value_type, self.mintable)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.value)
    }
}

impl Identifiable for AssetDefinition {
    type Id = AssetDefinitionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Identifiable for NewAssetDefinition {
    type Id = AssetDefinitionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Identifiable for Asset {
    type Id = AssetId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Registered for AssetDefinition {
    type With = NewAssetDefinition;
}

impl Registered for Asset {
    type With = Self;
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{
        Asset, AssetDefinition, AssetDefinitionId, AssetId, AssetValue, AssetValueType, Mintable,
        NewAssetDefinition, NumericValue,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATORY: &str =
        "ed0120E2ECD69DA5833EC10FB3DFAED83A07E5B9CBE9BC39484F0F7DDEC8B46253428B";

    #[test]
    fn abbreviated_asset_id_inherits_account_domain() {
        let raw = format!("nft_number_1_for_genesis##{SIGNATORY}@genesis");
        let asset_id: AssetId = raw.parse().expect("Valid");
        assert_eq!(
            asset_id.definition_id,
            "nft_number_1_for_genesis#genesis".parse().expect("Valid"),
        );
        assert_eq!(asset_id.to_string(), raw);
    }

    #[test]
    fn full_asset_id_keeps_both_domains() {
        let raw = format!("rose#wonderland#{SIGNATORY}@genesis");
        let asset_id: AssetId = raw.parse().expect("Valid");
        assert_eq!(
            asset_id.definition_id,
            "rose#wonderland".parse().expect("Valid")
        );
        assert_eq!(asset_id.to_string(), raw);
    }

    #[test]
    fn asset_id_without_account_part_is_rejected() {
        assert!("rose#wonderland".parse::<AssetId>().is_err());
        assert!("rose".parse::<AssetId>().is_err());
    }
}
