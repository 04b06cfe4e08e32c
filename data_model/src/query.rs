//! Read-only requests against ledger state and their typed outputs.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountId},
    asset::{Asset, AssetDefinition, AssetDefinitionId, AssetId, NumericValue},
    domain::{Domain, DomainId},
    permission::Permission,
    trigger::{Trigger, TriggerId},
};

/// A typed read-only request. Each query knows the shape of its answer.
pub trait Query: Into<QueryBox> + core::fmt::Debug + Clone {
    /// The answer this query produces.
    type Output;
}

macro_rules! queries {
    () => {};
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty,
            )+
        } => $output:ty;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl Query for $name {
            type Output = $output;
        }

        queries!($($rest)*);
    };
    (
        $(#[$meta:meta])*
        pub struct $name:ident => $output:ty;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Decode, Encode, Deserialize, Serialize,
        )]
        pub struct $name;

        impl $name {
            /// Constructor.
            pub fn new() -> Self {
                Self
            }
        }

        impl Query for $name {
            type Output = $output;
        }

        queries!($($rest)*);
    };
}

queries! {
    /// Find every domain on the ledger.
    pub struct FindAllDomains => Vec<Domain>;

    /// Find a domain by id.
    pub struct FindDomainById {
        /// Id of the domain.
        pub id: DomainId,
    } => Domain;

    /// Find every account on the ledger.
    pub struct FindAllAccounts => Vec<Account>;

    /// Find an account by id.
    pub struct FindAccountById {
        /// Id of the account.
        pub id: AccountId,
    } => Account;

    /// Find every account registered in a domain.
    pub struct FindAccountsByDomainId {
        /// Id of the domain.
        pub domain_id: DomainId,
    } => Vec<Account>;

    /// Find every asset on the ledger.
    pub struct FindAllAssets => Vec<Asset>;

    /// Find an asset by id.
    pub struct FindAssetById {
        /// Id of the asset.
        pub id: AssetId,
    } => Asset;

    /// Find every asset held by an account.
    pub struct FindAssetsByAccountId {
        /// Id of the holding account.
        pub account_id: AccountId,
    } => Vec<Asset>;

    /// Find the numeric value of an asset.
    pub struct FindAssetQuantityById {
        /// Id of the asset.
        pub id: AssetId,
    } => NumericValue;

    /// Find every asset definition on the ledger.
    pub struct FindAllAssetsDefinitions => Vec<AssetDefinition>;

    /// Find an asset definition by id.
    pub struct FindAssetDefinitionById {
        /// Id of the definition.
        pub id: AssetDefinitionId,
    } => AssetDefinition;

    /// Find the ids of every registered trigger.
    pub struct FindAllActiveTriggerIds => Vec<TriggerId>;

    /// Find a trigger by id.
    pub struct FindTriggerById {
        /// Id of the trigger.
        pub id: TriggerId,
    } => Trigger;

    /// Find every permission granted to an account.
    pub struct FindPermissionsByAccountId {
        /// Id of the account.
        pub id: AccountId,
    } => Vec<Permission>;
}

macro_rules! query_constructor {
    ($($name:ident($field:ident: $ty:ty);)+) => {$(
        impl $name {
            /// Constructor.
            pub fn new($field: $ty) -> Self {
                Self { $field }
            }
        }
    )+};
}

query_constructor! {
    FindDomainById(id: DomainId);
    FindAccountById(id: AccountId);
    FindAccountsByDomainId(domain_id: DomainId);
    FindAssetById(id: AssetId);
    FindAssetsByAccountId(account_id: AccountId);
    FindAssetQuantityById(id: AssetId);
    FindAssetDefinitionById(id: AssetDefinitionId);
    FindTriggerById(id: TriggerId);
    FindPermissionsByAccountId(id: AccountId);
}

/// Sized structure for all possible queries.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
#[allow(missing_docs)]
pub enum QueryBox {
    FindAllDomains(FindAllDomains),
    FindDomainById(FindDomainById),
    FindAllAccounts(FindAllAccounts),
    FindAccountById(FindAccountById),
    FindAccountsByDomainId(FindAccountsByDomainId),
    FindAllAssets(FindAllAssets),
    FindAssetById(FindAssetById),
    FindAssetsByAccountId(FindAssetsByAccountId),
    FindAssetQuantityById(FindAssetQuantityById),
    FindAllAssetsDefinitions(FindAllAssetsDefinitions),
    FindAssetDefinitionById(FindAssetDefinitionById),
    FindAllActiveTriggerIds(FindAllActiveTriggerIds),
    FindTriggerById(FindTriggerById),
    FindPermissionsByAccountId(FindPermissionsByAccountId),
}

pub mod error {
    //! Query execution errors.

    use parity_scale_codec::{Decode, Encode};
    use serde::{Deserialize, Serialize};

    pub use crate::isi::error::FindError;

    /// Reasons a query fails to produce an answer.
    #[derive(
        Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
    )]
    pub enum QueryExecutionFail {
        /// The queried entity does not exist.
        #[error("Entity missing")]
        Find(#[from] FindError),
        /// The entity exists but its value has the wrong shape.
        #[error("Conversion error: {0}")]
        Conversion(String),
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{
        error::QueryExecutionFail, FindAccountById, FindAccountsByDomainId,
        FindAllAccounts, FindAllActiveTriggerIds, FindAllAssets, FindAllAssetsDefinitions,
        FindAllDomains, FindAssetById, FindAssetDefinitionById, FindAssetQuantityById,
        FindAssetsByAccountId, FindDomainById, FindPermissionsByAccountId, FindTriggerById,
        Query, QueryBox,
    };
}
