//! Permission tokens accounts can hold to act on entities they do not
//! own.

use std::collections::BTreeSet;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{account::AccountId, asset::AssetDefinitionId, trigger::TriggerId};

/// Set of [`Permission`]s an account holds.
pub type Permissions = BTreeSet<Permission>;

/// A delegation an account can be granted. Ownership always implies the
/// corresponding ability; tokens extend it to non-owners.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Decode,
    Encode,
    Deserialize,
    Serialize,
)]
pub enum Permission {
    /// Register triggers whose action executes under another account.
    #[display(fmt = "CanRegisterTriggerForAccount({_0})")]
    CanRegisterTriggerForAccount(AccountId),
    /// Invoke another account's trigger.
    #[display(fmt = "CanExecuteTrigger({_0})")]
    CanExecuteTrigger(TriggerId),
    /// Unregister another account's trigger.
    #[display(fmt = "CanUnregisterTrigger({_0})")]
    CanUnregisterTrigger(TriggerId),
    /// Extend or shorten the repetitions of another account's trigger.
    #[display(fmt = "CanModifyTriggerRepetitions({_0})")]
    CanModifyTriggerRepetitions(TriggerId),
    /// Register assets under a definition owned by another account.
    #[display(fmt = "CanRegisterAssetWithDefinition({_0})")]
    CanRegisterAssetWithDefinition(AssetDefinitionId),
    /// Mint assets under a definition owned by another account.
    #[display(fmt = "CanMintAssetWithDefinition({_0})")]
    CanMintAssetWithDefinition(AssetDefinitionId),
    /// Burn assets under a definition owned by another account.
    #[display(fmt = "CanBurnAssetWithDefinition({_0})")]
    CanBurnAssetWithDefinition(AssetDefinitionId),
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{Permission, Permissions};
}
