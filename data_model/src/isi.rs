//! This library contains basic Takara Special Instructions.

use core::fmt;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    asset::{Asset, AssetDefinition, AssetId},
    domain::Domain,
    metadata::JsonString,
    name::Name,
    permission::Permission,
    trigger::{Trigger, TriggerId},
    Identifiable, Registered,
};

/// Generic instruction for the registration of an object.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Register<O: Registered> {
    /// The object that should be registered, uniquely identifiable by
    /// its id.
    pub object: O::With,
}

/// Generic instruction for the unregistration of an object.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Unregister<O: Identifiable> {
    /// [`Identifiable::Id`] of the object which should be unregistered.
    pub object_id: O::Id,
}

/// Generic instruction for minting onto a destination.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Mint<D: Identifiable, O> {
    /// Object which should be minted.
    pub object: O,
    /// Destination the object is minted onto.
    pub destination_id: D::Id,
}

/// Generic instruction for burning from a destination.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Burn<D: Identifiable, O> {
    /// Object which should be burned.
    pub object: O,
    /// Destination the object is burned from.
    pub destination_id: D::Id,
}

/// Generic instruction to set a key-value pair on an object.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct SetKeyValue<O: Identifiable> {
    /// Where to set the key value.
    pub object_id: O::Id,
    /// Key.
    pub key: Name,
    /// Value.
    pub value: JsonString,
}

/// Generic instruction to remove a key-value pair from an object.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct RemoveKeyValue<O: Identifiable> {
    /// From where to remove the key value.
    pub object_id: O::Id,
    /// Key of the pair to remove.
    pub key: Name,
}

/// Instruction to attach a [`Permission`] to an account.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Grant {
    /// Permission to grant.
    pub object: Permission,
    /// Account the permission is granted to.
    pub destination_id: AccountId,
}

/// Instruction to detach a [`Permission`] from an account.
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct Revoke {
    /// Permission to revoke.
    pub object: Permission,
    /// Account the permission is revoked from.
    pub destination_id: AccountId,
}

/// Instruction to request the execution of a registered trigger.
#[derive(
    Debug, derive_more::Constructor, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize,
)]
pub struct ExecuteTrigger {
    /// Id of the trigger to execute.
    pub trigger_id: TriggerId,
}

impl Register<Domain> {
    /// Construct the registration of a [`Domain`].
    pub fn domain(object: <Domain as Registered>::With) -> Self {
        Self { object }
    }
}

impl Register<crate::account::Account> {
    /// Construct the registration of an [`Account`](crate::account::Account).
    pub fn account(object: <crate::account::Account as Registered>::With) -> Self {
        Self { object }
    }
}

impl Register<AssetDefinition> {
    /// Construct the registration of an [`AssetDefinition`].
    pub fn asset_definition(object: <AssetDefinition as Registered>::With) -> Self {
        Self { object }
    }
}

impl Register<Asset> {
    /// Construct the registration of an [`Asset`].
    pub fn asset(object: Asset) -> Self {
        Self { object }
    }
}

impl Register<Trigger> {
    /// Construct the registration of a [`Trigger`].
    pub fn trigger(object: Trigger) -> Self {
        Self { object }
    }
}

impl Unregister<Domain> {
    /// Construct the unregistration of a [`Domain`].
    pub fn domain(object_id: crate::domain::DomainId) -> Self {
        Self { object_id }
    }
}

impl Unregister<crate::account::Account> {
    /// Construct the unregistration of an [`Account`](crate::account::Account).
    pub fn account(object_id: AccountId) -> Self {
        Self { object_id }
    }
}

impl Unregister<AssetDefinition> {
    /// Construct the unregistration of an [`AssetDefinition`].
    pub fn asset_definition(object_id: crate::asset::AssetDefinitionId) -> Self {
        Self { object_id }
    }
}

impl Unregister<Asset> {
    /// Construct the unregistration of an [`Asset`].
    pub fn asset(object_id: AssetId) -> Self {
        Self { object_id }
    }
}

impl Unregister<Trigger> {
    /// Construct the unregistration of a [`Trigger`].
    pub fn trigger(object_id: TriggerId) -> Self {
        Self { object_id }
    }
}

impl Mint<Asset, u32> {
    /// Construct the mint of a `u32` quantity onto an asset.
    pub fn asset_quantity(object: u32, destination_id: AssetId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Mint<Asset, u128> {
    /// Construct the mint of a `u128` quantity onto an asset.
    pub fn asset_big_quantity(object: u128, destination_id: AssetId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Mint<Trigger, u32> {
    /// Construct the mint of extra repetitions onto a trigger.
    pub fn trigger_repetitions(object: u32, destination_id: TriggerId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Burn<Asset, u32> {
    /// Construct the burn of a `u32` quantity from an asset.
    pub fn asset_quantity(object: u32, destination_id: AssetId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Burn<Asset, u128> {
    /// Construct the burn of a `u128` quantity from an asset.
    pub fn asset_big_quantity(object: u128, destination_id: AssetId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Burn<Trigger, u32> {
    /// Construct the burn of remaining repetitions from a trigger.
    pub fn trigger_repetitions(object: u32, destination_id: TriggerId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl SetKeyValue<Asset> {
    /// Construct the insertion of a store entry into an asset.
    pub fn asset(object_id: AssetId, key: Name, value: impl Into<JsonString>) -> Self {
        Self {
            object_id,
            key,
            value: value.into(),
        }
    }
}

impl RemoveKeyValue<Asset> {
    /// Construct the removal of a store entry from an asset.
    pub fn asset(object_id: AssetId, key: Name) -> Self {
        Self { object_id, key }
    }
}

impl Grant {
    /// Construct the grant of `permission` to `destination_id`.
    pub fn permission(object: Permission, destination_id: AccountId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

impl Revoke {
    /// Construct the revocation of `permission` from `destination_id`.
    pub fn permission(object: Permission, destination_id: AccountId) -> Self {
        Self {
            object,
            destination_id,
        }
    }
}

/// Sized structure for all possible registrations.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum RegisterBox {
    /// [`Domain`] variant.
    Domain(Register<Domain>),
    /// [`Account`](crate::account::Account) variant.
    Account(Register<crate::account::Account>),
    /// [`AssetDefinition`] variant.
    AssetDefinition(Register<AssetDefinition>),
    /// [`Asset`] variant.
    Asset(Register<Asset>),
    /// [`Trigger`] variant.
    Trigger(Register<Trigger>),
}

/// Sized structure for all possible unregistrations.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum UnregisterBox {
    /// [`Domain`] variant.
    Domain(Unregister<Domain>),
    /// [`Account`](crate::account::Account) variant.
    Account(Unregister<crate::account::Account>),
    /// [`AssetDefinition`] variant.
    AssetDefinition(Unregister<AssetDefinition>),
    /// [`Asset`] variant.
    Asset(Unregister<Asset>),
    /// [`Trigger`] variant.
    Trigger(Unregister<Trigger>),
}

/// Sized structure for asset mints.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum AssetMintBox {
    /// `u32` quantity variant.
    Quantity(Mint<Asset, u32>),
    /// `u128` quantity variant.
    BigQuantity(Mint<Asset, u128>),
}

/// Sized structure for all possible mints.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum MintBox {
    /// Mint onto an asset.
    Asset(AssetMintBox),
    /// Mint repetitions onto a trigger.
    TriggerRepetitions(Mint<Trigger, u32>),
}

/// Sized structure for asset burns.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum AssetBurnBox {
    /// `u32` quantity variant.
    Quantity(Burn<Asset, u32>),
    /// `u128` quantity variant.
    BigQuantity(Burn<Asset, u128>),
}

/// Sized structure for all possible burns.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum BurnBox {
    /// Burn from an asset.
    Asset(AssetBurnBox),
    /// Burn repetitions from a trigger.
    TriggerRepetitions(Burn<Trigger, u32>),
}

/// Sized structure for all possible instructions.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum InstructionBox {
    /// `Register` variant.
    Register(RegisterBox),
    /// `Unregister` variant.
    Unregister(UnregisterBox),
    /// `Mint` variant.
    Mint(MintBox),
    /// `Burn` variant.
    Burn(BurnBox),
    /// `SetKeyValue` variant.
    SetKeyValue(SetKeyValue<Asset>),
    /// `RemoveKeyValue` variant.
    RemoveKeyValue(RemoveKeyValue<Asset>),
    /// `Grant` variant.
    Grant(Grant),
    /// `Revoke` variant.
    Revoke(Revoke),
    /// `ExecuteTrigger` variant.
    ExecuteTrigger(ExecuteTrigger),
}

macro_rules! impl_into_instruction_box {
    ($($ty:ty => $inner:ty),+ $(,)?) => {$(
        impl From<$ty> for InstructionBox {
            fn from(instruction: $ty) -> Self {
                Self::from(<$inner>::from(instruction))
            }
        }
    )+};
}

impl_into_instruction_box!(
    Register<Domain> => RegisterBox,
    Register<crate::account::Account> => RegisterBox,
    Register<AssetDefinition> => RegisterBox,
    Register<Asset> => RegisterBox,
    Register<Trigger> => RegisterBox,
    Unregister<Domain> => UnregisterBox,
    Unregister<crate::account::Account> => UnregisterBox,
    Unregister<AssetDefinition> => UnregisterBox,
    Unregister<Asset> => UnregisterBox,
    Unregister<Trigger> => UnregisterBox,
    Mint<Trigger, u32> => MintBox,
    Burn<Trigger, u32> => BurnBox,
);

impl From<Mint<Asset, u32>> for InstructionBox {
    fn from(instruction: Mint<Asset, u32>) -> Self {
        Self::Mint(MintBox::Asset(AssetMintBox::Quantity(instruction)))
    }
}

impl From<Mint<Asset, u128>> for InstructionBox {
    fn from(instruction: Mint<Asset, u128>) -> Self {
        Self::Mint(MintBox::Asset(AssetMintBox::BigQuantity(instruction)))
    }
}

impl From<Burn<Asset, u32>> for InstructionBox {
    fn from(instruction: Burn<Asset, u32>) -> Self {
        Self::Burn(BurnBox::Asset(AssetBurnBox::Quantity(instruction)))
    }
}

impl From<Burn<Asset, u128>> for InstructionBox {
    fn from(instruction: Burn<Asset, u128>) -> Self {
        Self::Burn(BurnBox::Asset(AssetBurnBox::BigQuantity(instruction)))
    }
}

impl fmt::Display for InstructionBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionBox::Register(register) => match register {
                RegisterBox::Domain(isi) => write!(f, "REGISTER `{}`", isi.object.id),
                RegisterBox::Account(isi) => write!(f, "REGISTER `{}`", isi.object.id),
                RegisterBox::AssetDefinition(isi) => write!(f, "REGISTER `{}`", isi.object.id),
                RegisterBox::Asset(isi) => write!(f, "REGISTER `{}`", isi.object.id),
                RegisterBox::Trigger(isi) => write!(f, "REGISTER `{}`", isi.object.id),
            },
            InstructionBox::Unregister(unregister) => match unregister {
                UnregisterBox::Domain(isi) => write!(f, "UNREGISTER `{}`", isi.object_id),
                UnregisterBox::Account(isi) => write!(f, "UNREGISTER `{}`", isi.object_id),
                UnregisterBox::AssetDefinition(isi) => {
                    write!(f, "UNREGISTER `{}`", isi.object_id)
                }
                UnregisterBox::Asset(isi) => write!(f, "UNREGISTER `{}`", isi.object_id),
                UnregisterBox::Trigger(isi) => write!(f, "UNREGISTER `{}`", isi.object_id),
            },
            InstructionBox::Mint(mint) => match mint {
                MintBox::Asset(AssetMintBox::Quantity(isi)) => {
                    write!(f, "MINT `{}` TO `{}`", isi.object, isi.destination_id)
                }
                MintBox::Asset(AssetMintBox::BigQuantity(isi)) => {
                    write!(f, "MINT `{}` TO `{}`", isi.object, isi.destination_id)
                }
                MintBox::TriggerRepetitions(isi) => {
                    write!(
                        f,
                        "MINT `{}` REPETITIONS OF `{}`",
                        isi.object, isi.destination_id
                    )
                }
            },
            InstructionBox::Burn(burn) => match burn {
                BurnBox::Asset(AssetBurnBox::Quantity(isi)) => {
                    write!(f, "BURN `{}` FROM `{}`", isi.object, isi.destination_id)
                }
                BurnBox::Asset(AssetBurnBox::BigQuantity(isi)) => {
                    write!(f, "BURN `{}` FROM `{}`", isi.object, isi.destination_id)
                }
                BurnBox::TriggerRepetitions(isi) => {
                    write!(
                        f,
                        "BURN `{}` REPETITIONS OF `{}`",
                        isi.object, isi.destination_id
                    )
                }
            },
            InstructionBox::SetKeyValue(isi) => {
                write!(f, "SET `{}` ON `{}`", isi.key, isi.object_id)
            }
            InstructionBox::RemoveKeyValue(isi) => {
                write!(f, "REMOVE `{}` FROM `{}`", isi.key, isi.object_id)
            }
            InstructionBox::Grant(isi) => {
                write!(f, "GRANT `{}` TO `{}`", isi.object, isi.destination_id)
            }
            InstructionBox::Revoke(isi) => {
                write!(f, "REVOKE `{}` FROM `{}`", isi.object, isi.destination_id)
            }
            InstructionBox::ExecuteTrigger(isi) => {
                write!(f, "EXECUTE `{}`", isi.trigger_id)
            }
        }
    }
}

pub mod error {
    //! Instruction execution errors.

    use parity_scale_codec::{Decode, Encode};
    use serde::{Deserialize, Serialize};

    use crate::{
        account::AccountId,
        asset::{AssetDefinitionId, AssetId, AssetValueType},
        domain::DomainId,
        metadata::MetadataError,
        name::Name,
        trigger::TriggerId,
        IdBox,
    };

    /// Failure to find an entity the instruction refers to.
    #[derive(
        Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
    )]
    pub enum FindError {
        /// Failed to find a domain.
        #[error("Failed to find domain `{0}`")]
        Domain(DomainId),
        /// Failed to find an account.
        #[error("Failed to find account `{0}`")]
        Account(AccountId),
        /// Failed to find an asset definition.
        #[error("Failed to find asset definition `{0}`")]
        AssetDefinition(AssetDefinitionId),
        /// Failed to find an asset.
        #[error("Failed to find asset `{0}`")]
        Asset(AssetId),
        /// Failed to find a trigger.
        #[error("Failed to find trigger `{0}`")]
        Trigger(TriggerId),
        /// Failed to find a metadata key.
        #[error("Failed to find metadata key `{0}`")]
        MetadataKey(Name),
    }

    /// Type of instruction, used in repetition errors.
    #[derive(
        Debug,
        derive_more::Display,
        Clone,
        Copy,
        PartialEq,
        Eq,
        Decode,
        Encode,
        Deserialize,
        Serialize,
    )]
    pub enum InstructionType {
        /// `Register` instruction.
        #[display(fmt = "Register")]
        Register,
        /// `Unregister` instruction.
        #[display(fmt = "Unregister")]
        Unregister,
        /// `Mint` instruction.
        #[display(fmt = "Mint")]
        Mint,
        /// `Burn` instruction.
        #[display(fmt = "Burn")]
        Burn,
        /// `Grant` instruction.
        #[display(fmt = "Grant")]
        Grant,
        /// `Revoke` instruction.
        #[display(fmt = "Revoke")]
        Revoke,
    }

    /// An instruction was repeated where it should not have been: e.g.
    /// registering an entity whose id is already taken.
    #[derive(
        Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
    )]
    #[error("Repetition of `{instruction}` for `{id}`")]
    pub struct RepetitionError {
        /// The repeated instruction kind.
        pub instruction: InstructionType,
        /// The id the repetition happened on.
        pub id: IdBox,
    }

    /// Violation of a definition's mintability scheme.
    #[derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        thiserror::Error,
        Decode,
        Encode,
        Deserialize,
        Serialize,
    )]
    pub enum MintabilityError {
        /// Tried to mint on a definition which can no longer be minted.
        #[error("This asset cannot be minted more than once and it was already minted")]
        MintUnmintable,
        /// Tried to forbid minting on a definition which was already
        /// minted freely.
        #[error("This asset was set as infinitely mintable; it cannot be made fixed-supply")]
        ForbidMintOnMintable,
    }

    /// Math error inside an instruction.
    #[derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        thiserror::Error,
        Decode,
        Encode,
        Deserialize,
        Serialize,
    )]
    pub enum MathError {
        /// Overflow during addition.
        #[error("Overflow occurred")]
        Overflow,
        /// The asset holds less than what the instruction removes.
        #[error("Not enough quantity to burn")]
        NotEnoughQuantity,
    }

    /// Asset type assertion error.
    #[derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        thiserror::Error,
        Decode,
        Encode,
        Deserialize,
        Serialize,
    )]
    #[error("Expected asset of type {expected}, got {got}")]
    pub struct AssetTypeError {
        /// Expected type.
        pub expected: AssetValueType,
        /// Type which was discovered.
        pub got: AssetValueType,
    }

    /// The permission validator vetoed the instruction.
    #[derive(
        Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
    )]
    pub enum ValidationFail {
        /// The authority lacks the permission the operation requires.
        #[error("Operation is not permitted: {0}")]
        NotPermitted(String),
    }

    /// Instruction execution error type.
    #[derive(
        Debug, Clone, PartialEq, Eq, thiserror::Error, Decode, Encode, Deserialize, Serialize,
    )]
    pub enum InstructionExecutionError {
        /// Failed to find some entity.
        #[error("Entity missing")]
        Find(#[from] FindError),
        /// An instruction was repeated where it should not have been.
        #[error("Repeated instruction")]
        Repetition(#[from] RepetitionError),
        /// A definition's mintability scheme was violated.
        #[error("Mintability violation")]
        Mintability(#[from] MintabilityError),
        /// Failed due to a math exception.
        #[error("Math error")]
        Math(#[from] MathError),
        /// An asset had a different type than the instruction expected.
        #[error("Type assertion failed")]
        Type(#[from] AssetTypeError),
        /// A metadata limit was broken.
        #[error("Metadata limit violation")]
        Metadata(#[from] MetadataError),
        /// Some other invariant was violated.
        #[error("Invariant violation: {0}")]
        InvariantViolation(String),
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{
        AssetBurnBox, AssetMintBox, Burn, BurnBox, ExecuteTrigger, Grant, InstructionBox, Mint,
        MintBox, Register, RegisterBox, RemoveKeyValue, Revoke, SetKeyValue, Unregister,
        UnregisterBox,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn typed_instructions_fold_into_the_box() {
        let trigger_id: TriggerId = "mint_rose".parse().expect("Valid");
        let instruction: InstructionBox = Unregister::trigger(trigger_id).into();
        assert!(matches!(
            instruction,
            InstructionBox::Unregister(UnregisterBox::Trigger(_))
        ));
    }

    #[test]
    fn instruction_display_names_the_target() {
        let asset_id: AssetId =
            "rose##ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland"
                .parse()
                .expect("Valid");
        let instruction: InstructionBox = Mint::asset_quantity(13_u32, asset_id).into();
        assert_eq!(
            instruction.to_string(),
            "MINT `13` TO `rose##ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland`"
        );
    }
}
