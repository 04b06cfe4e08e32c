//! This module contains the implementations of every special
//! instruction, split by the entity they act on.

pub mod account;
pub mod asset;
pub mod domain;
pub mod triggers;
pub mod world;

use takara_data_model::{
    account::AccountId,
    isi::error::InstructionExecutionError,
    isi::{
        AssetBurnBox, AssetMintBox, BurnBox, InstructionBox, MintBox, RegisterBox, UnregisterBox,
    },
    metadata::{Metadata, MetadataError, MetadataLimits},
};

use super::Execute;
use crate::wsv::WorldStateView;

/// Check that `metadata` attached to a freshly registered entity stays
/// within `limits`.
pub(crate) fn assert_metadata_limits(
    metadata: &Metadata,
    limits: MetadataLimits,
) -> Result<(), InstructionExecutionError> {
    if metadata.len() > limits.capacity as usize {
        return Err(MetadataError::OverCapacity {
            limit: limits.capacity,
        }
        .into());
    }
    for (key, value) in metadata.iter() {
        let entry_len = key.as_ref().len() + value.as_str().len();
        if entry_len > limits.max_entry_len as usize {
            return Err(MetadataError::EntryTooBig {
                limit: limits.max_entry_len,
                actual: u32::try_from(entry_len).unwrap_or(u32::MAX),
            }
            .into());
        }
    }
    Ok(())
}

impl Execute for InstructionBox {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        match self {
            InstructionBox::Register(isi) => isi.execute(authority, wsv),
            InstructionBox::Unregister(isi) => isi.execute(authority, wsv),
            InstructionBox::Mint(isi) => isi.execute(authority, wsv),
            InstructionBox::Burn(isi) => isi.execute(authority, wsv),
            InstructionBox::SetKeyValue(isi) => isi.execute(authority, wsv),
            InstructionBox::RemoveKeyValue(isi) => isi.execute(authority, wsv),
            InstructionBox::Grant(isi) => isi.execute(authority, wsv),
            InstructionBox::Revoke(isi) => isi.execute(authority, wsv),
            InstructionBox::ExecuteTrigger(isi) => isi.execute(authority, wsv),
        }
    }
}

impl Execute for RegisterBox {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        match self {
            RegisterBox::Domain(isi) => isi.execute(authority, wsv),
            RegisterBox::Account(isi) => isi.execute(authority, wsv),
            RegisterBox::AssetDefinition(isi) => isi.execute(authority, wsv),
            RegisterBox::Asset(isi) => isi.execute(authority, wsv),
            RegisterBox::Trigger(isi) => isi.execute(authority, wsv),
        }
    }
}

impl Execute for UnregisterBox {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        match self {
            UnregisterBox::Domain(isi) => isi.execute(authority, wsv),
            UnregisterBox::Account(isi) => isi.execute(authority, wsv),
            UnregisterBox::AssetDefinition(isi) => isi.execute(authority, wsv),
            UnregisterBox::Asset(isi) => isi.execute(authority, wsv),
            UnregisterBox::Trigger(isi) => isi.execute(authority, wsv),
        }
    }
}

impl Execute for MintBox {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        match self {
            MintBox::Asset(AssetMintBox::Quantity(isi)) => isi.execute(authority, wsv),
            MintBox::Asset(AssetMintBox::BigQuantity(isi)) => isi.execute(authority, wsv),
            MintBox::TriggerRepetitions(isi) => isi.execute(authority, wsv),
        }
    }
}

impl Execute for BurnBox {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        match self {
            BurnBox::Asset(AssetBurnBox::Quantity(isi)) => isi.execute(authority, wsv),
            BurnBox::Asset(AssetBurnBox::BigQuantity(isi)) => isi.execute(authority, wsv),
            BurnBox::TriggerRepetitions(isi) => isi.execute(authority, wsv),
        }
    }
}
