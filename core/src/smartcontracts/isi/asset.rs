//! Asset instructions: supply changes and store mutation.

use takara_data_model::{
    account::AccountId,
    asset::{Asset, AssetDefinitionId, AssetValue, AssetValueType, Mintable},
    events::AssetEvent,
    isi::error::{
        AssetTypeError, FindError, InstructionExecutionError, InstructionType, MathError,
        MintabilityError, RepetitionError,
    },
    isi::{Burn, Mint, Register, RemoveKeyValue, SetKeyValue, Unregister},
    metadata::Metadata,
    IdBox,
};

use crate::{smartcontracts::Execute, wsv::WorldStateView};

/// Assert that the definition of `definition_id` has the
/// `expected_value_type`.
fn assert_asset_type(
    definition_id: &AssetDefinitionId,
    wsv: &WorldStateView,
    expected_value_type: AssetValueType,
) -> Result<(), InstructionExecutionError> {
    let definition = wsv.asset_definition(definition_id)?;
    if definition.value_type == expected_value_type {
        Ok(())
    } else {
        Err(AssetTypeError {
            expected: expected_value_type,
            got: definition.value_type,
        }
        .into())
    }
}

/// Assert that the definition of `definition_id` can be minted right
/// now, and consume the one-shot mintability if that is what allowed
/// the mint.
fn assert_can_mint(
    definition_id: &AssetDefinitionId,
    wsv: &mut WorldStateView,
    expected_value_type: AssetValueType,
) -> Result<(), InstructionExecutionError> {
    assert_asset_type(definition_id, wsv, expected_value_type)?;
    let definition = wsv.asset_definition_mut(definition_id)?;
    match definition.mintable {
        Mintable::Infinitely => Ok(()),
        Mintable::Once => {
            definition.mintable = Mintable::Not;
            Ok(())
        }
        Mintable::Not => Err(MintabilityError::MintUnmintable.into()),
    }
}

impl Execute for Register<Asset> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let asset = self.object;
        let expected_type = wsv.asset_definition(&asset.id.definition_id)?.value_type;
        if asset.value.value_type() != expected_type {
            return Err(AssetTypeError {
                expected: expected_type,
                got: asset.value.value_type(),
            }
            .into());
        }
        if !asset.value.is_zero_value() {
            // A register carrying supply is a mint in disguise; make it
            // respect mintability.
            assert_can_mint(&asset.id.definition_id, wsv, expected_type)?;
        }

        let account = wsv.account_mut(&asset.id.account_id)?;
        if account.asset(&asset.id).is_some() {
            return Err(RepetitionError {
                instruction: InstructionType::Register,
                id: IdBox::AssetId(asset.id),
            }
            .into());
        }

        let asset_id = asset.id.clone();
        account.add_asset(asset);
        wsv.emit(AssetEvent::Created(asset_id));
        Ok(())
    }
}

impl Execute for Unregister<Asset> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let account = wsv.account_mut(&self.object_id.account_id)?;
        account
            .remove_asset(&self.object_id)
            .ok_or_else(|| FindError::Asset(self.object_id.clone()))?;
        wsv.emit(AssetEvent::Deleted(self.object_id));
        Ok(())
    }
}

impl Execute for Mint<Asset, u32> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_can_mint(
            &self.destination_id.definition_id,
            wsv,
            AssetValueType::Quantity,
        )?;
        wsv.asset_or_insert(&self.destination_id, 0_u32)?;
        wsv.modify_asset(&self.destination_id, |asset| {
            let AssetValue::Quantity(quantity) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a mint".to_owned(),
                ));
            };
            *quantity = quantity
                .checked_add(self.object)
                .ok_or(MathError::Overflow)?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::Added(self.destination_id));
        Ok(())
    }
}

impl Execute for Mint<Asset, u128> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_can_mint(
            &self.destination_id.definition_id,
            wsv,
            AssetValueType::BigQuantity,
        )?;
        wsv.asset_or_insert(&self.destination_id, 0_u128)?;
        wsv.modify_asset(&self.destination_id, |asset| {
            let AssetValue::BigQuantity(quantity) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a mint".to_owned(),
                ));
            };
            *quantity = quantity
                .checked_add(self.object)
                .ok_or(MathError::Overflow)?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::Added(self.destination_id));
        Ok(())
    }
}

impl Execute for Burn<Asset, u32> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_asset_type(
            &self.destination_id.definition_id,
            wsv,
            AssetValueType::Quantity,
        )?;
        wsv.modify_asset(&self.destination_id, |asset| {
            let AssetValue::Quantity(quantity) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a burn".to_owned(),
                ));
            };
            *quantity = quantity
                .checked_sub(self.object)
                .ok_or(MathError::NotEnoughQuantity)?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::Removed(self.destination_id));
        Ok(())
    }
}

impl Execute for Burn<Asset, u128> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_asset_type(
            &self.destination_id.definition_id,
            wsv,
            AssetValueType::BigQuantity,
        )?;
        wsv.modify_asset(&self.destination_id, |asset| {
            let AssetValue::BigQuantity(quantity) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a burn".to_owned(),
                ));
            };
            *quantity = quantity
                .checked_sub(self.object)
                .ok_or(MathError::NotEnoughQuantity)?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::Removed(self.destination_id));
        Ok(())
    }
}

impl Execute for SetKeyValue<Asset> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_asset_type(&self.object_id.definition_id, wsv, AssetValueType::Store)?;
        let limits = wsv.config.asset_metadata_limits;
        wsv.asset_or_insert(&self.object_id, Metadata::new())?;
        wsv.modify_asset(&self.object_id, |asset| {
            let AssetValue::Store(store) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a store update".to_owned(),
                ));
            };
            store.insert_with_limits(self.key.clone(), self.value.clone(), limits)?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::MetadataInserted(self.object_id));
        Ok(())
    }
}

impl Execute for RemoveKeyValue<Asset> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        assert_asset_type(&self.object_id.definition_id, wsv, AssetValueType::Store)?;
        wsv.modify_asset(&self.object_id, |asset| {
            let AssetValue::Store(store) = &mut asset.value else {
                return Err(InstructionExecutionError::InvariantViolation(
                    "Asset value changed its type underneath a store update".to_owned(),
                ));
            };
            store
                .remove(&self.key)
                .ok_or(FindError::MetadataKey(self.key.clone()))?;
            Ok(())
        })?;
        wsv.emit(AssetEvent::MetadataRemoved(self.object_id));
        Ok(())
    }
}

pub mod query {
    //! Queries over assets.

    use takara_data_model::{
        asset::{Asset, NumericValue},
        query::{
            error::QueryExecutionFail, FindAllAssets, FindAssetById, FindAssetQuantityById,
            FindAssetsByAccountId,
        },
    };

    use crate::{smartcontracts::ValidQuery, wsv::WorldStateView};

    impl ValidQuery for FindAllAssets {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv
                .domains()
                .flat_map(|domain| domain.accounts())
                .flat_map(|account| account.assets())
                .cloned()
                .collect())
        }
    }

    impl ValidQuery for FindAssetById {
        fn execute(&self, wsv: &WorldStateView) -> Result<Asset, QueryExecutionFail> {
            Ok(wsv.asset(&self.id)?.clone())
        }
    }

    impl ValidQuery for FindAssetsByAccountId {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv
                .map_account(&self.account_id, |account| {
                    account.assets().cloned().collect()
                })?)
        }
    }

    impl ValidQuery for FindAssetQuantityById {
        fn execute(&self, wsv: &WorldStateView) -> Result<NumericValue, QueryExecutionFail> {
            let asset = wsv.asset(&self.id)?;
            asset
                .value
                .clone()
                .try_into()
                .map_err(|error: takara_data_model::isi::error::AssetTypeError| {
                    QueryExecutionFail::Conversion(error.to_string())
                })
        }
    }
}
