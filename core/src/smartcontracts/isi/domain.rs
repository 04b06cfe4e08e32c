//! Domain-scoped instructions: registration of accounts and asset
//! definitions.

use takara_data_model::{
    account::{Account, AccountId},
    asset::AssetDefinition,
    events::{AccountEvent, AssetDefinitionEvent, AssetEvent},
    isi::error::{FindError, InstructionExecutionError, InstructionType, RepetitionError},
    isi::{Register, Unregister},
    IdBox,
};

use crate::{smartcontracts::Execute, wsv::WorldStateView};

impl Execute for Register<Account> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let account = self.object.build();
        let account_id = account.id.clone();
        super::assert_metadata_limits(&account.metadata, wsv.config.entity_metadata_limits)?;

        let domain = wsv.domain_mut(&account_id.domain_id)?;
        if domain.account(&account_id).is_some() {
            return Err(RepetitionError {
                instruction: InstructionType::Register,
                id: IdBox::AccountId(account_id),
            }
            .into());
        }

        domain.add_account(account);
        wsv.emit(AccountEvent::Created(account_id));
        Ok(())
    }
}

impl Execute for Unregister<Account> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let domain = wsv.domain_mut(&self.object_id.domain_id)?;
        domain
            .remove_account(&self.object_id)
            .ok_or_else(|| FindError::Account(self.object_id.clone()))?;
        wsv.emit(AccountEvent::Deleted(self.object_id));
        Ok(())
    }
}

impl Execute for Register<AssetDefinition> {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let definition = self.object.build(authority.clone());
        let definition_id = definition.id.clone();
        super::assert_metadata_limits(&definition.metadata, wsv.config.entity_metadata_limits)?;

        let domain = wsv.domain_mut(&definition_id.domain_id)?;
        if domain.asset_definition(&definition_id).is_some() {
            return Err(RepetitionError {
                instruction: InstructionType::Register,
                id: IdBox::AssetDefinitionId(definition_id),
            }
            .into());
        }

        domain.define_asset(definition);
        wsv.emit(AssetDefinitionEvent::Created(definition_id));
        Ok(())
    }
}

impl Execute for Unregister<AssetDefinition> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let definition_id = self.object_id;

        let domain = wsv.domain_mut(&definition_id.domain_id)?;
        domain
            .remove_asset_definition(&definition_id)
            .ok_or_else(|| FindError::AssetDefinition(definition_id.clone()))?;

        // Every asset of the definition disappears with it, wherever it
        // is held.
        let mut deleted_assets = Vec::new();
        for domain in wsv.world.domains.values_mut() {
            for account in domain.accounts.values_mut() {
                let doomed: Vec<_> = account
                    .assets
                    .keys()
                    .filter(|asset_id| asset_id.definition_id == definition_id)
                    .cloned()
                    .collect();
                for asset_id in doomed {
                    account.remove_asset(&asset_id);
                    deleted_assets.push(asset_id);
                }
            }
        }
        for asset_id in deleted_assets {
            wsv.emit(AssetEvent::Deleted(asset_id));
        }
        wsv.emit(AssetDefinitionEvent::Deleted(definition_id));
        Ok(())
    }
}

pub mod query {
    //! Queries over accounts and asset definitions.

    use takara_data_model::{
        account::Account,
        asset::AssetDefinition,
        query::{
            error::QueryExecutionFail, FindAccountById, FindAccountsByDomainId, FindAllAccounts,
            FindAllAssetsDefinitions, FindAssetDefinitionById,
        },
    };

    use crate::{smartcontracts::ValidQuery, wsv::WorldStateView};

    impl ValidQuery for FindAllAccounts {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv
                .domains()
                .flat_map(|domain| domain.accounts())
                .cloned()
                .collect())
        }
    }

    impl ValidQuery for FindAccountById {
        fn execute(&self, wsv: &WorldStateView) -> Result<Account, QueryExecutionFail> {
            Ok(wsv.account(&self.id)?.clone())
        }
    }

    impl ValidQuery for FindAccountsByDomainId {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv.domain(&self.domain_id)?.accounts().cloned().collect())
        }
    }

    impl ValidQuery for FindAllAssetsDefinitions {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv
                .domains()
                .flat_map(|domain| domain.asset_definitions())
                .cloned()
                .collect())
        }
    }

    impl ValidQuery for FindAssetDefinitionById {
        fn execute(&self, wsv: &WorldStateView) -> Result<AssetDefinition, QueryExecutionFail> {
            Ok(wsv.asset_definition(&self.id)?.clone())
        }
    }
}
