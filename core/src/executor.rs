//! Permission validation of instructions, applied before execution.
//!
//! Ownership always implies the corresponding ability; permission
//! tokens extend it to non-owners. Registering a trigger for one's own
//! authority deliberately requires no permission at all.

use takara_data_model::{
    account::AccountId,
    asset::{AssetDefinitionId, AssetId},
    isi::error::ValidationFail,
    isi::{
        AssetBurnBox, AssetMintBox, BurnBox, Grant, InstructionBox, MintBox, RegisterBox, Revoke,
        UnregisterBox,
    },
    permission::Permission,
    trigger::TriggerId,
};

use crate::wsv::WorldStateView;

/// Check whether `authority` may apply `instruction` to `wsv`.
///
/// # Errors
/// Returns the denial reason if not.
pub fn validate(
    authority: &AccountId,
    instruction: &InstructionBox,
    wsv: &WorldStateView,
) -> Result<(), ValidationFail> {
    match instruction {
        InstructionBox::Register(register) => match register {
            RegisterBox::Trigger(isi) => {
                validate_trigger_registration(authority, &isi.object.action.authority, wsv)
            }
            RegisterBox::Asset(isi) => {
                validate_asset_registration(authority, &isi.object.id, wsv)
            }
            // Open world: anyone may carve out new domains, accounts
            // and definitions.
            RegisterBox::Domain(_) | RegisterBox::Account(_) | RegisterBox::AssetDefinition(_) => {
                Ok(())
            }
        },
        InstructionBox::Unregister(unregister) => match unregister {
            UnregisterBox::Trigger(isi) => validate_trigger_access(
                authority,
                &isi.object_id,
                Permission::CanUnregisterTrigger(isi.object_id.clone()),
                wsv,
                "unregister",
            ),
            UnregisterBox::Asset(isi) => validate_asset_access(authority, &isi.object_id, wsv),
            UnregisterBox::Domain(_)
            | UnregisterBox::Account(_)
            | UnregisterBox::AssetDefinition(_) => Ok(()),
        },
        InstructionBox::Mint(mint) => match mint {
            MintBox::Asset(AssetMintBox::Quantity(isi)) => validate_asset_supply_change(
                authority,
                &isi.destination_id,
                wsv,
                Permission::CanMintAssetWithDefinition(isi.destination_id.definition_id.clone()),
            ),
            MintBox::Asset(AssetMintBox::BigQuantity(isi)) => validate_asset_supply_change(
                authority,
                &isi.destination_id,
                wsv,
                Permission::CanMintAssetWithDefinition(isi.destination_id.definition_id.clone()),
            ),
            MintBox::TriggerRepetitions(isi) => validate_trigger_access(
                authority,
                &isi.destination_id,
                Permission::CanModifyTriggerRepetitions(isi.destination_id.clone()),
                wsv,
                "extend",
            ),
        },
        InstructionBox::Burn(burn) => match burn {
            BurnBox::Asset(AssetBurnBox::Quantity(isi)) => validate_asset_supply_change(
                authority,
                &isi.destination_id,
                wsv,
                Permission::CanBurnAssetWithDefinition(isi.destination_id.definition_id.clone()),
            ),
            BurnBox::Asset(AssetBurnBox::BigQuantity(isi)) => validate_asset_supply_change(
                authority,
                &isi.destination_id,
                wsv,
                Permission::CanBurnAssetWithDefinition(isi.destination_id.definition_id.clone()),
            ),
            BurnBox::TriggerRepetitions(isi) => validate_trigger_access(
                authority,
                &isi.destination_id,
                Permission::CanModifyTriggerRepetitions(isi.destination_id.clone()),
                wsv,
                "shorten",
            ),
        },
        InstructionBox::SetKeyValue(isi) => validate_asset_access(authority, &isi.object_id, wsv),
        InstructionBox::RemoveKeyValue(isi) => {
            validate_asset_access(authority, &isi.object_id, wsv)
        }
        InstructionBox::Grant(Grant { object, .. })
        | InstructionBox::Revoke(Revoke { object, .. }) => {
            validate_permission_delegation(authority, object, wsv)
        }
        InstructionBox::ExecuteTrigger(isi) => validate_trigger_access(
            authority,
            &isi.trigger_id,
            Permission::CanExecuteTrigger(isi.trigger_id.clone()),
            wsv,
            "execute",
        ),
    }
}

/// Registering a trigger under one's own authority is free of any
/// permission requirement. Registering on behalf of someone else needs
/// a token from them.
fn validate_trigger_registration(
    authority: &AccountId,
    action_authority: &AccountId,
    wsv: &WorldStateView,
) -> Result<(), ValidationFail> {
    if authority == action_authority {
        return Ok(());
    }
    // The token is checked against the account the trigger would act
    // for, not against any current trigger owner.
    let token = Permission::CanRegisterTriggerForAccount(action_authority.clone());
    if wsv.has_permission(authority, &token) {
        return Ok(());
    }
    Err(ValidationFail::NotPermitted(format!(
        "Can't register a trigger acting on behalf of `{action_authority}`"
    )))
}

fn is_trigger_owner(
    trigger_id: &TriggerId,
    authority: &AccountId,
    wsv: &WorldStateView,
) -> bool {
    wsv.triggers()
        .inspect(trigger_id, |action| action.authority == *authority)
        .unwrap_or(false)
}

fn validate_trigger_access(
    authority: &AccountId,
    trigger_id: &TriggerId,
    token: Permission,
    wsv: &WorldStateView,
    verb: &str,
) -> Result<(), ValidationFail> {
    if is_trigger_owner(trigger_id, authority, wsv) {
        return Ok(());
    }
    if wsv.has_permission(authority, &token) {
        return Ok(());
    }
    Err(ValidationFail::NotPermitted(format!(
        "Can't {verb} trigger `{trigger_id}` owned by another account"
    )))
}

fn is_definition_owner(
    definition_id: &AssetDefinitionId,
    authority: &AccountId,
    wsv: &WorldStateView,
) -> bool {
    wsv.asset_definition(definition_id)
        .map(|definition| definition.owned_by == *authority)
        .unwrap_or(false)
}

/// Registering or unregistering a concrete asset: the holding account
/// itself, the definition owner, or a token holder.
fn validate_asset_registration(
    authority: &AccountId,
    asset_id: &AssetId,
    wsv: &WorldStateView,
) -> Result<(), ValidationFail> {
    if is_definition_owner(&asset_id.definition_id, authority, wsv) {
        return Ok(());
    }
    let token = Permission::CanRegisterAssetWithDefinition(asset_id.definition_id.clone());
    if *authority == asset_id.account_id && wsv.has_permission(authority, &token) {
        return Ok(());
    }
    Err(ValidationFail::NotPermitted(format!(
        "Can't register `{asset_id}` under a definition owned by another account"
    )))
}

/// Touching an existing asset entry (unregister, store mutation): the
/// holder or the definition owner.
fn validate_asset_access(
    authority: &AccountId,
    asset_id: &AssetId,
    wsv: &WorldStateView,
) -> Result<(), ValidationFail> {
    if *authority == asset_id.account_id {
        return Ok(());
    }
    if is_definition_owner(&asset_id.definition_id, authority, wsv) {
        return Ok(());
    }
    Err(ValidationFail::NotPermitted(format!(
        "Can't touch `{asset_id}` held by another account"
    )))
}

/// Changing an asset's supply: the definition owner or a token holder.
fn validate_asset_supply_change(
    authority: &AccountId,
    asset_id: &AssetId,
    wsv: &WorldStateView,
    token: Permission,
) -> Result<(), ValidationFail> {
    if is_definition_owner(&asset_id.definition_id, authority, wsv) {
        return Ok(());
    }
    if wsv.has_permission(authority, &token) {
        return Ok(());
    }
    Err(ValidationFail::NotPermitted(format!(
        "Can't change the supply of `{asset_id}`: the definition is owned by another account"
    )))
}

/// Only the owner of the entity a token refers to may grant or revoke
/// that token.
fn validate_permission_delegation(
    authority: &AccountId,
    permission: &Permission,
    wsv: &WorldStateView,
) -> Result<(), ValidationFail> {
    let owns_referent = match permission {
        Permission::CanRegisterTriggerForAccount(account) => account == authority,
        Permission::CanExecuteTrigger(trigger_id)
        | Permission::CanUnregisterTrigger(trigger_id)
        | Permission::CanModifyTriggerRepetitions(trigger_id) => {
            is_trigger_owner(trigger_id, authority, wsv)
        }
        Permission::CanRegisterAssetWithDefinition(definition_id)
        | Permission::CanMintAssetWithDefinition(definition_id)
        | Permission::CanBurnAssetWithDefinition(definition_id) => {
            is_definition_owner(definition_id, authority, wsv)
        }
    };
    if owns_referent {
        Ok(())
    } else {
        Err(ValidationFail::NotPermitted(format!(
            "Can't delegate `{permission}`: the referent is owned by another account"
        )))
    }
}
