//! This module provides the [`WorldStateView`] — an in-memory
//! representation of the current ledger state.

use serde::{Deserialize, Serialize};
use takara_data_model::{
    account::{Account, AccountId},
    asset::{Asset, AssetDefinition, AssetDefinitionId, AssetId, AssetValue},
    domain::{Domain, DomainId, DomainsMap},
    events::{AssetEvent, EventBox},
    isi::error::{FindError, InstructionExecutionError, ValidationFail},
    isi::InstructionBox,
    metadata::MetadataLimits,
    permission::{Permission, Permissions},
    transaction::{
        InstructionExecutionFail, TransactionLimitError, TransactionLimits,
        TransactionRejectionReason,
    },
    trigger::{action::Action, action::Repeats, TriggerId},
};
use takara_logger::prelude::*;

use crate::{executor, smartcontracts::Execute, triggers::TriggerSet};

use std::collections::BTreeMap;

/// Rounds of trigger matching processed per transaction. One round for
/// the transaction's own events, one for events the matched triggers
/// emitted; a self-recursive trigger therefore runs once per submission.
const TRIGGER_CASCADE_ROUNDS: usize = 2;

/// Configuration of the world state view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Limits the metadata of an asset store must respect.
    pub asset_metadata_limits: MetadataLimits,
    /// Limits the metadata of accounts, domains and definitions must
    /// respect.
    pub entity_metadata_limits: MetadataLimits,
    /// Limits every transaction must respect.
    pub transaction_limits: TransactionLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_metadata_limits: MetadataLimits::default(),
            entity_metadata_limits: MetadataLimits::default(),
            transaction_limits: TransactionLimits::default(),
        }
    }
}

/// The global entity consisting of `domains`, `triggers` and
/// `permissions`. Registration of a domain, for example, has this as
/// its target.
#[derive(Debug, Default, Clone)]
pub struct World {
    /// Registered domains.
    pub(crate) domains: DomainsMap,
    /// Registered triggers.
    pub(crate) triggers: TriggerSet,
    /// Permission tokens of accounts.
    pub(crate) account_permissions: BTreeMap<AccountId, Permissions>,
}

impl World {
    /// Creates an empty `World`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`World`] populated with these [`Domain`]s.
    pub fn with<D>(domains: D) -> Self
    where
        D: IntoIterator<Item = Domain>,
    {
        let domains = domains
            .into_iter()
            .map(|domain| (domain.id.clone(), domain))
            .collect();
        World {
            domains,
            ..World::new()
        }
    }
}

/// A failure of a trigger activated by a committed transaction. The
/// transaction stands; the trigger's own effects were rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerExecutionError {
    /// The validator vetoed an instruction of the trigger's executable.
    #[error("Trigger instruction vetoed: {0}")]
    Validation(#[from] ValidationFail),
    /// An instruction of the trigger's executable failed.
    #[error("Trigger instruction failed: {0}")]
    Execution(#[from] InstructionExecutionError),
}

/// Current state of the ledger.
#[derive(Debug, Clone)]
pub struct WorldStateView {
    /// The world: domains, triggers, permissions.
    pub world: World,
    /// Configuration of the world state view.
    pub config: Config,
    /// Buffer of events generated by the transaction currently being
    /// applied. Drained by trigger matching.
    events_buffer: Vec<EventBox>,
}

impl WorldStateView {
    /// Construct a [`WorldStateView`] with a given [`World`] and the
    /// default configuration.
    pub fn new(world: World) -> Self {
        Self::from_configuration(Config::default(), world)
    }

    /// Construct a [`WorldStateView`] with a given [`World`] and
    /// [`Config`].
    pub fn from_configuration(config: Config, world: World) -> Self {
        Self {
            world,
            config,
            events_buffer: Vec::new(),
        }
    }

    /// Push `event` onto the buffer processed by trigger matching.
    pub fn emit(&mut self, event: impl Into<EventBox>) {
        self.events_buffer.push(event.into());
    }

    /// Registered triggers.
    pub fn triggers(&self) -> &TriggerSet {
        &self.world.triggers
    }

    /// Registered triggers, mutably.
    pub fn triggers_mut(&mut self) -> &mut TriggerSet {
        &mut self.world.triggers
    }

    /// Get the [`Domain`] identified by `id`.
    ///
    /// # Errors
    /// Fails if there is no such domain.
    pub fn domain(&self, id: &DomainId) -> Result<&Domain, FindError> {
        self.world
            .domains
            .get(id)
            .ok_or_else(|| FindError::Domain(id.clone()))
    }

    /// Get the [`Domain`] identified by `id`, mutably.
    ///
    /// # Errors
    /// Fails if there is no such domain.
    pub fn domain_mut(&mut self, id: &DomainId) -> Result<&mut Domain, FindError> {
        self.world
            .domains
            .get_mut(id)
            .ok_or_else(|| FindError::Domain(id.clone()))
    }

    /// Iterate over all registered domains.
    pub fn domains(&self) -> impl ExactSizeIterator<Item = &Domain> {
        self.world.domains.values()
    }

    /// Whether a domain with the given id is registered.
    pub fn has_domain(&self, id: &DomainId) -> bool {
        self.world.domains.contains_key(id)
    }

    /// Remove the [`Domain`] identified by `id` and return it.
    ///
    /// # Errors
    /// Fails if there is no such domain.
    pub fn remove_domain(&mut self, id: &DomainId) -> Result<Domain, FindError> {
        self.world
            .domains
            .remove(id)
            .ok_or_else(|| FindError::Domain(id.clone()))
    }

    /// Add `domain` to the world, replacing nothing.
    pub fn add_domain(&mut self, domain: Domain) {
        self.world.domains.insert(domain.id.clone(), domain);
    }

    /// Get the [`Account`] identified by `id`.
    ///
    /// # Errors
    /// Fails if there is no such domain or account.
    pub fn account(&self, id: &AccountId) -> Result<&Account, FindError> {
        self.domain(&id.domain_id)?
            .account(id)
            .ok_or_else(|| FindError::Account(id.clone()))
    }

    /// Get the [`Account`] identified by `id`, mutably.
    ///
    /// # Errors
    /// Fails if there is no such domain or account.
    pub fn account_mut(&mut self, id: &AccountId) -> Result<&mut Account, FindError> {
        self.domain_mut(&id.domain_id)?
            .account_mut(id)
            .ok_or_else(|| FindError::Account(id.clone()))
    }

    /// Apply `f` to the account identified by `id`.
    ///
    /// # Errors
    /// Fails if there is no such domain or account.
    pub fn map_account<T>(
        &self,
        id: &AccountId,
        f: impl FnOnce(&Account) -> T,
    ) -> Result<T, FindError> {
        self.account(id).map(f)
    }

    /// Get the [`AssetDefinition`] identified by `id`.
    ///
    /// # Errors
    /// Fails if there is no such domain or definition.
    pub fn asset_definition(
        &self,
        id: &AssetDefinitionId,
    ) -> Result<&AssetDefinition, FindError> {
        self.domain(&id.domain_id)?
            .asset_definition(id)
            .ok_or_else(|| FindError::AssetDefinition(id.clone()))
    }

    /// Get the [`AssetDefinition`] identified by `id`, mutably.
    ///
    /// # Errors
    /// Fails if there is no such domain or definition.
    pub fn asset_definition_mut(
        &mut self,
        id: &AssetDefinitionId,
    ) -> Result<&mut AssetDefinition, FindError> {
        self.domain_mut(&id.domain_id)?
            .asset_definition_mut(id)
            .ok_or_else(|| FindError::AssetDefinition(id.clone()))
    }

    /// Get the [`Asset`] identified by `id`.
    ///
    /// # Errors
    /// Fails if there is no such account or asset.
    pub fn asset(&self, id: &AssetId) -> Result<&Asset, FindError> {
        self.account(&id.account_id)?
            .asset(id)
            .ok_or_else(|| FindError::Asset(id.clone()))
    }

    /// Ensure the asset identified by `id` exists, creating it with
    /// `default_value` if it does not. Emits the creation event when it
    /// does so.
    ///
    /// # Errors
    /// Fails if the holding account or the definition is missing.
    pub fn asset_or_insert(
        &mut self,
        id: &AssetId,
        default_value: impl Into<AssetValue>,
    ) -> Result<(), InstructionExecutionError> {
        self.asset_definition(&id.definition_id)?;
        let account = self.account_mut(&id.account_id)?;
        if account.asset(id).is_none() {
            account.add_asset(Asset::new(id.clone(), default_value));
            self.emit(AssetEvent::Created(id.clone()));
        }
        Ok(())
    }

    /// Apply `f` to the asset identified by `id`.
    ///
    /// # Errors
    /// Fails if the asset is missing, or forwards the failure of `f`.
    pub fn modify_asset(
        &mut self,
        id: &AssetId,
        f: impl FnOnce(&mut Asset) -> Result<(), InstructionExecutionError>,
    ) -> Result<(), InstructionExecutionError> {
        let account = self.account_mut(&id.account_id)?;
        let asset = account
            .assets
            .get_mut(id)
            .ok_or_else(|| FindError::Asset(id.clone()))?;
        f(asset)
    }

    /// Permissions granted to `account`, not counting ownership.
    pub fn account_permissions(&self, account: &AccountId) -> impl Iterator<Item = &Permission> {
        self.world
            .account_permissions
            .get(account)
            .into_iter()
            .flatten()
    }

    /// Whether `account` holds `permission`.
    pub fn has_permission(&self, account: &AccountId, permission: &Permission) -> bool {
        self.world
            .account_permissions
            .get(account)
            .map_or(false, |permissions| permissions.contains(permission))
    }

    /// Grant `permission` to `account`. Returns `false` if the account
    /// already held it.
    pub fn grant_permission(&mut self, account: &AccountId, permission: Permission) -> bool {
        self.world
            .account_permissions
            .entry(account.clone())
            .or_default()
            .insert(permission)
    }

    /// Revoke `permission` from `account`. Returns `false` if the
    /// account did not hold it.
    pub fn revoke_permission(&mut self, account: &AccountId, permission: &Permission) -> bool {
        self.world
            .account_permissions
            .get_mut(account)
            .map_or(false, |permissions| permissions.remove(permission))
    }

    /// Apply a transaction: validate and execute every instruction on
    /// behalf of `authority`, then run the triggers its events matched.
    ///
    /// On rejection the state is left exactly as it was.
    ///
    /// # Errors
    /// Returns the rejection reason if a limit, the validator, or an
    /// instruction failed.
    pub fn apply_transaction(
        &mut self,
        authority: &AccountId,
        instructions: Vec<InstructionBox>,
    ) -> Result<Vec<(TriggerId, TriggerExecutionError)>, TransactionRejectionReason> {
        let limits = self.config.transaction_limits;
        if instructions.len() as u64 > limits.max_instruction_number {
            return Err(TransactionLimitError {
                reason: format!(
                    "Too many instructions in the transaction: {} given, {} allowed",
                    instructions.len(),
                    limits.max_instruction_number
                ),
            }
            .into());
        }

        let backup = self.clone();
        for instruction in instructions {
            trace!(%instruction, %authority, "Executing");
            if let Err(rejection) = self.apply_instruction(authority, instruction) {
                *self = backup;
                return Err(rejection);
            }
        }
        Ok(self.process_triggers())
    }

    fn apply_instruction(
        &mut self,
        authority: &AccountId,
        instruction: InstructionBox,
    ) -> Result<(), TransactionRejectionReason> {
        executor::validate(authority, &instruction, self)
            .map_err(TransactionRejectionReason::Validation)?;
        instruction
            .clone()
            .execute(authority, self)
            .map_err(|error| InstructionExecutionFail::new(instruction, &error).into())
    }

    /// Run every trigger matched by the buffered events. Bounded to
    /// [`TRIGGER_CASCADE_ROUNDS`] rounds of matching, so recursive
    /// triggers cannot spin the ledger forever.
    fn process_triggers(&mut self) -> Vec<(TriggerId, TriggerExecutionError)> {
        let mut reports = Vec::new();
        for _round in 0..TRIGGER_CASCADE_ROUNDS {
            let events: Vec<EventBox> = self.events_buffer.drain(..).collect();
            if events.is_empty() {
                break;
            }
            for event in &events {
                match event {
                    EventBox::Data(data_event) => {
                        self.world.triggers.handle_data_event(data_event);
                    }
                    EventBox::ExecuteTrigger(execute_event) => {
                        self.world.triggers.handle_execute_trigger_event(execute_event);
                    }
                }
            }

            for (event, id) in self.world.triggers.extract_matched_ids() {
                let Ok(action) = self.world.triggers.inspect(&id, Action::clone) else {
                    // Unregistered by an earlier trigger in this round.
                    continue;
                };
                if matches!(action.repeats, Repeats::Exactly(0)) {
                    continue;
                }
                debug!(trigger_id = %id, ?event, "Executing trigger");
                match self.execute_trigger_action(&action) {
                    Ok(()) => self.world.triggers.decrease_repeats(&id),
                    Err(error) => reports.push((id, error)),
                }
            }
            self.world.triggers.remove_zeros();
        }
        // Anything still buffered is beyond the cascade bound.
        self.events_buffer.clear();
        reports
    }

    /// Execute one trigger action atomically: all of its instructions
    /// or none.
    fn execute_trigger_action(&mut self, action: &Action) -> Result<(), TriggerExecutionError> {
        let backup_world = self.world.clone();
        let backup_events = self.events_buffer.len();
        for instruction in action.executable.instructions() {
            let result = executor::validate(&action.authority, instruction, self)
                .map_err(TriggerExecutionError::Validation)
                .and_then(|()| {
                    instruction
                        .clone()
                        .execute(&action.authority, self)
                        .map_err(TriggerExecutionError::Execution)
                });
            if let Err(error) = result {
                self.world = backup_world;
                self.events_buffer.truncate(backup_events);
                return Err(error);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use takara_data_model::prelude::*;
    use takara_test_samples::{ALICE_ID, BOB_ID};

    use super::*;

    fn world_with_alice() -> WorldStateView {
        let mut domain = Domain::new("wonderland".parse().expect("Valid")).build();
        domain.add_account(Account::new(ALICE_ID.clone()).build());
        domain.add_account(Account::new(BOB_ID.clone()).build());
        domain.define_asset(
            AssetDefinition::quantity("rose#wonderland".parse().expect("Valid"))
                .build(ALICE_ID.clone()),
        );
        WorldStateView::new(World::with([domain]))
    }

    fn rose_of(holder: &AccountId) -> AssetId {
        format!("rose##{holder}").parse().expect("Valid")
    }

    #[test]
    fn transaction_is_atomic() {
        let mut wsv = world_with_alice();
        let instructions: Vec<InstructionBox> = vec![
            Mint::asset_quantity(10_u32, rose_of(&ALICE_ID)).into(),
            // Fails: no such definition.
            Mint::asset_quantity(1_u32, format!("tulip##{}", ALICE_ID.clone()).parse().expect("Valid"))
                .into(),
        ];

        let rejection = wsv
            .apply_transaction(&ALICE_ID, instructions)
            .expect_err("Second instruction must reject the transaction");
        assert!(matches!(
            rejection,
            TransactionRejectionReason::InstructionExecution(_)
        ));
        assert!(wsv.asset(&rose_of(&ALICE_ID)).is_err());
    }

    #[test]
    fn too_many_instructions_hit_the_limit() {
        let mut wsv = world_with_alice();
        wsv.config.transaction_limits = TransactionLimits {
            max_instruction_number: 1,
        };
        let instructions: Vec<InstructionBox> = vec![
            Mint::asset_quantity(1_u32, rose_of(&ALICE_ID)).into(),
            Mint::asset_quantity(1_u32, rose_of(&ALICE_ID)).into(),
        ];
        assert!(matches!(
            wsv.apply_transaction(&ALICE_ID, instructions),
            Err(TransactionRejectionReason::LimitCheck(_))
        ));
    }

    #[test]
    fn by_call_trigger_runs_in_the_same_transaction() {
        let mut wsv = world_with_alice();
        let trigger_id: TriggerId = "mint_rose".parse().expect("Valid");
        let register = Register::trigger(Trigger::new(
            trigger_id.clone(),
            Action::new(
                [Mint::asset_quantity(1_u32, rose_of(&ALICE_ID))],
                Repeats::Indefinitely,
                ALICE_ID.clone(),
                ExecuteTriggerEventFilter::new()
                    .for_trigger(trigger_id.clone())
                    .under_authority(ALICE_ID.clone()),
            ),
        ));

        let reports = wsv
            .apply_transaction(
                &ALICE_ID,
                vec![register.into(), ExecuteTrigger::new(trigger_id).into()],
            )
            .expect("Transaction must commit");
        assert!(reports.is_empty());
        assert_eq!(
            *wsv.asset(&rose_of(&ALICE_ID)).expect("Minted").value(),
            AssetValue::Quantity(1),
        );
    }

    #[test]
    fn failing_trigger_does_not_reject_the_transaction() {
        let mut wsv = world_with_alice();
        let trigger_id: TriggerId = "bad_trigger".parse().expect("Valid");
        let register = Register::trigger(Trigger::new(
            trigger_id.clone(),
            Action::new(
                // Fails: the domain does not exist.
                [Unregister::domain("dummy".parse().expect("Valid"))],
                Repeats::Indefinitely,
                ALICE_ID.clone(),
                ExecuteTriggerEventFilter::new().for_trigger(trigger_id.clone()),
            ),
        ));

        let reports = wsv
            .apply_transaction(
                &ALICE_ID,
                vec![register.into(), ExecuteTrigger::new(trigger_id.clone()).into()],
            )
            .expect("Transaction must commit regardless");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, trigger_id);
    }

    #[test]
    fn recursive_trigger_runs_once_per_transaction() {
        let mut wsv = world_with_alice();
        let trigger_id: TriggerId = "recursive".parse().expect("Valid");
        let register = Register::trigger(Trigger::new(
            trigger_id.clone(),
            Action::new(
                [
                    InstructionBox::from(Mint::asset_quantity(1_u32, rose_of(&ALICE_ID))),
                    ExecuteTrigger::new(trigger_id.clone()).into(),
                ],
                Repeats::Indefinitely,
                ALICE_ID.clone(),
                ExecuteTriggerEventFilter::new().for_trigger(trigger_id.clone()),
            ),
        ));

        wsv.apply_transaction(
            &ALICE_ID,
            vec![register.into(), ExecuteTrigger::new(trigger_id).into()],
        )
        .expect("Transaction must commit");
        // One roses mint from the original call, one from the single
        // cascaded round.
        assert_eq!(
            *wsv.asset(&rose_of(&ALICE_ID)).expect("Minted").value(),
            AssetValue::Quantity(2),
        );
    }
}
