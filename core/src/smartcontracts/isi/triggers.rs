//! This module contains the trigger instructions:
//! - registering and un-registering a trigger
//! - minting and burning a trigger's repetitions
//! - requesting a trigger's execution

use takara_data_model::{
    account::AccountId,
    events::{ExecuteTriggerEvent, TriggerEvent},
    isi::error::{FindError, InstructionExecutionError, MathError},
    isi::{Burn, ExecuteTrigger, Mint, Register, Unregister},
    trigger::Trigger,
};

use crate::{smartcontracts::Execute, wsv::WorldStateView};

impl Execute for Register<Trigger> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let trigger = self.object;
        // The action authority must exist; otherwise the trigger could
        // never pass validation when it fires.
        wsv.account(&trigger.action.authority)?;
        super::assert_metadata_limits(
            &trigger.action.metadata,
            wsv.config.entity_metadata_limits,
        )?;

        let trigger_id = trigger.id.clone();
        wsv.triggers_mut().add(trigger)?;
        wsv.emit(TriggerEvent::Created(trigger_id));
        Ok(())
    }
}

impl Execute for Unregister<Trigger> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        wsv.triggers_mut().remove(&self.object_id)?;
        wsv.emit(TriggerEvent::Deleted(self.object_id));
        Ok(())
    }
}

impl Execute for Mint<Trigger, u32> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        wsv.triggers_mut().mod_repeats(&self.destination_id, |n| {
            n.checked_add(self.object).ok_or(MathError::Overflow)
        })?;
        wsv.emit(TriggerEvent::Extended(self.destination_id));
        Ok(())
    }
}

impl Execute for Burn<Trigger, u32> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        wsv.triggers_mut().mod_repeats(&self.destination_id, |n| {
            n.checked_sub(self.object).ok_or(MathError::Overflow)
        })?;
        // Triggers whose repetitions were burned to zero are swept when
        // they next come up for matching.
        wsv.emit(TriggerEvent::Shortened(self.destination_id));
        Ok(())
    }
}

impl Execute for ExecuteTrigger {
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        if !wsv.triggers().contains(&self.trigger_id) {
            return Err(FindError::Trigger(self.trigger_id).into());
        }
        wsv.emit(ExecuteTriggerEvent {
            trigger_id: self.trigger_id,
            authority: authority.clone(),
        });
        Ok(())
    }
}

pub mod query {
    //! Queries associated with triggers.

    use takara_data_model::{
        query::{error::QueryExecutionFail, FindAllActiveTriggerIds, FindTriggerById},
        trigger::Trigger,
    };

    use crate::{smartcontracts::ValidQuery, wsv::WorldStateView};

    impl ValidQuery for FindAllActiveTriggerIds {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv.triggers().ids())
        }
    }

    impl ValidQuery for FindTriggerById {
        fn execute(&self, wsv: &WorldStateView) -> Result<Trigger, QueryExecutionFail> {
            let action = wsv.triggers().inspect(&self.id, Clone::clone)?;
            Ok(Trigger::new(self.id.clone(), action))
        }
    }
}
