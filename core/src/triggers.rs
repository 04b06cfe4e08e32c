//! Trigger logic. Instead of defining a trigger as a standalone entity,
//! we provide a collection of triggers as the smallest unit: filters
//! are bucketed by the class of events they observe, so matching an
//! event only walks the bucket that can possibly care about it.

use std::{collections::BTreeMap, mem};

use takara_data_model::{
    events::{DataEvent, EventBox, EventFilter, EventFilterBox, ExecuteTriggerEvent},
    isi::error::{
        FindError, InstructionExecutionError, InstructionType, MathError, RepetitionError,
    },
    trigger::{action::Action, action::Repeats, Trigger, TriggerId},
    IdBox,
};

/// Class of events a registered trigger listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggeringEventType {
    /// Data events emitted by committed instructions.
    Data,
    /// Explicit `ExecuteTrigger` requests.
    ExecuteTrigger,
}

/// Specialized structure that maps event filters to triggers.
#[derive(Debug, Clone, Default)]
pub struct TriggerSet {
    /// Triggers using a [`DataEventFilter`](takara_data_model::events::DataEventFilter).
    data_triggers: BTreeMap<TriggerId, Action>,
    /// Triggers using an [`ExecuteTriggerEventFilter`](takara_data_model::events::ExecuteTriggerEventFilter).
    by_call_triggers: BTreeMap<TriggerId, Action>,
    /// Trigger ids with the class of events they process.
    ids: BTreeMap<TriggerId, TriggeringEventType>,
    /// Actions matched by events of the transaction being processed,
    /// in match order.
    matched_ids: Vec<(EventBox, TriggerId)>,
}

impl TriggerSet {
    /// Add a trigger, bucketing it by its filter class.
    ///
    /// # Errors
    /// If a trigger with the same id already exists, in any bucket.
    pub fn add(&mut self, trigger: Trigger) -> Result<(), RepetitionError> {
        if self.contains(&trigger.id) {
            return Err(RepetitionError {
                instruction: InstructionType::Register,
                id: IdBox::TriggerId(trigger.id),
            });
        }

        let event_type = match &trigger.action.filter {
            EventFilterBox::Data(_) => TriggeringEventType::Data,
            EventFilterBox::ExecuteTrigger(_) => TriggeringEventType::ExecuteTrigger,
        };
        match event_type {
            TriggeringEventType::Data => {
                self.data_triggers.insert(trigger.id.clone(), trigger.action)
            }
            TriggeringEventType::ExecuteTrigger => self
                .by_call_triggers
                .insert(trigger.id.clone(), trigger.action),
        };
        self.ids.insert(trigger.id, event_type);
        Ok(())
    }

    /// Check if the set contains a trigger with the given id.
    pub fn contains(&self, id: &TriggerId) -> bool {
        self.ids.contains_key(id)
    }

    /// Get all contained trigger ids, in id order.
    pub fn ids(&self) -> Vec<TriggerId> {
        self.ids.keys().cloned().collect()
    }

    /// Apply `f` to the trigger identified by `id`.
    ///
    /// # Errors
    /// If the set does not contain a trigger with the given id.
    pub fn inspect<F, R>(&self, id: &TriggerId, f: F) -> Result<R, FindError>
    where
        F: FnOnce(&Action) -> R,
    {
        self.action(id).map(f).ok_or_else(|| FindError::Trigger(id.clone()))
    }

    fn action(&self, id: &TriggerId) -> Option<&Action> {
        match self.ids.get(id)? {
            TriggeringEventType::Data => self.data_triggers.get(id),
            TriggeringEventType::ExecuteTrigger => self.by_call_triggers.get(id),
        }
    }

    fn action_mut(&mut self, id: &TriggerId) -> Option<&mut Action> {
        match self.ids.get(id)? {
            TriggeringEventType::Data => self.data_triggers.get_mut(id),
            TriggeringEventType::ExecuteTrigger => self.by_call_triggers.get_mut(id),
        }
    }

    /// Remove a trigger from the set.
    ///
    /// # Errors
    /// If the set does not contain a trigger with the given id.
    pub fn remove(&mut self, id: &TriggerId) -> Result<(), FindError> {
        match self.ids.remove(id) {
            Some(TriggeringEventType::Data) => {
                self.data_triggers.remove(id);
                Ok(())
            }
            Some(TriggeringEventType::ExecuteTrigger) => {
                self.by_call_triggers.remove(id);
                Ok(())
            }
            None => Err(FindError::Trigger(id.clone())),
        }
    }

    /// Modify the remaining repetitions of the trigger identified by
    /// `id`.
    ///
    /// # Errors
    /// - If the trigger is not found.
    /// - If the trigger repeats indefinitely: there is no count to
    ///   modify, reported as an overflow like any other unrepresentable
    ///   result of `f`.
    pub fn mod_repeats(
        &mut self,
        id: &TriggerId,
        f: impl FnOnce(u32) -> Result<u32, MathError>,
    ) -> Result<(), InstructionExecutionError> {
        let action = self
            .action_mut(id)
            .ok_or_else(|| FindError::Trigger(id.clone()))?;
        match action.repeats {
            Repeats::Exactly(repeats) => {
                action.repeats = Repeats::Exactly(f(repeats)?);
                Ok(())
            }
            Repeats::Indefinitely => Err(MathError::Overflow.into()),
        }
    }

    /// Find every data trigger matched by `event` and queue its action
    /// for [`extract_matched_ids`](Self::extract_matched_ids).
    pub fn handle_data_event(&mut self, event: &DataEvent) {
        let mut matched = Vec::new();
        for (id, action) in &self.data_triggers {
            if Self::exhausted(action) {
                continue;
            }
            if let EventFilterBox::Data(filter) = &action.filter {
                if filter.matches(event) {
                    matched.push((EventBox::Data(event.clone()), id.clone()));
                }
            }
        }
        self.matched_ids.extend(matched);
    }

    /// Find every by-call trigger matched by `event` and queue its
    /// action for [`extract_matched_ids`](Self::extract_matched_ids).
    pub fn handle_execute_trigger_event(&mut self, event: &ExecuteTriggerEvent) {
        let mut matched = Vec::new();
        for (id, action) in &self.by_call_triggers {
            if Self::exhausted(action) {
                continue;
            }
            if let EventFilterBox::ExecuteTrigger(filter) = &action.filter {
                if filter.matches(event) {
                    matched.push((EventBox::ExecuteTrigger(event.clone()), id.clone()));
                }
            }
        }
        self.matched_ids.extend(matched);
    }

    /// Drain the queue of matched actions, in match order.
    pub fn extract_matched_ids(&mut self) -> Vec<(EventBox, TriggerId)> {
        mem::take(&mut self.matched_ids)
    }

    /// Decrement the remaining repetitions of a counted trigger after a
    /// successful execution. Indefinitely repeating triggers are left
    /// alone.
    pub fn decrease_repeats(&mut self, id: &TriggerId) {
        if let Some(action) = self.action_mut(id) {
            if let Repeats::Exactly(repeats) = action.repeats {
                action.repeats = Repeats::Exactly(repeats.saturating_sub(1));
            }
        }
    }

    /// Sweep triggers which have no repetitions left.
    pub fn remove_zeros(&mut self) {
        let to_remove: Vec<TriggerId> = self
            .data_triggers
            .iter()
            .chain(self.by_call_triggers.iter())
            .filter_map(|(id, action)| Self::exhausted(action).then(|| id.clone()))
            .collect();

        for id in to_remove {
            let _result = self.remove(&id);
        }
    }

    fn exhausted(action: &Action) -> bool {
        matches!(action.repeats, Repeats::Exactly(0))
    }
}

#[cfg(test)]
mod tests {
    use takara_data_model::prelude::*;
    use takara_test_samples::ALICE_ID;

    use super::*;

    fn by_call_trigger(name: &str) -> Trigger {
        let id: TriggerId = name.parse().expect("Valid");
        let asset_id: AssetId = format!("rose##{}", ALICE_ID.clone()).parse().expect("Valid");
        Trigger::new(
            id.clone(),
            Action::new(
                [Mint::asset_quantity(1_u32, asset_id)],
                Repeats::Indefinitely,
                ALICE_ID.clone(),
                ExecuteTriggerEventFilter::new().for_trigger(id),
            ),
        )
    }

    #[test]
    fn duplicate_ids_are_rejected_across_buckets() {
        let mut set = TriggerSet::default();
        set.add(by_call_trigger("mint_rose")).expect("First");

        let mut data_variant = by_call_trigger("mint_rose");
        data_variant.action.filter = TriggerEventFilter::new().into();
        assert!(matches!(
            set.add(data_variant),
            Err(RepetitionError {
                instruction: InstructionType::Register,
                ..
            })
        ));
    }

    #[test]
    fn matching_queues_in_match_order() {
        let mut set = TriggerSet::default();
        set.add(by_call_trigger("first")).expect("Valid");
        set.add(by_call_trigger("second")).expect("Valid");

        let event = ExecuteTriggerEvent {
            trigger_id: "first".parse().expect("Valid"),
            authority: ALICE_ID.clone(),
        };
        set.handle_execute_trigger_event(&event);

        let matched = set.extract_matched_ids();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1, "first".parse().expect("Valid"));
        assert!(set.extract_matched_ids().is_empty());
    }

    #[test]
    fn exhausted_triggers_stop_matching_and_get_swept() {
        let mut set = TriggerSet::default();
        let mut trigger = by_call_trigger("oneshot");
        trigger.action.repeats = Repeats::Exactly(1);
        let id = trigger.id.clone();
        set.add(trigger).expect("Valid");

        set.decrease_repeats(&id);
        let event = ExecuteTriggerEvent {
            trigger_id: id.clone(),
            authority: ALICE_ID.clone(),
        };
        set.handle_execute_trigger_event(&event);
        assert!(set.extract_matched_ids().is_empty());

        set.remove_zeros();
        assert!(!set.contains(&id));
    }

    #[test]
    fn mod_repeats_rejects_indefinite_triggers() {
        let mut set = TriggerSet::default();
        let trigger = by_call_trigger("unlimited");
        let id = trigger.id.clone();
        set.add(trigger).expect("Valid");

        assert!(matches!(
            set.mod_repeats(&id, |n| n.checked_add(1).ok_or(MathError::Overflow)),
            Err(InstructionExecutionError::Math(MathError::Overflow))
        ));
    }
}
