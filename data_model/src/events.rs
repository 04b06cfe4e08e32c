//! Events emitted by committed instructions and the filters triggers
//! use to subscribe to them.

use getset::Getters;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    asset::{AssetDefinitionId, AssetId},
    domain::DomainId,
    trigger::TriggerId,
};

/// Trait for filters over a concrete event type.
pub trait EventFilter {
    /// Type of the events the filter inspects.
    type Event;

    /// Check if `event` passes the filter.
    fn matches(&self, event: &Self::Event) -> bool;
}

/// Event on a [`Domain`](crate::domain::Domain).
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum DomainEvent {
    /// The domain was registered.
    Created(DomainId),
    /// The domain was unregistered.
    Deleted(DomainId),
}

/// Kind of a [`DomainEvent`], with the payload stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum DomainEventKind {
    /// Matches [`DomainEvent::Created`].
    Created,
    /// Matches [`DomainEvent::Deleted`].
    Deleted,
}

/// Event on an [`Account`](crate::account::Account).
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AccountEvent {
    /// The account was registered.
    Created(AccountId),
    /// The account was unregistered.
    Deleted(AccountId),
    /// A permission was granted to the account.
    PermissionGranted(AccountId),
    /// A permission was revoked from the account.
    PermissionRevoked(AccountId),
}

/// Kind of an [`AccountEvent`], with the payload stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AccountEventKind {
    /// Matches [`AccountEvent::Created`].
    Created,
    /// Matches [`AccountEvent::Deleted`].
    Deleted,
    /// Matches [`AccountEvent::PermissionGranted`].
    PermissionGranted,
    /// Matches [`AccountEvent::PermissionRevoked`].
    PermissionRevoked,
}

/// Event on an [`AssetDefinition`](crate::asset::AssetDefinition).
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AssetDefinitionEvent {
    /// The definition was registered.
    Created(AssetDefinitionId),
    /// The definition was unregistered.
    Deleted(AssetDefinitionId),
}

/// Kind of an [`AssetDefinitionEvent`], with the payload stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AssetDefinitionEventKind {
    /// Matches [`AssetDefinitionEvent::Created`].
    Created,
    /// Matches [`AssetDefinitionEvent::Deleted`].
    Deleted,
}

/// Event on an [`Asset`](crate::asset::Asset).
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AssetEvent {
    /// The asset was registered.
    Created(AssetId),
    /// The asset was unregistered.
    Deleted(AssetId),
    /// Quantity was minted onto the asset.
    Added(AssetId),
    /// Quantity was burned from the asset.
    Removed(AssetId),
    /// A store entry was inserted into the asset.
    MetadataInserted(AssetId),
    /// A store entry was removed from the asset.
    MetadataRemoved(AssetId),
}

/// Kind of an [`AssetEvent`], with the payload stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum AssetEventKind {
    /// Matches [`AssetEvent::Created`].
    Created,
    /// Matches [`AssetEvent::Deleted`].
    Deleted,
    /// Matches [`AssetEvent::Added`].
    Added,
    /// Matches [`AssetEvent::Removed`].
    Removed,
    /// Matches [`AssetEvent::MetadataInserted`].
    MetadataInserted,
    /// Matches [`AssetEvent::MetadataRemoved`].
    MetadataRemoved,
}

/// Event on a [`Trigger`](crate::trigger::Trigger).
#[derive(Debug, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum TriggerEvent {
    /// The trigger was registered.
    Created(TriggerId),
    /// The trigger was unregistered.
    Deleted(TriggerId),
    /// Repetitions were minted onto the trigger.
    Extended(TriggerId),
    /// Repetitions were burned from the trigger.
    Shortened(TriggerId),
}

/// Kind of a [`TriggerEvent`], with the payload stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub enum TriggerEventKind {
    /// Matches [`TriggerEvent::Created`].
    Created,
    /// Matches [`TriggerEvent::Deleted`].
    Deleted,
    /// Matches [`TriggerEvent::Extended`].
    Extended,
    /// Matches [`TriggerEvent::Shortened`].
    Shortened,
}

/// Any event produced by applying instructions to the world.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum DataEvent {
    /// Domain event.
    Domain(DomainEvent),
    /// Account event.
    Account(AccountEvent),
    /// Asset definition event.
    AssetDefinition(AssetDefinitionEvent),
    /// Asset event.
    Asset(AssetEvent),
    /// Trigger event.
    Trigger(TriggerEvent),
}

/// Trigger execution event. Produced every time the `ExecuteTrigger`
/// instruction is executed.
#[derive(
    Debug, Clone, PartialEq, Eq, Getters, Decode, Encode, Deserialize, Serialize,
)]
#[getset(get = "pub")]
pub struct ExecuteTriggerEvent {
    /// Id of the trigger to be executed.
    pub trigger_id: TriggerId,
    /// Authority of the user who invoked the trigger.
    pub authority: AccountId,
}

/// Sized union of every event the ledger produces.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum EventBox {
    /// Data event.
    Data(DataEvent),
    /// Trigger execution request.
    ExecuteTrigger(ExecuteTriggerEvent),
}

impl From<DomainEvent> for EventBox {
    fn from(event: DomainEvent) -> Self {
        Self::Data(event.into())
    }
}

impl From<AccountEvent> for EventBox {
    fn from(event: AccountEvent) -> Self {
        Self::Data(event.into())
    }
}

impl From<AssetDefinitionEvent> for EventBox {
    fn from(event: AssetDefinitionEvent) -> Self {
        Self::Data(event.into())
    }
}

impl From<AssetEvent> for EventBox {
    fn from(event: AssetEvent) -> Self {
        Self::Data(event.into())
    }
}

impl From<TriggerEvent> for EventBox {
    fn from(event: TriggerEvent) -> Self {
        Self::Data(event.into())
    }
}

macro_rules! entity_filter {
    (
        $(#[$meta:meta])*
        pub struct $filter:ident {
            event: $event:ty,
            kind: $kind:ty,
            id: $id:ty,
            id_setter: $id_setter:ident,
        }
        kind_of = $kind_of:expr,
        id_of = $id_of:expr,
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Default,
            PartialEq,
            Eq,
            Decode,
            Encode,
            Deserialize,
            Serialize,
        )]
        pub struct $filter {
            /// Only match events on this entity, when set.
            pub id_matcher: Option<$id>,
            /// Only match events of this kind, when set.
            pub event_kind: Option<$kind>,
        }

        impl $filter {
            /// Create a filter accepting every event of this entity type.
            pub const fn new() -> Self {
                Self {
                    id_matcher: None,
                    event_kind: None,
                }
            }

            /// Narrow the filter to events on the given entity.
            #[must_use]
            pub fn $id_setter(mut self, id: $id) -> Self {
                self.id_matcher = Some(id);
                self
            }

            /// Narrow the filter to events of the given kind.
            #[must_use]
            pub fn for_events(mut self, kind: $kind) -> Self {
                self.event_kind = Some(kind);
                self
            }
        }

        impl EventFilter for $filter {
            type Event = $event;

            fn matches(&self, event: &Self::Event) -> bool {
                // Force the `id_of` closure to borrow its result from its
                // argument (`for<'a> Fn(&'a _) -> &'a _`); closure inference
                // alone cannot express this dependent lifetime.
                fn constrain_id_of<F>(f: F) -> F
                where
                    F: for<'a> Fn(&'a $event) -> &'a $id,
                {
                    f
                }
                #[allow(clippy::redundant_closure_call)]
                let kind: $kind = ($kind_of)(event);
                #[allow(clippy::redundant_closure_call)]
                let id: &$id = (constrain_id_of($id_of))(event);
                if let Some(expected) = &self.event_kind {
                    if *expected != kind {
                        return false;
                    }
                }
                if let Some(expected) = &self.id_matcher {
                    if expected != id {
                        return false;
                    }
                }
                true
            }
        }
    };
}

entity_filter! {
    /// Filter over [`DomainEvent`]s.
    pub struct DomainEventFilter {
        event: DomainEvent,
        kind: DomainEventKind,
        id: DomainId,
        id_setter: for_domain,
    }
    kind_of = |event: &DomainEvent| match event {
        DomainEvent::Created(_) => DomainEventKind::Created,
        DomainEvent::Deleted(_) => DomainEventKind::Deleted,
    },
    id_of = |event: &DomainEvent| match event {
        DomainEvent::Created(id) | DomainEvent::Deleted(id) => id,
    },
}

entity_filter! {
    /// Filter over [`AccountEvent`]s.
    pub struct AccountEventFilter {
        event: AccountEvent,
        kind: AccountEventKind,
        id: AccountId,
        id_setter: for_account,
    }
    kind_of = |event: &AccountEvent| match event {
        AccountEvent::Created(_) => AccountEventKind::Created,
        AccountEvent::Deleted(_) => AccountEventKind::Deleted,
        AccountEvent::PermissionGranted(_) => AccountEventKind::PermissionGranted,
        AccountEvent::PermissionRevoked(_) => AccountEventKind::PermissionRevoked,
    },
    id_of = |event: &AccountEvent| match event {
        AccountEvent::Created(id)
        | AccountEvent::Deleted(id)
        | AccountEvent::PermissionGranted(id)
        | AccountEvent::PermissionRevoked(id) => id,
    },
}

entity_filter! {
    /// Filter over [`AssetDefinitionEvent`]s.
    pub struct AssetDefinitionEventFilter {
        event: AssetDefinitionEvent,
        kind: AssetDefinitionEventKind,
        id: AssetDefinitionId,
        id_setter: for_asset_definition,
    }
    kind_of = |event: &AssetDefinitionEvent| match event {
        AssetDefinitionEvent::Created(_) => AssetDefinitionEventKind::Created,
        AssetDefinitionEvent::Deleted(_) => AssetDefinitionEventKind::Deleted,
    },
    id_of = |event: &AssetDefinitionEvent| match event {
        AssetDefinitionEvent::Created(id) | AssetDefinitionEvent::Deleted(id) => id,
    },
}

entity_filter! {
    /// Filter over [`AssetEvent`]s.
    pub struct AssetEventFilter {
        event: AssetEvent,
        kind: AssetEventKind,
        id: AssetId,
        id_setter: for_asset,
    }
    kind_of = |event: &AssetEvent| match event {
        AssetEvent::Created(_) => AssetEventKind::Created,
        AssetEvent::Deleted(_) => AssetEventKind::Deleted,
        AssetEvent::Added(_) => AssetEventKind::Added,
        AssetEvent::Removed(_) => AssetEventKind::Removed,
        AssetEvent::MetadataInserted(_) => AssetEventKind::MetadataInserted,
        AssetEvent::MetadataRemoved(_) => AssetEventKind::MetadataRemoved,
    },
    id_of = |event: &AssetEvent| match event {
        AssetEvent::Created(id)
        | AssetEvent::Deleted(id)
        | AssetEvent::Added(id)
        | AssetEvent::Removed(id)
        | AssetEvent::MetadataInserted(id)
        | AssetEvent::MetadataRemoved(id) => id,
    },
}

entity_filter! {
    /// Filter over [`TriggerEvent`]s.
    pub struct TriggerEventFilter {
        event: TriggerEvent,
        kind: TriggerEventKind,
        id: TriggerId,
        id_setter: for_trigger,
    }
    kind_of = |event: &TriggerEvent| match event {
        TriggerEvent::Created(_) => TriggerEventKind::Created,
        TriggerEvent::Deleted(_) => TriggerEventKind::Deleted,
        TriggerEvent::Extended(_) => TriggerEventKind::Extended,
        TriggerEvent::Shortened(_) => TriggerEventKind::Shortened,
    },
    id_of = |event: &TriggerEvent| match event {
        TriggerEvent::Created(id)
        | TriggerEvent::Deleted(id)
        | TriggerEvent::Extended(id)
        | TriggerEvent::Shortened(id) => id,
    },
}

/// Filter over [`DataEvent`]s.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum DataEventFilter {
    /// Accept every data event.
    #[from(ignore)]
    Any,
    /// Filter domain events.
    Domain(DomainEventFilter),
    /// Filter account events.
    Account(AccountEventFilter),
    /// Filter asset definition events.
    AssetDefinition(AssetDefinitionEventFilter),
    /// Filter asset events.
    Asset(AssetEventFilter),
    /// Filter trigger events.
    Trigger(TriggerEventFilter),
}

impl EventFilter for DataEventFilter {
    type Event = DataEvent;

    fn matches(&self, event: &DataEvent) -> bool {
        match (self, event) {
            (Self::Any, _) => true,
            (Self::Domain(filter), DataEvent::Domain(event)) => filter.matches(event),
            (Self::Account(filter), DataEvent::Account(event)) => filter.matches(event),
            (Self::AssetDefinition(filter), DataEvent::AssetDefinition(event)) => {
                filter.matches(event)
            }
            (Self::Asset(filter), DataEvent::Asset(event)) => filter.matches(event),
            (Self::Trigger(filter), DataEvent::Trigger(event)) => filter.matches(event),
            _ => false,
        }
    }
}

/// Filter for [`ExecuteTriggerEvent`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Decode, Encode, Deserialize, Serialize)]
pub struct ExecuteTriggerEventFilter {
    /// Id of the trigger to catch executions of.
    pub(crate) trigger_id: Option<TriggerId>,
    /// Authority the execution must be requested under.
    pub(crate) authority: Option<AccountId>,
}

impl ExecuteTriggerEventFilter {
    /// Creates a filter accepting all [`ExecuteTriggerEvent`]s.
    pub const fn new() -> Self {
        Self {
            trigger_id: None,
            authority: None,
        }
    }

    /// Accept only events originating from a specific trigger.
    #[must_use]
    pub fn for_trigger(mut self, trigger_id: TriggerId) -> Self {
        self.trigger_id = Some(trigger_id);
        self
    }

    /// Accept only executions requested under a specific authority.
    #[must_use]
    pub fn under_authority(mut self, authority: AccountId) -> Self {
        self.authority = Some(authority);
        self
    }
}

impl EventFilter for ExecuteTriggerEventFilter {
    type Event = ExecuteTriggerEvent;

    fn matches(&self, event: &ExecuteTriggerEvent) -> bool {
        if let Some(trigger_id) = &self.trigger_id {
            if trigger_id != &event.trigger_id {
                return false;
            }
        }
        if let Some(authority) = &self.authority {
            if authority != &event.authority {
                return false;
            }
        }
        true
    }
}

/// Sized union of every filter a trigger can subscribe with.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::From, Decode, Encode, Deserialize, Serialize,
)]
pub enum EventFilterBox {
    /// Filter over data events.
    Data(DataEventFilter),
    /// Filter over trigger execution requests.
    ExecuteTrigger(ExecuteTriggerEventFilter),
}

macro_rules! impl_into_event_filter_box {
    ($($filter:ty),+ $(,)?) => {$(
        impl From<$filter> for EventFilterBox {
            fn from(filter: $filter) -> Self {
                Self::Data(DataEventFilter::from(filter))
            }
        }
    )+};
}

impl_into_event_filter_box!(
    DomainEventFilter,
    AccountEventFilter,
    AssetDefinitionEventFilter,
    AssetEventFilter,
    TriggerEventFilter,
);

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{
        AccountEvent, AccountEventFilter, AccountEventKind, AssetDefinitionEvent,
        AssetDefinitionEventFilter, AssetDefinitionEventKind, AssetEvent, AssetEventFilter,
        AssetEventKind, DataEvent, DataEventFilter, DomainEvent, DomainEventFilter,
        DomainEventKind, EventBox, EventFilter, EventFilterBox, ExecuteTriggerEvent,
        ExecuteTriggerEventFilter, TriggerEvent, TriggerEventFilter, TriggerEventKind,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_id(domain: &str) -> AccountId {
        format!(
            "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@{domain}"
        )
        .parse()
        .expect("Valid")
    }

    #[test]
    fn account_filter_narrows_by_kind_and_id() {
        let id = account_id("wonderland");
        let other = account_id("garden");

        let any = AccountEventFilter::new();
        assert!(any.matches(&AccountEvent::Created(id.clone())));
        assert!(any.matches(&AccountEvent::Deleted(other.clone())));

        let narrowed = AccountEventFilter::new()
            .for_account(id.clone())
            .for_events(AccountEventKind::Created);
        assert!(narrowed.matches(&AccountEvent::Created(id.clone())));
        assert!(!narrowed.matches(&AccountEvent::Deleted(id)));
        assert!(!narrowed.matches(&AccountEvent::Created(other)));
    }

    #[test]
    fn data_filter_ignores_foreign_entities() {
        let filter = DataEventFilter::from(AccountEventFilter::new());
        let domain_event = DataEvent::Domain(DomainEvent::Created(
            "wonderland".parse().expect("Valid"),
        ));
        assert!(!filter.matches(&domain_event));
        assert!(DataEventFilter::Any.matches(&domain_event));
    }

    #[test]
    fn execute_trigger_filter_checks_both_fields() {
        let trigger_id: TriggerId = "mint_rose".parse().expect("Valid");
        let authority = account_id("wonderland");
        let filter = ExecuteTriggerEventFilter::new()
            .for_trigger(trigger_id.clone())
            .under_authority(authority.clone());

        assert!(filter.matches(&ExecuteTriggerEvent {
            trigger_id: trigger_id.clone(),
            authority: authority.clone(),
        }));
        assert!(!filter.matches(&ExecuteTriggerEvent {
            trigger_id,
            authority: account_id("garden"),
        }));
    }
}
