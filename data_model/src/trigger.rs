//! Structures, traits and impls related to `Trigger`s.

use core::{cmp, str::FromStr};

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{Identifiable, Name, ParseError, Registered};

/// Identification of a `Trigger`.
#[derive(
    Debug,
    derive_more::Display,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Constructor,
    getset::Getters,
    Decode,
    Encode,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[display(fmt = "{name}")]
#[getset(get = "pub")]
#[repr(transparent)]
pub struct TriggerId {
    /// Name given to the trigger by its creator.
    pub name: Name,
}

impl FromStr for TriggerId {
    type Err = ParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            name: Name::from_str(name)?,
        })
    }
}

/// Type which is used for registering a `Trigger`.
#[derive(
    Debug, derive_more::Display, Clone, Decode, Encode, Deserialize, Serialize,
)]
#[display(fmt = "{id}")]
pub struct Trigger {
    /// [`TriggerId`] of the [`Trigger`].
    pub id: TriggerId,
    /// Action to be performed when the trigger matches.
    pub action: action::Action,
}

id_eq_ord!(Trigger);

impl Trigger {
    /// Construct a trigger given `id` and `action`.
    pub fn new(id: TriggerId, action: action::Action) -> Self {
        Self { id, action }
    }

    /// Action to be performed when the trigger matches.
    pub fn action(&self) -> &action::Action {
        &self.action
    }
}

impl Identifiable for Trigger {
    type Id = TriggerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Registered for Trigger {
    type With = Self;
}

pub mod action {
    //! Contains the trigger action and its repetition schemes.

    use super::*;
    use crate::{account::AccountId, events::EventFilterBox, metadata::Metadata,
        transaction::Executable};

    /// Designed to differentiate between oneshot and unlimited triggers.
    /// If the trigger must run a limited number of times, it is the
    /// end-user's responsibility to unregister it afterwards.
    #[derive(Debug, Clone, PartialEq, Eq, Encode, Serialize)]
    pub struct Action {
        /// The executable linked to this action.
        pub executable: Executable,
        /// The repeating scheme of the action. It's kept as part of the
        /// action and not inside the [`Trigger`] type, so that further
        /// sanity checking can be done.
        pub repeats: Repeats,
        /// Account executing this action.
        pub authority: AccountId,
        /// Defines the events which trigger the `Action`.
        pub filter: EventFilterBox,
        /// Metadata used as persistent storage for trigger data.
        pub metadata: Metadata,
    }

    impl Action {
        /// Construct an action given `executable`, `repeats`, `authority`
        /// and `filter`.
        pub fn new(
            executable: impl Into<Executable>,
            repeats: impl Into<Repeats>,
            authority: AccountId,
            filter: impl Into<EventFilterBox>,
        ) -> Self {
            Self {
                executable: executable.into(),
                repeats: repeats.into(),
                authority,
                filter: filter.into(),
                metadata: Metadata::default(),
            }
        }

        /// Add [`Metadata`] to the action, replacing any previously
        /// defined metadata.
        #[must_use]
        pub fn with_metadata(mut self, metadata: Metadata) -> Self {
            self.metadata = metadata;
            self
        }

        /// The repeating scheme of the action.
        pub fn repeats(&self) -> Repeats {
            self.repeats
        }

        /// Account executing this action.
        pub fn authority(&self) -> &AccountId {
            &self.authority
        }

        /// Defines the events which trigger the `Action`.
        pub fn filter(&self) -> &EventFilterBox {
            &self.filter
        }

        /// The executable linked to this action.
        pub fn executable(&self) -> &Executable {
            &self.executable
        }
    }

    impl crate::HasMetadata for Action {
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }
    }

    impl PartialOrd for Action {
        fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Action {
        fn cmp(&self, other: &Self) -> cmp::Ordering {
            // Exclude the executable. When debugging and replacing
            // the trigger, its position in ordered containers should
            // not change depending on the content.
            match self.repeats.cmp(&other.repeats) {
                cmp::Ordering::Equal => {}
                ord => return ord,
            }
            self.authority.cmp(&other.authority)
        }
    }

    /// Enumeration of possible repetition schemes.
    #[derive(
        Debug, Copy, Clone, PartialEq, Eq, Decode, Encode, Deserialize, Serialize,
    )]
    pub enum Repeats {
        /// Repeat indefinitely, until the trigger is unregistered.
        Indefinitely,
        /// Repeat a set number of times.
        Exactly(u32), // If you need more, use `Indefinitely`.
    }

    impl PartialOrd for Repeats {
        fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Repeats {
        fn cmp(&self, other: &Self) -> cmp::Ordering {
            match (self, other) {
                (Repeats::Indefinitely, Repeats::Indefinitely) => cmp::Ordering::Equal,
                (Repeats::Indefinitely, Repeats::Exactly(_)) => cmp::Ordering::Greater,
                (Repeats::Exactly(_), Repeats::Indefinitely) => cmp::Ordering::Less,
                (Repeats::Exactly(l), Repeats::Exactly(r)) => l.cmp(r),
            }
        }
    }

    impl From<u32> for Repeats {
        fn from(num: u32) -> Self {
            Repeats::Exactly(num)
        }
    }

    mod candidate {
        use parity_scale_codec::Input;

        use super::*;

        /// An [`Action`] before its invariants were checked.
        #[derive(Decode, Deserialize)]
        pub(super) struct ActionCandidate {
            pub executable: Executable,
            pub repeats: Repeats,
            pub authority: AccountId,
            pub filter: EventFilterBox,
            pub metadata: Metadata,
        }

        impl ActionCandidate {
            pub(super) fn validate(self) -> Result<Action, &'static str> {
                if self.executable.is_empty() {
                    return Err("A trigger action with an empty executable would never \
                                observably run");
                }
                Ok(Action {
                    executable: self.executable,
                    repeats: self.repeats,
                    authority: self.authority,
                    filter: self.filter,
                    metadata: self.metadata,
                })
            }
        }

        impl Decode for Action {
            fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
                ActionCandidate::decode(input)?
                    .validate()
                    .map_err(Into::into)
            }
        }

        impl<'de> Deserialize<'de> for Action {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use serde::de::Error as _;

                ActionCandidate::deserialize(deserializer)?
                    .validate()
                    .map_err(D::Error::custom)
            }
        }
    }

    /// The prelude re-exports most commonly used items from this module.
    pub mod prelude {
        pub use super::{Action, Repeats};
    }
}

/// The prelude re-exports most commonly used items from this module.
pub mod prelude {
    pub use super::{action::prelude::*, Trigger, TriggerId};
}

#[cfg(test)]
mod tests {
    use super::{action::prelude::*, *};
    use crate::{events::prelude::*, isi::prelude::*};

    fn sample_authority() -> crate::account::AccountId {
        "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland"
            .parse()
            .expect("Valid")
    }

    #[test]
    fn empty_executable_is_rejected_on_deserialization() {
        let authority = sample_authority();
        let trigger_id: TriggerId = "mint_rose".parse().expect("Valid");
        let asset_id = format!("rose##{authority}").parse().expect("Valid");

        let action = Action::new(
            [Mint::asset_quantity(1_u32, asset_id)],
            Repeats::Indefinitely,
            authority.clone(),
            ExecuteTriggerEventFilter::new().for_trigger(trigger_id),
        );
        let mut json = serde_json::to_value(&action).expect("Valid");
        json["executable"] = serde_json::json!({ "Instructions": [] });

        assert!(serde_json::from_value::<Action>(json).is_err());
    }

    #[test]
    fn repeats_order_indefinitely_on_top() {
        assert!(Repeats::Indefinitely > Repeats::Exactly(u32::MAX));
        assert!(Repeats::Exactly(2) > Repeats::Exactly(1));
    }
}
