//! Entities, instructions, events and queries of the Takara ledger.
//!
//! Everything the core executes and the client submits is defined here,
//! so that both sides of the embedded API agree on one vocabulary.

/// Implement `PartialEq`/`Eq`/`PartialOrd`/`Ord` for an entity in terms
/// of its id, so that containers never depend on payload contents.
macro_rules! id_eq_ord {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                self.id.cmp(&other.id)
            }
        }
    };
}

pub mod account;
pub mod asset;
pub mod domain;
pub mod events;
pub mod isi;
pub mod metadata;
pub mod name;
pub mod permission;
pub mod query;
pub mod transaction;
pub mod trigger;

use core::{fmt, hash::Hash};

use parity_scale_codec::{Decode, Encode};
use serde::{de::DeserializeOwned, Serialize};

pub use name::Name;
pub use takara_crypto::PublicKey;

/// Error which occurs when parsing a string into a ledger type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ParseError {
    /// Why the candidate string was rejected.
    pub reason: &'static str,
}

/// Types which have an identification.
///
/// The bounds on [`Identifiable::Id`] are what the generic instructions
/// (e.g. `Unregister<O>`) need to derive their own comparison, codec
/// and serde implementations.
pub trait Identifiable {
    /// The type of the identification.
    type Id: fmt::Debug
        + fmt::Display
        + Clone
        + PartialEq
        + Eq
        + PartialOrd
        + Ord
        + Hash
        + Encode
        + Decode
        + Serialize
        + DeserializeOwned;

    /// The identification of this entity.
    fn id(&self) -> &Self::Id;
}

/// Types which are registered on the ledger, possibly through a builder.
pub trait Registered: Identifiable {
    /// The type carried by `Register` for this entity. Entities without
    /// server-side defaults are registered as themselves.
    type With: fmt::Debug
        + Clone
        + PartialEq
        + Eq
        + Encode
        + Decode
        + Serialize
        + DeserializeOwned;
}

/// Types which carry [`Metadata`](metadata::Metadata).
pub trait HasMetadata {
    /// The metadata of this entity.
    fn metadata(&self) -> &metadata::Metadata;
}

/// Sized union of all identifications, used in errors and event payloads.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::From,
    parity_scale_codec::Decode,
    parity_scale_codec::Encode,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum IdBox {
    /// [`DomainId`](domain::DomainId) variant.
    DomainId(domain::DomainId),
    /// [`AccountId`](account::AccountId) variant.
    AccountId(account::AccountId),
    /// [`AssetDefinitionId`](asset::AssetDefinitionId) variant.
    AssetDefinitionId(asset::AssetDefinitionId),
    /// [`AssetId`](asset::AssetId) variant.
    AssetId(asset::AssetId),
    /// [`TriggerId`](trigger::TriggerId) variant.
    TriggerId(trigger::TriggerId),
}

impl fmt::Display for IdBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdBox::DomainId(id) => fmt::Display::fmt(id, f),
            IdBox::AccountId(id) => fmt::Display::fmt(id, f),
            IdBox::AssetDefinitionId(id) => fmt::Display::fmt(id, f),
            IdBox::AssetId(id) => fmt::Display::fmt(id, f),
            IdBox::TriggerId(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// The prelude re-exports most commonly used traits, structs and macros
/// from this crate.
pub mod prelude {
    pub use takara_crypto::prelude::*;

    pub use super::{
        account::prelude::*, asset::prelude::*, domain::prelude::*, events::prelude::*,
        isi::prelude::*, metadata::prelude::*, name::prelude::*, permission::prelude::*,
        query::prelude::*, transaction::prelude::*, trigger::prelude::*, HasMetadata, IdBox,
        Identifiable, ParseError, Registered,
    };
}
