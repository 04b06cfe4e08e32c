//! Takara smart contract functionality. Special instructions are the
//! only way of mutating the [`WorldStateView`], and [`ValidQuery`]
//! implementations are the only way of reading it.

pub mod isi;

use takara_data_model::{
    account::AccountId, isi::error::InstructionExecutionError,
    query::{error::QueryExecutionFail, Query},
};

use crate::wsv::WorldStateView;

/// Trait implementations provide actions to apply changes on
/// [`WorldStateView`].
pub trait Execute {
    /// Apply this instruction to `wsv` on behalf of `authority`.
    ///
    /// # Errors
    /// Concrete to each implementer.
    fn execute(
        self,
        authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError>;
}

/// This trait should be implemented for all Takara queries.
pub trait ValidQuery: Query {
    /// Execute the query on a state snapshot.
    ///
    /// # Errors
    /// Concrete to each implementer.
    fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail>;
}
