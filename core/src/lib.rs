//! Takara's ledger core: the world state, instruction execution,
//! permission validation and trigger processing.

pub mod executor;
pub mod smartcontracts;
pub mod triggers;
pub mod wsv;

use std::sync::Arc;

use parking_lot::RwLock;
use takara_data_model::{
    account::AccountId,
    isi::InstructionBox,
    query::error::QueryExecutionFail,
    transaction::TransactionRejectionReason,
};
use takara_logger::prelude::*;

pub use crate::{
    smartcontracts::ValidQuery,
    wsv::{Config, World, WorldStateView},
};

/// Shared handle on a running ledger.
///
/// This plays the role a transport endpoint would play in a deployed
/// network: clients hold a `Ledger` and feed it transactions and
/// queries. Cloning the handle shares the underlying state.
#[derive(Clone)]
pub struct Ledger {
    wsv: Arc<RwLock<WorldStateView>>,
}

impl Ledger {
    /// Wrap `wsv` into a shareable handle.
    pub fn new(wsv: WorldStateView) -> Self {
        Self {
            wsv: Arc::new(RwLock::new(wsv)),
        }
    }

    /// Apply a transaction: the `instructions`, in order, on behalf of
    /// `authority`. Either every instruction commits or none does.
    ///
    /// Failures of triggers activated by the transaction do not reject
    /// it; they are logged and swallowed, and their own effects are
    /// rolled back.
    ///
    /// # Errors
    /// Returns the rejection reason if a limit, the validator, or an
    /// instruction failed.
    pub fn submit_transaction(
        &self,
        authority: AccountId,
        instructions: Vec<InstructionBox>,
    ) -> Result<(), TransactionRejectionReason> {
        let mut wsv = self.wsv.write();
        let trigger_reports = wsv.apply_transaction(&authority, instructions)?;
        for (trigger_id, error) in trigger_reports {
            warn!(%trigger_id, %error, "Trigger execution failed");
        }
        Ok(())
    }

    /// Run a read-only closure over the current state.
    pub fn view<T>(&self, f: impl FnOnce(&WorldStateView) -> T) -> T {
        f(&self.wsv.read())
    }

    /// Execute a typed query against the current state.
    ///
    /// # Errors
    /// Forwards the query failure.
    pub fn query<Q: ValidQuery>(&self, query: &Q) -> Result<Q::Output, QueryExecutionFail> {
        query.execute(&self.wsv.read())
    }
}

/// The prelude re-exports most commonly used items from this crate.
pub mod prelude {
    pub use super::{
        smartcontracts::{Execute, ValidQuery},
        triggers::TriggerSet,
        wsv::{Config, World, WorldStateView},
        Ledger,
    };
}
