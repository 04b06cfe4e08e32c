//! Account instructions: permission delegation.

use takara_data_model::{
    account::AccountId,
    events::AccountEvent,
    isi::error::{InstructionExecutionError, InstructionType, RepetitionError},
    isi::{Grant, Revoke},
    IdBox,
};

use crate::{smartcontracts::Execute, wsv::WorldStateView};

impl Execute for Grant {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        // The account must exist before it can hold tokens.
        wsv.account(&self.destination_id)?;
        if !wsv.grant_permission(&self.destination_id, self.object) {
            return Err(RepetitionError {
                instruction: InstructionType::Grant,
                id: IdBox::AccountId(self.destination_id),
            }
            .into());
        }
        wsv.emit(AccountEvent::PermissionGranted(self.destination_id));
        Ok(())
    }
}

impl Execute for Revoke {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        wsv.account(&self.destination_id)?;
        if !wsv.revoke_permission(&self.destination_id, &self.object) {
            return Err(InstructionExecutionError::InvariantViolation(format!(
                "`{}` does not hold `{}`",
                self.destination_id, self.object
            )));
        }
        wsv.emit(AccountEvent::PermissionRevoked(self.destination_id));
        Ok(())
    }
}

pub mod query {
    //! Queries over account permissions.

    use takara_data_model::query::{error::QueryExecutionFail, FindPermissionsByAccountId};

    use crate::{smartcontracts::ValidQuery, wsv::WorldStateView};

    impl ValidQuery for FindPermissionsByAccountId {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            // Querying a missing account is a find error, not an empty
            // answer.
            wsv.account(&self.id)?;
            Ok(wsv.account_permissions(&self.id).cloned().collect())
        }
    }
}
