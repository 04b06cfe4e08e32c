//! World-level instructions: carving domains in and out of existence.

use takara_data_model::{
    account::AccountId,
    domain::Domain,
    events::DomainEvent,
    isi::error::{InstructionExecutionError, InstructionType, RepetitionError},
    isi::{Register, Unregister},
    IdBox,
};

use crate::{smartcontracts::Execute, wsv::WorldStateView};

impl Execute for Register<Domain> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        let domain = self.object.build();
        super::assert_metadata_limits(&domain.metadata, wsv.config.entity_metadata_limits)?;
        if wsv.has_domain(&domain.id) {
            return Err(RepetitionError {
                instruction: InstructionType::Register,
                id: IdBox::DomainId(domain.id),
            }
            .into());
        }

        let domain_id = domain.id.clone();
        wsv.add_domain(domain);
        wsv.emit(DomainEvent::Created(domain_id));
        Ok(())
    }
}

impl Execute for Unregister<Domain> {
    fn execute(
        self,
        _authority: &AccountId,
        wsv: &mut WorldStateView,
    ) -> Result<(), InstructionExecutionError> {
        wsv.remove_domain(&self.object_id)?;
        wsv.emit(DomainEvent::Deleted(self.object_id));
        Ok(())
    }
}

pub mod query {
    //! Queries over the set of domains.

    use takara_data_model::{
        domain::Domain,
        query::{error::QueryExecutionFail, FindAllDomains, FindDomainById},
    };

    use crate::{smartcontracts::ValidQuery, wsv::WorldStateView};

    impl ValidQuery for FindAllDomains {
        fn execute(&self, wsv: &WorldStateView) -> Result<Self::Output, QueryExecutionFail> {
            Ok(wsv.domains().cloned().collect())
        }
    }

    impl ValidQuery for FindDomainById {
        fn execute(&self, wsv: &WorldStateView) -> Result<Domain, QueryExecutionFail> {
            Ok(wsv.domain(&self.id)?.clone())
        }
    }
}
