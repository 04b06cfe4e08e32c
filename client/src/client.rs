//! Contains the [`Client`]: the facade everything outside the core uses
//! to talk to a ledger.

use eyre::{eyre, Result};
use takara_core::{Ledger, ValidQuery};
use takara_data_model::{
    account::AccountId,
    asset::{Asset, AssetDefinition, AssetDefinitionId, AssetId},
    isi::{ExecuteTrigger, InstructionBox, Register},
    metadata::Metadata,
    query::{error::QueryExecutionFail, FindAssetsByAccountId},
    transaction::{TransactionLimitError, TransactionRejectionReason},
    trigger::{action::Action, Trigger, TriggerId},
};
use takara_logger::prelude::*;

use crate::config::Configuration;

/// Client of a Takara ledger, bound to one authority.
///
/// Submitting builds a transaction out of the given instructions and
/// applies it under the configured account; querying reads a state
/// snapshot.
#[derive(Clone)]
pub struct Client {
    /// Ledger the client talks to.
    ledger: Ledger,
    /// Account under whose authority transactions are submitted.
    account_id: AccountId,
    /// Limits applied before a transaction is even handed over.
    transaction_limits: takara_data_model::transaction::TransactionLimits,
}

impl Client {
    /// Construct a [`Client`] from `configuration`, attached to
    /// `ledger`.
    ///
    /// # Errors
    /// Fails if the configured public key does not match the account's
    /// signatory: such a client could never act for the account.
    pub fn new(configuration: &Configuration, ledger: Ledger) -> Result<Self> {
        if configuration.account_id.signatory != configuration.public_key {
            return Err(eyre!(
                "The configured public key `{}` does not match the signatory of `{}`",
                configuration.public_key,
                configuration.account_id,
            ));
        }
        Ok(Self {
            ledger,
            account_id: configuration.account_id.clone(),
            transaction_limits: configuration.transaction_limits,
        })
    }

    /// The account this client acts for.
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Submit one instruction as a transaction.
    ///
    /// # Errors
    /// Returns the rejection reason if the ledger threw the transaction
    /// away.
    pub fn submit(
        &self,
        instruction: impl Into<InstructionBox>,
    ) -> Result<(), TransactionRejectionReason> {
        self.submit_all([instruction.into()])
    }

    /// Submit several instructions as one atomic transaction.
    ///
    /// # Errors
    /// Returns the rejection reason if the ledger threw the transaction
    /// away.
    pub fn submit_all(
        &self,
        instructions: impl IntoIterator<Item = InstructionBox>,
    ) -> Result<(), TransactionRejectionReason> {
        let instructions: Vec<InstructionBox> = instructions.into_iter().collect();
        if instructions.len() as u64 > self.transaction_limits.max_instruction_number {
            return Err(TransactionLimitError {
                reason: format!(
                    "Too many instructions in the transaction: {} given, {} allowed",
                    instructions.len(),
                    self.transaction_limits.max_instruction_number
                ),
            }
            .into());
        }
        trace!(authority = %self.account_id, count = instructions.len(), "Submitting");
        self.ledger
            .submit_transaction(self.account_id.clone(), instructions)
    }

    /// Execute a typed query against the ledger.
    ///
    /// # Errors
    /// Forwards the query failure.
    pub fn request<Q: ValidQuery>(&self, query: Q) -> Result<Q::Output, QueryExecutionFail> {
        self.ledger.query(&query)
    }

    /// Check whether the asset identified by `asset_id` exists.
    ///
    /// # Errors
    /// Forwards failures other than the asset simply being absent.
    pub fn has_asset(&self, asset_id: &AssetId) -> Result<bool, QueryExecutionFail> {
        use takara_data_model::isi::error::FindError;
        use takara_data_model::query::FindAssetById;

        match self.request(FindAssetById::new(asset_id.clone())) {
            Ok(_asset) => Ok(true),
            Err(QueryExecutionFail::Find(FindError::Asset(_))) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Build the canonical NFT-minting trigger for this client's
    /// account: a by-call trigger which issues the next
    /// `nft_number_<n>_for_<domain>` token to the account.
    ///
    /// # Errors
    /// Forwards the failure of the asset lookup used to pick `<n>`.
    pub fn build_nft_trigger(&self) -> Result<Trigger, QueryExecutionFail> {
        let account_id = &self.account_id;
        let held = self.request(FindAssetsByAccountId::new(account_id.clone()))?;
        let nft_number = next_nft_number(&held);

        let definition_id = AssetDefinitionId::new(
            format!("nft_number_{}_for_{}", nft_number, account_id.domain_id)
                .parse()
                .expect("Ordinals and domain names are valid name parts"),
            account_id.domain_id.clone(),
        );

        let mut definition_metadata = Metadata::new();
        definition_metadata.insert(
            format!("nft_for_{}_in_{}", account_id.signatory, account_id.domain_id)
                .parse()
                .expect("Signatories and domain names are valid name parts"),
            true,
        );

        let nft_definition = AssetDefinition::store(definition_id.clone())
            .mintable_once()
            .with_metadata(definition_metadata);
        let account_nft_id = AssetId::new(definition_id, account_id.clone());
        let account_nft = Asset::new(account_nft_id, Metadata::new());

        let trigger_id: TriggerId = format!("mint_nft_for_{}", account_id.domain_id)
            .parse()
            .expect("Domain names are valid name parts");
        Ok(Trigger::new(
            trigger_id.clone(),
            Action::new(
                [
                    InstructionBox::from(Register::asset_definition(nft_definition)),
                    Register::asset(account_nft).into(),
                ],
                1_u32,
                account_id.clone(),
                takara_data_model::events::ExecuteTriggerEventFilter::new()
                    .for_trigger(trigger_id)
                    .under_authority(account_id.clone()),
            ),
        ))
    }

    /// Register the NFT-minting trigger for this client's account and
    /// activate it, in one transaction. Returns the trigger id.
    ///
    /// No permission is required: the trigger acts for the account
    /// registering it.
    ///
    /// # Errors
    /// Forwards the lookup failure or the transaction rejection.
    pub fn register_nft_trigger(&self) -> Result<TriggerId> {
        let trigger = self.build_nft_trigger()?;
        let trigger_id = trigger.id.clone();
        debug!(%trigger_id, authority = %self.account_id, "Registering NFT trigger");
        self.submit_all([
            Register::trigger(trigger).into(),
            ExecuteTrigger::new(trigger_id.clone()).into(),
        ])?;
        Ok(trigger_id)
    }
}

/// Pick the ordinal for the next NFT among `held` assets: one past the
/// number of `nft_`-prefixed definitions already held.
fn next_nft_number(held: &[Asset]) -> usize {
    held.iter()
        .filter(|asset| asset.id.definition_id.name.as_ref().starts_with("nft_"))
        .count()
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nft_numbering_counts_only_nft_definitions() {
        let holder: AccountId =
            "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland"
                .parse()
                .expect("Valid");
        let nft = Asset::new(
            format!("nft_number_1_for_wonderland##{holder}")
                .parse()
                .expect("Valid"),
            Metadata::new(),
        );
        let rose = Asset::new(
            format!("rose##{holder}").parse().expect("Valid"),
            13_u32,
        );

        assert_eq!(next_nft_number(&[]), 1);
        assert_eq!(next_nft_number(&[rose.clone()]), 1);
        assert_eq!(next_nft_number(&[nft, rose]), 2);
    }
}
