//! Builder for self-contained test ledgers, pre-populated the way the
//! integration suites expect: a `genesis` domain holding the genesis
//! account, and a `wonderland` domain with Alice, Bob and Alice's
//! `rose` asset.

use color_eyre::eyre::{eyre, Result};
use takara_client::{prelude::Client, Configuration};
use takara_core::{Config, Ledger, World, WorldStateView};
use takara_crypto::KeyPair;
use takara_data_model::{
    account::{Account, AccountId},
    asset::{Asset, AssetDefinition},
    domain::Domain,
    prelude::*,
};
use takara_test_samples::{ALICE_ID, ALICE_KEYPAIR, BOB_ID, GENESIS_ID, GENESIS_KEYPAIR};

/// How many roses Alice starts with.
const ALICE_INITIAL_ROSES: u32 = 13;

/// A running in-process ledger.
pub struct Network {
    ledger: Ledger,
}

/// Builder of a [`Network`].
#[derive(Default)]
pub struct NetworkBuilder {
    config: Option<Config>,
    extra_domains: Vec<Domain>,
}

impl NetworkBuilder {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the core configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Register an extra domain next to the standard ones.
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.extra_domains.push(domain);
        self
    }

    /// Start the ledger with the standard genesis population.
    ///
    /// # Errors
    /// Fails if an extra domain collides with the standard ones.
    pub fn start(self) -> Result<Network> {
        takara_logger::init_test_logger();

        let mut genesis = Domain::new("genesis".parse()?).build();
        genesis.add_account(Account::new(GENESIS_ID.clone()).build());

        let mut wonderland = Domain::new("wonderland".parse()?).build();
        wonderland.add_account(Account::new(ALICE_ID.clone()).build());
        wonderland.add_account(Account::new(BOB_ID.clone()).build());
        let rose_definition_id = "rose#wonderland".parse()?;
        wonderland.define_asset(
            AssetDefinition::quantity(rose_definition_id).build(ALICE_ID.clone()),
        );
        let alice = wonderland
            .account_mut(&ALICE_ID)
            .expect("Alice was added just above");
        alice.add_asset(Asset::new(
            format!("rose##{}", ALICE_ID.clone()).parse()?,
            ALICE_INITIAL_ROSES,
        ));

        let mut domains = vec![genesis, wonderland];
        for extra in self.extra_domains {
            if domains.iter().any(|domain| domain.id == extra.id) {
                return Err(eyre!("Domain `{}` is already part of the genesis", extra.id));
            }
            domains.push(extra);
        }

        let config = self.config.unwrap_or_default();
        let wsv = WorldStateView::from_configuration(config, World::with(domains));
        Ok(Network {
            ledger: Ledger::new(wsv),
        })
    }
}

impl Network {
    /// Handle on the underlying ledger.
    pub fn ledger(&self) -> Ledger {
        self.ledger.clone()
    }

    /// A client acting for Alice, the all-purpose test authority.
    pub fn client(&self) -> Client {
        self.client_for(&ALICE_KEYPAIR, ALICE_ID.clone())
            .expect("The sample key pairs match their accounts")
    }

    /// A client acting for the genesis account.
    pub fn genesis_client(&self) -> Client {
        self.client_for(&GENESIS_KEYPAIR, GENESIS_ID.clone())
            .expect("The sample key pairs match their accounts")
    }

    /// A client acting for an arbitrary account.
    ///
    /// # Errors
    /// Fails if `key_pair` does not match the account's signatory.
    pub fn client_for(&self, key_pair: &KeyPair, account_id: AccountId) -> Result<Client> {
        let configuration = Configuration::for_account(key_pair, account_id);
        Ok(Client::new(&configuration, self.ledger())?)
    }
}

#[cfg(test)]
mod tests {
    use takara_data_model::query::{FindAccountById, FindAssetById};

    use super::*;

    #[test]
    fn standard_population_is_reachable() {
        let network = NetworkBuilder::new().start().expect("Valid");
        let client = network.client();

        client
            .request(FindAccountById::new(GENESIS_ID.clone()))
            .expect("Genesis account exists");
        let roses = client
            .request(FindAssetById::new(
                format!("rose##{}", ALICE_ID.clone()).parse().expect("Valid"),
            ))
            .expect("Alice holds roses");
        assert_eq!(*roses.value(), AssetValue::Quantity(ALICE_INITIAL_ROSES));
    }

    #[test]
    fn extra_domains_cannot_shadow_standard_ones() {
        let clash = Domain::new("wonderland".parse().expect("Valid")).build();
        assert!(NetworkBuilder::new().with_domain(clash).start().is_err());
    }
}
