//! The NFT-issuance story: an authorized account registers the
//! NFT-minting trigger for itself and the ledger must afterwards show
//! the issued token.

use eyre::Result;
use takara_data_model::{prelude::*, trigger::Trigger};
use takara_test_network::NetworkBuilder;
use takara_test_samples::{ALICE_ID, BOB_ID, BOB_KEYPAIR};

const GENESIS_NFT: &str = "nft_number_1_for_genesis##\
     ed0120E2ECD69DA5833EC10FB3DFAED83A07E5B9CBE9BC39484F0F7DDEC8B46253428B@genesis";

#[test]
fn register_trigger_issues_nft_to_the_authorized_account() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.genesis_client();

    // No special permission is granted anywhere: acting for oneself is
    // enough.
    client.register_nft_trigger()?;

    let asset_id: AssetId = GENESIS_NFT.parse()?;
    assert!(client.has_asset(&asset_id)?);

    let nft = client.request(FindAssetById::new(asset_id.clone()))?;
    assert!(matches!(nft.value(), AssetValue::Store(_)));

    // The definition behind the token is a consumed one-shot issuance.
    let definition =
        client.request(FindAssetDefinitionById::new(asset_id.definition_id.clone()))?;
    assert_eq!(definition.mintable, Mintable::Not);
    assert_eq!(definition.owned_by, *client.account_id());
    Ok(())
}

#[test]
fn repeated_registration_issues_the_next_ordinal() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.genesis_client();

    client.register_nft_trigger()?;
    // The one-shot trigger is spent and swept, so the name is free for
    // the next round.
    client.register_nft_trigger()?;

    let held = client.request(FindAssetsByAccountId::new(client.account_id().clone()))?;
    let mut nft_names: Vec<String> = held
        .iter()
        .map(|asset| asset.id().definition_id().name().to_string())
        .collect();
    nft_names.sort();
    assert_eq!(
        nft_names,
        ["nft_number_1_for_genesis", "nft_number_2_for_genesis"]
    );
    Ok(())
}

#[test]
fn registering_a_trigger_for_another_account_requires_a_token() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let alice = network.client();
    let bob = network.client_for(&BOB_KEYPAIR, BOB_ID.clone())?;

    // Alice tries to register a trigger acting for Bob.
    let rose_of_bob: AssetId = format!("rose##{}", BOB_ID.clone()).parse()?;
    let trigger_id: TriggerId = "mint_bob_roses".parse()?;
    let trigger = Trigger::new(
        trigger_id.clone(),
        Action::new(
            [Mint::asset_quantity(1_u32, rose_of_bob)],
            Repeats::Indefinitely,
            BOB_ID.clone(),
            ExecuteTriggerEventFilter::new().for_trigger(trigger_id),
        ),
    );

    let rejection = alice
        .submit(Register::trigger(trigger.clone()))
        .expect_err("Acting for Bob needs Bob's token");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::Validation(_)
    ));

    // With the token granted by Bob himself, the same registration
    // passes.
    bob.submit(Grant::permission(
        Permission::CanRegisterTriggerForAccount(BOB_ID.clone()),
        ALICE_ID.clone(),
    ))?;
    alice.submit(Register::trigger(trigger))?;
    Ok(())
}
