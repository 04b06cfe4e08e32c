//! Asset lifecycle: supply changes, stores and one-shot issuance.

use eyre::Result;
use takara_data_model::prelude::*;
use takara_test_network::NetworkBuilder;
use takara_test_samples::{ALICE_ID, BOB_ID, BOB_KEYPAIR};

fn alice_rose() -> AssetId {
    format!("rose##{}", ALICE_ID.clone())
        .parse()
        .expect("Valid")
}

#[test]
fn client_can_mint_and_burn_its_own_asset() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();
    let asset_id = alice_rose();

    client.submit(Mint::asset_quantity(7_u32, asset_id.clone()))?;
    client.submit(Burn::asset_quantity(20_u32, asset_id.clone()))?;

    let asset = client.request(FindAssetById::new(asset_id))?;
    // 13 seeded + 7 minted - 20 burned.
    assert_eq!(*asset.value(), AssetValue::Quantity(0));
    Ok(())
}

#[test]
fn burning_more_than_held_is_rejected() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();
    let asset_id = alice_rose();

    let rejection = client
        .submit(Burn::asset_quantity(1_000_u32, asset_id.clone()))
        .expect_err("Nobody holds a thousand roses");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::InstructionExecution(_)
    ));
    // The failed burn left the balance alone.
    let asset = client.request(FindAssetById::new(asset_id))?;
    assert_eq!(*asset.value(), AssetValue::Quantity(13));
    Ok(())
}

#[test]
fn minting_assets_of_a_foreign_definition_requires_a_token() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let alice = network.client();
    let bob = network.client_for(&BOB_KEYPAIR, BOB_ID.clone())?;

    // Bob wants roses of his own; the definition belongs to Alice.
    let bob_rose: AssetId = format!("rose##{}", BOB_ID.clone()).parse()?;
    let rejection = bob
        .submit(Mint::asset_quantity(1_u32, bob_rose.clone()))
        .expect_err("The rose definition is Alice's");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::Validation(_)
    ));

    alice.submit(Grant::permission(
        Permission::CanMintAssetWithDefinition("rose#wonderland".parse()?),
        BOB_ID.clone(),
    ))?;
    bob.submit(Mint::asset_quantity(1_u32, bob_rose.clone()))?;

    let asset = bob.request(FindAssetById::new(bob_rose))?;
    assert_eq!(*asset.value(), AssetValue::Quantity(1));
    Ok(())
}

#[test]
fn store_assets_hold_key_value_entries() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();

    let definition_id: AssetDefinitionId = "profile#wonderland".parse()?;
    client.submit(Register::asset_definition(AssetDefinition::store(
        definition_id.clone(),
    )))?;

    let asset_id = AssetId::new(definition_id, ALICE_ID.clone());
    let key: Name = "preferred_flower".parse()?;
    client.submit(SetKeyValue::asset(asset_id.clone(), key.clone(), "rose"))?;

    let asset = client.request(FindAssetById::new(asset_id.clone()))?;
    let AssetValue::Store(store) = asset.value() else {
        panic!("Expected a store asset");
    };
    assert!(store.contains(&key));

    client.submit(RemoveKeyValue::asset(asset_id.clone(), key.clone()))?;
    let asset = client.request(FindAssetById::new(asset_id.clone()))?;
    let AssetValue::Store(store) = asset.value() else {
        panic!("Expected a store asset");
    };
    assert!(!store.contains(&key));

    // Removing a key twice surfaces the absence.
    assert!(client.submit(RemoveKeyValue::asset(asset_id, key)).is_err());
    Ok(())
}

#[test]
fn one_shot_definition_mints_exactly_once() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();

    let definition_id: AssetDefinitionId = "medal#wonderland".parse()?;
    client.submit(Register::asset_definition(
        AssetDefinition::quantity(definition_id.clone()).mintable_once(),
    ))?;

    let asset_id = AssetId::new(definition_id, ALICE_ID.clone());
    client.submit(Mint::asset_quantity(1_u32, asset_id.clone()))?;

    let rejection = client
        .submit(Mint::asset_quantity(1_u32, asset_id.clone()))
        .expect_err("The medal was already issued");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::InstructionExecution(_)
    ));
    let asset = client.request(FindAssetById::new(asset_id))?;
    assert_eq!(*asset.value(), AssetValue::Quantity(1));
    Ok(())
}

#[test]
fn unregistered_definition_takes_its_assets_along() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();
    let asset_id = alice_rose();

    client.submit(Unregister::asset_definition(
        asset_id.definition_id().clone(),
    ))?;

    assert!(client.request(FindAssetById::new(asset_id)).is_err());
    assert!(client
        .request(FindAssetDefinitionById::new("rose#wonderland".parse()?))
        .is_err());
    Ok(())
}

#[test]
fn asset_quantity_query_reports_the_numeric_value() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let client = network.client();

    let quantity = client.request(FindAssetQuantityById::new(alice_rose()))?;
    assert_eq!(quantity, NumericValue::U32(13));
    Ok(())
}
