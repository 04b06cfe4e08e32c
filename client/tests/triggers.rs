//! Behavior of registered triggers: explicit invocation, repetition
//! accounting, ownership and data-event subscriptions.

use eyre::Result;
use takara_client::prelude::Client;
use takara_data_model::prelude::*;
use takara_test_network::NetworkBuilder;
use takara_test_samples::{gen_account_in, ALICE_ID, BOB_ID, BOB_KEYPAIR};

const TRIGGER_NAME: &str = "mint_rose";

fn alice_rose() -> AssetId {
    format!("rose##{}", ALICE_ID.clone())
        .parse()
        .expect("Valid")
}

fn get_asset_value(client: &Client, asset_id: AssetId) -> u32 {
    let asset = client
        .request(FindAssetById::new(asset_id))
        .expect("Failed to execute query");
    let AssetValue::Quantity(quantity) = asset.value() else {
        panic!("Expected a quantity asset");
    };
    *quantity
}

fn build_register_trigger_isi(
    asset_id: AssetId,
    trigger_instructions: Vec<InstructionBox>,
) -> Register<Trigger> {
    let trigger_id: TriggerId = TRIGGER_NAME.parse().expect("Valid");
    Register::trigger(Trigger::new(
        trigger_id.clone(),
        Action::new(
            trigger_instructions,
            Repeats::Indefinitely,
            asset_id.account_id().clone(),
            ExecuteTriggerEventFilter::new()
                .for_trigger(trigger_id)
                .under_authority(asset_id.account_id().clone()),
        ),
    ))
}

#[test]
fn call_execute_trigger() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let test_client = network.client();

    let asset_id = alice_rose();
    let prev_value = get_asset_value(&test_client, asset_id.clone());

    let instruction = Mint::asset_quantity(1_u32, asset_id.clone());
    let register_trigger = build_register_trigger_isi(asset_id.clone(), vec![instruction.into()]);
    test_client.submit(register_trigger)?;

    let trigger_id: TriggerId = TRIGGER_NAME.parse()?;
    test_client.submit(ExecuteTrigger::new(trigger_id))?;

    let new_value = get_asset_value(&test_client, asset_id);
    assert_eq!(new_value, prev_value + 1);
    Ok(())
}

#[test]
fn trigger_should_not_be_executed_with_zero_repeats_count() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let test_client = network.client();

    let asset_id = alice_rose();
    let trigger_id: TriggerId = "self_modifying_trigger".parse()?;

    let register_trigger = Register::trigger(Trigger::new(
        trigger_id.clone(),
        Action::new(
            [Mint::asset_quantity(1_u32, asset_id.clone())],
            1_u32,
            ALICE_ID.clone(),
            ExecuteTriggerEventFilter::new()
                .for_trigger(trigger_id.clone())
                .under_authority(ALICE_ID.clone()),
        ),
    ));
    test_client.submit(register_trigger)?;

    let prev_value = get_asset_value(&test_client, asset_id.clone());

    // First invocation spends the only repetition and the trigger is
    // swept.
    test_client.submit(ExecuteTrigger::new(trigger_id.clone()))?;
    assert_eq!(get_asset_value(&test_client, asset_id.clone()), prev_value + 1);

    // The second invocation has nothing left to address.
    assert!(test_client
        .submit(ExecuteTrigger::new(trigger_id.clone()))
        .is_err());
    assert_eq!(get_asset_value(&test_client, asset_id), prev_value + 1);

    let find = test_client.request(FindTriggerById::new(trigger_id));
    assert!(find.is_err());
    Ok(())
}

#[test]
fn minted_repetitions_extend_a_triggers_life() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let test_client = network.client();

    let asset_id = alice_rose();
    let trigger_id: TriggerId = "counted_trigger".parse()?;

    test_client.submit(Register::trigger(Trigger::new(
        trigger_id.clone(),
        Action::new(
            [Mint::asset_quantity(1_u32, asset_id.clone())],
            1_u32,
            ALICE_ID.clone(),
            ExecuteTriggerEventFilter::new()
                .for_trigger(trigger_id.clone())
                .under_authority(ALICE_ID.clone()),
        ),
    )))?;
    test_client.submit(Mint::trigger_repetitions(1_u32, trigger_id.clone()))?;

    let prev_value = get_asset_value(&test_client, asset_id.clone());
    test_client.submit(ExecuteTrigger::new(trigger_id.clone()))?;
    test_client.submit(ExecuteTrigger::new(trigger_id))?;
    assert_eq!(get_asset_value(&test_client, asset_id), prev_value + 2);
    Ok(())
}

#[test]
fn only_the_owner_may_execute_or_unregister_a_trigger() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let alice = network.client();
    let bob = network.client_for(&BOB_KEYPAIR, BOB_ID.clone())?;

    let asset_id = alice_rose();
    let register_trigger = build_register_trigger_isi(
        asset_id.clone(),
        vec![Mint::asset_quantity(1_u32, asset_id).into()],
    );
    alice.submit(register_trigger)?;
    let trigger_id: TriggerId = TRIGGER_NAME.parse()?;

    let rejection = bob
        .submit(ExecuteTrigger::new(trigger_id.clone()))
        .expect_err("Bob does not own the trigger");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::Validation(_)
    ));
    assert!(bob.submit(Unregister::trigger(trigger_id.clone())).is_err());

    // An execution token changes the picture.
    alice.submit(Grant::permission(
        Permission::CanExecuteTrigger(trigger_id.clone()),
        BOB_ID.clone(),
    ))?;
    bob.submit(ExecuteTrigger::new(trigger_id.clone()))?;

    // Unregistration still belongs to Alice.
    assert!(bob.submit(Unregister::trigger(trigger_id.clone())).is_err());
    alice.submit(Unregister::trigger(trigger_id.clone()))?;
    assert!(alice.request(FindTriggerById::new(trigger_id)).is_err());
    Ok(())
}

#[test]
fn data_trigger_airdrops_on_account_registration() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let test_client = network.client();

    let asset_id = alice_rose();
    let trigger_id: TriggerId = "rose_per_newcomer".parse()?;

    test_client.submit(Register::trigger(Trigger::new(
        trigger_id,
        Action::new(
            [Mint::asset_quantity(1_u32, asset_id.clone())],
            Repeats::Indefinitely,
            ALICE_ID.clone(),
            AccountEventFilter::new().for_events(AccountEventKind::Created),
        ),
    )))?;

    let prev_value = get_asset_value(&test_client, asset_id.clone());

    let (newcomer, _key_pair) = gen_account_in("wonderland");
    test_client.submit(Register::account(Account::new(newcomer)))?;
    assert_eq!(get_asset_value(&test_client, asset_id.clone()), prev_value + 1);

    // Unrelated events do not wake the trigger up.
    test_client.submit(Register::domain(Domain::new("neverland".parse()?)))?;
    assert_eq!(get_asset_value(&test_client, asset_id), prev_value + 1);
    Ok(())
}

#[test]
fn registering_two_triggers_under_one_id_fails() -> Result<()> {
    let network = NetworkBuilder::new().start()?;
    let test_client = network.client();

    let asset_id = alice_rose();
    let register =
        build_register_trigger_isi(asset_id.clone(), vec![Mint::asset_quantity(1_u32, asset_id).into()]);
    test_client.submit(register.clone())?;

    let rejection = test_client
        .submit(register)
        .expect_err("The id is already taken");
    assert!(matches!(
        rejection,
        TransactionRejectionReason::InstructionExecution(_)
    ));
    Ok(())
}
