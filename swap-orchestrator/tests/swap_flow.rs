// End-to-end swap scenarios against a pair of in-memory chains, with a
// spawned task standing in for the deputy relay process.

use std::sync::Arc;
use std::time::Duration;

use swap_orchestrator::{
    config::{CoordinatorConfig, RelayWaitConfig},
    error::SwapError,
    gateway::{
        mock::{run_deputy_mirror, MockChainGateway},
        ChainGateway, EscrowStatus,
    },
    registry::{AssetInfo, AssetRegistry},
    swap::{CancelHandle, SwapCoordinator, SwapDirection},
};

const HOME_USER: &str = "home1ys7zar2vhl9cgu6hnnkg";
const FOREIGN_USER: &str = "fore10rr5f8m73rxgnz9afvn";
const HOME_DEPUTY: &str = "home1hh4x3a4suu5zyaeauvm";
const FOREIGN_DEPUTY: &str = "fore10zq89008gmedc6rrwzd";
const HOME_DENOM: &str = "busd";
const FOREIGN_DENOM: &str = "BUSD-BD1";
const CONVERSION_FACTOR: u64 = 100;
const STARTING_BALANCE: u64 = 100_000_000;

fn busd() -> AssetInfo {
    AssetInfo {
        symbol: "busd".to_string(),
        home_denom: HOME_DENOM.to_string(),
        foreign_denom: FOREIGN_DENOM.to_string(),
        home_deputy: HOME_DEPUTY.to_string(),
        foreign_deputy: FOREIGN_DEPUTY.to_string(),
        conversion_factor: CONVERSION_FACTOR,
    }
}

fn quick_config(max_attempts: u32) -> CoordinatorConfig {
    CoordinatorConfig {
        relay: RelayWaitConfig {
            poll_interval: Duration::from_millis(20),
            max_attempts,
        },
        claim_confirm_timeout: Duration::from_secs(1),
        ..CoordinatorConfig::default()
    }
}

struct TestNet {
    home: Arc<MockChainGateway>,
    foreign: Arc<MockChainGateway>,
    coordinator: SwapCoordinator,
    cancel: CancelHandle,
}

fn setup_with(config: CoordinatorConfig) -> TestNet {
    let home = Arc::new(MockChainGateway::new("home", HOME_USER));
    let foreign = Arc::new(MockChainGateway::new("foreign", FOREIGN_USER));
    home.set_balance(HOME_USER, HOME_DENOM, STARTING_BALANCE);
    foreign.set_balance(FOREIGN_USER, FOREIGN_DENOM, STARTING_BALANCE);

    let (coordinator, cancel) = SwapCoordinator::new(
        home.clone(),
        foreign.clone(),
        AssetRegistry::new([busd()]),
        config,
    );
    TestNet {
        home,
        foreign,
        coordinator,
        cancel,
    }
}

fn setup() -> TestNet {
    setup_with(quick_config(10))
}

// Mirrors foreign-chain escrows onto the home chain, converting amounts to
// home smallest units.
fn spawn_incoming_deputy(net: &TestNet) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_deputy_mirror(
        net.foreign.clone(),
        net.home.clone(),
        HOME_DENOM.to_string(),
        |amount| amount * CONVERSION_FACTOR,
        Duration::from_millis(5),
        250,
    ))
}

fn spawn_outgoing_deputy(net: &TestNet) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_deputy_mirror(
        net.home.clone(),
        net.foreign.clone(),
        FOREIGN_DENOM.to_string(),
        |amount| amount / CONVERSION_FACTOR,
        Duration::from_millis(5),
        10_001,
    ))
}

#[tokio::test]
async fn incoming_swap_completes_via_deputy_relay() {
    let net = setup();
    let deputy = spawn_incoming_deputy(&net);

    let amount = 10_200_005;
    let outcome = net
        .coordinator
        .incoming_swap("busd", amount)
        .await
        .expect("incoming swap should complete");
    deputy.abort();

    assert_eq!(outcome.direction, SwapDirection::Incoming);
    assert_eq!(outcome.amount, amount);
    assert!(outcome.create_tx.success);
    assert!(outcome.claim_tx.success);

    // The origin escrow landed under the locally precomputed id and names
    // the deputy pair correctly.
    let origin = net
        .foreign
        .escrow(outcome.ids.origin)
        .expect("origin escrow exists under the precomputed id");
    assert_eq!(origin.status, EscrowStatus::Open);
    assert_eq!(origin.sender, FOREIGN_USER);
    assert_eq!(origin.recipient, FOREIGN_DEPUTY);
    assert_eq!(origin.sender_other_chain, HOME_DEPUTY);
    assert_eq!(origin.recipient_other_chain, HOME_USER);
    assert_eq!(net.foreign.balance(FOREIGN_USER, FOREIGN_DENOM), STARTING_BALANCE - amount);

    // The mirrored escrow paid out the converted amount on claim.
    let dest = net.home.escrow(outcome.ids.dest).unwrap();
    assert_eq!(dest.status, EscrowStatus::Claimed);
    assert_eq!(dest.amount, amount * CONVERSION_FACTOR);
    assert_eq!(
        net.home.balance(HOME_USER, HOME_DENOM),
        STARTING_BALANCE + amount * CONVERSION_FACTOR
    );
}

#[tokio::test]
async fn outgoing_swap_completes_via_deputy_relay() {
    let net = setup();
    let deputy = spawn_outgoing_deputy(&net);

    let amount = 500_000;
    let outcome = net
        .coordinator
        .outgoing_swap("busd", amount)
        .await
        .expect("outgoing swap should complete");
    deputy.abort();

    assert_eq!(outcome.direction, SwapDirection::Outgoing);
    let origin = net.home.escrow(outcome.ids.origin).unwrap();
    assert_eq!(origin.sender, HOME_USER);
    assert_eq!(origin.recipient, HOME_DEPUTY);
    assert_eq!(origin.denom, HOME_DENOM);

    let dest = net.foreign.escrow(outcome.ids.dest).unwrap();
    assert_eq!(dest.status, EscrowStatus::Claimed);
    assert_eq!(dest.amount, amount / CONVERSION_FACTOR);
    assert_eq!(
        net.foreign.balance(FOREIGN_USER, FOREIGN_DENOM),
        STARTING_BALANCE + amount / CONVERSION_FACTOR
    );
}

#[tokio::test]
async fn relay_timeout_without_a_claim_attempt() {
    // No deputy running: the mirrored escrow never appears.
    let net = setup();

    let err = net
        .coordinator
        .incoming_swap("busd", 10_200_005)
        .await
        .unwrap_err();
    assert!(matches!(err, SwapError::RelayTimeout { attempts: 10, .. }));

    // The wait budget was spent on reads only; no claim was submitted.
    assert_eq!(net.home.query_calls(), 10);
    assert_eq!(net.home.claim_calls(), 0);

    // The origin escrow stays locked until its own height span expires.
    assert_eq!(net.foreign.open_escrows().len(), 1);
}

#[tokio::test]
async fn rejected_creation_short_circuits_the_swap() {
    let net = setup();
    net.foreign.set_fail_next_create();

    let err = net
        .coordinator
        .incoming_swap("busd", 10_200_005)
        .await
        .unwrap_err();
    assert!(matches!(err, SwapError::EscrowCreateFailed { chain, .. } if chain == "foreign"));

    // The wait stage was never entered.
    assert_eq!(net.home.query_calls(), 0);
    assert_eq!(net.home.claim_calls(), 0);
    assert!(net.foreign.open_escrows().is_empty());
}

#[tokio::test]
async fn claimed_escrow_queries_are_idempotent() {
    let net = setup();
    let deputy = spawn_incoming_deputy(&net);
    let outcome = net.coordinator.incoming_swap("busd", 10_200_005).await.unwrap();
    deputy.abort();

    for _ in 0..3 {
        let record = net
            .home
            .query_escrow(outcome.ids.dest)
            .await
            .unwrap()
            .expect("claimed escrow remains queryable");
        assert_eq!(record.status, EscrowStatus::Claimed);
    }
}

#[tokio::test]
async fn cancelling_the_wait_aborts_the_swap() {
    let net = setup_with(quick_config(1_000));

    let coordinator = net.coordinator.clone();
    let swap = tokio::spawn(async move { coordinator.incoming_swap("busd", 10_200_005).await });

    tokio::time::sleep(Duration::from_millis(60)).await;
    net.cancel.cancel();

    let err = swap.await.unwrap().unwrap_err();
    assert!(matches!(err, SwapError::Cancelled { .. }));
    assert_eq!(net.home.claim_calls(), 0);
}

#[tokio::test]
async fn rejected_claim_surfaces_as_claim_failed() {
    let net = setup();
    let deputy = spawn_incoming_deputy(&net);
    net.home.set_fail_next_claim();

    let err = net
        .coordinator
        .incoming_swap("busd", 10_200_005)
        .await
        .unwrap_err();
    deputy.abort();

    assert!(matches!(err, SwapError::ClaimFailed { .. }));
    // The mirrored escrow is still open; only the claim broadcast failed.
    let open = net.home.open_escrows();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn unknown_symbol_is_rejected_up_front() {
    let net = setup();
    let err = net
        .coordinator
        .incoming_swap("doesnotexist", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, SwapError::UnsupportedAsset(symbol) if symbol == "doesnotexist"));
    assert_eq!(net.foreign.create_calls(), 0);
}
