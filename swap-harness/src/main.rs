// Test-net harness: two in-memory chains, an in-process deputy between
// them, deputy hot-wallet funding, then one swap in each direction.
//
// Run with RUST_LOG=debug for the per-stage detail.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use swap_orchestrator::{
    config::{CoordinatorConfig, RelayWaitConfig},
    funding::{load_foreign_deputies, load_home_deputies},
    gateway::mock::{run_deputy_mirror, MockChainGateway},
    registry::{AssetInfo, AssetRegistry},
    swap::SwapCoordinator,
};

const HOME_USER: &str = "home1ys7zar2vhl9cgu6hnnkg";
const FOREIGN_USER: &str = "fore10rr5f8m73rxgnz9afvn";
const BUSD_FACTOR: u64 = 100;
const DEPUTY_POLL: Duration = Duration::from_millis(500);

fn asset(symbol: &str, foreign_denom: &str, conversion_factor: u64) -> AssetInfo {
    AssetInfo {
        symbol: symbol.to_string(),
        home_denom: symbol.to_string(),
        foreign_denom: foreign_denom.to_string(),
        home_deputy: format!("home1deputy{}", symbol),
        foreign_deputy: format!("fore1deputy{}", symbol),
        conversion_factor,
    }
}

fn testnet_registry() -> AssetRegistry {
    AssetRegistry::new([
        asset("bnb", "BNB", 1),
        asset("btcb", "BTCB-1DE", 1),
        asset("busd", "BUSD-BD1", BUSD_FACTOR),
        asset("xrpb", "XRPB-123", BUSD_FACTOR),
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let registry = testnet_registry();
    let home = Arc::new(MockChainGateway::new("home", HOME_USER));
    let foreign = Arc::new(MockChainGateway::new("foreign", FOREIGN_USER));
    for entry in registry.iter() {
        home.set_balance(HOME_USER, &entry.home_denom, 1_000_000_000_000);
        foreign.set_balance(FOREIGN_USER, &entry.foreign_denom, 1_000_000_000_000);
    }

    // The deputy is just another process watching both chains; here it is a
    // pair of mirror tasks, one per direction.
    tokio::spawn(run_deputy_mirror(
        foreign.clone(),
        home.clone(),
        "busd".to_string(),
        |amount| amount * BUSD_FACTOR,
        DEPUTY_POLL,
        250,
    ));
    tokio::spawn(run_deputy_mirror(
        home.clone(),
        foreign.clone(),
        "BUSD-BD1".to_string(),
        |amount| amount / BUSD_FACTOR,
        DEPUTY_POLL,
        10_001,
    ));

    info!("funding deputy hot wallets");
    load_home_deputies(home.as_ref(), &registry, 100_000).await?;
    load_foreign_deputies(foreign.as_ref(), &registry, 100_000).await?;

    let config = CoordinatorConfig {
        relay: RelayWaitConfig {
            poll_interval: Duration::from_secs(1),
            max_attempts: 30,
        },
        ..CoordinatorConfig::default()
    };
    let (coordinator, _cancel) = SwapCoordinator::new(home.clone(), foreign.clone(), registry, config);

    let incoming = coordinator.incoming_swap("busd", 10_200_005).await?;
    info!(
        "incoming swap claimed: origin {} dest {}",
        hex::encode(incoming.ids.origin),
        hex::encode(incoming.ids.dest)
    );
    info!(
        "home balance after incoming: {} busd",
        home.balance(HOME_USER, "busd")
    );

    let outgoing = coordinator.outgoing_swap("busd", 500_000).await?;
    info!(
        "outgoing swap claimed: origin {} dest {}",
        hex::encode(outgoing.ids.origin),
        hex::encode(outgoing.ids.dest)
    );
    info!(
        "foreign balance after outgoing: {} BUSD-BD1",
        foreign.balance(FOREIGN_USER, "BUSD-BD1")
    );

    Ok(())
}
