// Deputy hot-wallet top-up loops. Pure repeated transfers with settling
// pauses between them; no swap protocol state is involved. Each asset is
// independent: the loop stops at the first rejected transfer and reports
// it, leaving the remaining assets to the caller's policy.

use std::time::Duration;

use log::info;
use tokio::time;

use crate::error::{Result, SwapError};
use crate::gateway::interface::ChainGateway;
use crate::registry::AssetRegistry;

const HOME_FUNDING_GAP: Duration = Duration::from_secs(7);
const HOME_FUNDING_SETTLE: Duration = Duration::from_secs(3);
const FOREIGN_FUNDING_GAP: Duration = Duration::from_secs(2);

/// Tops up every home-chain deputy with `base_amount` scaled by the asset's
/// conversion factor, in the asset's home denom.
pub async fn load_home_deputies(
    gateway: &dyn ChainGateway,
    registry: &AssetRegistry,
    base_amount: u64,
) -> Result<()> {
    let total = registry.len();
    for (loaded, asset) in registry.iter().enumerate() {
        let amount = base_amount * asset.conversion_factor;
        let res = gateway
            .transfer(&asset.home_deputy, amount, &asset.home_denom)
            .await?;
        if !res.success {
            return Err(SwapError::TransferFailed {
                denom: asset.home_denom.clone(),
                raw_log: res.raw_log,
            });
        }
        info!("loaded {} deputy: {}", asset.home_denom, res.hash);

        let gap = if loaded + 1 < total {
            HOME_FUNDING_GAP
        } else {
            HOME_FUNDING_SETTLE
        };
        time::sleep(gap).await;
    }
    Ok(())
}

/// Tops up every foreign-chain deputy with a flat `amount` of the asset's
/// foreign denom.
pub async fn load_foreign_deputies(
    gateway: &dyn ChainGateway,
    registry: &AssetRegistry,
    amount: u64,
) -> Result<()> {
    for asset in registry.iter() {
        let res = gateway
            .transfer(&asset.foreign_deputy, amount, &asset.foreign_denom)
            .await?;
        if !res.success {
            return Err(SwapError::TransferFailed {
                denom: asset.foreign_denom.clone(),
                raw_log: res.raw_log,
            });
        }
        info!("loaded {} deputy: {}", asset.foreign_denom, res.hash);
        time::sleep(FOREIGN_FUNDING_GAP).await;
    }
    Ok(())
}
