// Drives one swap end-to-end against a pair of chain gateways. Both
// directions run the same state machine (Created -> AwaitingRelay ->
// Claimed); only the chain roles, denom and expiry window differ.
//
// Execution is strictly sequential: one in-flight transaction per wallet,
// no concurrent swaps against the same coordinator. Once the origin escrow
// is created the swap cannot be rolled back from here; it completes via
// claim or expires on-chain through its own height span.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use tokio::sync::watch;

use crate::config::CoordinatorConfig;
use crate::error::{Result, SwapError};
use crate::gateway::interface::{ChainGateway, EscrowParams, EscrowStatus};
use crate::registry::AssetRegistry;
use crate::relay::RelayWaitPolicy;
use crate::swap::types::{SwapDirection, SwapOutcome, SwapStage};
use crate::swap_id::{secret_hash, Secret, SwapIdPair};

/// Aborts the in-progress relay wait of the coordinator it was created
/// with. Claims already broadcast are not recalled.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

#[derive(Clone)]
pub struct SwapCoordinator {
    home: Arc<dyn ChainGateway>,
    foreign: Arc<dyn ChainGateway>,
    registry: AssetRegistry,
    config: CoordinatorConfig,
    relay: RelayWaitPolicy,
    cancel_rx: watch::Receiver<bool>,
}

// The direction-specific wiring fed into the shared state machine.
struct SwapLeg<'a> {
    origin: &'a dyn ChainGateway,
    dest: &'a dyn ChainGateway,
    origin_denom: &'a str,
    origin_deputy: &'a str,
    dest_deputy: &'a str,
    height_span: u64,
}

impl SwapCoordinator {
    pub fn new(
        home: Arc<dyn ChainGateway>,
        foreign: Arc<dyn ChainGateway>,
        registry: AssetRegistry,
        config: CoordinatorConfig,
    ) -> (Self, CancelHandle) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let relay = RelayWaitPolicy::new(config.relay);
        (
            SwapCoordinator {
                home,
                foreign,
                registry,
                config,
                relay,
                cancel_rx,
            },
            CancelHandle { tx: cancel_tx },
        )
    }

    /// Swap funds from the foreign chain to the home chain: escrow created
    /// by the foreign-chain wallet towards the foreign deputy, claimed on
    /// the home chain once the deputy has mirrored it.
    pub async fn incoming_swap(&self, symbol: &str, amount: u64) -> Result<SwapOutcome> {
        let asset = self.registry.resolve(symbol)?;
        self.execute(
            SwapDirection::Incoming,
            symbol,
            amount,
            SwapLeg {
                origin: self.foreign.as_ref(),
                dest: self.home.as_ref(),
                origin_denom: &asset.foreign_denom,
                origin_deputy: &asset.foreign_deputy,
                dest_deputy: &asset.home_deputy,
                height_span: self.config.incoming_height_span,
            },
        )
        .await
    }

    /// Swap funds from the home chain out to the foreign chain; mirror
    /// image of `incoming_swap` with a shorter expiry window.
    pub async fn outgoing_swap(&self, symbol: &str, amount: u64) -> Result<SwapOutcome> {
        let asset = self.registry.resolve(symbol)?;
        self.execute(
            SwapDirection::Outgoing,
            symbol,
            amount,
            SwapLeg {
                origin: self.home.as_ref(),
                dest: self.foreign.as_ref(),
                origin_denom: &asset.home_denom,
                origin_deputy: &asset.home_deputy,
                dest_deputy: &asset.foreign_deputy,
                height_span: self.config.outgoing_height_span,
            },
        )
        .await
    }

    async fn execute(
        &self,
        direction: SwapDirection,
        symbol: &str,
        amount: u64,
        leg: SwapLeg<'_>,
    ) -> Result<SwapOutcome> {
        // Fresh secret per attempt; the commitment binds it to the
        // timestamp. The secret itself is never logged.
        let secret = Secret::generate();
        let timestamp = Utc::now().timestamp();
        let hash = secret_hash(&secret, timestamp);
        let ids = SwapIdPair::derive(&hash, leg.origin.local_address(), leg.dest_deputy);

        info!(
            "{:?} swap of {} {}: expected {} escrow id {}",
            direction,
            amount,
            symbol,
            leg.origin.chain_name(),
            hex::encode(ids.origin)
        );

        let create_tx = leg
            .origin
            .create_escrow(EscrowParams {
                recipient: leg.origin_deputy.to_string(),
                recipient_other_chain: leg.dest.local_address().to_string(),
                sender_other_chain: leg.dest_deputy.to_string(),
                secret_hash: hash,
                timestamp,
                amount,
                denom: leg.origin_denom.to_string(),
                expected_income: format!("{}:{}", amount, leg.origin_denom),
                height_span: leg.height_span,
            })
            .await?;
        if !create_tx.success {
            return Err(SwapError::EscrowCreateFailed {
                chain: leg.origin.chain_name().to_string(),
                raw_log: create_tx.raw_log,
            });
        }
        info!(
            "create escrow tx ({}): {}",
            leg.origin.chain_name(),
            create_tx.hash
        );
        debug!(
            "swap {} stage {:?} -> {:?}, waiting for the deputy to witness and relay",
            hex::encode(ids.origin),
            SwapStage::Created,
            SwapStage::AwaitingRelay
        );
        info!(
            "expected {} escrow id {}",
            leg.dest.chain_name(),
            hex::encode(ids.dest)
        );

        let mut cancel = self.cancel_rx.clone();
        let mirrored = self
            .relay
            .await_mirrored_escrow(leg.dest, ids.dest, &hash, &mut cancel)
            .await?;
        debug!(
            "mirrored escrow pays {} {} until height {}",
            mirrored.amount, mirrored.denom, mirrored.expiry_height
        );

        let claim_tx = leg.dest.claim_escrow(ids.dest, &secret).await?;
        if !claim_tx.success {
            return Err(SwapError::ClaimFailed {
                swap_id: hex::encode(ids.dest),
                raw_log: claim_tx.raw_log,
            });
        }
        info!(
            "claim escrow tx ({}): {}",
            leg.dest.chain_name(),
            claim_tx.hash
        );

        let confirmed = leg
            .dest
            .confirm_tx(&claim_tx.hash, self.config.claim_confirm_timeout)
            .await?;
        if !confirmed.success {
            return Err(SwapError::ClaimFailed {
                swap_id: hex::encode(ids.dest),
                raw_log: confirmed.raw_log,
            });
        }

        // The claim tx succeeded; the record itself must now be terminal.
        match leg.dest.query_escrow(ids.dest).await? {
            Some(record) if record.status == EscrowStatus::Claimed => {}
            other => {
                return Err(SwapError::ClaimFailed {
                    swap_id: hex::encode(ids.dest),
                    raw_log: format!(
                        "escrow not claimed after confirmed claim tx (status {:?})",
                        other.map(|record| record.status)
                    ),
                })
            }
        }

        debug!("swap {} stage {:?}", hex::encode(ids.origin), SwapStage::Claimed);
        Ok(SwapOutcome {
            direction,
            symbol: symbol.to_string(),
            amount,
            ids,
            create_tx,
            claim_tx: confirmed,
        })
    }
}
