// Waiting discipline for the deputy relay: a bounded poll loop over the
// destination chain's escrow query, with a cancellation signal so a caller
// can abandon a stuck swap without killing the process. Pure reads only; no
// mutating transaction is ever submitted while waiting.

use log::{debug, warn};
use tokio::sync::watch;
use tokio::time;

use crate::config::RelayWaitConfig;
use crate::error::{Result, SwapError};
use crate::gateway::interface::{ChainGateway, EscrowRecord, EscrowStatus, SwapId};

#[derive(Clone, Debug)]
pub struct RelayWaitPolicy {
    config: RelayWaitConfig,
}

impl RelayWaitPolicy {
    pub fn new(config: RelayWaitConfig) -> Self {
        RelayWaitPolicy { config }
    }

    /// Polls the destination chain for the escrow the deputy is expected to
    /// mirror under the precomputed id. Only an Open record whose secret
    /// hash matches the local commitment counts as relayed; anything else is
    /// treated as not-yet-witnessed and runs the attempt budget down into
    /// RelayTimeout.
    pub async fn await_mirrored_escrow(
        &self,
        gateway: &dyn ChainGateway,
        id: SwapId,
        expected_hash: &[u8; 32],
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<EscrowRecord> {
        for attempt in 1..=self.config.max_attempts {
            if let Some(record) = gateway.query_escrow(id).await? {
                if record.status == EscrowStatus::Open && record.secret_hash == *expected_hash {
                    debug!(
                        "escrow {} observed on {} after {} attempt(s)",
                        hex::encode(id),
                        gateway.chain_name(),
                        attempt
                    );
                    return Ok(record);
                }
                warn!(
                    "escrow {} on {} is not claimable (status {:?})",
                    hex::encode(id),
                    gateway.chain_name(),
                    record.status
                );
            }

            if attempt == self.config.max_attempts {
                break;
            }
            tokio::select! {
                _ = time::sleep(self.config.poll_interval) => {}
                changed = cancel.changed() => match changed {
                    Ok(()) if *cancel.borrow() => {
                        return Err(SwapError::Cancelled {
                            swap_id: hex::encode(id),
                        })
                    }
                    // The signal was rewritten without cancelling, or its
                    // sender is gone; fall back to a plain delay.
                    Ok(()) => {}
                    Err(_) => time::sleep(self.config.poll_interval).await,
                },
            }
        }

        Err(SwapError::RelayTimeout {
            swap_id: hex::encode(id),
            attempts: self.config.max_attempts,
        })
    }
}
