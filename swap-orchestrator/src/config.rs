use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapError};

// Timing parameters for the deputy relay wait. The defaults give the deputy
// two minutes to witness and mirror an escrow, well above its typical ~45s
// relay latency on a test network.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayWaitConfig {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for RelayWaitConfig {
    fn default() -> Self {
        RelayWaitConfig {
            poll_interval: Duration::from_secs(5),
            max_attempts: 24,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    // Expiry windows, in blocks, for the escrow created on each side. The
    // incoming window is a deployment parameter of the foreign chain; the
    // outgoing window is deliberately shorter.
    pub incoming_height_span: u64,
    pub outgoing_height_span: u64,

    // Bound on waiting for the claim transaction's final inclusion.
    #[serde(with = "humantime_serde")]
    pub claim_confirm_timeout: Duration,

    pub relay: RelayWaitConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        CoordinatorConfig {
            incoming_height_span: 10_001,
            outgoing_height_span: 250,
            claim_confirm_timeout: Duration::from_secs(15),
            relay: RelayWaitConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| SwapError::Config(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| SwapError::Config(e.to_string()))
    }
}
