use crate::gateway::interface::GatewayError;

/// Result type used throughout the orchestrator.
pub type Result<T> = std::result::Result<T, SwapError>;

// Every failure aborts the current swap attempt; nothing is retried
// internally. A RelayTimeout is only recoverable by re-running the whole
// swap with a fresh secret, never by reusing the stale IDs.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("asset {0} is not supported by the registry")]
    UnsupportedAsset(String),

    #[error("escrow creation rejected on {chain}: {raw_log}")]
    EscrowCreateFailed { chain: String, raw_log: String },

    #[error("no counterparty escrow {swap_id} observed after {attempts} attempts")]
    RelayTimeout { swap_id: String, attempts: u32 },

    #[error("claim of escrow {swap_id} failed: {raw_log}")]
    ClaimFailed { swap_id: String, raw_log: String },

    #[error("swap cancelled while waiting on escrow {swap_id}")]
    Cancelled { swap_id: String },

    #[error("deputy funding transfer of {denom} rejected: {raw_log}")]
    TransferFailed { denom: String, raw_log: String },

    #[error("chain gateway error: {0}")]
    Gateway(GatewayError),

    #[error("config load failed: {0}")]
    Config(String),
}

impl From<GatewayError> for SwapError {
    fn from(err: GatewayError) -> Self {
        SwapError::Gateway(err)
    }
}
