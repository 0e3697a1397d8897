use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;

use crate::swap_id::Secret;

// Transport-level error type for blockchain operations. Rejected
// transactions are not errors; they come back as a TxResult with
// success == false, mirroring how the chains report a non-success status.
pub type GatewayError = Box<dyn Error + Send + Sync>;

// Transaction identifier (hash) as reported by the chain.
pub type TxHash = String;

// 32-byte escrow identifier, identical on both chains' wire formats.
pub type SwapId = [u8; 32];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResult {
    pub success: bool,
    pub hash: TxHash,
    pub raw_log: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowStatus {
    Open,
    Claimed,
    Expired,
}

// On-chain escrow state. Owned by the chain; this system only reads it and
// drives it through transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowRecord {
    pub id: SwapId,
    pub sender: String,
    pub recipient: String,
    pub sender_other_chain: String,
    pub recipient_other_chain: String,
    pub secret_hash: [u8; 32],
    pub timestamp: i64,
    pub amount: u64,
    pub denom: String,
    pub expiry_height: u64,
    pub status: EscrowStatus,
}

// Arguments for an HTLT-style escrow creation. The sender is always the
// gateway's own wallet address.
#[derive(Clone, Debug)]
pub struct EscrowParams {
    pub recipient: String,
    pub recipient_other_chain: String,
    pub sender_other_chain: String,
    pub secret_hash: [u8; 32],
    pub timestamp: i64,
    pub amount: u64,
    pub denom: String,
    pub expected_income: String,
    pub height_span: u64,
}

/// One chain's client surface as seen by the coordinator: submit a
/// transaction, get a receipt, query escrow state. Wallet construction, key
/// management and sequence-number bookkeeping all live behind this trait,
/// which also allows mocking a whole chain in tests.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    fn chain_name(&self) -> &str;

    /// Address of the wallet this gateway signs with.
    fn local_address(&self) -> &str;

    /// Submits an escrow-creation transaction.
    async fn create_escrow(&self, params: EscrowParams) -> Result<TxResult, GatewayError>;

    /// Submits a claim against an open escrow, revealing the secret.
    async fn claim_escrow(&self, id: SwapId, secret: &Secret) -> Result<TxResult, GatewayError>;

    /// Reads an escrow's current state; Ok(None) when the id is unknown.
    async fn query_escrow(&self, id: SwapId) -> Result<Option<EscrowRecord>, GatewayError>;

    /// Waits for a previously submitted transaction's final inclusion
    /// result, up to the given bound.
    async fn confirm_tx(&self, hash: &str, timeout: Duration) -> Result<TxResult, GatewayError>;

    /// Plain bank transfer from the gateway's wallet. Used by the deputy
    /// funding routines, not by the swap protocol itself.
    async fn transfer(&self, to: &str, amount: u64, denom: &str)
        -> Result<TxResult, GatewayError>;
}
