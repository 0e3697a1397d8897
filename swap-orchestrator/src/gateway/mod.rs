// Chain gateway module: the external-collaborator seam plus an in-memory
// implementation for tests and the harness.

pub mod interface;
pub mod mock;

pub use interface::{
    ChainGateway, EscrowParams, EscrowRecord, EscrowStatus, GatewayError, SwapId, TxHash, TxResult,
};
