use crate::gateway::interface::TxResult;
use crate::swap_id::SwapIdPair;

// Which side of the deputy the swap starts on: Incoming swaps escrow on the
// foreign chain and claim on the home chain; Outgoing is the mirror image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    Incoming,
    Outgoing,
}

// Progression of one swap attempt. Failure is terminal from any stage and
// is carried by the error, not a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapStage {
    Created,
    AwaitingRelay,
    Claimed,
}

// Result of a completed swap. Both legs are final at this point: the origin
// escrow is spendable by the deputy with the revealed secret, and the
// destination escrow has paid out.
#[derive(Clone, Debug)]
pub struct SwapOutcome {
    pub direction: SwapDirection,
    pub symbol: String,
    pub amount: u64,
    pub ids: SwapIdPair,
    pub create_tx: TxResult,
    pub claim_tx: TxResult,
}
