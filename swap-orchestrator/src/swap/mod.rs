// Swap orchestration module entry point.

pub mod coordinator;
pub mod types;

pub use coordinator::{CancelHandle, SwapCoordinator};
pub use types::{SwapDirection, SwapOutcome, SwapStage};
