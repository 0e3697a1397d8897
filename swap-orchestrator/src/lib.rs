// Orchestrates deputy-relayed HTLT swaps between two chains: derive the
// swap ids up front, escrow on the origin chain, wait for the deputy to
// mirror, claim on the destination chain with the revealed secret.

pub mod config;
pub mod error;
pub mod funding;
pub mod gateway;
pub mod registry;
pub mod relay;
pub mod swap;
pub mod swap_id;
