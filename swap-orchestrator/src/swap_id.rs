// Deterministic swap identifier derivation.
//
// Corresponding escrows on the two chains share one secret hash but see the
// sender/counterparty pair in opposite order, so both identifiers can be
// computed locally before any transaction is broadcast.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::gateway::interface::SwapId;

/// Per-swap random value. Revealed on-chain only inside the claim
/// transaction; the Debug impl is redacted so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Draws a fresh 32-byte secret from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Secret(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Secret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

/// Commitment published on-chain: SHA-256 over the secret and the unix
/// timestamp (big-endian i64). The pair (secret, timestamp) must be kept
/// together; the hash is unverifiable without both.
pub fn secret_hash(secret: &Secret, timestamp: i64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.finalize().into()
}

/// SHA-256 over (secret_hash, sender, sender_other_chain). Pure and
/// deterministic; each chain derives its escrow id under its own view of
/// which party is the sender.
pub fn swap_id(secret_hash: &[u8; 32], sender: &str, sender_other_chain: &str) -> SwapId {
    let mut hasher = Sha256::new();
    hasher.update(secret_hash);
    hasher.update(sender.as_bytes());
    hasher.update(sender_other_chain.as_bytes());
    hasher.finalize().into()
}

// The expected escrow ids on both chains, known before anything is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapIdPair {
    pub origin: SwapId,
    pub dest: SwapId,
}

impl SwapIdPair {
    /// Derives both ids from the origin chain's point of view: `origin` with
    /// the local sender first, `dest` with the argument order inverted.
    pub fn derive(secret_hash: &[u8; 32], sender: &str, sender_other_chain: &str) -> Self {
        SwapIdPair {
            origin: swap_id(secret_hash, sender, sender_other_chain),
            dest: swap_id(secret_hash, sender_other_chain, sender),
        }
    }
}
