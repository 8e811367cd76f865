// Block data structure

use crate::core::{Canonical, Transaction, sha256_hex};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Index of the first block in every chain
pub const GENESIS_INDEX: u64 = 1;

/// Placeholder predecessor reference carried by the genesis block.
/// This is not a digest; nothing checks it.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof seeded into the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// A sealed batch of transactions plus linkage and proof metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 1
    pub index: u64,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    /// Transactions sealed into this block
    pub transactions: Vec<Transaction>,
    /// Proof satisfying the puzzle against the previous block's proof
    pub proof: u64,
    /// Digest of the preceding block (sentinel for genesis)
    pub previous_hash: String,
}

impl Block {
    /// Create a new block stamped with the current time
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: current_timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Canonical digest of this block
    pub fn hash(&self) -> String {
        sha256_hex(&self.canonical_bytes())
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
    }
}

/// Canonical digest of a block
pub fn digest(block: &Block) -> String {
    block.hash()
}

/// Wall clock time in seconds, truncated to microseconds so the value
/// survives the canonical rendering unchanged.
pub fn current_timestamp() -> f64 {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or(0);
    micros as f64 / 1_000_000.0
}
