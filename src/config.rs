//! Node configuration

use crate::consensus::{DEFAULT_DIFFICULTY, Difficulty};
use crate::core::GENESIS_PROOF;
use crate::error::{ChainError, Result};
use crate::network::DEFAULT_PEER_TIMEOUT;
use std::net::SocketAddr;
use std::time::Duration;

/// Default listen address for the HTTP node
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Amount paid to the miner of each block
pub const DEFAULT_MINING_REWARD: i64 = 1;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind: SocketAddr,
    pub difficulty: usize,
    pub genesis_proof: u64,
    pub mining_reward: i64,
    pub peer_timeout: Duration,
    /// Give up on a proof search after this long (unbounded if `None`)
    pub mining_timeout: Option<Duration>,
    /// Peers registered at startup
    pub peers: Vec<String>,
}

impl NodeConfig {
    /// Check values and produce the puzzle difficulty
    pub fn validate(&self) -> Result<Difficulty> {
        if self.peer_timeout.is_zero() {
            return Err(ChainError::Config("peer timeout must be non-zero".to_string()));
        }
        if self.mining_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ChainError::Config("mining timeout must be non-zero".to_string()));
        }
        Difficulty::new(self.difficulty)
            .map_err(|e| ChainError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            difficulty: DEFAULT_DIFFICULTY,
            genesis_proof: GENESIS_PROOF,
            mining_reward: DEFAULT_MINING_REWARD,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
            mining_timeout: None,
            peers: Vec::new(),
        }
    }
}
