// Error types for the ledger node

use crate::consensus::ValidationError;
use crate::network::FetchError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// A chain must always hold at least the genesis block
    EmptyChain,
    /// Proof search was cancelled or ran past its deadline
    MiningAborted,
    InvalidChain(ValidationError),
    InvalidDifficulty(usize),
    InvalidPeerAddress(String),
    Fetch(FetchError),
    Config(String),
    Io(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::EmptyChain => write!(f, "Chain has no blocks"),
            ChainError::MiningAborted => write!(f, "Proof search aborted"),
            ChainError::InvalidChain(e) => write!(f, "Invalid chain: {}", e),
            ChainError::InvalidDifficulty(d) => {
                write!(f, "Invalid difficulty: {} (must be at most 64 hex digits)", d)
            }
            ChainError::InvalidPeerAddress(addr) => write!(f, "Invalid peer address: {}", addr),
            ChainError::Fetch(e) => write!(f, "Peer fetch failed: {}", e),
            ChainError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<ValidationError> for ChainError {
    fn from(err: ValidationError) -> Self {
        ChainError::InvalidChain(err)
    }
}

impl From<FetchError> for ChainError {
    fn from(err: FetchError) -> Self {
        ChainError::Fetch(err)
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
