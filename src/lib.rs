// Proof-of-work ledger
// Single-node chain of transaction blocks with longest-valid-chain consensus

pub mod core;
pub mod consensus;
pub mod network;
pub mod config;
pub mod error;
pub mod cli;

// Re-exports for convenience
pub use crate::core::{Block, Blockchain, Transaction, digest};
pub use consensus::{ChainValidator, Consensus, Difficulty, ProofOfWork, ValidationError};
pub use network::{ChainFetcher, FetchError, HttpChainFetcher, Node, NodeRegistry};
pub use config::NodeConfig;
pub use error::{ChainError, Result};
pub use cli::{Cli, CliHandler};
