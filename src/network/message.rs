// HTTP request and response bodies

use crate::core::{Block, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Body of `GET /chain`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainResponse {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }

    /// Check that the advertised length matches the blocks sent
    pub fn is_consistent(&self) -> bool {
        self.length == self.chain.len()
    }
}

/// Body of `POST /transactions/new`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

/// Body of `POST /nodes/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterNodesRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `GET /mine`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinedBlockResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl MinedBlockResponse {
    pub fn new(block: Block) -> Self {
        Self {
            message: "New Block Forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

/// Body of `POST /nodes/register` on success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

/// Body of `GET /nodes/resolve`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}

impl ResolveResponse {
    pub fn new(replaced: bool, chain: Vec<Block>) -> Self {
        let message = if replaced {
            "Our chain was replaced"
        } else {
            "Our chain is authoritative"
        };
        Self {
            message: message.to_string(),
            replaced,
            chain,
        }
    }
}
