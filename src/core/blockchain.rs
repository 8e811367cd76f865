// In-memory ledger: the chain plus the pending transaction buffer

use crate::core::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, Transaction};
use crate::error::{ChainError, Result};
use serde_json::Number;

/// Append-only chain of blocks with a buffer of transactions waiting for
/// the next block.
///
/// The chain is never empty: a genesis block is sealed on construction and
/// [`Blockchain::replace_chain`] refuses an empty replacement. Mutation is
/// not synchronized here; share it behind a lock (see `network::Node`).
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Blockchain {
    /// Create a ledger holding only the genesis block
    pub fn new() -> Self {
        Self::with_genesis_proof(GENESIS_PROOF)
    }

    /// Create a ledger whose genesis block carries `proof`
    pub fn with_genesis_proof(proof: u64) -> Self {
        let mut blockchain = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        blockchain.seal_block(proof, Some(GENESIS_PREVIOUS_HASH.to_string()));
        blockchain
    }

    /// Buffer a transaction for the next block.
    /// Returns the index of the block it will be sealed into.
    pub fn append_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> u64 {
        self.add_transaction(Transaction::new(sender, recipient, amount))
    }

    /// Buffer an already built transaction
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.next_index()
    }

    /// Seal every pending transaction into a new block and append it.
    ///
    /// `previous_hash` defaults to the digest of the current last block.
    /// The proof is taken as given; checking it is the caller's business.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<String>) -> Block {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block().hash(),
        };

        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.chain.len() as u64 + 1, transactions, proof, previous_hash);

        log::debug!(
            "Sealed block {} with {} transactions",
            block.index,
            block.transactions.len()
        );

        self.chain.push(block.clone());
        block
    }

    /// The most recently sealed block
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always contains the genesis block")
    }

    /// Index the next sealed block will receive
    pub fn next_index(&self) -> u64 {
        self.last_block().index + 1
    }

    /// All blocks, genesis first
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Check if the chain has no blocks
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Transactions waiting for the next block
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// Swap in a different chain wholesale. Pending transactions are kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> Result<()> {
        if chain.is_empty() {
            return Err(ChainError::EmptyChain);
        }

        log::info!(
            "Replacing chain of {} blocks with {} blocks",
            self.chain.len(),
            chain.len()
        );

        self.chain = chain;
        Ok(())
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
