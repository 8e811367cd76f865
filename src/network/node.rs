// Network node - shared ledger state, mining and consensus

use crate::config::NodeConfig;
use crate::consensus::{CancelFlag, ChainValidator, Consensus, MiningControl, ProofOfWork};
use crate::core::{Block, Blockchain, Transaction};
use crate::error::{ChainError, Result};
use crate::network::{HttpChainFetcher, NodeRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Network node
///
/// Cheap to clone; clones share the same ledger and registry.
#[derive(Clone)]
pub struct Node {
    /// Chain and pending transactions
    pub blockchain: Arc<RwLock<Blockchain>>,
    /// Known peers
    pub registry: Arc<RwLock<NodeRegistry>>,
    pow: ProofOfWork,
    consensus: Consensus,
    fetcher: HttpChainFetcher,
    node_id: String,
    mining_reward: i64,
    mining_timeout: Option<Duration>,
    cancel: CancelFlag,
}

impl Node {
    /// Create a node with a fresh ledger
    pub fn new(config: &NodeConfig) -> Result<Self> {
        let difficulty = config.validate()?;
        let pow = ProofOfWork::new(difficulty);

        let mut registry = NodeRegistry::new();
        for peer in &config.peers {
            registry.register(peer)?;
        }

        let node_id = hex::encode(rand::random::<[u8; 16]>());
        log::info!(
            "Node {} starting with difficulty {} and {} peers",
            node_id,
            difficulty.zeros(),
            registry.len()
        );

        Ok(Self {
            blockchain: Arc::new(RwLock::new(Blockchain::with_genesis_proof(
                config.genesis_proof,
            ))),
            registry: Arc::new(RwLock::new(registry)),
            pow,
            consensus: Consensus::new(ChainValidator::new(pow)),
            fetcher: HttpChainFetcher::new(config.peer_timeout),
            node_id,
            mining_reward: config.mining_reward,
            mining_timeout: config.mining_timeout,
            cancel: CancelFlag::new(),
        })
    }

    /// Identifier credited with mining rewards
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    /// Buffer a transaction; returns the index of the block that will hold it
    pub async fn new_transaction(&self, tx: Transaction) -> u64 {
        self.blockchain.write().await.add_transaction(tx)
    }

    /// Snapshot of the full chain
    pub async fn chain(&self) -> Vec<Block> {
        self.blockchain.read().await.chain().to_vec()
    }

    /// Find a proof for the next block, then seal it with the pending
    /// transactions and a reward for this node.
    ///
    /// The search runs on a blocking worker with no lock held. If the chain
    /// tip moves meanwhile (another block sealed or a consensus swap), the
    /// proof is stale and the search starts over.
    pub async fn mine(&self) -> Result<Block> {
        loop {
            let (last_proof, last_hash) = {
                let blockchain = self.blockchain.read().await;
                let last = blockchain.last_block();
                (last.proof, last.hash())
            };

            let pow = self.pow;
            let control = self.mining_control();
            let result = tokio::task::spawn_blocking(move || pow.mine(last_proof, &control))
                .await
                .map_err(|e| {
                    log::error!("Proof search task failed: {}", e);
                    ChainError::MiningAborted
                })?;

            if !result.success {
                log::warn!("Proof search aborted after {} attempts", result.attempts);
                return Err(ChainError::MiningAborted);
            }

            let mut blockchain = self.blockchain.write().await;
            if blockchain.last_block().hash() != last_hash {
                log::info!("Chain tip moved during proof search, retrying");
                continue;
            }

            blockchain.add_transaction(Transaction::reward(&self.node_id, self.mining_reward));
            let block = blockchain.seal_block(result.proof, None);

            log::info!(
                "Mined block {} (proof {}, {} attempts in {:?}, {:.0} H/s)",
                block.index,
                result.proof,
                result.attempts,
                result.duration,
                result.hash_rate()
            );

            return Ok(block);
        }
    }

    fn mining_control(&self) -> MiningControl {
        let control = MiningControl::new(self.cancel.clone());
        match self.mining_timeout {
            Some(timeout) => control.with_timeout(timeout),
            None => control,
        }
    }

    /// Register a peer by URL or `host:port`
    pub async fn register_node(&self, address: &str) -> Result<bool> {
        self.registry.write().await.register(address)
    }

    /// Get peer addresses
    pub async fn peers(&self) -> Vec<String> {
        self.registry.read().await.peers()
    }

    /// Run consensus against all registered peers.
    /// Returns true if our chain was replaced.
    pub async fn resolve(&self) -> bool {
        let peers = self.peers().await;
        log::info!("Resolving against {} peers", peers.len());
        self.consensus
            .resolve(&self.blockchain, &peers, &self.fetcher)
            .await
    }

    /// Abort running and future proof searches
    pub fn shutdown(&self) {
        log::info!("Node {} shutting down", self.node_id);
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::ValidationError;

    fn test_config() -> NodeConfig {
        NodeConfig {
            difficulty: 1,
            ..NodeConfig::default()
        }
    }

    #[test]
    fn test_node_creation() {
        let config = NodeConfig {
            peers: vec!["http://127.0.0.1:5001".to_string()],
            ..test_config()
        };
        let node = Node::new(&config).unwrap();

        assert_eq!(node.node_id().len(), 32);
        assert_eq!(node.pow().difficulty.zeros(), 1);
    }

    #[test]
    fn test_node_rejects_bad_peer() {
        let config = NodeConfig {
            peers: vec!["/nowhere".to_string()],
            ..test_config()
        };
        assert!(matches!(
            Node::new(&config),
            Err(ChainError::InvalidPeerAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_mine_seals_pending_and_reward() {
        let node = Node::new(&test_config()).unwrap();
        let index = node.new_transaction(Transaction::new("alice", "bob", 5)).await;
        assert_eq!(index, 2);

        let genesis = node.blockchain.read().await.last_block().clone();
        let block = node.mine().await.unwrap();

        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis.hash());
        assert!(node.pow().verify(genesis.proof, block.proof));
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[0], Transaction::new("alice", "bob", 5));
        assert!(block.transactions[1].is_reward());
        assert_eq!(block.transactions[1].recipient, node.node_id());

        let blockchain = node.blockchain.read().await;
        assert!(blockchain.pending_transactions().is_empty());
        assert_eq!(
            ChainValidator::new(node.pow()).validate(blockchain.chain()),
            Ok::<(), ValidationError>(())
        );
    }

    #[tokio::test]
    async fn test_mine_retries_when_tip_moves() {
        // At difficulty 4 the first proof after 64 takes ~500k attempts,
        // leaving time to seal a competing block mid-search.
        const COMPETING_PROOF: u64 = 505_886;
        const NEXT_PROOF: u64 = 42_130;

        let config = NodeConfig {
            difficulty: 4,
            genesis_proof: 64,
            ..NodeConfig::default()
        };
        let node = Node::new(&config).unwrap();

        let miner = {
            let node = node.clone();
            tokio::spawn(async move { node.mine().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let competing = {
            let mut blockchain = node.blockchain.write().await;
            assert_eq!(blockchain.len(), 1, "search finished before the tip moved");
            blockchain.append_transaction("alice", "bob", 7);
            blockchain.seal_block(COMPETING_PROOF, None)
        };
        assert!(node.pow().verify(64, COMPETING_PROOF));

        let block = miner.await.unwrap().unwrap();
        assert_eq!(block.index, 3);
        assert_eq!(block.previous_hash, competing.hash());
        assert_eq!(block.proof, NEXT_PROOF);
        assert_eq!(block.transactions.len(), 1);
        assert!(block.transactions[0].is_reward());

        let chain = node.chain().await;
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[1], competing);
        assert!(ChainValidator::new(node.pow()).is_valid(&chain));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_during_mining() {
        const SUBMITTERS: i64 = 20;
        let node = Node::new(&test_config()).unwrap();

        let miner = {
            let node = node.clone();
            tokio::spawn(async move { node.mine().await })
        };
        let submitters: Vec<_> = (0..SUBMITTERS)
            .map(|i| {
                let node = node.clone();
                tokio::spawn(async move {
                    node.new_transaction(Transaction::new(format!("sender-{i}"), "bob", i))
                        .await
                })
            })
            .collect();

        for submitter in submitters {
            let index = submitter.await.unwrap();
            assert!(index == 2 || index == 3);
        }
        miner.await.unwrap().unwrap();

        let blockchain = node.blockchain.read().await;
        assert_eq!(blockchain.len(), 2);
        let recorded: Vec<&Transaction> = blockchain
            .chain()
            .iter()
            .flat_map(|block| block.transactions.iter())
            .chain(blockchain.pending_transactions())
            .filter(|tx| !tx.is_reward())
            .collect();

        // Every submission lands exactly once, sealed or still pending
        assert_eq!(recorded.len(), SUBMITTERS as usize);
        for i in 0..SUBMITTERS {
            let sender = format!("sender-{i}");
            let count = recorded.iter().filter(|tx| tx.sender == sender).count();
            assert_eq!(count, 1, "{} recorded {} times", sender, count);
        }
    }

    #[tokio::test]
    async fn test_mine_after_shutdown_aborts() {
        let config = NodeConfig {
            difficulty: 64,
            ..NodeConfig::default()
        };
        let node = Node::new(&config).unwrap();
        node.shutdown();

        assert_eq!(node.mine().await, Err(ChainError::MiningAborted));
        assert_eq!(node.chain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mine_timeout() {
        let config = NodeConfig {
            difficulty: 64,
            mining_timeout: Some(Duration::from_millis(20)),
            ..NodeConfig::default()
        };
        let node = Node::new(&config).unwrap();

        assert_eq!(node.mine().await, Err(ChainError::MiningAborted));
    }

    #[tokio::test]
    async fn test_resolve_without_peers() {
        let node = Node::new(&test_config()).unwrap();
        assert!(!node.resolve().await);
        assert_eq!(node.chain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_skipped() {
        let config = NodeConfig {
            peer_timeout: Duration::from_millis(200),
            ..test_config()
        };
        let node = Node::new(&config).unwrap();
        // Reserved port, nothing listens there
        node.register_node("http://127.0.0.1:1").await.unwrap();

        assert!(!node.resolve().await);
        assert_eq!(node.peers().await, vec!["127.0.0.1:1"]);
    }
}
