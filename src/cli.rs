// CLI commands

use crate::config::{DEFAULT_MINING_REWARD, NodeConfig};
use crate::consensus::{ChainValidator, DEFAULT_DIFFICULTY, Difficulty, MiningControl, ProofOfWork};
use crate::core::{Blockchain, GENESIS_PROOF};
use crate::error::{ChainError, Result};
use crate::network::{Node, api};
use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pow-ledger")]
#[command(about = "Proof-of-work ledger node", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an HTTP ledger node
    Serve(ServeArgs),

    /// Search for a proof against a previous proof
    Prove {
        /// Proof of the previous block
        #[arg(default_value_t = GENESIS_PROOF)]
        previous_proof: u64,
        /// Leading zero hex digits required
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
        difficulty: usize,
    },

    /// Mine a short local chain and validate it
    Demo {
        /// Blocks to mine after genesis
        #[arg(short, long, default_value_t = 3)]
        blocks: usize,
        /// Leading zero hex digits required
        #[arg(short, long, default_value_t = 2)]
        difficulty: usize,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,
    /// Leading zero hex digits required
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    pub difficulty: usize,
    /// Peer to register at startup (repeatable)
    #[arg(long = "peer")]
    pub peers: Vec<String>,
    /// Seconds to wait for each peer during consensus
    #[arg(long, default_value_t = 5)]
    pub peer_timeout_secs: u64,
    /// Give up on a proof search after this many seconds
    #[arg(long)]
    pub mining_timeout_secs: Option<u64>,
    /// Amount paid to this node for each mined block
    #[arg(long, default_value_t = DEFAULT_MINING_REWARD)]
    pub reward: i64,
}

impl ServeArgs {
    /// Build the node configuration
    pub fn to_config(&self) -> NodeConfig {
        NodeConfig {
            bind: SocketAddr::new(self.host, self.port),
            difficulty: self.difficulty,
            genesis_proof: GENESIS_PROOF,
            mining_reward: self.reward,
            peer_timeout: Duration::from_secs(self.peer_timeout_secs),
            mining_timeout: self.mining_timeout_secs.map(Duration::from_secs),
            peers: self.peers.clone(),
        }
    }
}

/// CLI handler
pub struct CliHandler;

impl CliHandler {
    /// Handle CLI command
    pub async fn handle(cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Serve(args) => Self::serve(args).await,
            Commands::Prove {
                previous_proof,
                difficulty,
            } => Self::prove(previous_proof, difficulty),
            Commands::Demo { blocks, difficulty } => Self::demo(blocks, difficulty),
        }
    }

    async fn serve(args: ServeArgs) -> Result<()> {
        let config = args.to_config();
        let node = Node::new(&config)?;
        api::serve(node, config.bind).await
    }

    /// Run a single proof search and report it
    fn prove(previous_proof: u64, difficulty: usize) -> Result<()> {
        let pow = ProofOfWork::new(Difficulty::new(difficulty)?);
        println!("Searching for proof after {} (difficulty {})...\n", previous_proof, difficulty);

        let result = pow.mine(previous_proof, &MiningControl::default());
        if !result.success {
            return Err(ChainError::MiningAborted);
        }

        println!("✓ Proof found\n");
        println!("Proof: {}", result.proof);
        println!("Hash: {}", result.hash);
        println!("Attempts: {}", result.attempts);
        println!("Duration: {:?}", result.duration);
        println!("Hash rate: {:.2} H/s", result.hash_rate());
        Ok(())
    }

    /// Mine a short chain, print it and check it
    fn demo(blocks: usize, difficulty: usize) -> Result<()> {
        let pow = ProofOfWork::new(Difficulty::new(difficulty)?);
        let mut blockchain = Blockchain::new();

        for i in 0..blocks {
            let index = blockchain.append_transaction("alice", "bob", i as i64 + 1);
            let proof = pow.find_proof(blockchain.last_block().proof);
            blockchain.seal_block(proof, None);
            log::debug!("Sealed demo block {}", index);
        }

        println!("Chain ({} blocks):", blockchain.len());
        for block in blockchain.chain() {
            println!("  [{}] {}", block.index, block.hash());
            println!("      previous: {}", block.previous_hash);
            println!("      proof: {}", block.proof);
            println!("      transactions: {}", block.transactions.len());
        }

        ChainValidator::new(pow).validate(blockchain.chain())?;
        println!("\n✓ Chain is valid");
        Ok(())
    }
}
