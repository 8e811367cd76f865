// Longest valid chain consensus

use crate::consensus::ChainValidator;
use crate::core::{Block, Blockchain};
use crate::network::ChainFetcher;
use tokio::sync::RwLock;

/// Replaces the local chain with the longest valid chain among peers.
///
/// Only a strictly longer chain can win, so between two equally long valid
/// forks the local one always stays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Consensus {
    validator: ChainValidator,
}

impl Consensus {
    pub fn new(validator: ChainValidator) -> Self {
        Self { validator }
    }

    /// Pick the best chain offered by `peers`, without touching the ledger.
    /// Returns `None` if no peer beats `local_len`.
    pub async fn best_candidate<F: ChainFetcher>(
        &self,
        local_len: usize,
        peers: &[String],
        fetcher: &F,
    ) -> Option<Vec<Block>> {
        let mut max_length = local_len;
        let mut best = None;

        for peer in peers {
            let response = match fetcher.fetch_chain(peer).await {
                Ok(response) => response,
                Err(e) => {
                    log::debug!("Skipping peer {}: {}", peer, e);
                    continue;
                }
            };

            if !response.is_consistent() {
                log::warn!(
                    "Skipping peer {}: advertised length {} but sent {} blocks",
                    peer,
                    response.length,
                    response.chain.len()
                );
                continue;
            }

            let length = response.chain.len();
            if length > max_length && self.validator.is_valid(&response.chain) {
                log::debug!("Peer {} offers a valid chain of {} blocks", peer, length);
                max_length = length;
                best = Some(response.chain);
            }
        }

        best
    }

    /// Query every peer and adopt the longest valid chain longer than ours.
    /// Returns true if the local chain was replaced.
    ///
    /// Peers are queried without holding the ledger lock; the write lock is
    /// only taken for the final swap.
    pub async fn resolve<F: ChainFetcher>(
        &self,
        blockchain: &RwLock<Blockchain>,
        peers: &[String],
        fetcher: &F,
    ) -> bool {
        let local_len = blockchain.read().await.len();

        let Some(candidate) = self.best_candidate(local_len, peers, fetcher).await else {
            log::debug!("Local chain of {} blocks is authoritative", local_len);
            return false;
        };

        let mut blockchain = blockchain.write().await;
        // The local chain may have grown while peers were being queried
        if candidate.len() <= blockchain.len() {
            log::info!(
                "Discarding peer chain of {} blocks; local chain grew to {}",
                candidate.len(),
                blockchain.len()
            );
            return false;
        }

        blockchain.replace_chain(candidate).is_ok()
    }
}
