// Registry of known peer nodes

use crate::error::{ChainError, Result};
use hyper::Uri;
use std::collections::BTreeSet;

/// Set of peer `host:port` strings consulted during consensus
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer by URL (`http://10.0.0.2:5000`) or bare `host:port`.
    /// Only the network location is kept. Returns false if already known.
    pub fn register(&mut self, address: &str) -> Result<bool> {
        let authority = parse_authority(address)?;
        let added = self.nodes.insert(authority.clone());
        if added {
            log::info!("Registered peer {}", authority);
        }
        Ok(added)
    }

    /// Snapshot of known peers, sorted
    pub fn peers(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Extract the `host:port` part of a peer address
pub fn parse_authority(address: &str) -> Result<String> {
    let address = address.trim();
    let uri: Uri = address
        .parse()
        .map_err(|_| ChainError::InvalidPeerAddress(address.to_string()))?;

    uri.authority()
        .map(|authority| authority.as_str().to_string())
        .filter(|authority| !authority.is_empty())
        .ok_or_else(|| ChainError::InvalidPeerAddress(address.to_string()))
}
