// Fetching chains from peers

use crate::network::ChainResponse;
use hyper::client::HttpConnector;
use hyper::{Client, StatusCode, Uri};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default time allowed for one peer to answer
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a peer's chain could not be obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    InvalidAddress(String),
    Transport(String),
    Timeout,
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::InvalidAddress(addr) => write!(f, "Invalid peer address: {}", addr),
            FetchError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FetchError::Timeout => write!(f, "Peer timed out"),
            FetchError::Status(code) => write!(f, "Unexpected status {}", code),
            FetchError::Decode(msg) => write!(f, "Malformed chain response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of peer chains for consensus
pub trait ChainFetcher {
    /// Fetch the full chain advertised by `peer` (a `host:port` string)
    fn fetch_chain(
        &self,
        peer: &str,
    ) -> impl Future<Output = Result<ChainResponse, FetchError>> + Send;
}

/// Fetches `GET http://<peer>/chain` over HTTP/1.1
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: Client<HttpConnector>,
    timeout: Duration,
}

impl HttpChainFetcher {
    /// Create a fetcher with the given per-peer timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn fetch(&self, uri: Uri) -> Result<ChainResponse, FetchError> {
        let response = self
            .client
            .get(uri)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for HttpChainFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PEER_TIMEOUT)
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse, FetchError> {
        let uri: Uri = format!("http://{}/chain", peer)
            .parse()
            .map_err(|_| FetchError::InvalidAddress(peer.to_string()))?;

        // Timeout covers the request and the body read
        tokio::time::timeout(self.timeout, self.fetch(uri))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}
