// Networking: peer registry, chain fetching and the HTTP node

mod message;
mod registry;
mod client;
mod node;
pub mod api;

pub use message::{
    ChainResponse, MessageResponse, MinedBlockResponse, NewTransactionRequest,
    RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};
pub use registry::{NodeRegistry, parse_authority};
pub use client::{ChainFetcher, DEFAULT_PEER_TIMEOUT, FetchError, HttpChainFetcher};
pub use node::Node;
