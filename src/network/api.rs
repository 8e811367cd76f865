//! HTTP interface for a ledger node
//!
//! | Method | Path                | Purpose                               |
//! |--------|---------------------|---------------------------------------|
//! | GET    | `/chain`            | Full chain and its length             |
//! | POST   | `/transactions/new` | Buffer a transaction                  |
//! | GET    | `/mine`             | Run proof of work and seal a block    |
//! | POST   | `/nodes/register`   | Add peers                             |
//! | GET    | `/nodes/resolve`    | Adopt the longest valid peer chain    |

use crate::core::Transaction;
use crate::error::{ChainError, Result};
use crate::network::{
    ChainResponse, MessageResponse, MinedBlockResponse, NewTransactionRequest, Node,
    RegisterNodesRequest, RegisterNodesResponse, ResolveResponse, parse_authority,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

type ApiError = (StatusCode, Json<MessageResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
}

/// Build the router for `node`
pub fn build_api_router(node: Node) -> Router {
    Router::new()
        .route("/chain", get(full_chain))
        .route("/transactions/new", post(new_transaction))
        .route("/mine", get(mine))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve))
        .with_state(node)
}

/// Serve `node` on `addr` until Ctrl-C
pub async fn serve(node: Node, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Node listening on {}", listener.local_addr()?);

    let shutdown_node = node.clone();
    axum::serve(listener, build_api_router(node))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
            shutdown_node.shutdown();
        })
        .await
        .map_err(ChainError::from)
}

async fn full_chain(State(node): State<Node>) -> Json<ChainResponse> {
    Json(ChainResponse::new(node.chain().await))
}

async fn new_transaction(
    State(node): State<Node>,
    Json(req): Json<NewTransactionRequest>,
) -> (StatusCode, Json<MessageResponse>) {
    let tx = Transaction::new(req.sender, req.recipient, req.amount);
    let index = node.new_transaction(tx).await;

    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to Block {}", index),
        }),
    )
}

async fn mine(State(node): State<Node>) -> std::result::Result<Json<MinedBlockResponse>, ApiError> {
    match node.mine().await {
        Ok(block) => Ok(Json(MinedBlockResponse::new(block))),
        Err(e) => Err(api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

async fn register_nodes(
    State(node): State<Node>,
    Json(req): Json<RegisterNodesRequest>,
) -> std::result::Result<(StatusCode, Json<RegisterNodesResponse>), ApiError> {
    if req.nodes.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Error: Please supply a valid list of nodes",
        ));
    }

    // Reject the whole batch before registering any of it
    for address in &req.nodes {
        parse_authority(address).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    for address in &req.nodes {
        node.register_node(address)
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes: node.peers().await,
        }),
    ))
}

async fn resolve(State(node): State<Node>) -> Json<ResolveResponse> {
    let replaced = node.resolve().await;
    Json(ResolveResponse::new(replaced, node.chain().await))
}
