//! Integration tests for the node's HTTP endpoints

use axum_test::TestServer;
use pow_ledger::network::api::build_api_router;
use pow_ledger::network::{ChainResponse, MinedBlockResponse, ResolveResponse};
use pow_ledger::{ChainValidator, Node, NodeConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn test_node() -> Node {
    let config = NodeConfig {
        difficulty: 1,
        ..NodeConfig::default()
    };
    Node::new(&config).expect("Failed to create node")
}

fn test_server(node: Node) -> TestServer {
    TestServer::new(build_api_router(node)).expect("Failed to create test server")
}

/// Serve `node` on an ephemeral port and return its `host:port`
async fn spawn_node(node: Node) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_api_router(node)).await.unwrap();
    });
    addr.to_string()
}

#[tokio::test]
async fn test_chain_endpoint() {
    let server = test_server(test_node());

    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);
    let body: ChainResponse = response.json();
    assert_eq!(body.length, 1);
    assert_eq!(body.chain[0].index, 1);
    assert_eq!(body.chain[0].previous_hash, "1");
}

#[tokio::test]
async fn test_new_transaction_then_mine() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server
        .post("/transactions/new")
        .json(&json!({"sender": "alice", "recipient": "bob", "amount": 5}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["message"], "Transaction will be added to Block 2");

    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 200);
    let mined: MinedBlockResponse = response.json();
    assert_eq!(mined.message, "New Block Forged");
    assert_eq!(mined.index, 2);
    assert_eq!(mined.transactions.len(), 2);
    assert_eq!(mined.transactions[0].sender, "alice");
    assert_eq!(mined.transactions[1].sender, "0");
    assert_eq!(mined.transactions[1].recipient, node.node_id());

    let body: ChainResponse = server.get("/chain").await.json();
    assert_eq!(body.length, 2);
    assert!(ChainValidator::new(node.pow()).is_valid(&body.chain));
}

#[tokio::test]
async fn test_fractional_amount_is_recorded() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server
        .post("/transactions/new")
        .json(&json!({"sender": "alice", "recipient": "bob", "amount": 2.5}))
        .await;
    assert_eq!(response.status_code(), 201);

    let mined: MinedBlockResponse = server.get("/mine").await.json();
    assert_eq!(mined.transactions[0].amount.as_f64(), Some(2.5));

    let body: Value = server.get("/chain").await.json();
    assert_eq!(body["chain"][1]["transactions"][0]["amount"], 2.5);

    let body: ChainResponse = server.get("/chain").await.json();
    assert!(ChainValidator::new(node.pow()).is_valid(&body.chain));
    assert_eq!(body.chain[1].hash(), node.chain().await[1].hash());
}

#[tokio::test]
async fn test_new_transaction_missing_fields() {
    let server = test_server(test_node());

    let response = server
        .post("/transactions/new")
        .json(&json!({"sender": "alice"}))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_register_nodes() {
    let server = test_server(test_node());

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://127.0.0.1:5001", "127.0.0.1:5002", "http://127.0.0.1:5001"]}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["total_nodes"], json!(["127.0.0.1:5001", "127.0.0.1:5002"]));
}

#[tokio::test]
async fn test_register_nodes_rejects_empty_and_invalid() {
    let node = test_node();
    let server = test_server(node.clone());

    let response = server.post("/nodes/register").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["127.0.0.1:5001", "/no-authority"]}))
        .await;
    assert_eq!(response.status_code(), 400);
    // Nothing from the rejected batch was kept
    assert!(node.peers().await.is_empty());
}

#[tokio::test]
async fn test_resolve_without_peers() {
    let server = test_server(test_node());

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let body: ResolveResponse = response.json();
    assert!(!body.replaced);
    assert_eq!(body.message, "Our chain is authoritative");
    assert_eq!(body.chain.len(), 1);
}

#[tokio::test]
async fn test_resolve_adopts_longer_peer_chain() {
    // Peer mines ahead of us
    let peer = test_node();
    for _ in 0..3 {
        peer.mine().await.unwrap();
    }
    let peer_addr = spawn_node(peer.clone()).await;

    let local = test_node();
    local.mine().await.unwrap();
    let server = test_server(local.clone());

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": [format!("http://{}", peer_addr)]}))
        .await;
    assert_eq!(response.status_code(), 201);

    let body: ResolveResponse = server.get("/nodes/resolve").await.json();
    assert!(body.replaced);
    assert_eq!(body.message, "Our chain was replaced");
    assert_eq!(body.chain, peer.chain().await);

    // Second round: chains are equal, nothing changes
    let body: ResolveResponse = server.get("/nodes/resolve").await.json();
    assert!(!body.replaced);
}

#[tokio::test]
async fn test_resolve_keeps_longer_local_chain() {
    let peer = test_node();
    peer.mine().await.unwrap();
    let peer_addr = spawn_node(peer).await;

    let local = test_node();
    for _ in 0..2 {
        local.mine().await.unwrap();
    }
    local.register_node(&peer_addr).await.unwrap();
    let before = local.chain().await;

    assert!(!local.resolve().await);
    assert_eq!(local.chain().await, before);
}
