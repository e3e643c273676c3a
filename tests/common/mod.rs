//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use charity_platform::config::PlatformConfig;
use charity_platform::database::SqliteStore;
use charity_platform::lifecycle::Shutdown;
use charity_platform::solana::{Pubkey, SolanaClient, Wallet};
use charity_platform::{AppState, HttpServer};

pub const ADMIN_KEY: &str = "test-admin-key";

pub const MOCK_SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

/// 2.5 SOL.
pub const MOCK_BALANCE_LAMPORTS: u64 = 2_500_000_000;

/// Deterministic wallet for test keys.
pub fn wallet(seed: u8) -> Wallet {
    Wallet::from_secret_bytes(&[seed; 32]).unwrap()
}

pub fn address(seed: u8) -> Pubkey {
    wallet(seed).pubkey()
}

/// Methods the mock node has been asked for, in call order.
#[derive(Clone, Default)]
pub struct RpcLog(Arc<Mutex<Vec<String>>>);

impl RpcLog {
    pub fn methods(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn called(&self, method: &str) -> bool {
        self.methods().iter().any(|m| m == method)
    }
}

/// How the mock node behaves.
#[derive(Clone, Copy)]
pub struct MockNode {
    /// When false, every signature status lookup comes back unknown.
    pub confirms: bool,
}

impl Default for MockNode {
    fn default() -> Self {
        Self { confirms: true }
    }
}

/// Start a JSON-RPC node that answers the calls the platform makes with
/// fixed results.
pub async fn start_mock_rpc() -> (SocketAddr, RpcLog) {
    start_mock_rpc_with(MockNode::default()).await
}

pub async fn start_mock_rpc_with(node: MockNode) -> (SocketAddr, RpcLog) {
    let log = RpcLog::default();
    let app = Router::new()
        .route("/", post(answer_rpc))
        .with_state((log.clone(), node));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, log)
}

async fn answer_rpc(
    State((log, node)): State<(RpcLog, MockNode)>,
    Json(request): Json<Value>,
) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    log.0.lock().unwrap().push(method.clone());

    let context = json!({ "slot": 4242 });
    let token_amount = |amount: &str, ui: &str| {
        json!({ "context": context, "value": { "amount": amount, "decimals": 9, "uiAmountString": ui } })
    };

    let result = match method.as_str() {
        "getHealth" => json!("ok"),
        "getBalance" => json!({ "context": context, "value": MOCK_BALANCE_LAMPORTS }),
        "getTokenAccountBalance" => token_amount("1500000000", "1.5"),
        "getTokenSupply" => token_amount("1000000000000000", "1000000"),
        "getLatestBlockhash" => json!({
            "context": context,
            "value": {
                "blockhash": "11111111111111111111111111111111",
                "lastValidBlockHeight": 5000
            }
        }),
        "getAccountInfo" => json!({ "context": context, "value": null }),
        "getFeeForMessage" => json!({ "context": context, "value": 5000 }),
        "sendTransaction" | "requestAirdrop" => json!(MOCK_SIGNATURE),
        "getSignatureStatuses" if !node.confirms => json!({ "context": context, "value": [null] }),
        "getSignatureStatuses" => json!({
            "context": context,
            "value": [{
                "slot": 4242,
                "confirmations": null,
                "err": null,
                "confirmationStatus": "finalized"
            }]
        }),
        "getSignaturesForAddress" => json!([]),
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": { "code": -32601, "message": "Method not found" }
            }))
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }))
}

/// A platform server running on an ephemeral port.
pub struct TestPlatform {
    pub base_url: String,
    pub state: AppState,
    pub rpc: RpcLog,
    shutdown: Shutdown,
}

impl TestPlatform {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestPlatform {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Test configuration: in-memory store, mock node, admin routes on.
///
/// The zakat pool is owned by `wallet(7)`.
pub fn test_config(rpc_addr: SocketAddr) -> PlatformConfig {
    let mut config = PlatformConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.fallback_to_mock = false;
    config.solana.network = "devnet".to_string();
    config.solana.rpc_url = format!("http://{rpc_addr}");
    config.solana.charity_token_mint = address(9).to_string();
    config.solana.zakat_pool_address = address(7).to_string();
    config.solana.rpc_timeout_secs = 2;
    config.solana.confirmation_retries = 2;
    config.solana.confirmation_delay_ms = 10;
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

pub async fn spawn_platform() -> TestPlatform {
    spawn_platform_with(|_| {}, None).await
}

/// Start a platform after `customize` adjusts the test configuration.
pub async fn spawn_platform_with<F>(customize: F, authority: Option<Wallet>) -> TestPlatform
where
    F: FnOnce(&mut PlatformConfig),
{
    spawn_platform_on(MockNode::default(), customize, authority).await
}

/// Start a platform backed by a mock node that behaves as `node` says.
pub async fn spawn_platform_on<F>(node: MockNode, customize: F, authority: Option<Wallet>) -> TestPlatform
where
    F: FnOnce(&mut PlatformConfig),
{
    let (rpc_addr, rpc) = start_mock_rpc_with(node).await;
    let mut config = test_config(rpc_addr);
    customize(&mut config);

    let store = SqliteStore::connect(&config.database.url, 1).await.unwrap();
    let solana = SolanaClient::new(&config.solana).unwrap();
    let state = AppState::new(config, Arc::new(store), solana, authority);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(state.clone());
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestPlatform {
        base_url: format!("http://{addr}"),
        state,
        rpc,
        shutdown,
    }
}

/// Client that skips system proxies, as local test servers need.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
