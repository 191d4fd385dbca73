//! In-process fakes for tests: the Notus API, an EIP-1193 wallet RPC and a wallet provider

use crate::config::NotusConfig;
use crate::constants::{BRZ_POLYGON, USDC_POLYGON};
use crate::signer::WalletProvider;
use crate::types::WalletQuery;
use alloy::hex;
use alloy::primitives::{address, keccak256, Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signer, SignerSync};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_KEY: &str = "test-api-key";

/// Well-known development key #0
pub const SIGNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const SMART_WALLET: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

pub fn signer_key() -> PrivateKeySigner {
    SIGNER_KEY.parse().unwrap()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// ========== Fake Notus API ==========

#[derive(Default)]
struct NotusState {
    hits: HashMap<String, usize>,
    failures: HashMap<String, u16>,
    raw: HashMap<String, String>,
    swap_delay: Option<Duration>,
    quote_id: Option<String>,
    expires_at: Option<u64>,
    last_wallet_query: Option<WalletQuery>,
    last_swap_body: Option<Value>,
    last_execute_body: Option<Value>,
}

type Shared = Arc<Mutex<NotusState>>;

/// Fake Notus API listening on a random local port
pub struct FakeNotus {
    addr: SocketAddr,
    state: Shared,
}

impl FakeNotus {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(NotusState {
            quote_id: Some("0x123".into()),
            ..Default::default()
        }));

        let router = Router::new()
            .route("/api/v1/wallets/register", post(register))
            .route("/api/v1/wallets/address", get(lookup))
            .route("/api/v1/crypto/swap", post(swap))
            .route("/api/v1/crypto/execute-user-op", post(execute))
            .with_state(state.clone());

        let addr = serve(router).await;
        Self { addr, state }
    }

    /// Injected-flow config pointing at this server
    pub fn config(&self) -> NotusConfig {
        NotusConfig::injected(API_KEY).with_base_url(format!("http://{}/api/v1", self.addr))
    }

    /// Answer `route` (e.g. "POST /crypto/swap") with `status`
    pub fn fail(&self, route: &str, status: u16) {
        self.state.lock().unwrap().failures.insert(route.into(), status);
    }

    /// Answer `route` with a raw 200 body
    pub fn respond_raw(&self, route: &str, body: &str) {
        self.state.lock().unwrap().raw.insert(route.into(), body.into());
    }

    pub fn delay_swap(&self, delay: Duration) {
        self.state.lock().unwrap().swap_delay = Some(delay);
    }

    pub fn set_quote_id(&self, quote_id: Option<&str>) {
        self.state.lock().unwrap().quote_id = quote_id.map(Into::into);
    }

    pub fn set_expires_at(&self, expires_at: Option<u64>) {
        self.state.lock().unwrap().expires_at = expires_at;
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().hits.values().sum()
    }

    pub fn last_wallet_query(&self) -> Option<WalletQuery> {
        self.state.lock().unwrap().last_wallet_query.clone()
    }

    pub fn last_swap_body(&self) -> Option<Value> {
        self.state.lock().unwrap().last_swap_body.clone()
    }

    pub fn last_execute_body(&self) -> Option<Value> {
        self.state.lock().unwrap().last_execute_body.clone()
    }
}

/// Count the hit and apply auth, failure and raw overrides
fn enter(state: &Shared, route: &str, headers: &HeaderMap) -> Option<Response> {
    let mut state = state.lock().unwrap();
    *state.hits.entry(route.into()).or_default() += 1;

    let authorized = headers
        .get(crate::constants::API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == API_KEY);
    if !authorized {
        return Some((StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response());
    }

    if let Some(status) = state.failures.get(route) {
        let status = StatusCode::from_u16(*status).unwrap();
        return Some((status, Json(json!({"message": "fake failure"}))).into_response());
    }

    state.raw.get(route).map(|body| {
        (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response()
    })
}

/// Deterministic stand-in for the factory's counterfactual address
fn derive_wallet(query: &WalletQuery) -> Address {
    if query.externally_owned_account == SIGNER {
        return SMART_WALLET;
    }
    let mut preimage = Vec::new();
    preimage.extend_from_slice(query.externally_owned_account.as_slice());
    preimage.extend_from_slice(query.factory.as_slice());
    preimage.extend_from_slice(query.salt.as_bytes());
    Address::from_slice(&keccak256(preimage)[12..])
}

fn wallet_body(query: &WalletQuery) -> Response {
    Json(json!({
        "wallet": {
            "accountAbstraction": derive_wallet(query),
            "externallyOwnedAccount": query.externally_owned_account,
            "factory": query.factory,
            "salt": query.salt,
        }
    }))
    .into_response()
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(query): Json<WalletQuery>,
) -> Response {
    if let Some(resp) = enter(&state, "POST /wallets/register", &headers) {
        return resp;
    }
    state.lock().unwrap().last_wallet_query = Some(query.clone());
    wallet_body(&query)
}

async fn lookup(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<WalletQuery>,
) -> Response {
    if let Some(resp) = enter(&state, "GET /wallets/address", &headers) {
        return resp;
    }
    state.lock().unwrap().last_wallet_query = Some(query.clone());
    wallet_body(&query)
}

async fn swap(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let delay = state.lock().unwrap().swap_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(resp) = enter(&state, "POST /crypto/swap", &headers) {
        return resp;
    }

    let mut state = state.lock().unwrap();
    let quote = json!({
        "quoteId": state.quote_id,
        "expiresAt": state.expires_at,
        "tokenIn": USDC_POLYGON,
        "tokenOut": BRZ_POLYGON,
        "amountIn": body["amountIn"],
        "minAmountOut": "4.9",
        "chainIdIn": body["chainIdIn"],
        "chainIdOut": body["chainIdOut"],
        "walletAddress": body["walletAddress"],
        "estimatedFees": {"maxGasFeeToken": "0.02", "maxGasFeeNative": "0.01"},
    });
    state.last_swap_body = Some(body);
    Json(json!({ "quotes": [quote] })).into_response()
}

async fn execute(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(resp) = enter(&state, "POST /crypto/execute-user-op", &headers) {
        return resp;
    }
    state.lock().unwrap().last_execute_body = Some(body);
    Json(json!({ "userOpHash": "0xHASH" })).into_response()
}

// ========== Fake wallet RPC ==========

struct RpcState {
    key: PrivateKeySigner,
    granted: bool,
    reject: bool,
    calls: HashMap<String, usize>,
}

/// Fake EIP-1193 wallet answering JSON-RPC over HTTP
pub struct FakeWalletRpc {
    addr: SocketAddr,
    state: Arc<Mutex<RpcState>>,
}

impl FakeWalletRpc {
    pub async fn start(key: PrivateKeySigner) -> Self {
        let state = Arc::new(Mutex::new(RpcState {
            key,
            granted: false,
            reject: false,
            calls: HashMap::new(),
        }));
        let router = Router::new().route("/", post(rpc)).with_state(state.clone());
        let addr = serve(router).await;
        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Make the wallet reject every request with code 4001
    pub fn reject_requests(&self) {
        self.state.lock().unwrap().reject = true;
    }

    pub fn calls(&self, method: &str) -> usize {
        self.state.lock().unwrap().calls.get(method).copied().unwrap_or(0)
    }
}

async fn rpc(State(state): State<Arc<Mutex<RpcState>>>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let method = req["method"].as_str().unwrap_or_default().to_string();

    let mut state = state.lock().unwrap();
    *state.calls.entry(method.clone()).or_default() += 1;

    if state.reject {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": 4001, "message": "User rejected the request."}
        }));
    }

    let result = match method.as_str() {
        "eth_requestAccounts" => {
            state.granted = true;
            json!([state.key.address()])
        }
        "eth_accounts" if state.granted => json!([state.key.address()]),
        "eth_accounts" => json!([]),
        "personal_sign" => {
            let data = req["params"][0].as_str().unwrap_or_default();
            let message = hex::decode(data).unwrap();
            let sig = state.key.sign_message_sync(&message).unwrap();
            json!(hex::encode_prefixed(sig.as_bytes()))
        }
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": format!("method {other} not found")}
            }));
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

// ========== Fake wallet provider ==========

/// Wallet provider signing locally, counting signatures
pub struct FakeWallet {
    key: Option<PrivateKeySigner>,
    connected: bool,
    sign_calls: AtomicUsize,
}

impl FakeWallet {
    pub fn with_key(key: PrivateKeySigner) -> Self {
        Self {
            key: Some(key),
            connected: false,
            sign_calls: AtomicUsize::new(0),
        }
    }

    /// Wallet that connects but exposes no accounts
    pub fn empty() -> Self {
        Self {
            key: None,
            connected: false,
            sign_calls: AtomicUsize::new(0),
        }
    }

    /// Start already connected, as after a previous login
    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

impl WalletProvider for FakeWallet {
    async fn connect(&mut self) -> eyre::Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn request_addresses(&self) -> eyre::Result<Vec<Address>> {
        Ok(self.key.iter().map(|k| k.address()).collect())
    }

    async fn sign_message(&self, address: Address, message: &[u8]) -> eyre::Result<Signature> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        let key = self.key.as_ref().ok_or_else(|| eyre::eyre!("no key"))?;
        eyre::ensure!(key.address() == address, "unknown account {}", address);
        Ok(key.sign_message(message).await?)
    }

    async fn disconnect(&mut self) -> eyre::Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
