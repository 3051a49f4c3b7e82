//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use ballot_ledger::blockchain::{LedgerClient, LedgerError, LedgerResult, Submission, ViewCall};

/// Hardhat/Anvil account #0.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_KEY_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// Hardhat/Anvil account #1.
pub const SECOND_ACCOUNT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
/// Hardhat/Anvil account #2.
pub const THIRD_ACCOUNT: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

pub fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

/// A transaction as the fake node saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenTx {
    pub from: Address,
    pub nonce: u64,
    pub input: Bytes,
    pub raw: bool,
}

#[derive(Default)]
struct State {
    nonces: HashMap<Address, u64>,
    nonce_reads: Vec<Address>,
    submissions: Vec<SeenTx>,
    submit_attempts: usize,
    account_reads: usize,
    view_calls: usize,
}

/// Deterministic in-memory ledger node.
///
/// Nonces advance only on accepted submissions, like a real node.
#[derive(Default)]
pub struct FakeLedger {
    state: Mutex<State>,
    unlocked: Vec<Address>,
    raw_signer: Option<Address>,
    results: Bytes,
    nonce_outage: bool,
    submit_outage: bool,
    reject_attempts: HashSet<usize>,
    yield_between: bool,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts the node reports as unlocked.
    pub fn with_unlocked(mut self, accounts: &[&str]) -> Self {
        self.unlocked = accounts.iter().map(|a| addr(a)).collect();
        self
    }

    /// Attribute raw (locally signed) submissions to this account.
    pub fn with_raw_signer(mut self, signer: &str) -> Self {
        self.raw_signer = Some(addr(signer));
        self
    }

    pub fn with_nonce(self, account: &str, nonce: u64) -> Self {
        self.state.lock().unwrap().nonces.insert(addr(account), nonce);
        self
    }

    pub fn with_results(mut self, encoded: Vec<u8>) -> Self {
        self.results = encoded.into();
        self
    }

    /// Every nonce read fails as if the node were unreachable.
    pub fn with_nonce_outage(mut self) -> Self {
        self.nonce_outage = true;
        self
    }

    /// Every submission fails as if the node were unreachable.
    pub fn with_submit_outage(mut self) -> Self {
        self.submit_outage = true;
        self
    }

    /// Reject the given submission attempts (0-based).
    pub fn rejecting_attempts(mut self, attempts: &[usize]) -> Self {
        self.reject_attempts = attempts.iter().copied().collect();
        self
    }

    /// Yield to the scheduler inside every call to expose interleavings.
    pub fn yielding(mut self) -> Self {
        self.yield_between = true;
        self
    }

    pub fn submissions(&self) -> Vec<SeenTx> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn nonce_reads(&self) -> Vec<Address> {
        self.state.lock().unwrap().nonce_reads.clone()
    }

    pub fn submit_attempts(&self) -> usize {
        self.state.lock().unwrap().submit_attempts
    }

    pub fn account_reads(&self) -> usize {
        self.state.lock().unwrap().account_reads
    }

    pub fn view_calls(&self) -> usize {
        self.state.lock().unwrap().view_calls
    }

    /// Total RPC calls of any kind.
    pub fn rpc_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.nonce_reads.len() + state.submit_attempts + state.account_reads + state.view_calls
    }

    async fn pause(&self) {
        if self.yield_between {
            tokio::task::yield_now().await;
        }
    }

    fn decode(&self, submission: &Submission) -> SeenTx {
        match submission {
            Submission::Raw(raw) => {
                let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).expect("valid envelope");
                SeenTx {
                    from: self.raw_signer.expect("raw signer configured"),
                    nonce: envelope.nonce(),
                    input: envelope.input().clone(),
                    raw: true,
                }
            }
            Submission::NodeManaged(request) => SeenTx {
                from: request.from.expect("from set"),
                nonce: request.nonce.expect("nonce set"),
                input: request.input.input().cloned().unwrap_or_default(),
                raw: false,
            },
        }
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_nonce(&self, address: Address) -> LedgerResult<u64> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.nonce_reads.push(address);
        if self.nonce_outage {
            return Err(LedgerError::RpcUnavailable("connection refused".to_string()));
        }
        Ok(state.nonces.get(&address).copied().unwrap_or(0))
    }

    async fn submit(&self, submission: Submission) -> LedgerResult<TxHash> {
        self.pause().await;
        let seen = self.decode(&submission);
        let mut state = self.state.lock().unwrap();
        let attempt = state.submit_attempts;
        state.submit_attempts += 1;

        if self.submit_outage {
            return Err(LedgerError::RpcUnavailable("connection reset".to_string()));
        }
        if self.reject_attempts.contains(&attempt) {
            return Err(LedgerError::RpcRejected("execution reverted".to_string()));
        }

        let expected = state.nonces.get(&seen.from).copied().unwrap_or(0);
        if seen.nonce != expected {
            return Err(LedgerError::RpcRejected(format!(
                "nonce mismatch: expected {}, got {}",
                expected, seen.nonce
            )));
        }
        state.nonces.insert(seen.from, expected + 1);

        let mut preimage = seen.from.to_vec();
        preimage.extend_from_slice(&seen.nonce.to_be_bytes());
        let hash = keccak256(&preimage);
        state.submissions.push(seen);
        Ok(hash)
    }

    async fn call(&self, _call: ViewCall) -> LedgerResult<Bytes> {
        self.pause().await;
        self.state.lock().unwrap().view_calls += 1;
        Ok(self.results.clone())
    }

    async fn accounts(&self) -> LedgerResult<Vec<Address>> {
        self.pause().await;
        self.state.lock().unwrap().account_reads += 1;
        Ok(self.unlocked.clone())
    }
}

/// A TCP endpoint that accepts connections and never answers.
pub async fn start_silent_node() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Start a JSON-RPC node over HTTP whose replies come from `handler`.
///
/// `handler` receives the method and params of each request; `Err` becomes a
/// JSON-RPC error response. One request per connection.
pub async fn start_json_rpc_node<F>(handler: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let Some(body) = read_http_body(&mut socket).await else {
                    return;
                };
                let Ok(request) = serde_json::from_slice::<Value>(&body) else {
                    return;
                };
                let method = request["method"].as_str().unwrap_or_default();
                let reply = match handler(method, &request["params"]) {
                    Ok(result) => json!({"jsonrpc": "2.0", "id": request["id"], "result": result}),
                    Err(message) => json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "error": {"code": -32000, "message": message}
                    }),
                };

                let body = reply.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

async fn read_http_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..header_end + length].to_vec())
}
