//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Define the `LedgerClient` capability the engine talks to
//! - Connect to JSON-RPC endpoints (primary + read failovers)
//! - Bound every call with the configured timeout
//! - Classify node rejections apart from transport faults

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::config::LedgerConfig;
use crate::observability::metrics;

/// A transaction ready to hand to the node.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Locally signed, EIP-2718 encoded payload.
    Raw(Bytes),
    /// Unsigned request the node signs with one of its own accounts.
    NodeManaged(TransactionRequest),
}

/// Read-only contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCall {
    pub to: Address,
    pub data: Bytes,
}

/// RPC capabilities the engine needs from a ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Transaction count of `address` including its pending transactions.
    /// Never cached.
    async fn get_nonce(&self, address: Address) -> LedgerResult<u64>;

    /// Submit a transaction once. Rejections are terminal.
    async fn submit(&self, submission: Submission) -> LedgerResult<TxHash>;

    /// Execute a view-call and return the raw return data.
    async fn call(&self, call: ViewCall) -> LedgerResult<Bytes>;

    /// Accounts the node can send from without a local key.
    async fn accounts(&self) -> LedgerResult<Vec<Address>>;
}

/// JSON-RPC ledger client backed by alloy HTTP providers.
#[derive(Clone)]
pub struct RpcLedger {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: LedgerConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcLedger {
    /// Create a new ledger client.
    ///
    /// Fails only on an unparseable primary URL; an unreachable node is
    /// reported per call.
    pub async fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            LedgerError::RpcUnavailable(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Ledger client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Ledger client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> LedgerResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(LedgerError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> LedgerResult<u64> {
        self.read("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
    }

    /// Run a read against each provider in turn until one answers.
    async fn read<T, F, Fut>(&self, method: &'static str, op: F) -> LedgerResult<T>
    where
        T: Send,
        F: Fn(Arc<dyn Provider + Send + Sync>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, TransportError>> + Send,
    {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    metrics::record_rpc_error(method);
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                    last_error = e.to_string();
                }
                Err(_) => {
                    metrics::record_rpc_error(method);
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                    last_error = format!("timeout after {}s", self.config.rpc_timeout_secs);
                }
            }
        }
        Err(LedgerError::RpcUnavailable(format!(
            "{} failed on all providers: {}",
            method, last_error
        )))
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn get_nonce(&self, address: Address) -> LedgerResult<u64> {
        self.read("eth_getTransactionCount", move |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    async fn submit(&self, submission: Submission) -> LedgerResult<TxHash> {
        // Primary only: resending to a failover after an indeterminate
        // outcome would spend the same nonce twice.
        let provider = self.providers[0].clone();
        let method = match &submission {
            Submission::Raw(_) => "eth_sendRawTransaction",
            Submission::NodeManaged(_) => "eth_sendTransaction",
        };

        let fut = async move {
            let pending = match submission {
                Submission::Raw(raw) => provider.send_raw_transaction(&raw).await?,
                Submission::NodeManaged(request) => provider.send_transaction(request).await?,
            };
            Ok::<_, TransportError>(*pending.tx_hash())
        };

        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(hash)) => Ok(hash),
            Ok(Err(e)) => {
                metrics::record_rpc_error(method);
                Err(classify_submit_error(e))
            }
            Err(_) => {
                metrics::record_rpc_error(method);
                Err(LedgerError::RpcUnavailable(format!(
                    "{} timed out after {}s; outcome unknown",
                    method, self.config.rpc_timeout_secs
                )))
            }
        }
    }

    async fn call(&self, call: ViewCall) -> LedgerResult<Bytes> {
        let request = TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.data);
        self.read("eth_call", move |p| {
            let request = request.clone();
            async move { p.call(request).await }
        })
        .await
    }

    async fn accounts(&self) -> LedgerResult<Vec<Address>> {
        self.read("eth_accounts", |p| async move { p.get_accounts().await })
            .await
    }
}

/// Node error responses are rejections; everything else is a transport fault.
fn classify_submit_error(err: TransportError) -> LedgerError {
    match err.as_error_resp() {
        Some(payload) => LedgerError::RpcRejected(payload.message.to_string()),
        None => LedgerError::RpcUnavailable(err.to_string()),
    }
}

impl std::fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedger")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
