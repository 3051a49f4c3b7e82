//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the engine.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable holding the optional signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "BALLOT_LEDGER_PRIVATE_KEY";

/// Environment variable overriding `ledger.default_account`.
pub const DEFAULT_ACCOUNT_ENV_VAR: &str = "BALLOT_LEDGER_ACCOUNT";

/// Root configuration for the ledger synchronization engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BallotConfig {
    /// Ledger node and contract settings.
    pub ledger: LedgerConfig,

    /// Flat gas policy.
    pub gas: GasConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node connection and contract settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for read paths only.
    pub failover_urls: Vec<String>,

    /// Chain ID used for EIP-155 signing (31337 for a local Hardhat node).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Address of the deployed OnlineVoting contract.
    pub contract_address: String,

    /// Account that sends batch transactions and pays gas.
    ///
    /// When unset, the wallet address is used if a key is configured,
    /// otherwise the node's first unlocked account.
    pub default_account: Option<String>,

    /// Send a vote from the default account when the voter's own key is not
    /// available. The receipt records when this happens.
    pub allow_sender_fallback: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            default_account: None,
            allow_sender_fallback: true,
        }
    }
}

/// Gas settings applied to every built transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Gas limit per transaction.
    pub limit: u64,

    /// Gas price in gwei.
    pub price_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit: 200_000,
            price_gwei: 50,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_node() {
        let config = BallotConfig::default();
        assert_eq!(config.ledger.chain_id, 31337);
        assert_eq!(config.gas.limit, 200_000);
        assert_eq!(config.gas.price_gwei, 50);
        assert!(config.ledger.allow_sender_fallback);
        assert!(config.ledger.default_account.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: BallotConfig = toml::from_str(
            r#"
            [ledger]
            rpc_url = "http://node:8545"

            [gas]
            price_gwei = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger.rpc_url, "http://node:8545");
        assert_eq!(config.ledger.rpc_timeout_secs, 10);
        assert_eq!(config.gas.price_gwei, 2);
        assert_eq!(config.gas.limit, 200_000);
        assert_eq!(config.observability.log_level, "info");
    }
}
