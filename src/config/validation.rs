//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit > 0)
//! - Check that configured addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BallotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::blockchain::address;
use crate::config::schema::BallotConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BallotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let ledger = &config.ledger;

    if let Err(e) = ledger.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "ledger.rpc_url",
            format!("invalid URL '{}': {}", ledger.rpc_url, e),
        ));
    }

    for failover in &ledger.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "ledger.failover_urls",
                format!("invalid URL '{}': {}", failover, e),
            ));
        }
    }

    if ledger.chain_id == 0 {
        errors.push(ValidationError::new("ledger.chain_id", "must be non-zero"));
    }

    if ledger.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.rpc_timeout_secs", "must be greater than 0"));
    }

    if let Err(e) = address::validate(&ledger.contract_address) {
        errors.push(ValidationError::new("ledger.contract_address", e.to_string()));
    }

    if let Some(account) = &ledger.default_account {
        if let Err(e) = address::validate(account) {
            errors.push(ValidationError::new("ledger.default_account", e.to_string()));
        }
    }

    if config.gas.limit == 0 {
        errors.push(ValidationError::new("gas.limit", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BallotConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = BallotConfig::default();
        config.ledger.rpc_url = "not a url".to_string();
        config.ledger.rpc_timeout_secs = 0;
        config.ledger.contract_address = "0x1234".to_string();
        config.gas.limit = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "ledger.rpc_url",
                "ledger.rpc_timeout_secs",
                "ledger.contract_address",
                "gas.limit",
            ]
        );
    }

    #[test]
    fn test_rejects_bad_default_account() {
        let mut config = BallotConfig::default();
        config.ledger.default_account = Some("0xnothex".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ledger.default_account");
    }
}
