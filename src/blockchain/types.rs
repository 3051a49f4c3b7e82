//! Ledger-facing types and error definitions.

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Input is not a well-formed or checksum-valid address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Candidate ID is not a non-negative integer.
    #[error("Invalid candidate ID: {0}")]
    InvalidCandidateId(String),

    /// RPC connection failed or timed out.
    #[error("RPC unavailable: {0}")]
    RpcUnavailable(String),

    /// Node declined the transaction (bad nonce, revert, insufficient funds).
    #[error("RPC rejected: {0}")]
    RpcRejected(String),

    /// No local key and the node cannot send on behalf of the address.
    #[error("Signing unavailable: {0}")]
    SigningUnavailable(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A view-call result could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Serializable category of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidAddress,
    InvalidCandidateId,
    RpcUnavailable,
    RpcRejected,
    SigningUnavailable,
    Wallet,
    Decode,
    ChainMismatch,
}

impl From<&LedgerError> for FailureKind {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::InvalidAddress(_) => Self::InvalidAddress,
            LedgerError::InvalidCandidateId(_) => Self::InvalidCandidateId,
            LedgerError::RpcUnavailable(_) => Self::RpcUnavailable,
            LedgerError::RpcRejected(_) => Self::RpcRejected,
            LedgerError::SigningUnavailable(_) => Self::SigningUnavailable,
            LedgerError::Wallet(_) => Self::Wallet,
            LedgerError::Decode(_) => Self::Decode,
            LedgerError::ChainMismatch { .. } => Self::ChainMismatch,
        }
    }
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The node accepted the transaction.
    Success { transaction_hash: TxHash },
    /// The transaction was not accepted, or never built.
    Failure { kind: FailureKind, reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn transaction_hash(&self) -> Option<TxHash> {
        match self {
            Self::Success { transaction_hash } => Some(*transaction_hash),
            Self::Failure { .. } => None,
        }
    }

    /// Failure category, if this outcome is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

impl From<LedgerResult<TxHash>> for SubmissionOutcome {
    fn from(result: LedgerResult<TxHash>) -> Self {
        match result {
            Ok(transaction_hash) => Self::Success { transaction_hash },
            Err(e) => Self::Failure {
                kind: FailureKind::from(&e),
                reason: e.to_string(),
            },
        }
    }
}

impl From<LedgerError> for SubmissionOutcome {
    fn from(err: LedgerError) -> Self {
        Self::from(Err::<TxHash, _>(err))
    }
}

/// One tallied candidate as returned by the contract's results view.
///
/// Serializes as `{"id": 1, "name": "Alice", "voteCount": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub id: u64,
    pub name: String,
    pub vote_count: u64,
}

/// Flat gas policy applied to every built transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
}

impl GasPolicy {
    const WEI_PER_GWEI: u128 = 1_000_000_000;

    pub fn flat(gas_limit: u64, gas_price_gwei: u64) -> Self {
        Self {
            gas_limit,
            gas_price: gas_price_gwei as u128 * Self::WEI_PER_GWEI,
        }
    }
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self::flat(200_000, 50)
    }
}

/// Where a submitted transaction came from, relative to the audited actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub address: Address,
    /// True when the address is the engine's default account standing in for
    /// the actor whose key is not available.
    pub fallback: bool,
}
