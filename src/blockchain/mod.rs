//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! raw address → address.rs (checksum validation)
//! intent      → transaction.rs (call data + nonce + gas)
//!             → submitter.rs (wallet.rs signs, or node-managed)
//!             → client.rs (RPC submit with timeout)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Submissions are never retried with a reused nonce

pub mod address;
pub mod client;
pub mod contract;
pub mod submitter;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{LedgerClient, RpcLedger, Submission, ViewCall};
pub use submitter::Submitter;
pub use transaction::{BuiltTransaction, TransactionIntent};
pub use types::{
    CandidateTally, FailureKind, GasPolicy, LedgerError, LedgerResult, Sender, SubmissionOutcome,
};
pub use wallet::Wallet;
