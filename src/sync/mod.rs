//! Synchronization and voting orchestration.
//!
//! # Data Flow
//! ```text
//! CandidateRecord / VoterRecord → batch.rs ─┐
//! (voter, candidate id)         → vote.rs  ─┤
//!                                           ▼
//!                    pipeline.rs: nonce → build → submit
//!                                           ▼
//!                          SyncReport / VoteReceipt
//! ```
//!
//! Every step for one sender is sequential: a nonce is fetched, spent, and
//! only then is the next one fetched.

pub mod batch;
pub mod pipeline;
pub mod vote;

use serde::{Deserialize, Serialize};

use crate::blockchain::types::{Sender, SubmissionOutcome};

pub use batch::BatchSynchronizer;
pub use pipeline::Pipeline;
pub use vote::VoteCaster;

/// A candidate row from the application store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A voter row from the application store. The wallet address is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    #[serde(default)]
    pub address: Option<String>,
}

impl VoterRecord {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    pub fn without_address() -> Self {
        Self::default()
    }

    /// The address, if one is present and non-blank.
    pub fn present_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Whether a batch had anything to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Completed,
    NothingToDo,
}

/// Outcome for one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntry {
    /// Candidate name or voter address.
    pub subject: String,
    pub outcome: SubmissionOutcome,
}

/// Itemized batch result, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub message: String,
    pub entries: Vec<SyncEntry>,
}

impl SyncReport {
    pub fn nothing_to_do(message: impl Into<String>) -> Self {
        Self {
            status: SyncStatus::NothingToDo,
            message: message.into(),
            entries: Vec::new(),
        }
    }

    pub fn completed(what: &str, entries: Vec<SyncEntry>) -> Self {
        let succeeded = entries.iter().filter(|e| e.outcome.is_success()).count();
        let failed = entries.len() - succeeded;
        Self {
            status: SyncStatus::Completed,
            message: format!("{} synced: {} succeeded, {} failed", what, succeeded, failed),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SyncEntry> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }
}

/// Result of a single cast-vote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// The voter recorded for audit: checksum form when valid, raw input otherwise.
    pub voter: String,
    pub candidate_id: i64,
    /// The account that actually sent the transaction, when one was resolved.
    /// `sender.fallback` marks votes paid and sent by the default account.
    pub sender: Option<Sender>,
    pub outcome: SubmissionOutcome,
}

impl VoteReceipt {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// True when the ledger sender differs from the audited voter.
    pub fn used_fallback_sender(&self) -> bool {
        self.sender.is_some_and(|s| s.fallback)
    }
}
