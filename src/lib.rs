//! Ledger synchronization and voting transaction engine.
//!
//! Turns candidate, voter and vote records into sequenced, signed ledger
//! transactions against a deployed OnlineVoting contract, and reports an
//! outcome for every item.

pub mod blockchain;
pub mod config;
pub mod engine;
pub mod observability;
pub mod sync;

pub use blockchain::{LedgerClient, LedgerError, SubmissionOutcome};
pub use config::BallotConfig;
pub use engine::Engine;
pub use sync::{CandidateRecord, SyncReport, VoteReceipt, VoterRecord};
