//! Bulk candidate and voter synchronization.
//!
//! One sender account funds the whole batch. Records are processed in input
//! order and a failure on one record never stops the rest.

use alloy::primitives::Address;

use crate::blockchain::address;
use crate::blockchain::transaction::TransactionIntent;
use crate::observability::metrics;
use crate::sync::pipeline::Pipeline;
use crate::sync::{CandidateRecord, SyncEntry, SyncReport, VoterRecord};

/// Pushes application records onto the ledger from a shared sender.
#[derive(Clone)]
pub struct BatchSynchronizer {
    pipeline: Pipeline,
    sender: Address,
}

impl BatchSynchronizer {
    pub fn new(pipeline: Pipeline, sender: Address) -> Self {
        Self { pipeline, sender }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Register every candidate by name.
    pub async fn sync_candidates(&self, records: &[CandidateRecord]) -> SyncReport {
        metrics::record_batch_size("candidates", records.len());
        if records.is_empty() {
            return SyncReport::nothing_to_do("No candidates to synchronize.");
        }

        tracing::info!(count = records.len(), sender = %self.sender, "Synchronizing candidates");

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let intent = TransactionIntent::RegisterCandidate {
                name: record.name.clone(),
            };
            let outcome = self.pipeline.send(intent, self.sender).await;
            entries.push(SyncEntry {
                subject: record.name.clone(),
                outcome,
            });
        }

        SyncReport::completed("Candidates", entries)
    }

    /// Register every voter that has a wallet address.
    ///
    /// Records without an address are skipped entirely; invalid addresses
    /// are reported as failures without touching the ledger.
    pub async fn sync_voters(&self, records: &[VoterRecord]) -> SyncReport {
        let present: Vec<&str> = records.iter().filter_map(VoterRecord::present_address).collect();
        metrics::record_batch_size("voters", present.len());

        if present.is_empty() {
            return SyncReport::nothing_to_do("No voters found with a valid wallet address.");
        }

        tracing::info!(
            count = present.len(),
            skipped = records.len() - present.len(),
            sender = %self.sender,
            "Synchronizing voters"
        );

        let mut entries = Vec::with_capacity(present.len());
        for raw in present {
            let entry = match address::validate(raw) {
                Ok(voter) => SyncEntry {
                    subject: address::checksum(&voter),
                    outcome: self
                        .pipeline
                        .send(TransactionIntent::RegisterVoter { address: voter }, self.sender)
                        .await,
                },
                Err(e) => {
                    tracing::warn!(address = %raw, "Skipping voter with invalid address");
                    SyncEntry {
                        subject: raw.to_string(),
                        outcome: e.into(),
                    }
                }
            };
            entries.push(entry);
        }

        SyncReport::completed("Voters", entries)
    }
}
