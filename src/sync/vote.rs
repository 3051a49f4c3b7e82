//! Single-vote path.
//!
//! The ledger sender is the voter when its key is usable (held locally or
//! unlocked on the node). Otherwise the default account sends on the voter's
//! behalf and the receipt marks the substitution: the ledger then records the
//! default account, not the voter, as `msg.sender`.

use alloy::primitives::Address;

use crate::blockchain::address;
use crate::blockchain::transaction::TransactionIntent;
use crate::blockchain::types::{LedgerError, LedgerResult, Sender, SubmissionOutcome};
use crate::sync::pipeline::Pipeline;
use crate::sync::VoteReceipt;

/// Casts one vote per call.
#[derive(Clone)]
pub struct VoteCaster {
    pipeline: Pipeline,
    default_account: Address,
    allow_fallback: bool,
}

impl VoteCaster {
    pub fn new(pipeline: Pipeline, default_account: Address, allow_fallback: bool) -> Self {
        Self {
            pipeline,
            default_account,
            allow_fallback,
        }
    }

    /// Validate, pick the sender, and submit the vote.
    ///
    /// Validation failures return before any RPC call.
    pub async fn cast_vote(&self, voter_address: &str, candidate_id: i64) -> VoteReceipt {
        let rejected = |voter: String, err: LedgerError| VoteReceipt {
            voter,
            candidate_id,
            sender: None,
            outcome: SubmissionOutcome::from(err),
        };

        let voter = match address::validate(voter_address) {
            Ok(voter) => voter,
            Err(e) => return rejected(voter_address.to_string(), e),
        };
        let voter_label = address::checksum(&voter);

        let Ok(candidate) = u64::try_from(candidate_id) else {
            return rejected(
                voter_label,
                LedgerError::InvalidCandidateId(format!("{} is negative", candidate_id)),
            );
        };

        let sender = match self.resolve_sender(voter).await {
            Ok(sender) => sender,
            Err(e) => return rejected(voter_label, e),
        };

        let outcome = self
            .pipeline
            .send(TransactionIntent::CastVote { candidate_id: candidate }, sender.address)
            .await;

        VoteReceipt {
            voter: voter_label,
            candidate_id,
            sender: Some(sender),
            outcome,
        }
    }

    async fn resolve_sender(&self, voter: Address) -> LedgerResult<Sender> {
        if self.pipeline.submitter().can_sign(voter) {
            return Ok(Sender {
                address: voter,
                fallback: false,
            });
        }

        if self.pipeline.ledger().accounts().await?.contains(&voter) {
            return Ok(Sender {
                address: voter,
                fallback: false,
            });
        }

        if !self.allow_fallback {
            return Err(LedgerError::SigningUnavailable(format!(
                "no key for voter {} and sender fallback is disabled",
                voter
            )));
        }

        tracing::warn!(
            voter = %voter,
            sender = %self.default_account,
            "Voter key unavailable; default account will send the vote"
        );
        Ok(Sender {
            address: self.default_account,
            fallback: true,
        })
    }
}
