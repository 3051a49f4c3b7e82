//! Transaction signing and submission.
//!
//! Converts every failure into a `SubmissionOutcome::Failure` so callers can
//! keep going after one bad item.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash};

use crate::blockchain::client::{LedgerClient, Submission};
use crate::blockchain::transaction::BuiltTransaction;
use crate::blockchain::types::{LedgerResult, SubmissionOutcome};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Signs when a key is held for the sender, otherwise defers to the node.
#[derive(Clone)]
pub struct Submitter {
    ledger: Arc<dyn LedgerClient>,
    wallet: Option<Wallet>,
}

impl Submitter {
    pub fn new(ledger: Arc<dyn LedgerClient>, wallet: Option<Wallet>) -> Self {
        Self { ledger, wallet }
    }

    /// Whether a local key is configured for `address`.
    pub fn can_sign(&self, address: Address) -> bool {
        self.wallet.as_ref().is_some_and(|w| w.controls(address))
    }

    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    /// Submit `tx` exactly once.
    pub async fn submit(&self, tx: BuiltTransaction) -> SubmissionOutcome {
        let intent = tx.intent.label();
        let outcome = SubmissionOutcome::from(self.try_submit(&tx).await);

        metrics::record_submission(intent, outcome.label());
        match &outcome {
            SubmissionOutcome::Success { transaction_hash } => tracing::info!(
                intent,
                from = %tx.from,
                nonce = tx.nonce,
                tx_hash = %transaction_hash,
                "Transaction submitted"
            ),
            SubmissionOutcome::Failure { kind, reason } => tracing::warn!(
                intent,
                from = %tx.from,
                nonce = tx.nonce,
                ?kind,
                reason = %reason,
                "Transaction submission failed"
            ),
        }
        outcome
    }

    async fn try_submit(&self, tx: &BuiltTransaction) -> LedgerResult<TxHash> {
        let submission = match &self.wallet {
            Some(wallet) if wallet.controls(tx.from) => {
                Submission::Raw(wallet.sign_transaction(tx).await?)
            }
            _ => Submission::NodeManaged(tx.to_request()),
        };
        self.ledger.submit(submission).await
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("signer", &self.wallet.as_ref().map(Wallet::address))
            .finish()
    }
}
