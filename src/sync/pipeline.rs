//! Nonce → build → submit for one intent.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::blockchain::client::LedgerClient;
use crate::blockchain::submitter::Submitter;
use crate::blockchain::transaction::{self, TransactionIntent};
use crate::blockchain::types::{GasPolicy, SubmissionOutcome};
use crate::observability::metrics;

/// Everything needed to turn an intent into one submitted transaction.
#[derive(Clone)]
pub struct Pipeline {
    ledger: Arc<dyn LedgerClient>,
    submitter: Submitter,
    contract: Address,
    chain_id: u64,
    gas: GasPolicy,
}

impl Pipeline {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        submitter: Submitter,
        contract: Address,
        chain_id: u64,
        gas: GasPolicy,
    ) -> Self {
        Self {
            ledger,
            submitter,
            contract,
            chain_id,
            gas,
        }
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Fetch a fresh nonce for `from`, build, and submit once.
    ///
    /// A failed nonce read ends here with a failure; nothing is submitted.
    pub async fn send(&self, intent: TransactionIntent, from: Address) -> SubmissionOutcome {
        let nonce = match self.ledger.get_nonce(from).await {
            Ok(nonce) => {
                metrics::record_nonce_fetch(true);
                nonce
            }
            Err(e) => {
                metrics::record_nonce_fetch(false);
                tracing::warn!(intent = intent.label(), from = %from, error = %e, "Nonce fetch failed");
                return e.into();
            }
        };

        tracing::debug!(intent = intent.label(), from = %from, nonce, "Building transaction");
        let tx = transaction::build(intent, from, nonce, &self.gas, self.contract, self.chain_id);
        self.submitter.submit(tx).await
    }
}
