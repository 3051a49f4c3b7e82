//! Operation surface for the web layer.
//!
//! # Responsibilities
//! - Wire configuration, ledger client, wallet and submitter together
//! - Resolve the default sender account once at construction
//! - Serialize submitting operations so one engine never races itself on a nonce
//! - Pass the contract's tallied results through unmodified

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::address;
use crate::blockchain::client::{LedgerClient, RpcLedger, ViewCall};
use crate::blockchain::contract;
use crate::blockchain::submitter::Submitter;
use crate::blockchain::types::{CandidateTally, GasPolicy, LedgerError, LedgerResult};
use crate::blockchain::wallet::Wallet;
use crate::config::BallotConfig;
use crate::sync::{
    BatchSynchronizer, CandidateRecord, Pipeline, SyncReport, VoteCaster, VoteReceipt, VoterRecord,
};

/// Ledger synchronization and voting engine.
pub struct Engine {
    pipeline: Pipeline,
    batch: BatchSynchronizer,
    votes: VoteCaster,
    /// Held for the whole of each submitting operation.
    submit_lock: Mutex<()>,
}

impl Engine {
    /// Connect to the configured node and load the signing key from the environment.
    pub async fn connect(config: &BallotConfig) -> LedgerResult<Self> {
        let ledger = Arc::new(RpcLedger::new(config.ledger.clone()).await?);
        let wallet = Wallet::from_env()?;
        Self::with_ledger(config, ledger, wallet).await
    }

    /// Build an engine over any ledger client.
    pub async fn with_ledger(
        config: &BallotConfig,
        ledger: Arc<dyn LedgerClient>,
        wallet: Option<Wallet>,
    ) -> LedgerResult<Self> {
        let contract = address::validate(&config.ledger.contract_address)?;
        let sender = resolve_default_account(config, ledger.as_ref(), wallet.as_ref()).await?;

        tracing::info!(
            contract = %contract,
            sender = %sender,
            local_key = wallet.is_some(),
            "Engine ready"
        );
        if let Some(wallet) = wallet.as_ref().filter(|w| !w.controls(sender)) {
            tracing::warn!(
                key_account = %wallet.address(),
                sender = %sender,
                "Private key does not match the default account; batch transactions will be node-managed"
            );
        }

        let gas = GasPolicy::flat(config.gas.limit, config.gas.price_gwei);
        let submitter = Submitter::new(ledger.clone(), wallet);
        let pipeline = Pipeline::new(ledger, submitter, contract, config.ledger.chain_id, gas);

        Ok(Self {
            batch: BatchSynchronizer::new(pipeline.clone(), sender),
            votes: VoteCaster::new(pipeline.clone(), sender, config.ledger.allow_sender_fallback),
            pipeline,
            submit_lock: Mutex::new(()),
        })
    }

    /// Account that sends batch transactions and stands in for voters.
    pub fn default_account(&self) -> Address {
        self.batch.sender()
    }

    pub async fn sync_candidates(&self, records: &[CandidateRecord]) -> SyncReport {
        let span = tracing::info_span!("sync_candidates", op_id = %Uuid::new_v4());
        async {
            let _guard = self.submit_lock.lock().await;
            self.batch.sync_candidates(records).await
        }
        .instrument(span)
        .await
    }

    pub async fn sync_voters(&self, records: &[VoterRecord]) -> SyncReport {
        let span = tracing::info_span!("sync_voters", op_id = %Uuid::new_v4());
        async {
            let _guard = self.submit_lock.lock().await;
            self.batch.sync_voters(records).await
        }
        .instrument(span)
        .await
    }

    pub async fn cast_vote(&self, voter_address: &str, candidate_id: i64) -> VoteReceipt {
        let span = tracing::info_span!("cast_vote", op_id = %Uuid::new_v4(), candidate_id);
        async {
            let _guard = self.submit_lock.lock().await;
            self.votes.cast_vote(voter_address, candidate_id).await
        }
        .instrument(span)
        .await
    }

    /// Tallied results straight from the contract's view.
    pub async fn election_results(&self) -> LedgerResult<Vec<CandidateTally>> {
        let data = self
            .pipeline
            .ledger()
            .call(ViewCall {
                to: self.pipeline.contract(),
                data: contract::results_call(),
            })
            .await?;
        contract::decode_results(&data)
    }
}

/// Configured account, else the local key's account, else the node's first account.
async fn resolve_default_account(
    config: &BallotConfig,
    ledger: &dyn LedgerClient,
    wallet: Option<&Wallet>,
) -> LedgerResult<Address> {
    if let Some(raw) = &config.ledger.default_account {
        return address::validate(raw);
    }
    if let Some(wallet) = wallet {
        return Ok(wallet.address());
    }
    ledger.accounts().await?.first().copied().ok_or_else(|| {
        LedgerError::SigningUnavailable(
            "no default account configured, no private key set, and the node exposes no accounts"
                .to_string(),
        )
    })
}
