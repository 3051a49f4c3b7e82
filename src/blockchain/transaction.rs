//! Transaction building for the three contract intents.
//!
//! # Responsibilities
//! - Encode contract call data for each intent
//! - Attach sender, nonce and the flat gas policy
//! - Produce either a signable legacy transaction or a node-managed request

use alloy::consensus::TxLegacy;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::blockchain::contract::IOnlineVoting;
use crate::blockchain::types::GasPolicy;

/// A contract call the engine can put on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum TransactionIntent {
    RegisterCandidate { name: String },
    RegisterVoter { address: Address },
    CastVote { candidate_id: u64 },
}

impl TransactionIntent {
    /// ABI-encoded call data.
    pub fn call_data(&self) -> Bytes {
        match self {
            Self::RegisterCandidate { name } => IOnlineVoting::addCandidateCall {
                fullName: name.clone(),
            }
            .abi_encode(),
            Self::RegisterVoter { address } => {
                IOnlineVoting::addVoterCall { voter: *address }.abi_encode()
            }
            Self::CastVote { candidate_id } => IOnlineVoting::voteCall {
                candidateId: U256::from(*candidate_id),
            }
            .abi_encode(),
        }
        .into()
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RegisterCandidate { .. } => "register_candidate",
            Self::RegisterVoter { .. } => "register_voter",
            Self::CastVote { .. } => "cast_vote",
        }
    }
}

/// A fully specified transaction, consumed by exactly one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub intent: TransactionIntent,
    pub from: Address,
    pub to: Address,
    pub nonce: u64,
    pub input: Bytes,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
}

impl BuiltTransaction {
    /// Unsigned legacy form for local signing.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: U256::ZERO,
            input: self.input.clone(),
        }
    }

    /// Request form for node-managed `eth_sendTransaction`.
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_input(self.input.clone())
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_chain_id(self.chain_id)
    }
}

/// Build a transaction for `intent` sent by `from` with `nonce`.
///
/// Address validity is checked by the caller before this point.
pub fn build(
    intent: TransactionIntent,
    from: Address,
    nonce: u64,
    gas: &GasPolicy,
    contract: Address,
    chain_id: u64,
) -> BuiltTransaction {
    BuiltTransaction {
        input: intent.call_data(),
        intent,
        from,
        to: contract,
        nonce,
        gas_limit: gas.gas_limit,
        gas_price: gas.gas_price,
        chain_id,
    }
}
