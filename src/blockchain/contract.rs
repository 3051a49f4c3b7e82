//! ABI binding for the deployed OnlineVoting contract.
//!
//! Only the entry points the engine calls are declared. Parameter names are
//! local; selectors depend on types alone.

use alloy::primitives::{Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{CandidateTally, LedgerError, LedgerResult};

sol! {
    interface IOnlineVoting {
        struct Candidate {
            uint256 id;
            string fullName;
            uint256 voteCount;
        }

        function addCandidate(string fullName) external;
        function addVoter(address voter) external;
        function vote(uint256 candidateId) external;
        function getResults() external view returns (Candidate[] memory);
    }
}

/// Call data for the results view.
pub fn results_call() -> Bytes {
    IOnlineVoting::getResultsCall {}.abi_encode().into()
}

/// Decode the results view return data, preserving order and values.
///
/// Ids and counts beyond `u64` are a decode error, not a truncation.
pub fn decode_results(data: &[u8]) -> LedgerResult<Vec<CandidateTally>> {
    let candidates = IOnlineVoting::getResultsCall::abi_decode_returns(data)
        .map_err(|e| LedgerError::Decode(format!("getResults: {}", e)))?;

    candidates
        .into_iter()
        .map(|c| {
            Ok(CandidateTally {
                id: to_u64("id", c.id)?,
                vote_count: to_u64("voteCount", c.voteCount)?,
                name: c.fullName,
            })
        })
        .collect()
}

fn to_u64(field: &str, value: U256) -> LedgerResult<u64> {
    u64::try_from(value)
        .map_err(|_| LedgerError::Decode(format!("getResults: {} {} exceeds u64", field, value)))
}
