//! Local key management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//! - The wallet holds no nonce state; nonces are always read from the node

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSigner;
use alloy::primitives::{Address, Bytes};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::transaction::BuiltTransaction;
use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::config::schema::PRIVATE_KEY_ENV_VAR;

/// Signing key for one account.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> LedgerResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| LedgerError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from environment variable, if one is set.
    ///
    /// Reads `BALLOT_LEDGER_PRIVATE_KEY`. An unset or empty variable means no
    /// local key; a malformed one is an error.
    pub fn from_env() -> LedgerResult<Option<Self>> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key).map(Some),
            _ => Ok(None),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Whether this wallet can sign for `address`.
    pub fn controls(&self, address: Address) -> bool {
        self.address() == address
    }

    /// Sign a built transaction and return the EIP-2718 encoded payload.
    pub async fn sign_transaction(&self, tx: &BuiltTransaction) -> LedgerResult<Bytes> {
        if !self.controls(tx.from) {
            return Err(LedgerError::SigningUnavailable(format!(
                "wallet {} cannot sign for {}",
                self.address(),
                tx.from
            )));
        }

        let mut legacy = tx.to_legacy();
        let signature = self
            .signer
            .sign_transaction(&mut legacy)
            .await
            .map_err(|e| LedgerError::Wallet(format!("Signing failed: {}", e)))?;

        let envelope = TxEnvelope::from(legacy.into_signed(signature));
        Ok(envelope.encoded_2718().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::transaction::{build, TransactionIntent};
    use crate::blockchain::types::GasPolicy;
    use alloy::consensus::Transaction;
    use alloy::eips::eip2718::Decodable2718;

    // Well-known test private key (Hardhat/Anvil first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn built_for(from: Address, nonce: u64) -> BuiltTransaction {
        build(
            TransactionIntent::RegisterCandidate {
                name: "Alice".to_string(),
            },
            from,
            nonce,
            &GasPolicy::default(),
            Address::repeat_byte(0x11),
            31337,
        )
    }

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert!(wallet.controls(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
        ));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_signed_payload_decodes_with_same_nonce() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let tx = built_for(wallet.address(), 7);

        let raw = wallet.sign_transaction(&tx).await.unwrap();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();

        assert_eq!(envelope.nonce(), 7);
        assert_eq!(envelope.gas_limit(), 200_000);
        assert_eq!(envelope.chain_id(), Some(31337));
        assert_eq!(envelope.input(), &tx.input);
    }

    #[tokio::test]
    async fn test_refuses_foreign_sender() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let tx = built_for(Address::repeat_byte(0x22), 0);

        let err = wallet.sign_transaction(&tx).await.unwrap_err();
        assert!(matches!(err, LedgerError::SigningUnavailable(_)));
    }
}
