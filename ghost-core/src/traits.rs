//! Collaborator seams: the chain RPC node and the user's wallet.
//! Production implementations live in [`crate::rpc`] and
//! [`crate::wallet`]; tests substitute their own.

use crate::config::ChainProfile;
use crate::error::{EstimateError, NetworkError, WalletError};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};

/// Trimmed receipt view the analyzer needs.
#[derive(Debug, Clone)]
pub struct ReceiptSummary {
    pub gas_used: u64,
    pub succeeded: bool,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
}

impl ReceiptSummary {
    /// Address the analysis keys its seeds off: the call target, falling
    /// back to the created contract for deployments.
    pub fn target(&self) -> Option<Address> {
        self.to.or(self.contract_address)
    }
}

/// Dry-run call parameters.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub to: Address,
    pub from: Address,
    pub data: Vec<u8>,
    pub value: U256,
}

impl CallRequest {
    /// Empty probe call used by the pre-flight estimate.
    pub fn probe(to: Address, from: Address) -> Self {
        Self {
            to,
            from,
            data: Vec::new(),
            value: U256::zero(),
        }
    }
}

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Receipt of a confirmed transaction, `None` when the chain does not
    /// know the hash.
    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ReceiptSummary>, NetworkError>;

    /// Dry-run gas estimate against the target.
    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, EstimateError>;

    /// Current gas price; `None` when the node does not report one.
    async fn gas_price(&self) -> Result<Option<U256>, NetworkError>;
}

/// Outcome of a wallet message signature.
#[derive(Debug, Clone)]
pub struct SignedIntent {
    /// 0x-prefixed signature hex.
    pub signature: String,
    /// EIP-191 hash of the signed message.
    pub message_hash: H256,
    pub signer: Address,
}

#[async_trait]
pub trait WalletBridge: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    async fn sign_message(&self, message: &str) -> Result<SignedIntent, WalletError>;

    /// Make `chain_id` the active chain. Fails with
    /// [`WalletError::UnrecognizedChain`] when the wallet does not know
    /// it; callers then register the chain via [`Self::add_chain`].
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    async fn add_chain(&self, chain: &ChainProfile) -> Result<(), WalletError>;

    async fn balance(&self, account: Address) -> Result<U256, WalletError>;
}
