//! `ChainRpc` over an ethers HTTP provider.

use crate::config::ChainProfile;
use crate::error::{EstimateError, NetworkError};
use crate::traits::{CallRequest, ChainRpc, ReceiptSummary};
use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;

#[derive(Debug, Clone)]
pub struct EthersRpc {
    provider: Provider<Http>,
    endpoint: String,
}

impl EthersRpc {
    pub fn new(profile: &ChainProfile) -> Result<Self> {
        let provider = Provider::<Http>::try_from(profile.rpc_url.as_str())?;
        Ok(Self {
            provider,
            endpoint: profile.rpc_url.clone(),
        })
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    fn unreachable_error(&self, err: impl std::fmt::Display) -> NetworkError {
        NetworkError::Unreachable {
            endpoint: self.endpoint.clone(),
            reason: err.to_string(),
        }
    }
}

/// Node errors that mean the target rejected the dry-run rather than the
/// transport failing.
fn is_revert(message: &str) -> bool {
    let message = message.to_lowercase();
    ["revert", "invalid opcode", "out of gas", "call_exception"]
        .iter()
        .any(|pattern| message.contains(pattern))
}

#[async_trait]
impl ChainRpc for EthersRpc {
    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ReceiptSummary>, NetworkError> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| self.unreachable_error(e))?;
        Ok(receipt.map(|r| ReceiptSummary {
            gas_used: r.gas_used.map(|g| g.as_u64()).unwrap_or_default(),
            succeeded: r.status.map(|s| s.as_u64() == 1).unwrap_or(false),
            to: r.to,
            contract_address: r.contract_address,
        }))
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, EstimateError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(call.to)
            .from(call.from)
            .value(call.value)
            .data(call.data.clone())
            .into();

        match self.provider.estimate_gas(&tx, None).await {
            Ok(gas) => Ok(gas.as_u64()),
            Err(err) => {
                let message = err.to_string();
                if is_revert(&message) {
                    Err(EstimateError::Reverted { reason: message })
                } else {
                    Err(EstimateError::Network(self.unreachable_error(message)))
                }
            }
        }
    }

    async fn gas_price(&self) -> Result<Option<U256>, NetworkError> {
        self.provider
            .get_gas_price()
            .await
            .map(Some)
            .map_err(|e| self.unreachable_error(e))
    }
}
