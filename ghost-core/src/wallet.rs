//! # Local Wallet Bridge
//!
//! Headless stand-in for a browser wallet extension: an in-process
//! signer loaded from the environment, plus the chain switch/add
//! bookkeeping the connect flow expects. The raw key material is wiped
//! from memory once the signer is constructed.

use crate::config::ChainProfile;
use crate::error::WalletError;
use crate::logbuf::LogBuffer;
use crate::traits::{SignedIntent, WalletBridge};
use crate::utils::wei_to_eth;
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::{hash_message, to_checksum};
use std::collections::HashSet;
use std::sync::Mutex;
use zeroize::Zeroizing;

/// Environment variable holding the signer's private key.
pub const SIGNER_KEY_ENV: &str = "GHOST_SIGNER_KEY";

pub struct EnvWallet {
    signer: LocalWallet,
    provider: Provider<Http>,
    known_chains: Mutex<HashSet<u64>>,
    active_chain: Mutex<u64>,
}

impl EnvWallet {
    /// Load the signer key from the environment. A missing key maps to
    /// the "no wallet installed" condition.
    pub fn from_env(profile: &ChainProfile) -> Result<Self, WalletError> {
        let raw = Zeroizing::new(
            std::env::var(SIGNER_KEY_ENV).map_err(|_| WalletError::Unavailable)?,
        );
        let signer: LocalWallet = raw
            .trim()
            .parse()
            .map_err(|e: ethers::signers::WalletError| WalletError::Signer {
                reason: e.to_string(),
            })?;
        let provider = Provider::<Http>::try_from(profile.rpc_url.as_str()).map_err(|e| {
            WalletError::Backend {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            signer: signer.with_chain_id(profile.chain_id),
            provider,
            known_chains: Mutex::new(HashSet::from([profile.chain_id])),
            active_chain: Mutex::new(profile.chain_id),
        })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn active_chain(&self) -> u64 {
        *self.active_chain.lock().unwrap()
    }
}

#[async_trait]
impl WalletBridge for EnvWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn sign_message(&self, message: &str) -> Result<SignedIntent, WalletError> {
        let signature = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| WalletError::Signer {
                reason: e.to_string(),
            })?;
        Ok(SignedIntent {
            signature: format!("0x{signature}"),
            message_hash: hash_message(message),
            signer: self.signer.address(),
        })
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        if !self.known_chains.lock().unwrap().contains(&chain_id) {
            return Err(WalletError::UnrecognizedChain { chain_id });
        }
        *self.active_chain.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn add_chain(&self, chain: &ChainProfile) -> Result<(), WalletError> {
        self.known_chains.lock().unwrap().insert(chain.chain_id);
        *self.active_chain.lock().unwrap() = chain.chain_id;
        Ok(())
    }

    async fn balance(&self, account: Address) -> Result<U256, WalletError> {
        self.provider
            .get_balance(account, None)
            .await
            .map_err(|e| WalletError::Backend {
                reason: e.to_string(),
            })
    }
}

/// Connected account view for the header.
#[derive(Debug, Clone)]
pub struct ConnectedAccount {
    pub address: Address,
    pub checksummed: String,
    pub balance_eth: f64,
}

/// Connect flow: request accounts, make sure the configured chain is
/// active (registering it when the wallet does not recognize it), then
/// fetch the balance readout.
pub async fn connect_session(
    wallet: &dyn WalletBridge,
    profile: &ChainProfile,
    logs: &LogBuffer,
) -> Result<ConnectedAccount, WalletError> {
    let accounts = wallet.request_accounts().await?;
    let address = accounts.first().copied().ok_or(WalletError::Unavailable)?;

    match wallet.switch_chain(profile.chain_id).await {
        Ok(()) => {}
        Err(WalletError::UnrecognizedChain { .. }) => wallet.add_chain(profile).await?,
        Err(err) => return Err(err),
    }

    let balance = wallet.balance(address).await?;
    if balance.is_zero() {
        logs.push(format!(
            "[WARNING] Zero balance detected. You need {} {} to interact.",
            profile.name, profile.native_symbol
        ));
    }

    Ok(ConnectedAccount {
        address,
        checksummed: to_checksum(&address, None),
        balance_eth: wei_to_eth(balance),
    })
}
