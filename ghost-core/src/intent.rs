//! # Intent Automaton
//!
//! State machine for the signed-intent flow:
//! Idle -> Signing -> Monitoring -> Executed, with Monitoring -> Idle on
//! cancel. The relayer monitor is a simulation: each tick synthesizes a
//! gas quote around the target and the trigger is a fixed tick count,
//! not the quote itself. Executed is terminal; re-arming is not wired.
//!
//! The monitor timer is owned by the automaton and stops on both natural
//! completion and cancellation; a timer outliving its state is a bug.

use crate::config::IntentConfig;
use crate::error::{GhostError, IntentError, WalletError};
use crate::store::{DashboardStore, IntentState};
use crate::traits::WalletBridge;
use chrono::Local;
use ethers::types::Address;
use rand::Rng;
use std::sync::{Arc, Mutex};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct IntentAutomaton {
    wallet: Arc<dyn WalletBridge>,
    store: Arc<DashboardStore>,
    config: IntentConfig,
    monitor: Arc<Mutex<Option<CancellationToken>>>,
}

impl IntentAutomaton {
    pub fn new(
        wallet: Arc<dyn WalletBridge>,
        store: Arc<DashboardStore>,
        config: IntentConfig,
    ) -> Self {
        Self {
            wallet,
            store,
            config,
            monitor: Arc::new(Mutex::new(None)),
        }
    }

    /// Current lifecycle state (read model).
    pub fn state(&self) -> IntentState {
        self.store.intent_state()
    }

    /// Authorize the intent: collect the wallet signature and arm the
    /// relayer monitor. Valid only from Idle. A declined signature is
    /// recoverable: the automaton reverts to Idle before returning.
    pub async fn sign(&self, target_gas_gwei: f64) -> Result<(), GhostError> {
        if !self
            .store
            .transition_intent(IntentState::Idle, IntentState::Signing)
        {
            return Err(IntentError::InvalidState {
                action: "sign",
                state: self.state(),
            }
            .into());
        }

        let signed = async {
            let accounts = self.wallet.request_accounts().await?;
            let signer = accounts.first().copied().ok_or(WalletError::Unavailable)?;
            let message = self.authorization_message(target_gas_gwei, signer);
            self.wallet.sign_message(&message).await
        }
        .await;

        let signed = match signed {
            Ok(signed) => signed,
            Err(err) => {
                self.store
                    .transition_intent(IntentState::Signing, IntentState::Idle);
                self.store.logs().push("[ERROR] User denied signature.");
                return Err(err.into());
            }
        };

        let logs = self.store.logs();
        logs.push(format!(
            "[AUTH] Intent Hash: {}...",
            truncate(&format!("{:#x}", signed.message_hash), 20)
        ));
        logs.push(format!(
            "[GHOST] Signature: {}...",
            truncate(&signed.signature, 24)
        ));
        logs.push(format!(
            "[SYSTEM] Relayer Active. Monitoring mempool for {target_gas_gwei} Gwei..."
        ));

        self.store
            .transition_intent(IntentState::Signing, IntentState::Monitoring);
        self.spawn_monitor(target_gas_gwei);
        Ok(())
    }

    /// Revoke an armed intent. Valid only from Monitoring; a no-op from
    /// any other state.
    pub fn cancel(&self) {
        if !self
            .store
            .transition_intent(IntentState::Monitoring, IntentState::Idle)
        {
            return;
        }
        if let Some(token) = self.monitor.lock().unwrap().take() {
            token.cancel();
        }
        let logs = self.store.logs();
        logs.push("[REVOKE] User requested intent cancellation.");
        logs.push("[SYSTEM] Nonce invalidation broadcasted to local relayer. Monitoring stopped.");
    }

    fn authorization_message(&self, target_gas_gwei: f64, signer: Address) -> String {
        let nonce: u32 = rand::thread_rng().gen_range(0..1_000_000);
        format!(
            "GhostTx Intent Authentication\n\
             --------------------------------\n\
             Action: Execute Optimized Path\n\
             Target Gas: {target_gas_gwei} Gwei\n\
             Relayer: {relayer}\n\
             Signer: {signer:?}\n\
             Nonce: {nonce}\n\
             Time: {time}\n\
             --------------------------------\n\
             Status: [AUTHORIZED]",
            relayer = self.config.relayer_tag,
            time = Local::now().format("%Y-%m-%d %H:%M:%S"),
        )
    }

    fn spawn_monitor(&self, target_gas_gwei: f64) {
        let token = CancellationToken::new();
        *self.monitor.lock().unwrap() = Some(token.clone());

        let store = self.store.clone();
        let slot = self.monitor.clone();
        let interval = self.config.poll_interval();
        let trigger_ticks = self.config.trigger_ticks;

        tokio::spawn(async move {
            let logs = store.logs();
            let mut ticks = 0u32;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("relayer monitor cancelled after {ticks} ticks");
                        return;
                    }
                    _ = sleep(interval) => {}
                }
                if store.intent_state() != IntentState::Monitoring {
                    // revoked while this tick was pending
                    return;
                }

                ticks += 1;
                let current = target_gas_gwei + rand::thread_rng().gen_range(-0.1..0.3);
                logs.push(format!(
                    "[MONITOR] Block Check: Current Gas ({current:.3} Gwei) > Target ({target_gas_gwei} Gwei)"
                ));

                if ticks >= trigger_ticks {
                    if store.transition_intent(IntentState::Monitoring, IntentState::Executed) {
                        logs.push(format!("[TRIGGER] Gas Match! {current:.3} Gwei reached."));
                        logs.push(
                            "[SUCCESS] Transaction Executed via Stylus. Saved ~$12.45!",
                        );
                        info!("intent executed after {ticks} monitor ticks");
                    }
                    slot.lock().unwrap().take();
                    return;
                }
            }
        });
    }
}

fn truncate(value: &str, len: usize) -> &str {
    if value.len() > len {
        &value[..len]
    } else {
        value
    }
}
