use async_trait::async_trait;
use ethers::types::{Address, U256};
use ethers::utils::hash_message;
use ghost_core::{
    ChainProfile, DashboardStore, IntentAutomaton, IntentConfig, IntentState, SignedIntent,
    WalletBridge, WalletError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::advance;

struct ApprovingWallet;

#[async_trait]
impl WalletBridge for ApprovingWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![Address::repeat_byte(0x11)])
    }

    async fn sign_message(&self, message: &str) -> Result<SignedIntent, WalletError> {
        Ok(SignedIntent {
            signature: format!("0x{}", "ab".repeat(65)),
            message_hash: hash_message(message),
            signer: Address::repeat_byte(0x11),
        })
    }

    async fn switch_chain(&self, _chain_id: u64) -> Result<(), WalletError> {
        Ok(())
    }

    async fn add_chain(&self, _chain: &ChainProfile) -> Result<(), WalletError> {
        Ok(())
    }

    async fn balance(&self, _account: Address) -> Result<U256, WalletError> {
        Ok(U256::zero())
    }
}

struct RejectingWallet;

#[async_trait]
impl WalletBridge for RejectingWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![Address::repeat_byte(0x11)])
    }

    async fn sign_message(&self, _message: &str) -> Result<SignedIntent, WalletError> {
        Err(WalletError::UserRejected {
            action: "signature".to_string(),
        })
    }

    async fn switch_chain(&self, _chain_id: u64) -> Result<(), WalletError> {
        Ok(())
    }

    async fn add_chain(&self, _chain: &ChainProfile) -> Result<(), WalletError> {
        Ok(())
    }

    async fn balance(&self, _account: Address) -> Result<U256, WalletError> {
        Ok(U256::zero())
    }
}

fn automaton(wallet: Arc<dyn WalletBridge>) -> (IntentAutomaton, Arc<DashboardStore>) {
    let store = Arc::new(DashboardStore::new());
    let automaton = IntentAutomaton::new(wallet, store.clone(), IntentConfig::default());
    (automaton, store)
}

/// Let the spawned monitor task register its timer, move the paused
/// clock past one poll interval, then let the tick run.
async fn run_one_tick(interval: Duration) {
    tokio::task::yield_now().await;
    advance(interval).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn test_intent_executes_on_fifth_tick() {
    let (automaton, store) = automaton(Arc::new(ApprovingWallet));
    let interval = IntentConfig::default().poll_interval();

    automaton.sign(0.05).await.unwrap();
    assert_eq!(automaton.state(), IntentState::Monitoring);

    for _ in 0..5 {
        run_one_tick(interval).await;
    }

    assert_eq!(automaton.state(), IntentState::Executed);
    let logs = store.logs();
    assert_eq!(logs.count_tagged("[MONITOR]"), 5);

    let lines = logs.snapshot();
    assert!(lines[lines.len() - 2].starts_with("[TRIGGER]"));
    assert!(lines[lines.len() - 1].starts_with("[SUCCESS]"));

    // the timer is stopped: no sixth tick ever fires
    run_one_tick(interval).await;
    run_one_tick(interval).await;
    assert_eq!(store.logs().count_tagged("[MONITOR]"), 5);
    assert_eq!(automaton.state(), IntentState::Executed);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_monitor_before_trigger() {
    let (automaton, store) = automaton(Arc::new(ApprovingWallet));
    let interval = IntentConfig::default().poll_interval();

    automaton.sign(0.05).await.unwrap();
    run_one_tick(interval).await;
    run_one_tick(interval).await;
    assert_eq!(store.logs().count_tagged("[MONITOR]"), 2);

    automaton.cancel();
    assert_eq!(automaton.state(), IntentState::Idle);
    assert_eq!(store.logs().count_tagged("[REVOKE]"), 1);

    // no further ticks are logged after revocation
    for _ in 0..4 {
        run_one_tick(interval).await;
    }
    assert_eq!(store.logs().count_tagged("[MONITOR]"), 2);
    assert_eq!(automaton.state(), IntentState::Idle);
}

#[tokio::test]
async fn test_rejected_signature_returns_to_idle() {
    let (automaton, store) = automaton(Arc::new(RejectingWallet));

    let err = automaton.sign(0.05).await;
    assert!(err.is_err());
    assert_eq!(automaton.state(), IntentState::Idle);
    assert_eq!(store.logs().count_tagged("[ERROR]"), 1);

    // recoverable: a fresh sign attempt is accepted again
    let retry =
        IntentAutomaton::new(Arc::new(ApprovingWallet), store.clone(), IntentConfig::default());
    retry.sign(0.05).await.unwrap();
    assert_eq!(retry.state(), IntentState::Monitoring);
}

#[tokio::test(start_paused = true)]
async fn test_sign_rejected_outside_idle() {
    let (automaton, _store) = automaton(Arc::new(ApprovingWallet));

    automaton.sign(0.05).await.unwrap();
    assert_eq!(automaton.state(), IntentState::Monitoring);

    let second = automaton.sign(0.07).await;
    assert!(second.is_err());
    assert_eq!(automaton.state(), IntentState::Monitoring);
}

#[tokio::test]
async fn test_cancel_is_noop_outside_monitoring() {
    let (automaton, store) = automaton(Arc::new(ApprovingWallet));

    automaton.cancel();
    assert_eq!(automaton.state(), IntentState::Idle);
    assert_eq!(store.logs().count_tagged("[REVOKE]"), 0);
}
