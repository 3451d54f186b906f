use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use ethers::utils::to_checksum;
use ghost_core::{
    metrics, AnalyzerConfig, CallRequest, ChainRpc, DashboardStore, EstimateError, GhostError,
    NetworkError, OracleConfig, PriceOracleClient, ReceiptSummary, TransactionAnalyzer,
};
use std::collections::HashMap;
use std::sync::Arc;

const TARGET: &str = "0x391d9430426cc633e72a5035ba7364893757f314";
const FIXTURE_GAS: u64 = 100_000;
const FIXTURE_GAS_PRICE: u64 = 100_000_000; // 0.1 gwei

struct MockRpc {
    receipts: HashMap<H256, ReceiptSummary>,
    estimate: Result<u64, String>,
    gas_price: Option<U256>,
}

impl MockRpc {
    fn with_receipt(hash: H256, receipt: ReceiptSummary) -> Self {
        Self {
            receipts: HashMap::from([(hash, receipt)]),
            estimate: Ok(FIXTURE_GAS),
            gas_price: Some(U256::from(FIXTURE_GAS_PRICE)),
        }
    }

    fn empty() -> Self {
        Self {
            receipts: HashMap::new(),
            estimate: Ok(FIXTURE_GAS),
            gas_price: Some(U256::from(FIXTURE_GAS_PRICE)),
        }
    }

    fn reverting() -> Self {
        Self {
            receipts: HashMap::new(),
            estimate: Err("execution reverted".to_string()),
            gas_price: Some(U256::from(FIXTURE_GAS_PRICE)),
        }
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ReceiptSummary>, NetworkError> {
        Ok(self.receipts.get(&hash).cloned())
    }

    async fn estimate_gas(&self, _call: &CallRequest) -> Result<u64, EstimateError> {
        match &self.estimate {
            Ok(gas) => Ok(*gas),
            Err(reason) => Err(EstimateError::Reverted {
                reason: reason.clone(),
            }),
        }
    }

    async fn gas_price(&self) -> Result<Option<U256>, NetworkError> {
        Ok(self.gas_price)
    }
}

/// Oracle pointed at a dead endpoint: always answers with the fallback
/// quote, which makes the USD figures deterministic.
fn offline_oracle(store: &DashboardStore) -> PriceOracleClient {
    let config = OracleConfig {
        endpoint: "http://127.0.0.1:9/simple/price".to_string(),
        timeout_ms: 250,
        ..OracleConfig::default()
    };
    PriceOracleClient::new(config, store.logs()).unwrap()
}

fn analyzer(rpc: MockRpc, store: &Arc<DashboardStore>) -> TransactionAnalyzer {
    TransactionAnalyzer::new(
        Arc::new(rpc),
        offline_oracle(store),
        store.clone(),
        AnalyzerConfig::default(),
    )
}

fn fixture_receipt() -> ReceiptSummary {
    ReceiptSummary {
        gas_used: FIXTURE_GAS,
        succeeded: true,
        to: Some(TARGET.parse().unwrap()),
        contract_address: None,
    }
}

#[tokio::test]
async fn test_audit_produces_expected_rows() {
    let hash = H256::repeat_byte(0xaa);
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::with_receipt(hash, fixture_receipt()), &store);

    let result = analyzer
        .analyze_by_hash(&format!("{hash:#x}"))
        .await
        .unwrap();

    // 100_000 gas at 0.1 gwei, and the "14" suffix pins the discount
    // rate at 0.12, so the optimized figure is exactly 12_000 gas
    assert_eq!(result.rows[0].label, "Actual");
    assert_eq!(result.rows[0].status_text, "Success");
    assert_eq!(result.rows[0].gas_used, Some(FIXTURE_GAS));
    assert_eq!(result.rows[0].outcome, "-0.00001000");

    assert_eq!(result.rows[1].gas_used, Some(12_000));
    assert_eq!(result.rows[1].outcome, "-0.000001");

    // fallback quote 2650: (1e-5 - 1.2e-6) * 2650 = 0.02332
    assert_eq!(result.rows[2].gas_used, None);
    assert_eq!(result.rows[2].outcome, "+$0.0233");

    let view = store.snapshot();
    let checksummed = to_checksum(&TARGET.parse::<Address>().unwrap(), None);
    assert_eq!(view.result.unwrap(), result);
    assert_eq!(
        view.breakdown.unwrap(),
        metrics::gas_breakdown(FIXTURE_GAS, &checksummed)
    );
    assert_eq!(view.memory.unwrap(), metrics::memory_heap(&checksummed));
    let multiplier = view.multiplier.unwrap();
    assert!((multiplier - FIXTURE_GAS as f64 / 12_000.0).abs() < 1e-12);
    assert!(!view.busy);
}

#[tokio::test]
async fn test_audit_missing_gas_price_uses_fallback() {
    let hash = H256::repeat_byte(0xbb);
    let mut rpc = MockRpc::with_receipt(hash, fixture_receipt());
    rpc.gas_price = None;
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(rpc, &store);

    let result = analyzer
        .analyze_by_hash(&format!("{hash:#x}"))
        .await
        .unwrap();

    // 0.1 gwei fallback matches the fixture price exactly
    assert_eq!(result.rows[0].outcome, "-0.00001000");
}

#[tokio::test]
async fn test_audit_unknown_hash_is_not_found() {
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::empty(), &store);

    let err = analyzer
        .analyze_by_hash(&format!("{:#x}", H256::repeat_byte(0xcc)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GhostError::Analysis(ghost_core::AnalysisError::NotFound { .. })
    ));
    let view = store.snapshot();
    assert!(view.result.is_none());
    assert!(!view.busy);
    assert_eq!(store.logs().count_tagged("[ERROR]"), 1);
}

#[tokio::test]
async fn test_audit_rejects_malformed_hash_before_any_call() {
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::empty(), &store);

    let err = analyzer.analyze_by_hash("0xnothex").await.unwrap_err();

    assert!(matches!(
        err,
        GhostError::Analysis(ghost_core::AnalysisError::InvalidHash { .. })
    ));
    // rejected input never starts an action
    assert!(!store.is_busy());
    assert!(store.snapshot().result.is_none());
}

#[tokio::test]
async fn test_preview_produces_simulation_result() {
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::empty(), &store);

    let result = analyzer
        .analyze_by_address(TARGET, Address::repeat_byte(0x22))
        .await
        .unwrap();

    assert_eq!(result.source_id, "PRE-SIGNING SIMULATION");
    assert_eq!(result.rows[0].status_text, "Legacy EVM");
    assert_eq!(result.rows[0].outcome, "-0.0000100000");
    assert_eq!(result.rows[1].outcome, "-0.0000012000");
    assert_eq!(result.rows[2].status_text, "Capital Efficiency");
    assert_eq!(result.rows[2].outcome, "+$0.0233");
}

#[tokio::test]
async fn test_preview_revert_leaves_state_untouched() {
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::reverting(), &store);

    let err = analyzer
        .analyze_by_address(TARGET, Address::repeat_byte(0x22))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GhostError::Analysis(ghost_core::AnalysisError::SimulationReverted { .. })
    ));

    let view = store.snapshot();
    assert!(view.result.is_none());
    assert!(view.breakdown.is_none());
    assert!(view.memory.is_none());
    assert!(view.multiplier.is_none());
    assert!(!view.busy);
    assert_eq!(store.logs().count_tagged("[CRITICAL]"), 1);
}

#[tokio::test]
async fn test_preview_rejects_malformed_address_before_any_call() {
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::empty(), &store);

    let err = analyzer
        .analyze_by_address("not-an-address", Address::repeat_byte(0x22))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GhostError::Analysis(ghost_core::AnalysisError::InvalidAddress { .. })
    ));
    assert!(!store.is_busy());
    assert_eq!(store.logs().count_tagged("[ERROR]"), 1);
}

#[tokio::test]
async fn test_new_result_replaces_prior_one() {
    let hash = H256::repeat_byte(0xaa);
    let store = Arc::new(DashboardStore::new());
    let analyzer = analyzer(MockRpc::with_receipt(hash, fixture_receipt()), &store);

    analyzer
        .analyze_by_hash(&format!("{hash:#x}"))
        .await
        .unwrap();
    analyzer
        .analyze_by_address(TARGET, Address::repeat_byte(0x22))
        .await
        .unwrap();

    let view = store.snapshot();
    assert_eq!(view.result.unwrap().source_id, "PRE-SIGNING SIMULATION");
}
