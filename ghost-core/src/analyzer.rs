//! # Transaction Analyzer
//!
//! The audit (past transaction by hash) and pre-flight (prospective call
//! by address) flows. Both share the same downstream computation and
//! differ only in how the gas amount and the target address are
//! obtained. Each analysis publishes a three-row cost comparison plus
//! the derived panel figures to the [`DashboardStore`] in one shot.
//!
//! Failure policy: the public entry points are the action boundary.
//! Every failure is appended to the trace stream before it is returned,
//! and a failed analysis never publishes a partial result; the previous
//! result stays in place until a successful replacement exists.

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, EstimateError, GhostError, NetworkError};
use crate::metrics;
use crate::oracle::PriceOracleClient;
use crate::store::{AnalysisOutcome, AnalysisResult, ComparisonRow, DashboardStore};
use crate::traits::{CallRequest, ChainRpc};
use crate::utils::gas_cost_eth;
use chrono::Local;
use ethers::types::{Address, H256, U256};
use ethers::utils::to_checksum;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

/// Source id shown for pre-flight analyses instead of a hash.
pub const PREVIEW_SOURCE_ID: &str = "PRE-SIGNING SIMULATION";

/// Staged status lines shown while an analysis is in flight.
const TICKER_LINES: [&str; 4] = [
    "[WASM] Initializing Stylus sandboxed runtime...",
    "[NITRO] Intercepting state trie via Arbitrum RPC...",
    "[STYLUS] Optimizing parallel execution universes...",
    "[SUCCESS] Deterministic outcome identified.",
];

pub struct TransactionAnalyzer {
    rpc: Arc<dyn ChainRpc>,
    oracle: PriceOracleClient,
    store: Arc<DashboardStore>,
    config: AnalyzerConfig,
}

impl TransactionAnalyzer {
    pub fn new(
        rpc: Arc<dyn ChainRpc>,
        oracle: PriceOracleClient,
        store: Arc<DashboardStore>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            rpc,
            oracle,
            store,
            config,
        }
    }

    /// Audit mode: gas figures from the confirmed receipt of `hash`.
    pub async fn analyze_by_hash(&self, hash: &str) -> Result<AnalysisResult, GhostError> {
        let parsed: H256 = match hash.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                return Err(self.reject(AnalysisError::InvalidHash {
                    input: hash.trim().to_string(),
                }))
            }
        };

        let generation = self.store.begin_analysis();
        let hash_hex = format!("{parsed:#x}");
        self.store
            .logs()
            .push(format!("[INIT] Deep-state audit of {}...", short_hex(&hash_hex)));
        let _ticker = self.spawn_ticker();

        let outcome = self.audit(parsed).await;
        self.settle(
            generation,
            outcome,
            format!("[SUCCESS] Audit Complete: {}...", short_hex(&hash_hex)),
        )
    }

    /// Preview mode: gas figures from a dry-run estimate against
    /// `address`, before anything is signed or sent.
    pub async fn analyze_by_address(
        &self,
        address: &str,
        from: Address,
    ) -> Result<AnalysisResult, GhostError> {
        let sanitized = address.trim().to_lowercase();
        let target: Address = match sanitized.parse() {
            Ok(target) => target,
            Err(_) => {
                return Err(self.reject(AnalysisError::InvalidAddress {
                    input: address.trim().to_string(),
                }))
            }
        };

        let generation = self.store.begin_analysis();
        self.store.logs().push(format!(
            "[INIT] Querying gas path for: {}...",
            short_hex(&to_checksum(&target, None))
        ));
        let _ticker = self.spawn_ticker();

        let outcome = self.preflight(target, from).await;
        self.settle(
            generation,
            outcome,
            "[SUCCESS] Pre-flight analytics synchronized.".to_string(),
        )
    }

    async fn audit(&self, hash: H256) -> Result<AnalysisOutcome, GhostError> {
        let receipt = self
            .rpc
            .transaction_receipt(hash)
            .await?
            .ok_or_else(|| AnalysisError::NotFound {
                hash: format!("{hash:#x}"),
            })?;
        let target = receipt.target().ok_or_else(|| NetworkError::InvalidResponse {
            reason: "receipt carries neither target nor contract address".to_string(),
        })?;
        self.store.logs().push(format!(
            "[SYSTEM] Receipt located: {} gas consumed.",
            receipt.gas_used
        ));

        let spot_usd = self.fetch_spot_price().await;
        let gas_price = self.gas_price_with_fallback().await?;
        let address = to_checksum(&target, None);

        let baseline_eth = gas_cost_eth(receipt.gas_used, gas_price);
        let optimized = metrics::optimized_path(receipt.gas_used, &address);
        let optimized_eth = gas_cost_eth(optimized.gas, gas_price);
        let savings_usd = baseline_eth * spot_usd - optimized_eth * spot_usd;

        // audit rows keep more precision on the baseline than the
        // optimized figure
        let rows = [
            ComparisonRow {
                label: "Actual".to_string(),
                status_text: if receipt.succeeded { "Success" } else { "Reverted" }.to_string(),
                gas_used: Some(receipt.gas_used),
                outcome: format!("-{baseline_eth:.8}"),
            },
            ComparisonRow {
                label: "Optimal (Stylus)".to_string(),
                status_text: "WASM Optimized".to_string(),
                gas_used: Some(optimized.gas),
                outcome: format!("-{optimized_eth:.6}"),
            },
            ComparisonRow {
                label: "Avoided".to_string(),
                status_text: "Potential Savings".to_string(),
                gas_used: None,
                outcome: format!("+${savings_usd:.4}"),
            },
        ];

        Ok(self.assemble(format!("{hash:#x}"), rows, receipt.gas_used, &address, optimized.gas))
    }

    async fn preflight(
        &self,
        target: Address,
        from: Address,
    ) -> Result<AnalysisOutcome, GhostError> {
        let spot_usd = self.fetch_spot_price().await;
        let gas_price = self.gas_price_with_fallback().await?;

        let predicted_gas = match self.rpc.estimate_gas(&CallRequest::probe(target, from)).await {
            Ok(gas) => gas,
            Err(EstimateError::Reverted { reason }) => {
                return Err(AnalysisError::SimulationReverted {
                    address: to_checksum(&target, None),
                    reason,
                }
                .into())
            }
            Err(EstimateError::Network(err)) => return Err(err.into()),
        };
        self.store.logs().push(format!(
            "[SYSTEM] Dry-run accepted: {predicted_gas} gas units predicted."
        ));
        let address = to_checksum(&target, None);

        let baseline_eth = gas_cost_eth(predicted_gas, gas_price);
        let optimized = metrics::optimized_path(predicted_gas, &address);
        let optimized_eth = gas_cost_eth(optimized.gas, gas_price);
        let savings_usd = baseline_eth * spot_usd - optimized_eth * spot_usd;

        let rows = [
            ComparisonRow {
                label: "Actual".to_string(),
                status_text: "Legacy EVM".to_string(),
                gas_used: Some(predicted_gas),
                outcome: format!("-{baseline_eth:.10}"),
            },
            ComparisonRow {
                label: "Optimal (Stylus)".to_string(),
                status_text: "WASM Optimized".to_string(),
                gas_used: Some(optimized.gas),
                outcome: format!("-{optimized_eth:.10}"),
            },
            ComparisonRow {
                label: "Avoided".to_string(),
                status_text: "Capital Efficiency".to_string(),
                gas_used: None,
                outcome: format!("+${savings_usd:.4}"),
            },
        ];

        Ok(self.assemble(
            PREVIEW_SOURCE_ID.to_string(),
            rows,
            predicted_gas,
            &address,
            optimized.gas,
        ))
    }

    fn assemble(
        &self,
        source_id: String,
        rows: [ComparisonRow; 3],
        gas_used: u64,
        address: &str,
        optimized_gas: u64,
    ) -> AnalysisOutcome {
        AnalysisOutcome {
            result: AnalysisResult { source_id, rows },
            breakdown: metrics::gas_breakdown(gas_used, address),
            memory: metrics::memory_heap(address),
            multiplier: metrics::efficiency_multiplier(gas_used, optimized_gas),
        }
    }

    /// Input rejected before any network call or state change.
    fn reject(&self, err: AnalysisError) -> GhostError {
        let err = GhostError::from(err);
        self.store.logs().push(error_line(&err));
        err
    }

    /// Publish or discard a finished analysis under its generation token.
    fn settle(
        &self,
        generation: u64,
        outcome: Result<AnalysisOutcome, GhostError>,
        done_line: String,
    ) -> Result<AnalysisResult, GhostError> {
        match outcome {
            Ok(outcome) => {
                let result = outcome.result.clone();
                if self.store.publish_analysis(generation, outcome) {
                    self.store.logs().push(done_line);
                    info!("analysis published for {}", result.source_id);
                } else {
                    debug!("superseded analysis discarded for {}", result.source_id);
                }
                Ok(result)
            }
            Err(err) => {
                self.store.finish_analysis(generation);
                self.store.logs().push(error_line(&err));
                Err(err)
            }
        }
    }

    async fn fetch_spot_price(&self) -> f64 {
        let price = self.oracle.spot_price_usd().await;
        self.store
            .logs()
            .push(format!("[MARKET] Live ETH Price: ${price:.2} USD"));
        price
    }

    async fn gas_price_with_fallback(&self) -> Result<U256, GhostError> {
        let reported = self.rpc.gas_price().await.map_err(GhostError::from)?;
        Ok(reported.unwrap_or_else(|| U256::from(self.config.gas_price_fallback_wei)))
    }

    /// Staged progress lines while the analysis is in flight. The
    /// returned guard cancels the task on every exit path.
    fn spawn_ticker(&self) -> DropGuard {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        let logs = self.store.logs();
        let interval = Duration::from_millis(self.config.ticker_interval_ms);

        tokio::spawn(async move {
            for line in TICKER_LINES {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(interval) => {}
                }
                logs.push(format!("[{}] {line}", Local::now().format("%H:%M:%S")));
            }
        });
        guard
    }
}

fn error_line(err: &GhostError) -> String {
    match err {
        GhostError::Analysis(AnalysisError::SimulationReverted { .. }) => {
            "[CRITICAL] Simulation Reverted. Address rejected dry-run.".to_string()
        }
        GhostError::Analysis(AnalysisError::NotFound { .. }) => {
            "[ERROR] Transaction not found on the configured chain.".to_string()
        }
        other => format!("[ERROR] Analysis aborted: {other}"),
    }
}

fn short_hex(value: &str) -> &str {
    if value.len() > 10 {
        &value[..10]
    } else {
        value
    }
}
