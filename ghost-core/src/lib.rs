//! # GhostTx Core - Gas Audit & Intent Engine
//!
//! Engine crate behind the GhostTx dashboard. It audits a past
//! transaction's gas cost against a modeled optimized-execution path,
//! pre-simulates prospective calls, and runs the signed-intent flow with
//! its relayer monitor loop. Front-ends consume the read models exposed by
//! [`store::DashboardStore`] and drive the engine through five actions:
//! connect, analyze, simulate, sign, cancel.
//!
//! ## Modules
//!
//! - [`analyzer`] - Audit (by hash) and pre-flight (by address) analysis
//! - [`config`] - Chain, oracle, intent, and analyzer settings
//! - [`error`] - Typed error handling with thiserror
//! - [`intent`] - Intent state machine and monitor timer
//! - [`logbuf`] - Bounded user-facing trace stream
//! - [`metrics`] - Pure derived-figure formulas
//! - [`oracle`] - Spot price client with silent fallback
//! - [`rpc`] / [`wallet`] - Production chain and wallet collaborators
//! - [`store`] - Explicit session state container
//! - [`traits`] - Collaborator seams

pub mod analyzer;
pub mod config;
pub mod error;
pub mod intent;
pub mod logbuf;
pub mod metrics;
pub mod oracle;
pub mod rpc;
pub mod store;
pub mod traits;
pub mod wallet;
pub(crate) mod utils;

pub use analyzer::TransactionAnalyzer;
pub use config::{AnalyzerConfig, ChainProfile, IntentConfig, OracleConfig};
pub use error::{
    AnalysisError, EstimateError, GhostError, IntentError, NetworkError, WalletError,
};
pub use intent::IntentAutomaton;
pub use logbuf::{LogBuffer, LOG_CAPACITY};
pub use metrics::{GasBreakdown, MemoryHeap, MemorySlot, OptimizedPath};
pub use oracle::PriceOracleClient;
pub use rpc::EthersRpc;
pub use store::{
    AnalysisOutcome, AnalysisResult, ComparisonRow, DashboardSnapshot, DashboardStore,
    IntentState,
};
pub use traits::{CallRequest, ChainRpc, ReceiptSummary, SignedIntent, WalletBridge};
pub use wallet::{connect_session, ConnectedAccount, EnvWallet, SIGNER_KEY_ENV};

// Utils are pub(crate) - only export the logging setup and unit helpers
pub use utils::{gas_cost_eth, gwei_to_wei, setup_logger, wei_to_eth};
