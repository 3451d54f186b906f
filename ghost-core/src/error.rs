//! # Core Error Types
//!
//! Centralized error definitions for the ghost-core crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use crate::store::IntentState;
use thiserror::Error;

/// Unified error type for engine operations.
///
/// This enum wraps all specific error types and provides a unified
/// error interface for the front-end layer.
#[derive(Error, Debug)]
pub enum GhostError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Intent(#[from] IntentError),
}

/// Wallet collaborator errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("No wallet signer available. Configure one before connecting.")]
    Unavailable,

    #[error("User rejected the {action} request")]
    UserRejected { action: String },

    #[error("Wallet does not recognize chain id {chain_id}")]
    UnrecognizedChain { chain_id: u64 },

    #[error("Signer error: {reason}")]
    Signer { reason: String },

    #[error("Wallet backend error: {reason}")]
    Backend { reason: String },
}

/// Network and RPC-related errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Endpoint {endpoint} unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("HTTP error {status_code} from {endpoint}")]
    Http { status_code: u16, endpoint: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

/// Failures of the audit and pre-flight flows
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    #[error("'{input}' is not a valid transaction hash")]
    InvalidHash { input: String },

    #[error("'{input}' is not a valid address")]
    InvalidAddress { input: String },

    #[error("No receipt found for {hash}")]
    NotFound { hash: String },

    #[error("Simulation reverted against {address}: {reason}")]
    SimulationReverted { address: String, reason: String },
}

/// Intent automaton errors
#[derive(Error, Debug, Clone)]
pub enum IntentError {
    #[error("Cannot {action} from the {state} state")]
    InvalidState {
        action: &'static str,
        state: IntentState,
    },
}

/// Dry-run gas estimation outcome classifier.
///
/// A revert means the target rejected the call; anything else is a
/// transport problem.
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Dry-run rejected by target: {reason}")]
    Reverted { reason: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}
