use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network profile for the chain the engine points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainProfile {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_symbol: String,
    pub native_decimals: u8,
}

impl ChainProfile {
    /// Chain id in the hex form wallets expect (`0x66eee`).
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

impl Default for ChainProfile {
    fn default() -> Self {
        Self {
            name: "Arbitrum Sepolia".to_string(),
            chain_id: 421_614,
            rpc_url: "https://sepolia-rollup.arbitrum.io/rpc".to_string(),
            explorer_url: "https://sepolia.arbiscan.io/".to_string(),
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
        }
    }
}

/// Spot price feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub endpoint: String,
    pub asset_id: String,
    pub quote_currency: String,
    /// Quote used whenever the feed cannot be reached.
    pub fallback_usd: f64,
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            asset_id: "ethereum".to_string(),
            quote_currency: "usd".to_string(),
            fallback_usd: 2650.00,
            timeout_ms: 10_000,
        }
    }
}

/// Relayer monitor settings for the intent automaton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    pub poll_interval_ms: u64,
    /// The monitor declares a gas match on this tick.
    pub trigger_ticks: u32,
    pub relayer_tag: String,
}

impl IntentConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_500,
            trigger_ticks: 5,
            relayer_tag: "0xGhostRelayer_v1".to_string(),
        }
    }
}

/// Analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Cadence of the staged progress lines while an analysis runs.
    pub ticker_interval_ms: u64,
    /// Used when the node does not report a gas price (0.1 gwei).
    pub gas_price_fallback_wei: u64,
    /// Suggested pre-flight target when the user has none.
    pub example_target: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ticker_interval_ms: 400,
            gas_price_fallback_wei: 100_000_000,
            example_target: "0x391D9430426cC633E72a5035BA7364893757F322".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_profile_defaults() {
        let profile = ChainProfile::default();
        assert_eq!(profile.chain_id, 421_614);
        assert_eq!(profile.chain_id_hex(), "0x66eee");
        assert_eq!(profile.native_decimals, 18);
    }

    #[test]
    fn test_intent_defaults() {
        let config = IntentConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(2_500));
        assert_eq!(config.trigger_ticks, 5);
    }

    #[test]
    fn test_analyzer_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.gas_price_fallback_wei, 100_000_000);
        assert!(config.example_target.starts_with("0x"));
    }
}
