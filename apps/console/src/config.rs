use anyhow::Result;
use config::{Config, File};
use ghost_core::{AnalyzerConfig, ChainProfile, IntentConfig, OracleConfig};
use serde::Deserialize;

/// Optional TOML overrides layered on the engine defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConsoleConfig {
    pub chain: Option<ChainProfile>,
    pub oracle: Option<OracleConfig>,
    pub intent: Option<IntentConfig>,
    pub analyzer: Option<AnalyzerConfig>,
}

impl ConsoleConfig {
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    pub fn chain_profile(&self) -> ChainProfile {
        self.chain.clone().unwrap_or_default()
    }

    pub fn oracle_config(&self) -> OracleConfig {
        self.oracle.clone().unwrap_or_default()
    }

    pub fn intent_config(&self) -> IntentConfig {
        self.intent.clone().unwrap_or_default()
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        self.analyzer.clone().unwrap_or_default()
    }
}
