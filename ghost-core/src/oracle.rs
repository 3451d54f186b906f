//! # Spot Price Oracle
//!
//! One GET against a CoinGecko-compatible simple-price endpoint. The
//! call never fails from the caller's perspective: any problem (network,
//! non-2xx, malformed payload) degrades to the configured fallback quote
//! with a single `[WARNING]` trace line.

use crate::config::OracleConfig;
use crate::logbuf::LogBuffer;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct PriceOracleClient {
    client: reqwest::Client,
    config: OracleConfig,
    logs: Arc<LogBuffer>,
}

impl PriceOracleClient {
    pub fn new(config: OracleConfig, logs: Arc<LogBuffer>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("failed to build price feed client")?;
        Ok(Self { client, config, logs })
    }

    /// Live quote in the configured currency, or the fallback.
    pub async fn spot_price_usd(&self) -> f64 {
        match self.fetch().await {
            Ok(price) => {
                debug!("live {} quote: {price}", self.config.asset_id);
                price
            }
            Err(err) => {
                warn!(
                    "price feed unavailable ({err:#}); using fallback ${:.2}",
                    self.config.fallback_usd
                );
                self.logs
                    .push("[WARNING] Price feed offline, using fallback quote.");
                self.config.fallback_usd
            }
        }
    }

    async fn fetch(&self) -> Result<f64> {
        let url = format!(
            "{}?ids={}&vs_currencies={}",
            self.config.endpoint, self.config.asset_id, self.config.quote_currency
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("price feed request failed")?;
        anyhow::ensure!(
            response.status().is_success(),
            "price feed returned {}",
            response.status()
        );

        // payload shape: {"<asset>": {"<currency>": 1234.56}}
        let body: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .context("malformed price feed payload")?;
        body.get(&self.config.asset_id)
            .and_then(|quotes| quotes.get(&self.config.quote_currency))
            .copied()
            .ok_or_else(|| anyhow!("asset '{}' missing from payload", self.config.asset_id))
    }
}
