use crate::http::{JsonHttpClient, TransportError};
use async_trait::async_trait;
use buyer_core::{MarketDataSource, SourceError, TokenPair};
use config_manager::DexScreenerConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DexScreenerError {
    #[error("DexScreener transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<DexScreenerError> for SourceError {
    fn from(err: DexScreenerError) -> Self {
        SourceError::Transport(err.to_string())
    }
}

/// DexScreener API client for token pair discovery
#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    http: JsonHttpClient,
    config: DexScreenerConfig,
}

impl DexScreenerClient {
    /// Create a new DexScreener client
    pub fn new(config: DexScreenerConfig) -> Result<Self, DexScreenerError> {
        let http = JsonHttpClient::new(Duration::from_secs(config.request_timeout_seconds))?;
        Ok(Self { http, config })
    }

    /// `{base}/tokens/v1/{chain}/{mint}`
    fn token_pairs_url(&self, token_mint: &str) -> String {
        format!(
            "{}/tokens/v1/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.chain_id,
            token_mint
        )
    }

    /// Get every trading pair DexScreener lists for a token
    pub async fn get_token_pairs(&self, token_mint: &str) -> Result<Vec<TokenPair>, DexScreenerError> {
        let url = self.token_pairs_url(token_mint);
        debug!("🔍 Fetching token pairs from: {}", url);

        let pairs: Vec<TokenPair> = self.http.get_json(&url, &[]).await?;

        info!("📊 Retrieved {} pairs for {} from DexScreener", pairs.len(), token_mint);
        Ok(pairs)
    }

    /// Get configuration
    pub fn get_config(&self) -> &DexScreenerConfig {
        &self.config
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn fetch_token_pairs(&self, token_mint: &str) -> buyer_core::Result<Vec<TokenPair>> {
        Ok(self.get_token_pairs(token_mint).await?)
    }
}
