use buyer_core::{
    extract_buyers, select_top_pools, BuyerAggregator, ChainDataSource, MarketDataSource,
    ScanWindow, SourceError, TokenPair,
};
use config_manager::SystemConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub mod report;
pub mod signatures;

#[cfg(test)]
mod test_support;

pub use report::{report_file_name, report_path, write_report, ReportError, ReportRow, REPORT_HEADER};
pub use signatures::{dedup_signatures, fetch_signatures_in_window};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("No DexScreener pairs found that include mint {token_mint} (wrong mint or not traded yet)")]
    NoPoolsFound { token_mint: String },
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Run parameters the orchestrator needs, detached from the full configuration
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub token_mint: String,
    pub window: ScanWindow,
    pub top_pools: usize,
    pub signature_page_limit: u32,
    pub parse_batch_size: usize,
    pub rate_limit: Duration,
    pub output_dir: PathBuf,
}

impl ScanSettings {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            token_mint: config.scan.token_mint.clone(),
            window: ScanWindow::new(config.scan.start_ts, config.scan.end_ts),
            top_pools: config.scan.top_pools,
            signature_page_limit: config.scan.signature_page_limit,
            parse_batch_size: config.scan.parse_batch_size.max(1),
            rate_limit: Duration::from_millis(config.scan.rate_limit_ms),
            output_dir: config.output_dir(),
        }
    }
}

/// Counters for one scanned pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolScanStats {
    pub pair_address: String,
    pub dex_id: Option<String>,
    /// In-window signatures after dedup
    pub signatures: usize,
    pub transactions_in_window: usize,
    /// In-window transactions whose token-transfer list mentions the mint
    pub mint_transfer_hits: usize,
    pub observations: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub pools: Vec<PoolScanStats>,
    pub unique_buyers: usize,
    pub report_path: PathBuf,
}

/// Drives one early-buyer scan: pool discovery, signature walk, parsing,
/// aggregation and the CSV report. Every request is awaited in turn.
pub struct BuyerScanOrchestrator<M, C> {
    market: M,
    chain: C,
    settings: ScanSettings,
}

impl<M: MarketDataSource, C: ChainDataSource> BuyerScanOrchestrator<M, C> {
    pub fn new(market: M, chain: C, settings: ScanSettings) -> Self {
        Self {
            market,
            chain,
            settings,
        }
    }

    /// Execute the whole scan. Nothing is written unless every step succeeds.
    pub async fn run(&self) -> Result<ScanSummary> {
        let settings = &self.settings;
        info!(
            "🚀 Scanning early buyers of {} between {} and {}",
            settings.token_mint,
            settings.window.start_utc(),
            settings.window.end_utc()
        );

        let pools = self.discover_pools().await?;

        let mut aggregator = BuyerAggregator::new();
        let mut pool_stats = Vec::with_capacity(pools.len());

        for pair in &pools {
            if let Some(stats) = self.scan_pool(pair, &mut aggregator).await? {
                pool_stats.push(stats);
            }
        }

        let unique_buyers = aggregator.len();
        let rows: Vec<ReportRow> = aggregator.into_sorted().iter().map(ReportRow::from).collect();

        let path = report_path(&settings.output_dir, &settings.token_mint, &settings.window);
        write_report(&path, &rows)?;

        info!("✅ Unique buyers: {}", unique_buyers);
        info!("📄 Report written to {}", path.display());

        Ok(ScanSummary {
            pools: pool_stats,
            unique_buyers,
            report_path: path,
        })
    }

    async fn discover_pools(&self) -> Result<Vec<TokenPair>> {
        let settings = &self.settings;
        let pairs = self.market.fetch_token_pairs(&settings.token_mint).await?;
        debug!("Market returned {} pairs", pairs.len());

        let pools = select_top_pools(pairs, &settings.token_mint, settings.top_pools);
        if pools.is_empty() {
            return Err(OrchestratorError::NoPoolsFound {
                token_mint: settings.token_mint.clone(),
            });
        }

        info!("📊 Selected {} pools", pools.len());
        Ok(pools)
    }

    /// Scan one pool into `aggregator`. Returns `None` when the pair is skipped.
    pub async fn scan_pool(
        &self,
        pair: &TokenPair,
        aggregator: &mut BuyerAggregator,
    ) -> Result<Option<PoolScanStats>> {
        let settings = &self.settings;
        let mint = settings.token_mint.as_str();

        let Some(pair_address) = pair.pair_address.as_deref().filter(|a| !a.is_empty()) else {
            warn!("⚠️ Skipping pair without a pair address (dex {:?})", pair.dex_id);
            return Ok(None);
        };

        if !pair.references_token(mint) {
            warn!("⚠️ Skipping pair {} which does not include {}", pair_address, mint);
            return Ok(None);
        }

        info!(
            "🔍 Pool {} on {} | base {} | quote {} | mint {}",
            pair_address,
            pair.dex_id.as_deref().unwrap_or("unknown"),
            pair.base_address().unwrap_or("?"),
            pair.quote_address().unwrap_or("?"),
            mint
        );

        let signatures = fetch_signatures_in_window(
            &self.chain,
            pair_address,
            &settings.window,
            settings.signature_page_limit,
            settings.rate_limit,
        )
        .await?;
        let signatures = dedup_signatures(signatures);
        info!("Signatures in window: {}", signatures.len());

        let mut stats = PoolScanStats {
            pair_address: pair_address.to_string(),
            dex_id: pair.dex_id.clone(),
            signatures: signatures.len(),
            ..Default::default()
        };

        let total = signatures.len();
        let mut parsed = 0usize;

        for batch in signatures.chunks(settings.parse_batch_size) {
            let transactions = self.chain.parse_transactions(batch).await?;

            for tx in transactions
                .iter()
                .filter(|tx| settings.window.contains_opt(tx.timestamp))
            {
                stats.transactions_in_window += 1;
                if tx.mentions_mint_in_transfers(mint) {
                    stats.mint_transfer_hits += 1;
                }

                let observations = extract_buyers(tx, mint);
                stats.observations += observations.len();
                aggregator.extend(observations);
            }

            parsed += batch.len();
            info!("parsed {}/{}", parsed, total);

            if !settings.rate_limit.is_zero() {
                sleep(settings.rate_limit).await;
            }
        }

        info!(
            "Transactions in window mentioning {} in token transfers: {}",
            mint, stats.mint_transfer_hits
        );

        Ok(Some(stats))
    }
}
