pub mod aggregator;
pub mod extractor;
pub mod pairs;
pub mod transaction;
pub mod window;

pub use aggregator::{parse_raw_amount, BuyerAggregator, WalletAggregate};
pub use extractor::{extract_buyers, swap_output_tier, token_transfer_tier, ExtractionTier, EXTRACTION_TIERS};
pub use pairs::{pool_score, select_top_pools, PairLiquidity, PairToken, PairVolume, TokenPair};
pub use transaction::{
    InnerSwap, ParsedTransaction, RawTokenAmount, SwapEvent, TokenOutput, TokenTransfer,
    TransactionEvents,
};
pub use window::{render_utc, ScanWindow};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// One entry of a `getSignaturesForAddress` page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(rename = "blockTime", default)]
    pub block_time: Option<i64>,
}

/// A single buy-side token receipt attributed to a wallet within one transaction.
///
/// Produced by the extraction tiers and folded straight into a [`BuyerAggregator`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerObservation {
    /// Resolved buyer wallet (never empty)
    pub wallet: String,
    /// Raw integer amount as reported upstream, if any
    pub raw_amount: Option<String>,
    pub decimals: Option<u8>,
    pub signature: String,
    /// Transaction timestamp (epoch seconds)
    pub timestamp: i64,
}

/// Market-data side: lists the trading pairs of a token
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch every pair the market-data API knows for `token_mint`, unordered
    async fn fetch_token_pairs(&self, token_mint: &str) -> Result<Vec<TokenPair>>;
}

/// Chain-indexing side: signature history and parsed transactions
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Fetch one page of signatures for `address`, newest first, strictly older than `before`
    async fn fetch_signature_page(
        &self,
        address: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SignatureInfo>>;

    /// Resolve a batch of signatures into parsed transactions
    async fn parse_transactions(&self, signatures: &[String]) -> Result<Vec<ParsedTransaction>>;
}
