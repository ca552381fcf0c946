//! In-memory market and chain sources for orchestrator tests.

use async_trait::async_trait;
use buyer_core::{
    ChainDataSource, MarketDataSource, ParsedTransaction, PairLiquidity, PairToken, PairVolume,
    SignatureInfo, SourceError, TokenPair,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const MINT: &str = "MintAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const SOL: &str = "So11111111111111111111111111111111111111112";

pub fn pair(address: &str, base: &str, quote: &str, liquidity_usd: f64) -> TokenPair {
    TokenPair {
        chain_id: Some("solana".to_string()),
        dex_id: Some("raydium".to_string()),
        pair_address: Some(address.to_string()),
        base_token: Some(PairToken {
            address: Some(base.to_string()),
            symbol: None,
        }),
        quote_token: Some(PairToken {
            address: Some(quote.to_string()),
            symbol: None,
        }),
        liquidity: Some(PairLiquidity {
            usd: Some(liquidity_usd),
        }),
        volume: Some(PairVolume { h24: Some(0.0) }),
    }
}

pub fn sig(signature: &str, block_time: Option<i64>) -> SignatureInfo {
    SignatureInfo {
        signature: signature.to_string(),
        block_time,
    }
}

/// Swap transaction whose single token output of `mint` goes to `buyer`
pub fn swap_tx(signature: &str, ts: i64, buyer: &str, mint: &str, amount: &str, decimals: u8) -> ParsedTransaction {
    serde_json::from_value(serde_json::json!({
        "signature": signature,
        "timestamp": ts,
        "feePayer": buyer,
        "events": {
            "swap": {
                "tokenOutputs": [{
                    "mint": mint,
                    "userAccount": buyer,
                    "rawTokenAmount": {"tokenAmount": amount, "decimals": decimals}
                }],
                "innerSwaps": []
            }
        },
        "tokenTransfers": [{
            "mint": mint,
            "toUserAccount": buyer,
            "tokenAmount": 1
        }]
    }))
    .expect("fixture transaction")
}

pub struct MockMarket {
    pub pairs: Vec<TokenPair>,
}

#[async_trait]
impl MarketDataSource for MockMarket {
    async fn fetch_token_pairs(&self, _token_mint: &str) -> buyer_core::Result<Vec<TokenPair>> {
        Ok(self.pairs.clone())
    }
}

/// Static dataset: signature history per address (newest first) and parsed
/// transactions by signature.
#[derive(Default)]
pub struct MockChain {
    pub history: HashMap<String, Vec<SignatureInfo>>,
    pub transactions: HashMap<String, ParsedTransaction>,
    pub page_requests: AtomicUsize,
    pub parse_requests: Mutex<Vec<Vec<String>>>,
    pub fail_rpc: bool,
}

impl MockChain {
    pub fn with_history(mut self, address: &str, history: Vec<SignatureInfo>) -> Self {
        self.history.insert(address.to_string(), history);
        self
    }

    pub fn with_transaction(mut self, tx: ParsedTransaction) -> Self {
        self.transactions.insert(tx.signature.clone(), tx);
        self
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    pub fn parse_requests(&self) -> Vec<Vec<String>> {
        self.parse_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainDataSource for MockChain {
    async fn fetch_signature_page(
        &self,
        address: &str,
        before: Option<&str>,
        limit: u32,
    ) -> buyer_core::Result<Vec<SignatureInfo>> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        if self.fail_rpc {
            return Err(SourceError::Rpc {
                code: -32005,
                message: "Node is behind".to_string(),
                data: None,
            });
        }

        let history = self.history.get(address).cloned().unwrap_or_default();
        let start = match before {
            Some(before) => history
                .iter()
                .rposition(|s| s.signature == before)
                .map(|idx| idx + 1)
                .unwrap_or(history.len()),
            None => 0,
        };

        Ok(history.into_iter().skip(start).take(limit as usize).collect())
    }

    async fn parse_transactions(&self, signatures: &[String]) -> buyer_core::Result<Vec<ParsedTransaction>> {
        self.parse_requests.lock().unwrap().push(signatures.to_vec());

        Ok(signatures
            .iter()
            .filter_map(|s| self.transactions.get(s).cloned())
            .collect())
    }
}
