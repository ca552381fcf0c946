use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// DexScreener pair snapshot, reduced to what pool ranking needs.
///
/// Every field is optional: pairs come from heterogeneous venues and any of
/// them can be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "chainId", default)]
    pub chain_id: Option<String>,
    #[serde(rename = "dexId", default)]
    pub dex_id: Option<String>,
    #[serde(rename = "pairAddress", default)]
    pub pair_address: Option<String>,
    #[serde(rename = "baseToken", default)]
    pub base_token: Option<PairToken>,
    #[serde(rename = "quoteToken", default)]
    pub quote_token: Option<PairToken>,
    #[serde(default)]
    pub liquidity: Option<PairLiquidity>,
    #[serde(default)]
    pub volume: Option<PairVolume>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairToken {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairLiquidity {
    #[serde(default)]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairVolume {
    #[serde(default)]
    pub h24: Option<f64>,
}

impl TokenPair {
    pub fn base_address(&self) -> Option<&str> {
        self.base_token.as_ref().and_then(|t| t.address.as_deref())
    }

    pub fn quote_address(&self) -> Option<&str> {
        self.quote_token.as_ref().and_then(|t| t.address.as_deref())
    }

    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0)
    }

    pub fn volume_24h_usd(&self) -> f64 {
        self.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0)
    }

    /// Whether the mint is the base or the quote side of this pair
    pub fn references_token(&self, token_mint: &str) -> bool {
        self.base_address() == Some(token_mint) || self.quote_address() == Some(token_mint)
    }
}

/// Liquidity-weighted ranking score: `liquidity_usd * 10 + volume_24h_usd`
pub fn pool_score(pair: &TokenPair) -> f64 {
    pair.liquidity_usd() * 10.0 + pair.volume_24h_usd()
}

/// Rank pairs by [`pool_score`] (descending, stable on ties), keep those that
/// reference `token_mint`, and return at most `top_n` of them.
pub fn select_top_pools(pairs: Vec<TokenPair>, token_mint: &str, top_n: usize) -> Vec<TokenPair> {
    let mut scored: Vec<(f64, TokenPair)> = pairs.into_iter().map(|p| (pool_score(&p), p)).collect();
    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .map(|(_, pair)| pair)
        .filter(|pair| pair.references_token(token_mint))
        .take(top_n)
        .collect()
}
