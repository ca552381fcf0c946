use buyer_core::{pool_score, select_top_pools, TokenPair};

const MINT: &str = "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr";

// Trimmed capture of /tokens/v1/solana/{mint}
const TOKEN_PAIRS_RESPONSE: &str = r#"[
  {
    "chainId": "solana",
    "dexId": "raydium",
    "url": "https://dexscreener.com/solana/3nmfmbh5oyxsp8bc2zgsg9bpajgfdkcqygtbaiwxhtsb",
    "pairAddress": "3nMFwZXwY1s1M5s8vYAHqd4wGs4iSxXE4LRoUMMYqEgF",
    "labels": ["CLMM"],
    "baseToken": {"address": "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", "name": "POPCAT", "symbol": "POPCAT"},
    "quoteToken": {"address": "So11111111111111111111111111111111111111112", "name": "Wrapped SOL", "symbol": "SOL"},
    "priceNative": "0.002",
    "priceUsd": "0.31",
    "txns": {"m5": {"buys": 3, "sells": 1}, "h24": {"buys": 900, "sells": 850}},
    "volume": {"h24": 250000.5, "h6": 60000, "h1": 9000, "m5": 100},
    "priceChange": {"h24": -3.2},
    "liquidity": {"usd": 120000.0, "base": 200000, "quote": 300},
    "fdv": 300000000,
    "marketCap": 300000000,
    "pairCreatedAt": 1703000000000
  },
  {
    "chainId": "solana",
    "dexId": "meteora",
    "url": "https://dexscreener.com/solana/frhb8l7y9qq41qzxyltc2nw8an1rjfllxrf2x9rwlld",
    "pairAddress": "FRhB8L7Y9Qq41qZXYLtC2nw8An1RJfLLxRF2x9RwLLMo",
    "baseToken": {"address": "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", "name": "POPCAT", "symbol": "POPCAT"},
    "quoteToken": {"address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "name": "USD Coin", "symbol": "USDC"},
    "volume": {"h24": 900000},
    "liquidity": {"usd": 15000}
  },
  {
    "chainId": "solana",
    "dexId": "pumpswap",
    "url": "https://dexscreener.com/solana/unrelated",
    "pairAddress": "Unre1atedPairAddress1111111111111111111111",
    "baseToken": {"address": "So11111111111111111111111111111111111111112", "name": "Wrapped SOL", "symbol": "SOL"},
    "quoteToken": {"address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "name": "USD Coin", "symbol": "USDC"},
    "volume": {"h24": 99999999},
    "liquidity": {"usd": 99999999}
  },
  {
    "chainId": "solana",
    "dexId": "orca",
    "url": "https://dexscreener.com/solana/fresh",
    "pairAddress": "FreshPoo1NoLiquidityYet111111111111111111",
    "baseToken": {"address": "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", "name": "POPCAT", "symbol": "POPCAT"},
    "quoteToken": {"address": "So11111111111111111111111111111111111111112", "name": "Wrapped SOL", "symbol": "SOL"}
  }
]"#;

#[test]
fn test_parse_token_pairs() {
    let pairs: Vec<TokenPair> = serde_json::from_str(TOKEN_PAIRS_RESPONSE).expect("token pairs should parse");
    assert_eq!(pairs.len(), 4);

    let first = &pairs[0];
    assert_eq!(first.dex_id.as_deref(), Some("raydium"));
    assert_eq!(first.base_address(), Some(MINT));
    assert_eq!(first.liquidity_usd(), 120000.0);
    assert_eq!(first.volume_24h_usd(), 250000.5);
    assert_eq!(pool_score(first), 1_450_000.5);

    // no liquidity or volume block at all
    assert_eq!(pool_score(&pairs[3]), 0.0);
}

#[test]
fn test_rank_recorded_pairs() {
    let pairs: Vec<TokenPair> = serde_json::from_str(TOKEN_PAIRS_RESPONSE).unwrap();

    let top = select_top_pools(pairs, MINT, 5);
    let addresses: Vec<_> = top.iter().filter_map(|p| p.pair_address.as_deref()).collect();

    // meteora: 15000*10 + 900000 = 1_050_000 < raydium: 1_450_000.5
    assert_eq!(
        addresses,
        vec![
            "3nMFwZXwY1s1M5s8vYAHqd4wGs4iSxXE4LRoUMMYqEgF",
            "FRhB8L7Y9Qq41qZXYLtC2nw8An1RJfLLxRF2x9RwLLMo",
            "FreshPoo1NoLiquidityYet111111111111111111",
        ]
    );
}

#[test]
fn test_rank_respects_top_n() {
    let pairs: Vec<TokenPair> = serde_json::from_str(TOKEN_PAIRS_RESPONSE).unwrap();
    let top = select_top_pools(pairs, MINT, 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].dex_id.as_deref(), Some("raydium"));
}
