use crate::BuyerObservation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-wallet accumulator across every pool and batch of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAggregate {
    pub wallet: String,
    pub first_seen_ts: i64,
    pub last_seen_ts: i64,
    pub tx_count: u64,
    /// Sum of the digit-only raw amounts; anything else contributed zero
    pub raw_total: u128,
    /// First decimals value seen; never overwritten once set
    pub decimals: Option<u8>,
    /// Signature of the first observation folded in
    pub example_signature: String,
}

impl WalletAggregate {
    fn from_observation(obs: BuyerObservation) -> Self {
        Self {
            raw_total: parse_raw_amount(obs.raw_amount.as_deref()),
            wallet: obs.wallet,
            first_seen_ts: obs.timestamp,
            last_seen_ts: obs.timestamp,
            tx_count: 1,
            decimals: obs.decimals,
            example_signature: obs.signature,
        }
    }

    fn absorb(&mut self, obs: &BuyerObservation) {
        self.first_seen_ts = self.first_seen_ts.min(obs.timestamp);
        self.last_seen_ts = self.last_seen_ts.max(obs.timestamp);
        self.tx_count += 1;
        self.raw_total = self
            .raw_total
            .saturating_add(parse_raw_amount(obs.raw_amount.as_deref()));
        if self.decimals.is_none() {
            self.decimals = obs.decimals;
        }
    }
}

/// Raw amount contribution: the integer value of a string made only of ASCII
/// digits, zero for everything else (signed, fractional, formatted, absent,
/// or too large for `u128`).
pub fn parse_raw_amount(raw: Option<&str>) -> u128 {
    match raw {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Reduces buyer observations into one [`WalletAggregate`] per wallet.
///
/// Wallets are kept in first-observation order so that equal first-seen
/// timestamps sort deterministically.
#[derive(Debug, Default)]
pub struct BuyerAggregator {
    index: HashMap<String, usize>,
    wallets: Vec<WalletAggregate>,
}

impl BuyerAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, obs: BuyerObservation) {
        match self.index.get(&obs.wallet) {
            Some(&slot) => self.wallets[slot].absorb(&obs),
            None => {
                self.index.insert(obs.wallet.clone(), self.wallets.len());
                self.wallets.push(WalletAggregate::from_observation(obs));
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = BuyerObservation>>(&mut self, observations: I) {
        for obs in observations {
            self.record(obs);
        }
    }

    pub fn get(&self, wallet: &str) -> Option<&WalletAggregate> {
        self.index.get(wallet).map(|&slot| &self.wallets[slot])
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Consume the aggregator, returning wallets ascending by first-seen time
    /// (stable, ties stay in insertion order)
    pub fn into_sorted(self) -> Vec<WalletAggregate> {
        let mut wallets = self.wallets;
        wallets.sort_by_key(|w| w.first_seen_ts);
        wallets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(wallet: &str, amount: Option<&str>, decimals: Option<u8>, sig: &str, ts: i64) -> BuyerObservation {
        BuyerObservation {
            wallet: wallet.to_string(),
            raw_amount: amount.map(str::to_string),
            decimals,
            signature: sig.to_string(),
            timestamp: ts,
        }
    }

    #[test]
    fn test_parse_raw_amount() {
        assert_eq!(parse_raw_amount(Some("12345")), 12345);
        assert_eq!(parse_raw_amount(Some("0")), 0);
        assert_eq!(parse_raw_amount(Some("1.5")), 0);
        assert_eq!(parse_raw_amount(Some("abc")), 0);
        assert_eq!(parse_raw_amount(Some("-5")), 0);
        assert_eq!(parse_raw_amount(Some("+5")), 0);
        assert_eq!(parse_raw_amount(Some("1e6")), 0);
        assert_eq!(parse_raw_amount(Some("")), 0);
        assert_eq!(parse_raw_amount(None), 0);
        // 40 digits overflows u128
        assert_eq!(parse_raw_amount(Some("9999999999999999999999999999999999999999")), 0);
    }

    #[test]
    fn test_first_observation_initialises() {
        let mut agg = BuyerAggregator::new();
        agg.record(obs("W", Some("100"), Some(6), "sig1", 1200));

        let w = agg.get("W").unwrap();
        assert_eq!(w.first_seen_ts, 1200);
        assert_eq!(w.last_seen_ts, 1200);
        assert_eq!(w.tx_count, 1);
        assert_eq!(w.raw_total, 100);
        assert_eq!(w.decimals, Some(6));
        assert_eq!(w.example_signature, "sig1");
    }

    #[test]
    fn test_merge_tracks_min_max_and_sum() {
        let mut agg = BuyerAggregator::new();
        agg.extend(vec![
            obs("W", Some("50"), Some(6), "late", 1800),
            obs("W", Some("100"), Some(6), "early", 1200),
            obs("W", Some("1.5"), Some(6), "odd", 1500),
        ]);

        let w = agg.get("W").unwrap();
        assert_eq!(w.first_seen_ts, 1200);
        assert_eq!(w.last_seen_ts, 1800);
        assert_eq!(w.tx_count, 3);
        assert_eq!(w.raw_total, 150);
        assert_eq!(w.example_signature, "late");
        assert_eq!(agg.len(), 1);
    }

    #[test]
    fn test_decimals_filled_once() {
        let mut agg = BuyerAggregator::new();
        agg.record(obs("W", Some("1"), None, "s1", 10));
        assert_eq!(agg.get("W").unwrap().decimals, None);

        agg.record(obs("W", Some("1"), Some(6), "s2", 11));
        assert_eq!(agg.get("W").unwrap().decimals, Some(6));

        agg.record(obs("W", Some("1"), Some(9), "s3", 12));
        agg.record(obs("W", Some("1"), None, "s4", 13));
        assert_eq!(agg.get("W").unwrap().decimals, Some(6));
    }

    #[test]
    fn test_same_signature_twice_counts_twice() {
        let mut agg = BuyerAggregator::new();
        agg.record(obs("W", Some("10"), Some(6), "dup", 1000));
        agg.record(obs("W", Some("10"), Some(6), "dup", 1000));

        let w = agg.get("W").unwrap();
        assert_eq!(w.tx_count, 2);
        assert_eq!(w.raw_total, 20);
    }

    #[test]
    fn test_sorted_by_first_seen_with_stable_ties() {
        let mut agg = BuyerAggregator::new();
        agg.extend(vec![
            obs("C", None, None, "s1", 300),
            obs("A", None, None, "s2", 100),
            obs("B", None, None, "s3", 300),
            obs("D", None, None, "s4", 100),
        ]);

        let order: Vec<_> = agg.into_sorted().into_iter().map(|w| w.wallet).collect();
        assert_eq!(order, vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_raw_total_saturates() {
        let mut agg = BuyerAggregator::new();
        let max = u128::MAX.to_string();
        agg.record(obs("W", Some(&max), None, "s1", 1));
        agg.record(obs("W", Some("1"), None, "s2", 2));
        assert_eq!(agg.get("W").unwrap().raw_total, u128::MAX);
    }
}
