//! Buyer extraction from parsed transactions.
//!
//! Tiers are tried in order and the first one that yields at least one
//! observation wins; lower tiers are never consulted after that.

use crate::transaction::ParsedTransaction;
use crate::BuyerObservation;
use serde_json::Value;
use tracing::trace;

/// A tier maps a transaction (plus the target mint and the transaction's
/// timestamp) to the buyer observations it can attribute.
pub type ExtractionTier = fn(&ParsedTransaction, &str, i64) -> Vec<BuyerObservation>;

/// Extraction tiers in priority order
pub const EXTRACTION_TIERS: &[ExtractionTier] = &[swap_output_tier, token_transfer_tier];

/// Extract buyer observations for `token_mint` from a single transaction.
///
/// Transactions without a timestamp yield nothing.
pub fn extract_buyers(tx: &ParsedTransaction, token_mint: &str) -> Vec<BuyerObservation> {
    let Some(timestamp) = tx.timestamp else {
        return Vec::new();
    };

    for (idx, tier) in EXTRACTION_TIERS.iter().enumerate() {
        let observations = tier(tx, token_mint, timestamp);
        if !observations.is_empty() {
            trace!(
                "tx {} resolved by tier {} ({} observations)",
                tx.signature,
                idx + 1,
                observations.len()
            );
            return observations;
        }
    }

    Vec::new()
}

/// Swap-event tier: direct and inner-swap token outputs of the target mint.
///
/// Buyer resolution: `toUserAccount`, then `userAccount`, then the fee payer.
pub fn swap_output_tier(tx: &ParsedTransaction, token_mint: &str, timestamp: i64) -> Vec<BuyerObservation> {
    tx.swap_outputs()
        .into_iter()
        .filter(|output| output.mint.as_deref() == Some(token_mint))
        .filter_map(|output| {
            let wallet = first_present(&[
                output.to_user_account.as_deref(),
                output.user_account.as_deref(),
                tx.fee_payer.as_deref(),
            ])?;
            let raw = output.raw_token_amount.as_ref();

            Some(BuyerObservation {
                wallet: wallet.to_string(),
                raw_amount: raw
                    .and_then(|r| r.token_amount.as_ref())
                    .and_then(Value::as_str)
                    .map(str::to_string),
                decimals: raw.and_then(|r| r.decimals),
                signature: tx.signature.clone(),
                timestamp,
            })
        })
        .collect()
}

/// Token-transfer tier: flat transfers of the target mint.
///
/// Buyer resolution: `toUserAccount`, then the fee payer. Numeric amounts are
/// carried in their JSON text form.
pub fn token_transfer_tier(tx: &ParsedTransaction, token_mint: &str, timestamp: i64) -> Vec<BuyerObservation> {
    tx.transfers()
        .iter()
        .filter(|transfer| transfer.mint.as_deref() == Some(token_mint))
        .filter_map(|transfer| {
            let wallet = first_present(&[
                transfer.to_user_account.as_deref(),
                tx.fee_payer.as_deref(),
            ])?;

            Some(BuyerObservation {
                wallet: wallet.to_string(),
                raw_amount: transfer.token_amount.as_ref().and_then(amount_text),
                decimals: transfer.decimals,
                signature: tx.signature.clone(),
                timestamp,
            })
        })
        .collect()
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|account| !account.is_empty())
}

fn amount_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
