// Helius enhanced-transaction shapes, reduced to the fields buyer extraction reads.
// Everything is optional; the parsing endpoint omits fields freely across
// transaction types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTransaction {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(rename = "feePayer", default)]
    pub fee_payer: Option<String>,
    #[serde(default)]
    pub events: Option<TransactionEvents>,
    #[serde(rename = "tokenTransfers", default)]
    pub token_transfers: Option<Vec<TokenTransfer>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionEvents {
    #[serde(default)]
    pub swap: Option<SwapEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapEvent {
    #[serde(rename = "tokenOutputs", default)]
    pub token_outputs: Option<Vec<TokenOutput>>,
    #[serde(rename = "innerSwaps", default)]
    pub inner_swaps: Option<Vec<InnerSwap>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnerSwap {
    #[serde(rename = "tokenOutputs", default)]
    pub token_outputs: Option<Vec<TokenOutput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenOutput {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(rename = "toUserAccount", default)]
    pub to_user_account: Option<String>,
    #[serde(rename = "userAccount", default)]
    pub user_account: Option<String>,
    #[serde(rename = "rawTokenAmount", default)]
    pub raw_token_amount: Option<RawTokenAmount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTokenAmount {
    /// Integer amount as a decimal string; left untyped because upstream is not consistent
    #[serde(rename = "tokenAmount", default)]
    pub token_amount: Option<Value>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenTransfer {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(rename = "fromUserAccount", default)]
    pub from_user_account: Option<String>,
    #[serde(rename = "toUserAccount", default)]
    pub to_user_account: Option<String>,
    /// String or number depending on the transaction source
    #[serde(rename = "tokenAmount", default)]
    pub token_amount: Option<Value>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

impl ParsedTransaction {
    /// Direct swap outputs followed by every inner-swap leg's outputs, in order
    pub fn swap_outputs(&self) -> Vec<&TokenOutput> {
        let Some(swap) = self.events.as_ref().and_then(|e| e.swap.as_ref()) else {
            return Vec::new();
        };

        let direct = swap.token_outputs.iter().flatten();
        let inner = swap
            .inner_swaps
            .iter()
            .flatten()
            .flat_map(|leg| leg.token_outputs.iter().flatten());

        direct.chain(inner).collect()
    }

    pub fn transfers(&self) -> &[TokenTransfer] {
        self.token_transfers.as_deref().unwrap_or_default()
    }

    /// Whether the mint shows up anywhere in the flat token-transfer list
    pub fn mentions_mint_in_transfers(&self, token_mint: &str) -> bool {
        self.transfers()
            .iter()
            .any(|t| t.mint.as_deref() == Some(token_mint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_outputs_include_inner_legs() {
        let json = r#"{
            "signature": "sig1",
            "timestamp": 1200,
            "feePayer": "Payer",
            "events": {
                "swap": {
                    "tokenOutputs": [{"mint": "A"}],
                    "innerSwaps": [
                        {"tokenOutputs": [{"mint": "B"}, {"mint": "C"}]},
                        {"tokenInputs": []}
                    ]
                }
            }
        }"#;

        let tx: ParsedTransaction = serde_json::from_str(json).unwrap();
        let mints: Vec<_> = tx
            .swap_outputs()
            .iter()
            .filter_map(|o| o.mint.as_deref())
            .collect();
        assert_eq!(mints, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_null_and_missing_collections() {
        let json = r#"{"signature": "sig2", "timestamp": null, "events": {"swap": null}, "tokenTransfers": null}"#;

        let tx: ParsedTransaction = serde_json::from_str(json).unwrap();
        assert!(tx.timestamp.is_none());
        assert!(tx.swap_outputs().is_empty());
        assert!(tx.transfers().is_empty());
        assert!(!tx.mentions_mint_in_transfers("A"));
    }
}
