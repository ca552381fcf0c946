use buyer_core::{ChainDataSource, ScanWindow, SignatureInfo};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Walk an address's signature history newest-first and collect the signatures
/// whose block time lies inside `window`.
///
/// Stops at the first empty page or at the first block time older than the
/// window start. Entries with no block time are skipped. `rate_limit` is slept
/// before each follow-up page request.
pub async fn fetch_signatures_in_window<C: ChainDataSource + ?Sized>(
    chain: &C,
    address: &str,
    window: &ScanWindow,
    page_limit: u32,
    rate_limit: Duration,
) -> buyer_core::Result<Vec<String>> {
    let mut collected = Vec::new();
    let mut before: Option<String> = None;
    let mut page = 0u32;

    loop {
        let entries = chain
            .fetch_signature_page(address, before.as_deref(), page_limit)
            .await?;
        page += 1;

        if entries.is_empty() {
            debug!("Page {} for {} is empty, history exhausted", page, address);
            break;
        }

        info!(
            "Page {}: {} signatures (newest {:?}, oldest {:?})",
            page,
            entries.len(),
            entries.first().and_then(|e| e.block_time),
            entries.last().and_then(|e| e.block_time)
        );

        if collect_page(&entries, window, &mut collected) == PageOutcome::PassedWindowStart {
            debug!("Page {} for {} reached below the window start", page, address);
            break;
        }

        before = entries.last().map(|e| e.signature.clone());

        if !rate_limit.is_zero() {
            sleep(rate_limit).await;
        }
    }

    Ok(collected)
}

#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    Continue,
    PassedWindowStart,
}

fn collect_page(entries: &[SignatureInfo], window: &ScanWindow, collected: &mut Vec<String>) -> PageOutcome {
    for entry in entries {
        let Some(block_time) = entry.block_time else {
            continue;
        };

        if window.is_before_start(block_time) {
            return PageOutcome::PassedWindowStart;
        }

        if window.contains(block_time) {
            collected.push(entry.signature.clone());
        }
    }

    PageOutcome::Continue
}

/// Drop repeated signatures, keeping the first occurrence of each
pub fn dedup_signatures(signatures: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(signatures.len());
    signatures
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
