use buyer_core::{render_utc, ScanWindow, WalletAggregate};
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const REPORT_HEADER: [&str; 7] = [
    "wallet",
    "first_seen_utc",
    "last_seen_utc",
    "tx_count",
    "raw_total",
    "decimals",
    "example_signature",
];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV line: a wallet aggregate with its timestamps rendered in UTC
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub wallet: String,
    pub first_seen_utc: String,
    pub last_seen_utc: String,
    pub tx_count: u64,
    pub raw_total: u128,
    pub decimals: Option<u8>,
    pub example_signature: String,
}

impl From<&WalletAggregate> for ReportRow {
    fn from(aggregate: &WalletAggregate) -> Self {
        Self {
            wallet: aggregate.wallet.clone(),
            first_seen_utc: render_utc(aggregate.first_seen_ts),
            last_seen_utc: render_utc(aggregate.last_seen_ts),
            tx_count: aggregate.tx_count,
            raw_total: aggregate.raw_total,
            decimals: aggregate.decimals,
            example_signature: aggregate.example_signature.clone(),
        }
    }
}

impl ReportRow {
    fn to_record(&self) -> [String; 7] {
        [
            self.wallet.clone(),
            self.first_seen_utc.clone(),
            self.last_seen_utc.clone(),
            self.tx_count.to_string(),
            self.raw_total.to_string(),
            self.decimals.map(|d| d.to_string()).unwrap_or_default(),
            self.example_signature.clone(),
        ]
    }
}

/// `buyers_<first 6 chars of mint>_<start>_<end>.csv`
pub fn report_file_name(token_mint: &str, window: &ScanWindow) -> String {
    let prefix: String = token_mint.chars().take(6).collect();
    format!("buyers_{}_{}_{}.csv", prefix, window.start_ts, window.end_ts)
}

pub fn report_path(directory: &Path, token_mint: &str, window: &ScanWindow) -> PathBuf {
    directory.join(report_file_name(token_mint, window))
}

/// Write the header and one line per row, replacing any existing file
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(REPORT_HEADER)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
