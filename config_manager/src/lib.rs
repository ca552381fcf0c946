use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable holding the Helius API key
pub const HELIUS_KEY_ENV: &str = "HELIUS_KEY";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Missing Helius API key. Set it in your shell, e.g. `export HELIUS_KEY=YOUR_API_KEY` (PowerShell: `$env:HELIUS_KEY=\"YOUR_API_KEY\"`)")]
    MissingCredential,
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Run parameters: target mint, time window, pool count, batch sizes
    pub scan: ScanConfig,

    /// DexScreener market-data API configuration
    pub dexscreener: DexScreenerConfig,

    /// Helius RPC and parsing API configuration
    pub helius: HeliusConfig,

    /// Report output configuration
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Mint address of the token whose early buyers are wanted
    pub token_mint: String,

    /// Window start, epoch seconds (inclusive)
    pub start_ts: i64,

    /// Window end, epoch seconds (inclusive)
    pub end_ts: i64,

    /// How many of the best-ranked DexScreener pairs to scan
    pub top_pools: usize,

    /// Signatures requested per `getSignaturesForAddress` page (max 1000)
    pub signature_page_limit: u32,

    /// Signatures per parse request (max 100)
    pub parse_batch_size: usize,

    /// Fixed delay after every signature page and parse batch, in milliseconds
    pub rate_limit_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexScreenerConfig {
    /// DexScreener API base URL
    pub api_base_url: String,

    /// Chain identifier used in the token-pairs path
    pub chain_id: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliusConfig {
    /// Helius API key (falls back to the HELIUS_KEY environment variable)
    pub api_key: String,

    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Enhanced transactions API base URL
    pub api_base_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV report is written into
    pub directory: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig {
                token_mint: "".to_string(), // Must be set in config.toml or SNIFFER__SCAN__TOKEN_MINT
                start_ts: 1_760_806_800,
                end_ts: 1_760_864_400,
                top_pools: 5,
                signature_page_limit: 1000,
                parse_batch_size: 100,
                rate_limit_ms: 120, // free-tier friendly
            },
            dexscreener: DexScreenerConfig {
                api_base_url: "https://api.dexscreener.com".to_string(),
                chain_id: "solana".to_string(),
                request_timeout_seconds: 30,
            },
            helius: HeliusConfig {
                api_key: "".to_string(),
                rpc_url: "https://mainnet.helius-rpc.com".to_string(),
                api_base_url: "https://api-mainnet.helius-rpc.com/v0".to_string(),
                request_timeout_seconds: 60,
            },
            output: OutputConfig {
                directory: ".".to_string(),
            },
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_mint.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "scan.token_mint is required".to_string(),
            ));
        }

        if self.start_ts > self.end_ts {
            return Err(ConfigurationError::InvalidValue(format!(
                "scan.start_ts ({}) must not be after scan.end_ts ({})",
                self.start_ts, self.end_ts
            )));
        }

        if self.top_pools == 0 {
            return Err(ConfigurationError::InvalidValue(
                "scan.top_pools must be at least 1".to_string(),
            ));
        }

        if !(1..=1000).contains(&self.signature_page_limit) {
            return Err(ConfigurationError::InvalidValue(format!(
                "scan.signature_page_limit must be within 1..=1000, got {}",
                self.signature_page_limit
            )));
        }

        if !(1..=100).contains(&self.parse_batch_size) {
            return Err(ConfigurationError::InvalidValue(format!(
                "scan.parse_batch_size must be within 1..=100, got {}",
                self.parse_batch_size
            )));
        }

        Ok(())
    }
}

impl HeliusConfig {
    /// Validate Helius configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential);
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Helius request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl DexScreenerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "DexScreener request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from `config.toml` and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let helius_key = std::env::var(HELIUS_KEY_ENV).ok();
        Self::load_with_key(config_path, helius_key)
    }

    /// Layer defaults, the optional file and `SNIFFER__*` variables, then fill
    /// the Helius key from `helius_key` when the layers left it empty.
    pub fn load_with_key<P: AsRef<Path>>(config_path: P, helius_key: Option<String>) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("SNIFFER")
                .try_parsing(true)
                .separator("__"),
        );

        let mut system_config: SystemConfig = config_builder.build()?.try_deserialize()?;

        if system_config.helius.api_key.trim().is_empty() {
            if let Some(key) = helius_key.filter(|k| !k.trim().is_empty()) {
                debug!("Using Helius API key from {}", HELIUS_KEY_ENV);
                system_config.helius.api_key = key;
            }
        }

        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Credential first so a bare checkout gets the guidance message
        self.helius.validate()?;
        self.scan.validate()?;
        self.dexscreener.validate()?;
        Ok(())
    }

    /// Directory the report goes into
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.directory)
    }
}
