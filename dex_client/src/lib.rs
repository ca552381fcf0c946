// DexScreener and Helius clients
// Pool discovery on the market-data side, signature history and transaction
// parsing on the indexing side.

pub mod dexscreener_client;
pub mod helius_client;
pub mod http;

// Re-export configs from config_manager
pub use config_manager::{DexScreenerConfig, HeliusConfig};

pub use dexscreener_client::{DexScreenerClient, DexScreenerError};
pub use helius_client::{HeliusClient, HeliusError, RpcResponse};
pub use http::{JsonHttpClient, TransportError};
