use crate::http::{JsonHttpClient, TransportError};
use async_trait::async_trait;
use buyer_core::{ChainDataSource, ParsedTransaction, SignatureInfo, SourceError};
use config_manager::HeliusConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum HeliusError {
    #[error("Helius transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    #[error("RPC response for {method} carried neither result nor error")]
    MissingResult { method: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, HeliusError>;

impl From<HeliusError> for SourceError {
    fn from(err: HeliusError) -> Self {
        match err {
            HeliusError::Rpc { code, message, data } => SourceError::Rpc { code, message, data },
            HeliusError::MissingResult { .. } => SourceError::InvalidResponse(err.to_string()),
            other => SourceError::Transport(other.to_string()),
        }
    }
}

/// JSON-RPC 2.0 response envelope.
///
/// `error` stays untyped: nodes and proxies do not always send the standard
/// `{code, message, data}` object.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Helius client: JSON-RPC signature history and the enhanced-transactions parser
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http: JsonHttpClient,
    config: HeliusConfig,
    request_id_counter: Arc<AtomicU64>,
}

impl HeliusClient {
    /// Create a new Helius client with the given configuration
    pub fn new(config: HeliusConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(HeliusError::ConfigError(
                "Helius API key is required".to_string(),
            ));
        }

        let http = JsonHttpClient::new(Duration::from_secs(config.request_timeout_seconds))?;

        Ok(Self {
            http,
            config,
            request_id_counter: Arc::new(AtomicU64::new(1)),
        })
    }

    fn next_request_id(&self) -> u64 {
        self.request_id_counter.fetch_add(1, Ordering::SeqCst)
    }

    fn auth_query(&self) -> [(&str, &str); 1] {
        [("api-key", self.config.api_key.as_str())]
    }

    fn transactions_url(&self) -> String {
        format!("{}/transactions", self.config.api_base_url.trim_end_matches('/'))
    }

    /// Generic RPC request; an `error` member in the response is returned as [`HeliusError::Rpc`]
    pub async fn rpc_request(&self, method: &str, params: Value) -> Result<Value> {
        let request_body = build_rpc_request(self.next_request_id(), method, params);

        let response: RpcResponse = self
            .http
            .post_json(&self.config.rpc_url, &self.auth_query(), &request_body)
            .await?;

        unwrap_rpc_response(method, response)
    }

    /// Get one page of signatures for an address, newest first
    pub async fn get_signatures_for_address(
        &self,
        address: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SignatureInfo>> {
        let result = self
            .rpc_request("getSignaturesForAddress", signature_page_params(address, before, limit))
            .await?;

        let sig_infos: Vec<SignatureInfo> = serde_json::from_value(result).map_err(TransportError::Decode)?;
        debug!("getSignaturesForAddress({}) returned {} entries", address, sig_infos.len());
        Ok(sig_infos)
    }

    /// Resolve signatures through the enhanced transactions endpoint (one request per call)
    pub async fn parse_transactions(&self, signatures: &[String]) -> Result<Vec<ParsedTransaction>> {
        if signatures.is_empty() {
            return Ok(vec![]);
        }

        let body = json!({ "transactions": signatures });
        let parsed: Vec<ParsedTransaction> = self
            .http
            .post_json(&self.transactions_url(), &self.auth_query(), &body)
            .await?;

        debug!("Parsed {} of {} requested transactions", parsed.len(), signatures.len());
        Ok(parsed)
    }
}

fn build_rpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn signature_page_params(address: &str, before: Option<&str>, limit: u32) -> Value {
    let mut options = serde_json::Map::new();
    options.insert("limit".to_string(), json!(limit));
    if let Some(before_sig) = before {
        options.insert("before".to_string(), json!(before_sig));
    }

    json!([address, options])
}

fn unwrap_rpc_response(method: &str, response: RpcResponse) -> Result<Value> {
    if let Some(rpc_error) = response.error {
        let err = rpc_error_from_value(rpc_error);
        error!("RPC {} failed: {}", method, err);
        return Err(err);
    }

    response.result.ok_or_else(|| HeliusError::MissingResult {
        method: method.to_string(),
    })
}

/// Standard error objects give up their code, message and data; anything else
/// is carried whole as `data` with code 0.
fn rpc_error_from_value(value: Value) -> HeliusError {
    match value {
        Value::Object(mut body) => {
            let code = body.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = match body.get("message") {
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => "unknown RPC error".to_string(),
            };
            HeliusError::Rpc {
                code,
                message,
                data: body.remove("data"),
            }
        }
        Value::String(message) => HeliusError::Rpc {
            code: 0,
            message: message.clone(),
            data: Some(Value::String(message)),
        },
        other => HeliusError::Rpc {
            code: 0,
            message: other.to_string(),
            data: Some(other),
        },
    }
}

#[async_trait]
impl ChainDataSource for HeliusClient {
    async fn fetch_signature_page(
        &self,
        address: &str,
        before: Option<&str>,
        limit: u32,
    ) -> buyer_core::Result<Vec<SignatureInfo>> {
        Ok(self.get_signatures_for_address(address, before, limit).await?)
    }

    async fn parse_transactions(&self, signatures: &[String]) -> buyer_core::Result<Vec<ParsedTransaction>> {
        Ok(HeliusClient::parse_transactions(self, signatures).await?)
    }
}
