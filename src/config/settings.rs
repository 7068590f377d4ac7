use alloy_primitives::Address;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::tokens::BASE_CHAIN_ID;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
/// Uniswap V3 quoter deployment on Base.
pub const DEFAULT_QUOTER_ADDRESS: &str = "0x3d4e44Eb1374240CE5F1B871ab261CD16335B76a";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub chain_id: u64,
    pub quoter_address: String,
    pub disperse_address: Option<String>,
    pub slippage_pct: f64,
    pub rpc_timeout_ms: u64,
    pub route_graph_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: BASE_CHAIN_ID,
            quoter_address: DEFAULT_QUOTER_ADDRESS.to_string(),
            disperse_address: None,
            slippage_pct: 0.5,
            rpc_timeout_ms: 10_000,
            route_graph_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            rpc_url: env::var("RPC_URL").unwrap_or(defaults.rpc_url),
            chain_id: env::var("CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chain_id),
            quoter_address: env::var("QUOTER_ADDRESS").unwrap_or(defaults.quoter_address),
            disperse_address: env::var("DISPERSE_ADDRESS").ok().filter(|v| !v.is_empty()),
            slippage_pct: env::var("SLIPPAGE_PCT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.slippage_pct),
            rpc_timeout_ms: env::var("RPC_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rpc_timeout_ms),
            route_graph_path: env::var("ROUTE_GRAPH_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn quoter(&self) -> Result<Address, String> {
        self.quoter_address
            .parse::<Address>()
            .map_err(|e| format!("QUOTER_ADDRESS '{}' is invalid: {}", self.quoter_address, e))
    }

    pub fn disperse(&self) -> Result<Option<Address>, String> {
        self.disperse_address
            .as_deref()
            .map(|addr| {
                addr.parse::<Address>()
                    .map_err(|e| format!("DISPERSE_ADDRESS '{}' is invalid: {}", addr, e))
            })
            .transpose()
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn validate_and_log(&self) {
        log::info!("Application Configuration Loaded: {}", self.summary());
    }

    /// One-line view of the config that is safe to log.
    pub fn summary(&self) -> String {
        format!(
            "rpc_url={} chain_id={} quoter={} disperse={} slippage={}% rpc_timeout_ms={} route_graph={} log_level={}",
            redact_url(&self.rpc_url),
            self.chain_id,
            self.quoter_address,
            self.disperse_address.as_deref().unwrap_or("-"),
            self.slippage_pct,
            self.rpc_timeout_ms,
            self.route_graph_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            self.log_level
        )
    }
}

/// Keep scheme, host and port; provider keys live in the path, query or userinfo.
pub fn redact_url(raw: &str) -> String {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return "<invalid url>".to_string(),
    };
    let mut redacted = format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""));
    if let Some(port) = url.port() {
        redacted.push_str(&format!(":{}", port));
    }
    let has_secret = url.path() != "/"
        || url.query().is_some()
        || !url.username().is_empty()
        || url.password().is_some();
    if has_secret {
        redacted.push_str("/<redacted>");
    }
    redacted
}
