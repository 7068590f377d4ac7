pub mod settings;

pub use settings::Config;

use crate::error::SwapError;
use std::sync::Arc;

/// Loads `.env` (if present) and the environment into a validated `Config`.
///
/// Nothing is logged here; the caller installs logging from the returned
/// level and then calls `validate_and_log`.
pub fn load_config() -> Result<Arc<Config>, SwapError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = Config::from_env();
    validate(&config)?;

    Ok(Arc::new(config))
}

pub fn validate(config: &Config) -> Result<(), SwapError> {
    if config.rpc_url.is_empty() {
        return Err(SwapError::Config("RPC_URL cannot be empty".to_string()));
    }
    url::Url::parse(&config.rpc_url)
        .map_err(|e| SwapError::Config(format!("RPC_URL is not a valid URL: {}", e)))?;
    config.quoter().map_err(SwapError::Config)?;
    config.disperse().map_err(SwapError::Config)?;
    if !(0.0..=50.0).contains(&config.slippage_pct) {
        return Err(SwapError::Config(format!(
            "SLIPPAGE_PCT must be within [0, 50], got {}",
            config.slippage_pct
        )));
    }
    if config.rpc_timeout_ms == 0 {
        return Err(SwapError::Config("RPC_TIMEOUT_MS must be > 0".to_string()));
    }
    Ok(())
}
