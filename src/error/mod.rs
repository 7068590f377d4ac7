// src/error/mod.rs
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// No direct or one-hop path connects the pair in the route graph
    #[error("No route found: {token_in} -> {token_out}")]
    NoRouteFound { token_in: String, token_out: String },

    /// Path/fee lengths are inconsistent; only reachable through a broken route invariant
    #[error("Malformed route: {tokens} tokens with {fees} fees")]
    MalformedRoute { tokens: usize, fees: usize },

    /// RPC transport failures, JSON-RPC error objects and contract reverts
    #[error("RPC Error: {0}")]
    Rpc(String),

    /// RPC answered, but the payload could not be interpreted
    #[error("Invalid Response: {0}")]
    InvalidResponse(String),

    /// Token is not in the registry
    #[error("Unknown Token: {0}")]
    UnknownToken(String),

    #[error("Invalid Amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    Config(String),

    /// Parsing errors for files and addresses
    #[error("Parse Error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::Parse(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        SwapError::Rpc(format!("HTTP transport error: {}", err))
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Config(format!("I/O error: {}", err))
    }
}

impl SwapError {
    /// Whether a caller may reasonably try the same request again.
    /// Nothing inside this crate retries; this is for the transport's owner.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SwapError::Rpc(_) => true,
            SwapError::NoRouteFound { .. } => false, // graph is static, answer won't change
            SwapError::MalformedRoute { .. } => false, // logic fault
            SwapError::InvalidResponse(_) => false,
            SwapError::UnknownToken(_) => false,
            SwapError::InvalidAmount(_) => false,
            SwapError::InvalidInput(_) => false,
            SwapError::Config(_) => false,
            SwapError::Parse(_) => false,
        }
    }
}

pub type Result<T, E = SwapError> = std::result::Result<T, E>;
