pub mod config;
pub mod disperse;
pub mod error;
pub mod quoter;
pub mod routing;
pub mod tokens;
pub mod utils;

// Re-export the types most callers need
pub use disperse::{DispersePlan, DispersePlanner, Recipient, Slippage};
pub use error::{Result, SwapError};
pub use quoter::{ExactOutputQuote, ExactOutputQuoter, QuoteService, RpcQuoter};
pub use routing::{FeeTier, Route, RouteGraph, RouteResolver};
pub use tokens::{Token, TokenRegistry};
