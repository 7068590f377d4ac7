// src/quoter/mod.rs
//! Exact-output quoting: "how much of `token_in` buys exactly `amount_out` of
//! `token_out`". Routing and path encoding happen here; pricing is delegated
//! to an on-chain quoter behind [`ExactOutputQuoter`].

pub mod rpc;

pub use rpc::RpcQuoter;

use alloy_primitives::{Bytes, U256};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

use crate::error::SwapError;
use crate::routing::{encode_path, Route, RouteResolver};
use crate::tokens::{Token, TokenRegistry};
use crate::utils::format_units;

/// Black-box price source taking a packed exact-output path.
/// This allows for mocking the RPC quoter in tests.
#[async_trait::async_trait]
pub trait ExactOutputQuoter: Send + Sync {
    /// Input amount (smallest units of the path's last token) needed to
    /// receive `amount_out` of the path's first token.
    async fn quote_exact_output(&self, path: &Bytes, amount_out: U256) -> Result<U256, SwapError>;
}

/// A priced exact-output request. `route` is `None` when no swap is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExactOutputQuote {
    pub token_in: Token,
    pub token_out: Token,
    pub amount_out: U256,
    pub amount_in: U256,
    pub route: Option<Route>,
}

impl ExactOutputQuote {
    pub fn is_identity(&self) -> bool {
        self.route.is_none()
    }

    /// The path handed to the router for this leg: the exact-output encoding
    /// of the route, or the bare output token address when nothing is swapped.
    pub fn path(&self) -> Result<Bytes, SwapError> {
        match &self.route {
            Some(route) => route.encode_exact_output(),
            None => encode_path(&[self.token_out.address], &[]),
        }
    }
}

#[derive(Clone)]
pub struct QuoteService {
    resolver: RouteResolver,
    registry: Arc<TokenRegistry>,
    quoter: Arc<dyn ExactOutputQuoter>,
}

impl QuoteService {
    pub fn new(
        resolver: RouteResolver,
        registry: Arc<TokenRegistry>,
        quoter: Arc<dyn ExactOutputQuoter>,
    ) -> Self {
        Self {
            resolver,
            registry,
            quoter,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Route for a pair after native substitution; `None` means identity.
    fn route_for(&self, token_in: &Token, token_out: &Token) -> Result<Option<Route>, SwapError> {
        let token_in = self.registry.wrap_native(token_in);
        let token_out = self.registry.wrap_native(token_out);
        if token_in == token_out {
            return Ok(None);
        }
        self.resolver.resolve(&token_in, &token_out).map(Some)
    }

    /// Price `amount_out` of `token_out` in `token_in`.
    ///
    /// Identity pairs return `amount_out` without touching the quoter. A
    /// missing route is returned as `NoRouteFound`; quoter failures are
    /// returned as they come.
    pub async fn quote_exact_output(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_out: U256,
    ) -> Result<ExactOutputQuote, SwapError> {
        let route = match self.route_for(token_in, token_out)? {
            Some(route) => route,
            None => {
                debug!(
                    "{} -> {} needs no swap, amount in = amount out",
                    token_in, token_out
                );
                return Ok(ExactOutputQuote {
                    token_in: token_in.clone(),
                    token_out: token_out.clone(),
                    amount_out,
                    amount_in: amount_out,
                    route: None,
                });
            }
        };

        let path = route.encode_exact_output()?;
        debug!("Quoting {} via path 0x{}", route, hex::encode(&path));
        let amount_in = self.quoter.quote_exact_output(&path, amount_out).await?;

        info!(
            "Quote: {} {} costs {} {} via {}",
            format_units(amount_out, token_out.decimals),
            token_out,
            format_units(amount_in, token_in.decimals),
            token_in,
            route
        );

        Ok(ExactOutputQuote {
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            amount_out,
            amount_in,
            route: Some(route),
        })
    }
}
