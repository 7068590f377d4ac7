// src/disperse/mod.rs
//! Multi-recipient disperse planning.
//!
//! Every recipient leg is quoted concurrently, then bounded by the slippage
//! tolerance and packed into a single `disperseToStablecoins` call. Signing
//! and submission happen elsewhere.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use futures::future::try_join_all;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::SwapError;
use crate::quoter::{ExactOutputQuote, QuoteService};
use crate::tokens::{Token, TokenRegistry};
use crate::utils::{format_units, parse_units};

sol! {
    interface ISwappiness {
        function disperseToStablecoins(
            address tokenIn,
            address[] recipients,
            address[] tokenOut,
            uint256[] amountOut,
            uint256[] amountInMax,
            bytes[] paths
        ) external payable;
    }
}

const BPS_DENOMINATOR: u64 = 10_000;
const MAX_SLIPPAGE_BPS: u32 = 5_000;

/// Slippage tolerance in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage {
    bps: u32,
}

impl Slippage {
    pub fn from_bps(bps: u32) -> Result<Self, SwapError> {
        if bps > MAX_SLIPPAGE_BPS {
            return Err(SwapError::InvalidInput(format!(
                "slippage of {} bps exceeds the {} bps limit",
                bps, MAX_SLIPPAGE_BPS
            )));
        }
        Ok(Self { bps })
    }

    pub fn from_percent(percent: f64) -> Result<Self, SwapError> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(SwapError::InvalidInput(format!(
                "slippage must be a non-negative percentage, got {}",
                percent
            )));
        }
        Self::from_bps((percent * 100.0).round() as u32)
    }

    pub fn bps(&self) -> u32 {
        self.bps
    }

    /// Upper bound on input for a quoted amount, rounded up.
    ///
    /// Fails only when the bound itself does not fit in a uint256.
    pub fn max_amount_in(&self, quoted: U256) -> Result<U256, SwapError> {
        let denominator = U256::from(BPS_DENOMINATOR);
        let bps = U256::from(self.bps);
        // quoted * bps / d == (quoted / d) * bps + (quoted % d) * bps / d, neither term overflows
        let extra = (quoted / denominator) * bps
            + ((quoted % denominator) * bps).div_ceil(denominator);
        quoted.checked_add(extra).ok_or_else(|| {
            SwapError::InvalidAmount(format!("{} overflows the slippage bound", quoted))
        })
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.bps as f64 / 100.0)
    }
}

/// A recipient as written in a recipients file: decimal amount, token by
/// symbol or address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientSpec {
    pub address: String,
    pub token_out: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub address: Address,
    pub token_out: Token,
    pub amount_out: U256,
}

impl Recipient {
    pub fn from_spec(spec: &RecipientSpec, registry: &TokenRegistry) -> Result<Self, SwapError> {
        let address: Address = spec.address.trim().parse().map_err(|e| {
            SwapError::Parse(format!("invalid recipient address '{}': {}", spec.address, e))
        })?;
        let token_out = registry.lookup(&spec.token_out)?;
        let amount_out = parse_units(&spec.amount, token_out.decimals)?;
        Ok(Self {
            address,
            token_out,
            amount_out,
        })
    }
}

/// Read a JSON array of [`RecipientSpec`] and resolve it against the registry.
pub fn load_recipients(
    path: impl AsRef<Path>,
    registry: &TokenRegistry,
) -> Result<Vec<Recipient>, SwapError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let specs: Vec<RecipientSpec> = serde_json::from_str(&json)?;
    specs
        .iter()
        .map(|spec| Recipient::from_spec(spec, registry))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedLeg {
    pub recipient: Address,
    pub quote: ExactOutputQuote,
    pub amount_in_max: U256,
    pub path: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispersePlan {
    pub token_in: Token,
    pub slippage: Slippage,
    pub legs: Vec<PlannedLeg>,
    pub total_quoted_in: U256,
    pub total_max_in: U256,
    /// Native value to attach; zero unless the source is the native coin.
    pub value: U256,
}

impl DispersePlan {
    pub fn call(&self) -> ISwappiness::disperseToStablecoinsCall {
        ISwappiness::disperseToStablecoinsCall {
            tokenIn: self.token_in.address,
            recipients: self.legs.iter().map(|leg| leg.recipient).collect(),
            tokenOut: self.legs.iter().map(|leg| leg.quote.token_out.address).collect(),
            amountOut: self.legs.iter().map(|leg| leg.quote.amount_out).collect(),
            amountInMax: self.legs.iter().map(|leg| leg.amount_in_max).collect(),
            paths: self.legs.iter().map(|leg| leg.path.clone()).collect(),
        }
    }

    pub fn calldata(&self) -> Bytes {
        Bytes::from(self.call().abi_encode())
    }
}

pub struct DispersePlanner {
    quotes: Arc<QuoteService>,
}

impl DispersePlanner {
    pub fn new(quotes: Arc<QuoteService>) -> Self {
        Self { quotes }
    }

    /// Quote every recipient leg concurrently and build the disperse call.
    ///
    /// Fails on the first leg that cannot be priced; a partial plan is never
    /// returned.
    pub async fn plan(
        &self,
        token_in: &Token,
        recipients: &[Recipient],
        slippage: Slippage,
    ) -> Result<DispersePlan, SwapError> {
        self.validate(token_in, recipients)?;

        let quotes: Vec<ExactOutputQuote> = try_join_all(recipients.iter().map(|recipient| {
            self.quotes
                .quote_exact_output(token_in, &recipient.token_out, recipient.amount_out)
        }))
        .await?;

        let mut legs = Vec::with_capacity(quotes.len());
        for (recipient, quote) in recipients.iter().zip(quotes) {
            let path = quote.path()?;
            legs.push(PlannedLeg {
                recipient: recipient.address,
                amount_in_max: slippage.max_amount_in(quote.amount_in)?,
                quote,
                path,
            });
        }

        let total_quoted_in = checked_sum(legs.iter().map(|leg| leg.quote.amount_in))?;
        let total_max_in = checked_sum(legs.iter().map(|leg| leg.amount_in_max))?;
        let value = if token_in.is_native() {
            total_max_in
        } else {
            U256::ZERO
        };

        info!(
            "Disperse plan: {} legs, quoted {} {}, max {} {} at {} slippage",
            legs.len(),
            format_units(total_quoted_in, token_in.decimals),
            token_in,
            format_units(total_max_in, token_in.decimals),
            token_in,
            slippage
        );

        Ok(DispersePlan {
            token_in: token_in.clone(),
            slippage,
            legs,
            total_quoted_in,
            total_max_in,
            value,
        })
    }

    fn validate(&self, token_in: &Token, recipients: &[Recipient]) -> Result<(), SwapError> {
        let registry = self.quotes.registry();
        if recipients.is_empty() {
            return Err(SwapError::InvalidInput(
                "at least one recipient is required".to_string(),
            ));
        }
        if !registry.is_input_token(token_in) {
            warn!("Rejected {} as disperse source token", token_in);
            return Err(SwapError::InvalidInput(format!(
                "{} cannot be used as the source token",
                token_in
            )));
        }
        for recipient in recipients {
            if recipient.address == Address::ZERO {
                return Err(SwapError::InvalidInput(
                    "recipient address cannot be the zero address".to_string(),
                ));
            }
            if !registry.is_output_token(&recipient.token_out) {
                return Err(SwapError::InvalidInput(format!(
                    "{} cannot be received by {}",
                    recipient.token_out, recipient.address
                )));
            }
            if recipient.amount_out.is_zero() {
                return Err(SwapError::InvalidAmount(format!(
                    "amount for {} must be greater than zero",
                    recipient.address
                )));
            }
        }
        Ok(())
    }
}

fn checked_sum(amounts: impl Iterator<Item = U256>) -> Result<U256, SwapError> {
    amounts.fold(Ok(U256::ZERO), |acc, amount| {
        acc?.checked_add(amount)
            .ok_or_else(|| SwapError::InvalidAmount("total input overflows uint256".to_string()))
    })
}
