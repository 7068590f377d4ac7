// src/routing/path.rs
//! Resolved routes and their packed path encoding.
//!
//! The pool router and quoter take a path as `token ‖ fee ‖ token ‖ … ‖ token`
//! with 20-byte addresses and 3-byte big-endian fees. Exact-output calls want
//! the path from the output token back to the input token.

use alloy_primitives::{Address, Bytes};
use serde::Serialize;
use std::fmt;

use super::graph::FeeTier;
use crate::error::SwapError;
use crate::tokens::Token;

pub const ADDRESS_SIZE: usize = 20;
pub const FEE_SIZE: usize = 3;
pub const HOP_SIZE: usize = ADDRESS_SIZE + FEE_SIZE;

/// A resolved swap route: `path[i] -> path[i + 1]` through a pool with tier `fees[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    path: Vec<Token>,
    fees: Vec<FeeTier>,
}

impl Route {
    pub fn new(path: Vec<Token>, fees: Vec<FeeTier>) -> Result<Self, SwapError> {
        if path.len() < 2 || fees.len() + 1 != path.len() {
            return Err(SwapError::MalformedRoute {
                tokens: path.len(),
                fees: fees.len(),
            });
        }
        Ok(Self { path, fees })
    }

    pub(crate) fn direct(token_in: Token, token_out: Token, fee: FeeTier) -> Self {
        Self {
            path: vec![token_in, token_out],
            fees: vec![fee],
        }
    }

    pub(crate) fn one_hop(
        token_in: Token,
        intermediate: Token,
        token_out: Token,
        first_fee: FeeTier,
        second_fee: FeeTier,
    ) -> Self {
        Self {
            path: vec![token_in, intermediate, token_out],
            fees: vec![first_fee, second_fee],
        }
    }

    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn fees(&self) -> &[FeeTier] {
        &self.fees
    }

    pub fn hop_count(&self) -> usize {
        self.fees.len()
    }

    /// Path for exact-output quoting and swapping: reversed, output token first.
    pub fn encode_exact_output(&self) -> Result<Bytes, SwapError> {
        let addresses: Vec<Address> = self.path.iter().rev().map(|t| t.address).collect();
        let fees: Vec<FeeTier> = self.fees.iter().rev().copied().collect();
        encode_path(&addresses, &fees)
    }

    /// Path in swap direction, input token first.
    pub fn encode_exact_input(&self) -> Result<Bytes, SwapError> {
        let addresses: Vec<Address> = self.path.iter().map(|t| t.address).collect();
        encode_path(&addresses, &self.fees)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path[0])?;
        for (fee, token) in self.fees.iter().zip(self.path.iter().skip(1)) {
            write!(f, " -({})-> {}", fee, token)?;
        }
        Ok(())
    }
}

/// Pack `tokens[0] ‖ fees[0] ‖ tokens[1] ‖ … ‖ tokens[n]`.
///
/// A single token with no fees is accepted and yields its bare address.
pub fn encode_path(tokens: &[Address], fees: &[FeeTier]) -> Result<Bytes, SwapError> {
    if tokens.len() != fees.len() + 1 {
        return Err(SwapError::MalformedRoute {
            tokens: tokens.len(),
            fees: fees.len(),
        });
    }

    let mut encoded = Vec::with_capacity(ADDRESS_SIZE + HOP_SIZE * fees.len());
    for (token, fee) in tokens.iter().zip(fees) {
        encoded.extend_from_slice(token.as_slice());
        encoded.extend_from_slice(&fee.to_be_bytes());
    }
    encoded.extend_from_slice(tokens[tokens.len() - 1].as_slice());
    Ok(Bytes::from(encoded))
}

/// Split an encoded path back into its addresses and fee tiers.
pub fn decode_path(encoded: &[u8]) -> Result<(Vec<Address>, Vec<FeeTier>), SwapError> {
    if encoded.len() < ADDRESS_SIZE || (encoded.len() - ADDRESS_SIZE) % HOP_SIZE != 0 {
        return Err(SwapError::InvalidInput(format!(
            "encoded path of {} bytes is not 20 + 23k",
            encoded.len()
        )));
    }

    let hops = (encoded.len() - ADDRESS_SIZE) / HOP_SIZE;
    let mut tokens = Vec::with_capacity(hops + 1);
    let mut fees = Vec::with_capacity(hops);
    for hop in encoded[..hops * HOP_SIZE].chunks_exact(HOP_SIZE) {
        tokens.push(Address::from_slice(&hop[..ADDRESS_SIZE]));
        let fee = u32::from_be_bytes([0, hop[20], hop[21], hop[22]]);
        fees.push(FeeTier::try_from(fee)?);
    }
    tokens.push(Address::from_slice(&encoded[hops * HOP_SIZE..]));
    Ok((tokens, fees))
}
