// src/tokens/mod.rs
//! Token model and the static registry of tokens the disperser knows about.
//!
//! Tokens are identified by `(chain_id, address)`. The zero address is the
//! native-coin sentinel; it never appears in the route graph and is swapped
//! for the registry's wrapped-native token before any lookup.

use alloy_primitives::{address, Address};
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::SwapError;

pub const BASE_CHAIN_ID: u64 = 8453;

/// Address used to represent the chain's native coin.
pub const NATIVE_ADDRESS: Address = Address::ZERO;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: &str, name: &str) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_ADDRESS
    }
}

// Identity is (chain, address); symbol and name are display data.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Known tokens for one chain, plus which of them may be picked as the
/// disperse source and which as a recipient's output.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    chain_id: u64,
    native: Token,
    wrapped_native: Token,
    tokens: Vec<Token>,
    input_symbols: Vec<String>,
    output_symbols: Vec<String>,
}

impl TokenRegistry {
    pub fn new(
        chain_id: u64,
        native: Token,
        wrapped_native: Token,
        tokens: Vec<Token>,
        input_symbols: Vec<String>,
        output_symbols: Vec<String>,
    ) -> Result<Self, SwapError> {
        if !native.is_native() {
            return Err(SwapError::Config(format!(
                "native token {} must use the zero address",
                native.symbol
            )));
        }
        if wrapped_native.is_native() {
            return Err(SwapError::Config(
                "wrapped native token cannot use the zero address".to_string(),
            ));
        }
        if let Some(foreign) = tokens.iter().find(|t| t.chain_id != chain_id) {
            return Err(SwapError::Config(format!(
                "token {} belongs to chain {}, registry is for chain {}",
                foreign.symbol, foreign.chain_id, chain_id
            )));
        }

        let registry = Self {
            chain_id,
            native,
            wrapped_native,
            tokens,
            input_symbols,
            output_symbols,
        };
        for symbol in registry.input_symbols.iter().chain(&registry.output_symbols) {
            registry.lookup(symbol)?;
        }
        Ok(registry)
    }

    /// Tokens deployed on Base mainnet that the disperser supports.
    pub fn base_mainnet() -> Self {
        BASE_REGISTRY.clone()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Look a token up by symbol (case-insensitive) or by hex address.
    pub fn lookup(&self, symbol_or_address: &str) -> Result<Token, SwapError> {
        let needle = symbol_or_address.trim();
        if needle.starts_with("0x") || needle.starts_with("0X") {
            let address: Address = needle
                .parse()
                .map_err(|e| SwapError::Parse(format!("invalid address '{}': {}", needle, e)))?;
            return self
                .tokens
                .iter()
                .find(|t| t.address == address)
                .cloned()
                .ok_or_else(|| SwapError::UnknownToken(needle.to_string()));
        }

        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(needle))
            .cloned()
            .ok_or_else(|| SwapError::UnknownToken(needle.to_string()))
    }

    /// Replace the native sentinel by the canonical wrapped token.
    pub fn wrap_native(&self, token: &Token) -> Token {
        if *token == self.native {
            debug!("Substituting {} for native {}", self.wrapped_native, token);
            self.wrapped_native.clone()
        } else {
            token.clone()
        }
    }

    pub fn input_tokens(&self) -> Vec<Token> {
        self.symbols_to_tokens(&self.input_symbols)
    }

    pub fn output_tokens(&self) -> Vec<Token> {
        self.symbols_to_tokens(&self.output_symbols)
    }

    pub fn is_input_token(&self, token: &Token) -> bool {
        self.input_tokens().contains(token)
    }

    pub fn is_output_token(&self, token: &Token) -> bool {
        self.output_tokens().contains(token)
    }

    fn symbols_to_tokens(&self, symbols: &[String]) -> Vec<Token> {
        // Symbols were validated in `new`.
        symbols
            .iter()
            .filter_map(|s| self.lookup(s).ok())
            .collect()
    }
}

pub static ETH: Lazy<Token> = Lazy::new(|| {
    Token::new(BASE_CHAIN_ID, NATIVE_ADDRESS, 18, "ETH", "Ether")
});

pub static WETH: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("4200000000000000000000000000000000000006"),
        18,
        "WETH",
        "Wrapped Ether",
    )
});

pub static USDC: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        6,
        "USDC",
        "USD Coin",
    )
});

pub static USDT: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("fde4C96c8593536E31F229EA8f37b2ADa2699bb2"),
        6,
        "USDT",
        "Tether USD",
    )
});

pub static DAI: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("50c5725949A6F0c72E6C4a641F24049A917DB0Cb"),
        18,
        "DAI",
        "Dai Stablecoin",
    )
});

pub static IDRX: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("18Bc5bcC660cf2B9cE3cd51a404aFe1a0cBD3C22"),
        2,
        "IDRX",
        "IDRX",
    )
});

pub static EURC: Lazy<Token> = Lazy::new(|| {
    Token::new(
        BASE_CHAIN_ID,
        address!("60a3E35Cc302bFA44Cb288Bc5a4F316Fdb1adb42"),
        18,
        "EURC",
        "Euro Coin",
    )
});

static BASE_REGISTRY: Lazy<TokenRegistry> = Lazy::new(|| TokenRegistry {
    chain_id: BASE_CHAIN_ID,
    native: ETH.clone(),
    wrapped_native: WETH.clone(),
    tokens: vec![
        ETH.clone(),
        WETH.clone(),
        USDC.clone(),
        USDT.clone(),
        DAI.clone(),
        IDRX.clone(),
        EURC.clone(),
    ],
    input_symbols: ["ETH", "USDC", "USDT", "DAI"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    output_symbols: ["USDC", "USDT", "DAI", "IDRX", "EURC", "WETH"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
});
