// src/routing/graph.rs
//! Static route graph.
//!
//! The graph is the hand-curated list of pools the disperser is willing to
//! route through. It is built once and never mutated; edge order is the
//! tie-break for every lookup.

use itertools::Itertools;
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::SwapError;
use crate::tokens::{Token, TokenRegistry, DAI, EURC, IDRX, USDC, USDT, WETH};

/// Pool fee as the uint24 the pool contracts use (hundredths of a basis point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.30%
    Medium,
    /// 1.00%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn as_u24(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10_000,
        }
    }

    pub fn bps(self) -> u32 {
        self.as_u24() / 100
    }

    pub fn percent(self) -> f64 {
        self.as_u24() as f64 / 10_000.0
    }

    /// Big-endian uint24, as laid out in an encoded path.
    pub fn to_be_bytes(self) -> [u8; 3] {
        let bytes = self.as_u24().to_be_bytes();
        [bytes[1], bytes[2], bytes[3]]
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = SwapError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        FeeTier::ALL
            .into_iter()
            .find(|tier| tier.as_u24() == value)
            .ok_or_else(|| SwapError::InvalidInput(format!("unsupported fee tier {}", value)))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.as_u24()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

/// An unordered pool pair and its fee tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub token_a: Token,
    pub token_b: Token,
    pub fee: FeeTier,
}

impl Edge {
    pub fn new(token_a: Token, token_b: Token, fee: FeeTier) -> Self {
        Self {
            token_a,
            token_b,
            fee,
        }
    }

    pub fn touches(&self, token: &Token) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// True if the edge joins `x` and `y`, in either orientation.
    pub fn connects(&self, x: &Token, y: &Token) -> bool {
        (self.token_a == *x && self.token_b == *y) || (self.token_a == *y && self.token_b == *x)
    }

    /// The endpoint opposite `token`, if `token` is an endpoint.
    pub fn other(&self, token: &Token) -> Option<&Token> {
        if self.token_a == *token {
            Some(&self.token_b)
        } else if self.token_b == *token {
            Some(&self.token_a)
        } else {
            None
        }
    }
}

/// One entry of a route graph file. Tokens are registry symbols or addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub token_a: String,
    pub token_b: String,
    pub fee: FeeTier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGraph {
    edges: Vec<Edge>,
}

impl RouteGraph {
    /// Build a graph from ordered edges.
    ///
    /// Rejects self-loops and edges touching the native sentinel; the
    /// resolver only ever sees wrapped tokens.
    pub fn new(edges: Vec<Edge>) -> Result<Self, SwapError> {
        for edge in &edges {
            if edge.token_a == edge.token_b {
                return Err(SwapError::Config(format!(
                    "edge {}/{} connects a token to itself",
                    edge.token_a, edge.token_b
                )));
            }
            if edge.token_a.is_native() || edge.token_b.is_native() {
                return Err(SwapError::Config(format!(
                    "edge {}/{} uses the native sentinel; use the wrapped token",
                    edge.token_a, edge.token_b
                )));
            }
        }
        debug!("Built route graph with {} edges", edges.len());
        Ok(Self { edges })
    }

    /// The pools the disperser routes through on Base mainnet.
    pub fn base_mainnet() -> Self {
        BASE_GRAPH.clone()
    }

    /// Parse a JSON array of `{ "token_a", "token_b", "fee" }` entries.
    pub fn from_json_str(json: &str, registry: &TokenRegistry) -> Result<Self, SwapError> {
        let specs: Vec<EdgeSpec> = serde_json::from_str(json)?;
        let edges = specs
            .into_iter()
            .map(|spec| {
                Ok(Edge::new(
                    registry.lookup(&spec.token_a)?,
                    registry.lookup(&spec.token_b)?,
                    spec.fee,
                ))
            })
            .collect::<Result<Vec<_>, SwapError>>()?;
        Self::new(edges)
    }

    pub fn from_file(path: impl AsRef<Path>, registry: &TokenRegistry) -> Result<Self, SwapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let graph = Self::from_json_str(&json, registry)?;
        info!(
            "Loaded route graph with {} edges from {}",
            graph.len(),
            path.display()
        );
        Ok(graph)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges with `token` as an endpoint, in graph order.
    pub fn edges_touching(&self, token: &Token) -> Vec<&Edge> {
        self.edges.iter().filter(|edge| edge.touches(token)).collect()
    }

    /// First edge, in graph order, joining `x` and `y` in either orientation.
    pub fn edge_between(&self, x: &Token, y: &Token) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.connects(x, y))
    }

    /// Tokens one edge away from `token`, in graph order, first occurrence kept.
    pub fn neighbors(&self, token: &Token) -> Vec<&Token> {
        self.edges
            .iter()
            .filter_map(|edge| edge.other(token))
            .unique()
            .collect()
    }

    /// Every distinct token appearing in the graph, in graph order.
    pub fn tokens(&self) -> Vec<&Token> {
        self.edges
            .iter()
            .flat_map(|edge| [&edge.token_a, &edge.token_b])
            .unique()
            .collect()
    }
}

static BASE_GRAPH: Lazy<RouteGraph> = Lazy::new(|| RouteGraph {
    edges: vec![
        Edge::new(IDRX.clone(), USDC.clone(), FeeTier::Lowest),
        Edge::new(USDC.clone(), USDT.clone(), FeeTier::Lowest),
        Edge::new(WETH.clone(), USDT.clone(), FeeTier::Low),
        Edge::new(EURC.clone(), USDC.clone(), FeeTier::Medium),
        Edge::new(DAI.clone(), USDC.clone(), FeeTier::Lowest),
        Edge::new(WETH.clone(), USDC.clone(), FeeTier::Low),
    ],
});
