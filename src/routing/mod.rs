// src/routing/mod.rs
//! Swap routing over a fixed set of pools.
//!
//! - `graph`: the static, ordered pool list and its lookups
//! - `resolver`: direct-or-one-hop route resolution
//! - `path`: the resolved `Route` and the packed path encoding the pool
//!   contracts consume

pub mod graph;
pub mod path;
pub mod resolver;

pub use graph::{Edge, EdgeSpec, FeeTier, RouteGraph};
pub use path::{decode_path, encode_path, Route};
pub use resolver::RouteResolver;
