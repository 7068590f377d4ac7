// src/routing/resolver.rs
//! Route resolution over the static graph: a direct pool if one exists,
//! otherwise a single intermediate token. Nothing longer is ever tried.

use log::debug;
use std::sync::Arc;

use super::graph::RouteGraph;
use super::path::Route;
use crate::error::SwapError;
use crate::tokens::Token;

#[derive(Debug, Clone)]
pub struct RouteResolver {
    graph: Arc<RouteGraph>,
}

impl RouteResolver {
    pub fn new(graph: Arc<RouteGraph>) -> Self {
        Self { graph }
    }

    /// Resolve a route from `token_in` to `token_out`.
    ///
    /// Both tokens must already be graph-eligible (native sentinel replaced by
    /// the wrapped token) and distinct; the identity case belongs to the caller.
    /// The first direct edge in graph order wins; otherwise the first
    /// intermediate (in graph order) that reaches `token_out` wins. No cost
    /// comparison is made between candidates.
    pub fn resolve(&self, token_in: &Token, token_out: &Token) -> Result<Route, SwapError> {
        let not_found = || SwapError::NoRouteFound {
            token_in: token_in.symbol.clone(),
            token_out: token_out.symbol.clone(),
        };

        if token_in == token_out {
            debug!("Refusing to resolve identity pair {} -> {}", token_in, token_out);
            return Err(not_found());
        }

        if let Some(edge) = self.graph.edge_between(token_in, token_out) {
            let route = Route::direct(token_in.clone(), token_out.clone(), edge.fee);
            debug!("Direct route found: {}", route);
            return Ok(route);
        }

        for intermediate in self.graph.neighbors(token_in) {
            if intermediate == token_out {
                continue;
            }

            let first_hop = self.graph.edge_between(token_in, intermediate);
            let second_hop = self.graph.edge_between(intermediate, token_out);
            if let (Some(first), Some(second)) = (first_hop, second_hop) {
                let route = Route::one_hop(
                    token_in.clone(),
                    intermediate.clone(),
                    token_out.clone(),
                    first.fee,
                    second.fee,
                );
                debug!("One-hop route found: {}", route);
                return Ok(route);
            }
        }

        debug!("No route within one hop for {} -> {}", token_in, token_out);
        Err(not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::graph::{Edge, FeeTier};
    use crate::tokens::{DAI, EURC, IDRX, USDC, USDT, WETH};
    use pretty_assertions::assert_eq;

    fn resolver() -> RouteResolver {
        RouteResolver::new(Arc::new(RouteGraph::base_mainnet()))
    }

    #[test]
    fn test_direct_route_in_both_directions() {
        let resolver = resolver();

        let forward = resolver.resolve(&WETH, &USDC).unwrap();
        assert_eq!(forward.path(), &[WETH.clone(), USDC.clone()]);
        assert_eq!(forward.fees(), &[FeeTier::Low]);

        let backward = resolver.resolve(&USDC, &WETH).unwrap();
        assert_eq!(backward.path(), &[USDC.clone(), WETH.clone()]);
        assert_eq!(backward.fees(), &[FeeTier::Low]);
    }

    #[test]
    fn test_every_edge_resolves_directly() {
        let resolver = resolver();
        for edge in RouteGraph::base_mainnet().edges() {
            for (a, b) in [(&edge.token_a, &edge.token_b), (&edge.token_b, &edge.token_a)] {
                let route = resolver.resolve(a, b).unwrap();
                assert_eq!(route.path(), &[a.clone(), b.clone()]);
                assert_eq!(route.fees(), &[edge.fee]);
            }
        }
    }

    #[test]
    fn test_one_hop_through_usdc() {
        let resolver = resolver();

        let route = resolver.resolve(&IDRX, &EURC).unwrap();
        assert_eq!(route.path(), &[IDRX.clone(), USDC.clone(), EURC.clone()]);
        assert_eq!(route.fees(), &[FeeTier::Lowest, FeeTier::Medium]);

        // WETH's first neighbour is USDT, which has no DAI pool
        let route = resolver.resolve(&WETH, &DAI).unwrap();
        assert_eq!(route.path(), &[WETH.clone(), USDC.clone(), DAI.clone()]);
        assert_eq!(route.fees(), &[FeeTier::Low, FeeTier::Lowest]);
    }

    #[test]
    fn test_direct_beats_one_hop() {
        // WETH-USDT exists directly even though WETH-USDC-USDT also connects
        let route = resolver().resolve(&WETH, &USDT).unwrap();
        assert_eq!(route.hop_count(), 1);
        assert_eq!(route.fees(), &[FeeTier::Low]);
    }

    #[test]
    fn test_first_direct_edge_wins() {
        let graph = RouteGraph::new(vec![
            Edge::new(WETH.clone(), USDC.clone(), FeeTier::Medium),
            Edge::new(USDC.clone(), WETH.clone(), FeeTier::Low),
        ])
        .unwrap();
        let route = RouteResolver::new(Arc::new(graph))
            .resolve(&USDC, &WETH)
            .unwrap();
        assert_eq!(route.fees(), &[FeeTier::Medium]);
    }

    #[test]
    fn test_first_candidate_in_graph_order_wins() {
        // Both USDT and USDC bridge WETH to DAI here; USDT is declared first.
        let graph = RouteGraph::new(vec![
            Edge::new(WETH.clone(), USDT.clone(), FeeTier::Low),
            Edge::new(WETH.clone(), USDC.clone(), FeeTier::Low),
            Edge::new(USDC.clone(), DAI.clone(), FeeTier::Lowest),
            Edge::new(USDT.clone(), DAI.clone(), FeeTier::High),
        ])
        .unwrap();
        let route = RouteResolver::new(Arc::new(graph))
            .resolve(&WETH, &DAI)
            .unwrap();
        assert_eq!(route.path(), &[WETH.clone(), USDT.clone(), DAI.clone()]);
        assert_eq!(route.fees(), &[FeeTier::Low, FeeTier::High]);
    }

    #[test]
    fn test_two_hops_are_never_attempted() {
        // IDRX - USDC - WETH - DAI would need two intermediates
        let graph = RouteGraph::new(vec![
            Edge::new(IDRX.clone(), USDC.clone(), FeeTier::Lowest),
            Edge::new(USDC.clone(), WETH.clone(), FeeTier::Low),
            Edge::new(WETH.clone(), DAI.clone(), FeeTier::Medium),
        ])
        .unwrap();
        let err = RouteResolver::new(Arc::new(graph))
            .resolve(&IDRX, &DAI)
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::NoRouteFound {
                token_in: "IDRX".to_string(),
                token_out: "DAI".to_string(),
            }
        );
    }

    #[test]
    fn test_disconnected_pair_fails() {
        let graph = RouteGraph::new(vec![
            Edge::new(WETH.clone(), USDC.clone(), FeeTier::Low),
            Edge::new(DAI.clone(), EURC.clone(), FeeTier::Lowest),
        ])
        .unwrap();
        let result = RouteResolver::new(Arc::new(graph)).resolve(&WETH, &EURC);
        assert!(matches!(result, Err(SwapError::NoRouteFound { .. })));
    }

    #[test]
    fn test_identity_pair_is_not_a_route() {
        assert!(matches!(
            resolver().resolve(&USDC, &USDC),
            Err(SwapError::NoRouteFound { .. })
        ));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = resolver();
        let first = resolver.resolve(&EURC, &WETH).unwrap();
        let second = resolver.resolve(&EURC, &WETH).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.path(), &[EURC.clone(), USDC.clone(), WETH.clone()]);
    }
}
