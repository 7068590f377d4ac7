//! Integration tests for route resolution and path encoding over the
//! Base mainnet pool set.

use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use swappiness::routing::{decode_path, FeeTier, RouteGraph, RouteResolver};
use swappiness::tokens::{TokenRegistry, DAI, EURC, IDRX, USDC, USDT, WETH};
use swappiness::SwapError;

fn resolver() -> RouteResolver {
    RouteResolver::new(Arc::new(RouteGraph::base_mainnet()))
}

#[test]
fn test_scenario_routes() {
    let resolver = resolver();

    let idrx_eurc = resolver.resolve(&IDRX, &EURC).unwrap();
    assert_eq!(idrx_eurc.path(), &[IDRX.clone(), USDC.clone(), EURC.clone()]);
    assert_eq!(idrx_eurc.fees(), &[FeeTier::Lowest, FeeTier::Medium]);

    let weth_dai = resolver.resolve(&WETH, &DAI).unwrap();
    assert_eq!(weth_dai.path(), &[WETH.clone(), USDC.clone(), DAI.clone()]);
    assert_eq!(weth_dai.fees(), &[FeeTier::Low, FeeTier::Lowest]);

    let usdt_weth = resolver.resolve(&USDT, &WETH).unwrap();
    assert_eq!(usdt_weth.hop_count(), 1);
    assert_eq!(usdt_weth.fees(), &[FeeTier::Low]);
}

#[test]
fn test_known_exact_output_vector() {
    let route = resolver().resolve(&WETH, &DAI).unwrap();
    let encoded = route.encode_exact_output().unwrap();
    assert_eq!(
        hex::encode(&encoded),
        "50c5725949a6f0c72e6c4a641f24049a917db0cb000064\
         833589fcd6edb6e08f4c7c32d4f71b54bda029130001f4\
         4200000000000000000000000000000000000006"
    );
    assert_eq!(encoded.len(), 66);

    let (tokens, fees) = decode_path(&encoded).unwrap();
    assert_eq!(tokens, vec![DAI.address, USDC.address, WETH.address]);
    assert_eq!(fees, vec![FeeTier::Lowest, FeeTier::Low]);
}

#[test]
fn test_every_output_is_reachable_from_every_wrapped_input() {
    let registry = TokenRegistry::base_mainnet();
    let resolver = resolver();
    for token_in in registry.input_tokens() {
        let token_in = registry.wrap_native(&token_in);
        for token_out in registry.output_tokens() {
            if token_in == token_out {
                continue;
            }
            let route = resolver.resolve(&token_in, &token_out).unwrap();
            assert!(route.hop_count() <= 2, "{} has too many hops", route);
            assert_eq!(
                route.encode_exact_output().unwrap().len(),
                20 + 23 * route.hop_count()
            );
        }
    }
}

#[test]
fn test_graph_from_json_file() {
    let registry = TokenRegistry::base_mainnet();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{ "token_a": "IDRX", "token_b": "USDT", "fee": 500 }},
            {{ "token_a": "usdt", "token_b": "0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb", "fee": 100 }}
        ]"#
    )
    .unwrap();

    let graph = RouteGraph::from_file(file.path(), &registry).unwrap();
    assert_eq!(graph.len(), 2);

    let resolver = RouteResolver::new(Arc::new(graph));
    let route = resolver.resolve(&IDRX, &DAI).unwrap();
    assert_eq!(route.path(), &[IDRX.clone(), USDT.clone(), DAI.clone()]);

    // USDC is not in this graph
    assert!(matches!(
        resolver.resolve(&USDC, &DAI),
        Err(SwapError::NoRouteFound { .. })
    ));
}

#[test]
fn test_graph_file_with_unknown_fee_is_rejected() {
    let registry = TokenRegistry::base_mainnet();
    let json = r#"[{ "token_a": "USDC", "token_b": "DAI", "fee": 250 }]"#;
    assert!(matches!(
        RouteGraph::from_json_str(json, &registry),
        Err(SwapError::Parse(_))
    ));
}

#[test]
fn test_native_route_resolves_offline_after_wrapping() {
    let registry = TokenRegistry::base_mainnet();
    let resolver = resolver();

    let token_in = registry.wrap_native(&registry.lookup("ETH").unwrap());
    let token_out = registry.wrap_native(&registry.lookup("dai").unwrap());
    let route = resolver.resolve(&token_in, &token_out).unwrap();
    assert_eq!(route.path(), &[WETH.clone(), USDC.clone(), DAI.clone()]);

    // ETH -> WETH collapses to the same token and needs no route
    let weth = registry.wrap_native(&registry.lookup("WETH").unwrap());
    assert_eq!(token_in, weth);
}
