// src/main.rs
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use swappiness::{
    config::{load_config, Config},
    disperse::{load_recipients, DispersePlan, DispersePlanner, Slippage},
    error::SwapError,
    quoter::{QuoteService, RpcQuoter},
    routing::{RouteGraph, RouteResolver},
    tokens::TokenRegistry,
    utils::{format_units, parse_units, setup_logging},
};

#[derive(Parser, Debug)]
#[command(name = "swappiness", version, about = "Route, quote and plan stablecoin disperse swaps on Base")]
struct Cli {
    /// JSON route graph overriding the built-in pools
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known tokens
    Tokens,
    /// Resolve a route and print its exact-output path
    Route {
        #[arg(long)]
        token_in: String,
        #[arg(long)]
        token_out: String,
    },
    /// Quote the input needed for an exact output amount
    Quote {
        #[arg(long)]
        token_in: String,
        #[arg(long)]
        token_out: String,
        #[arg(long)]
        amount_out: String,
    },
    /// Quote every recipient in a file and build the disperse call
    Plan {
        #[arg(long)]
        token_in: String,
        #[arg(long)]
        recipients: PathBuf,
        /// Slippage tolerance in percent
        #[arg(long)]
        slippage: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;
    setup_logging(config.log_level_filter()).context("Failed to initialize logging")?;
    config.validate_and_log();

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        if e.downcast_ref::<SwapError>().is_some_and(SwapError::is_recoverable) {
            warn!("The RPC endpoint failed; the same command may succeed if retried");
        }
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli, config: Arc<Config>) -> anyhow::Result<()> {
    let registry = Arc::new(TokenRegistry::base_mainnet());
    if registry.chain_id() != config.chain_id {
        return Err(anyhow!(
            "CHAIN_ID {} is not supported, the token registry targets chain {}",
            config.chain_id,
            registry.chain_id()
        ));
    }

    let graph = match cli.graph.as_ref().or(config.route_graph_path.as_ref()) {
        Some(path) => {
            info!("Loading route graph from {}", path.display());
            RouteGraph::from_file(path, &registry)
                .with_context(|| format!("Failed to load route graph {}", path.display()))?
        }
        None => RouteGraph::base_mainnet(),
    };
    let resolver = RouteResolver::new(Arc::new(graph));

    match cli.command {
        Command::Tokens => {
            println!("{:<6} {:<44} {:>8}  {:<5} {:<6}", "SYMBOL", "ADDRESS", "DECIMALS", "IN", "OUT");
            for token in registry.tokens() {
                println!(
                    "{:<6} {:<44} {:>8}  {:<5} {:<6}",
                    token.symbol,
                    token.address.to_string(),
                    token.decimals,
                    registry.is_input_token(token),
                    registry.is_output_token(token)
                );
            }
        }
        Command::Route {
            token_in,
            token_out,
        } => {
            let token_in = registry.wrap_native(&registry.lookup(&token_in)?);
            let token_out = registry.wrap_native(&registry.lookup(&token_out)?);
            if token_in == token_out {
                println!("{} -> {} needs no swap", token_in, token_out);
            } else {
                let route = resolver.resolve(&token_in, &token_out)?;
                println!("route: {}", route);
                println!("hops:  {}", route.hop_count());
                println!("path:  0x{}", hex::encode(route.encode_exact_output()?));
            }
        }
        Command::Quote {
            token_in,
            token_out,
            amount_out,
        } => {
            let token_in = registry.lookup(&token_in)?;
            let token_out = registry.lookup(&token_out)?;
            let amount_out = parse_units(&amount_out, token_out.decimals)?;
            let service = quote_service(&config, resolver, registry.clone())?;
            let quote = service
                .quote_exact_output(&token_in, &token_out, amount_out)
                .await?;
            if let Some(route) = &quote.route {
                println!("route:      {}", route);
            }
            println!(
                "amount out: {} {}",
                format_units(quote.amount_out, token_out.decimals),
                token_out
            );
            println!(
                "amount in:  {} {}",
                format_units(quote.amount_in, token_in.decimals),
                token_in
            );
        }
        Command::Plan {
            token_in,
            recipients,
            slippage,
        } => {
            let token_in = registry.lookup(&token_in)?;
            let recipients = load_recipients(&recipients, &registry)
                .with_context(|| format!("Failed to read recipients {}", recipients.display()))?;
            let slippage = Slippage::from_percent(slippage.unwrap_or(config.slippage_pct))?;
            let service = quote_service(&config, resolver, registry.clone())?;
            let plan = DispersePlanner::new(Arc::new(service))
                .plan(&token_in, &recipients, slippage)
                .await?;
            print_plan(&plan, &config)?;
        }
    }
    Ok(())
}

fn quote_service(
    config: &Config,
    resolver: RouteResolver,
    registry: Arc<TokenRegistry>,
) -> anyhow::Result<QuoteService> {
    let quoter_address = config.quoter().map_err(|e| anyhow!(e))?;
    let quoter = RpcQuoter::new(&config.rpc_url, quoter_address, config.rpc_timeout())?;
    Ok(QuoteService::new(resolver, registry, Arc::new(quoter)))
}

fn print_plan(plan: &DispersePlan, config: &Config) -> anyhow::Result<()> {
    let decimals = plan.token_in.decimals;
    for leg in &plan.legs {
        let quote = &leg.quote;
        println!(
            "{} <- {} {} for {} {} (max {}) path 0x{}",
            leg.recipient,
            format_units(quote.amount_out, quote.token_out.decimals),
            quote.token_out,
            format_units(quote.amount_in, decimals),
            plan.token_in,
            format_units(leg.amount_in_max, decimals),
            hex::encode(&leg.path)
        );
    }
    println!(
        "total quoted: {} {}",
        format_units(plan.total_quoted_in, decimals),
        plan.token_in
    );
    println!(
        "total max:    {} {} ({} slippage)",
        format_units(plan.total_max_in, decimals),
        plan.token_in,
        plan.slippage
    );
    println!("value:        {} wei", plan.value);
    if let Some(disperse) = config.disperse().map_err(|e| anyhow!(e))? {
        println!("to:           {}", disperse);
    }
    println!("calldata:     0x{}", hex::encode(plan.calldata()));
    Ok(())
}
