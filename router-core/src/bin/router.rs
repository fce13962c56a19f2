// router-core/src/bin/router.rs
// router <FROM> <TO> <AMOUNT> [--sample] [--execute] [--limit <PRICE>]

use anyhow::{anyhow, bail, Context, Result};
use router_common::{ExecutionOutcome, MultiHopResult, Route, RouteState, TradeResult};
use router_core::config::Settings;
use router_core::exchange::{HyperliquidConnector, MarketDataProvider, SimulatedMarket, Wallet};
use router_core::execution::OrderKind;
use router_core::service::RouteService;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "usage: router <FROM> <TO> <AMOUNT> [--sample] [--execute] [--limit <PRICE>]";

struct Args {
    from: String,
    to: String,
    amount: Decimal,
    sample: bool,
    execute: bool,
    limit: Option<Decimal>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut sample = false;
    let mut execute = false;
    let mut limit = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => sample = true,
            "--execute" => execute = true,
            "--limit" => {
                let raw = args.next().ok_or_else(|| anyhow!("--limit needs a price"))?;
                limit = Some(Decimal::from_str(&raw).with_context(|| format!("invalid limit price '{}'", raw))?);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => positional.push(arg),
        }
    }

    let [from, to, amount] = <[String; 3]>::try_from(positional).map_err(|_| anyhow!(USAGE))?;
    let amount = Decimal::from_str(&amount).with_context(|| format!("invalid amount '{}'", amount))?;

    if sample && execute {
        bail!("--execute is only available against the live exchange");
    }
    if limit.is_some() && !execute {
        bail!("--limit only applies together with --execute");
    }

    Ok(Args {
        from: from.to_uppercase(),
        to: to.to_uppercase(),
        amount,
        sample,
        execute,
        limit,
    })
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn print_route(route: &Route) {
    println!(
        "\n🧭 {} {} -> {} ({} hop{})",
        route.amount_in,
        route.from.symbol,
        route.to.symbol,
        route.hop_count(),
        if route.hop_count() == 1 { "" } else { "s" }
    );
    for (i, hop) in route.hops.iter().enumerate() {
        println!(
            "   {}. {:<5} {:<12} {} {} -> {} {} @ {}",
            i + 1,
            hop.side,
            hop.pair.id,
            hop.input_amount,
            hop.from_symbol(),
            hop.estimated_output.round_dp(8),
            hop.to_symbol(),
            hop.estimated_price.round_dp(8)
        );
    }
    println!("   Estimated output: {} {}", route.estimated_output.round_dp(8), route.to.symbol);
    for w in &route.warnings {
        println!("   ⚠️  [{:?}] {}", w.severity, w.message);
    }
}

fn print_trade(result: &TradeResult) {
    match result {
        TradeResult::Filled { oid, total_sz, avg_px } => {
            println!("✅ Filled {} @ {} (oid {})", total_sz, avg_px, oid)
        }
        TradeResult::Resting { oid } => println!("⏳ Resting (oid {})", oid),
        TradeResult::Error { message } => println!("❌ {}", message),
    }
}

fn print_multi_hop(result: &MultiHopResult) {
    println!("Status: {:?}", result.status);
    for hop in &result.completed_hops {
        print!("   Hop {} {} -> {}: ", hop.hop_index + 1, hop.from_symbol, hop.to_symbol);
        print_trade(&hop.result);
    }
    if let Some(failed) = &result.failed_hop {
        print!("   Hop {} {} -> {} FAILED: ", failed.hop_index + 1, failed.from_symbol, failed.to_symbol);
        print_trade(&failed.result);
    }
    if let Some(output) = result.final_output {
        println!("   Final output: {}", output);
    }
    if let Some(error) = &result.error {
        println!("   Error: {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = Settings::new().context("Failed to load settings")?;
    init_logging();

    let connector = Arc::new(HyperliquidConnector::new(&settings.api).context("Failed to build HTTP client")?);
    let market: Arc<dyn MarketDataProvider> = if args.sample {
        info!("Using the simulated sample market");
        Arc::new(SimulatedMarket::from_sample(chrono::Utc::now().timestamp_millis()))
    } else {
        info!("Using {} ({:?})", connector.base_url(), settings.api.network);
        connector.clone()
    };

    let service = RouteService::new(market, connector, settings.routing.clone(), settings.execution.clone());
    service
        .refresh_market_metadata()
        .await
        .context("Failed to load spot metadata")?;

    let route = match service.discover(&args.from, &args.to, args.amount).await? {
        RouteState::RouteFound { route } => route,
        RouteState::NoRoute { from, to } => {
            bail!("No route from {} to {} within {} hops", from.symbol, to.symbol, settings.routing.max_hops)
        }
        RouteState::Error { message } => bail!(message),
        other => bail!("Unexpected state after discovery: {}", other.name()),
    };
    print_route(&route);

    if !args.execute {
        return Ok(());
    }

    let key = settings
        .agent_private_key
        .as_deref()
        .ok_or_else(|| anyhow!("AGENT_PRIVATE_KEY is not set"))?;
    let agent = Wallet::from_private_key(key).context("Invalid agent key")?;
    info!("Executing with agent {}", agent.address);

    let kind = match args.limit {
        Some(price) => OrderKind::Limit { price },
        None => OrderKind::Market,
    };

    println!();
    match service.execute(&agent, kind).await? {
        RouteState::Executed { outcome, .. } => match outcome {
            ExecutionOutcome::SingleHop { result } => print_trade(&result),
            ExecutionOutcome::MultiHop { result } => print_multi_hop(&result),
        },
        RouteState::ExecutionError { message, .. } => bail!("Execution failed: {}", message),
        other => bail!("Unexpected state after execution: {}", other.name()),
    }

    Ok(())
}
