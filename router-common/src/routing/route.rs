// routing/route.rs
// Route assembly: path -> priced hops -> warnings.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use super::config::RouterConfig;
use super::errors::RouteError;
use super::estimator::estimate_hop;
use super::graph::{GraphEdge, TokenGraph};
use super::pathfinder::find_path;
use crate::domain::{Asset, OrderBookSnapshot, TradablePair, TradeSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    LowLiquidity,
    StaleData,
    /// Declared for consumers; no rule produces it yet.
    HighSlippage,
    LongRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWarning {
    pub kind: WarningKind,
    pub message: String,
    pub severity: Severity,
}

/// A single priced hop. Immutable once the route is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteHop {
    pub pair: TradablePair,
    pub side: TradeSide,
    /// Amount entering the hop (output of the previous hop)
    pub input_amount: Decimal,
    pub estimated_price: Decimal,
    pub estimated_output: Decimal,
}

impl RouteHop {
    pub fn from_symbol(&self) -> &str {
        &self.pair.input_asset(self.side).symbol
    }

    pub fn to_symbol(&self) -> &str {
        &self.pair.output_asset(self.side).symbol
    }
}

/// Discovered route. A value: re-discovery produces a new `Route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: Asset,
    pub to: Asset,
    pub amount_in: Decimal,
    pub hops: Vec<RouteHop>,
    pub estimated_output: Decimal,
    pub warnings: Vec<RouteWarning>,
}

impl Route {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn is_multi_hop(&self) -> bool {
        self.hops.len() > 1
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Pair ids in hop order, e.g. ["SOL/USDC", "HYPE/USDC"]
    pub fn pair_ids(&self) -> Vec<&str> {
        self.hops.iter().map(|h| h.pair.id.as_str()).collect()
    }
}

/// Price `edges` hop by hop, carrying each output into the next input.
///
/// Returns `None` if any hop's pair has no snapshot: an unpriced route is
/// not actionable.
pub fn assemble_route(
    from: &Asset,
    to: &Asset,
    amount: Decimal,
    edges: &[GraphEdge],
    books: &HashMap<String, OrderBookSnapshot>,
    config: &RouterConfig,
    now_ms: i64,
) -> Option<Route> {
    let mut current_amount = amount;
    let mut hops = Vec::with_capacity(edges.len());

    for edge in edges {
        let Some(book) = books.get(&edge.pair.id) else {
            warn!("No order book for {}, route {} -> {} dropped", edge.pair.id, from.symbol, to.symbol);
            return None;
        };

        let estimate = estimate_hop(edge, current_amount, book);
        hops.push(RouteHop {
            pair: edge.pair.clone(),
            side: edge.side,
            input_amount: current_amount,
            estimated_price: estimate.price,
            estimated_output: estimate.output,
        });
        current_amount = estimate.output;
    }

    let warnings = generate_warnings(&hops, books, config, now_ms);

    Some(Route {
        from: from.clone(),
        to: to.clone(),
        amount_in: amount,
        hops,
        estimated_output: current_amount,
        warnings,
    })
}

/// Inspect assembled hops for staleness, thin books and route length.
/// Read-only over the hops; one route may collect several warnings.
pub fn generate_warnings(
    hops: &[RouteHop],
    books: &HashMap<String, OrderBookSnapshot>,
    config: &RouterConfig,
    now_ms: i64,
) -> Vec<RouteWarning> {
    let mut warnings = Vec::new();

    for hop in hops {
        let Some(book) = books.get(&hop.pair.id) else {
            continue;
        };
        let pair_name = &hop.pair.id;

        let age = book.age_ms(now_ms);
        if age > config.stale_threshold_ms {
            warnings.push(RouteWarning {
                kind: WarningKind::StaleData,
                message: format!(
                    "Orderbook data for {} is stale (>{}s old)",
                    pair_name,
                    (age + 500) / 1000
                ),
                severity: Severity::Warn,
            });
        }

        let top_level_size = book
            .levels_for(hop.side)
            .first()
            .map(|l| l.size)
            .unwrap_or(Decimal::ZERO);
        let needed = hop
            .estimated_output
            .checked_mul(config.low_liquidity_ratio)
            .unwrap_or(Decimal::MAX);
        if top_level_size < needed {
            warnings.push(RouteWarning {
                kind: WarningKind::LowLiquidity,
                message: format!(
                    "Low liquidity on {}, may experience significant slippage",
                    pair_name
                ),
                severity: Severity::Warn,
            });
        }
    }

    if hops.len() >= 3 {
        warnings.push(RouteWarning {
            kind: WarningKind::LongRoute,
            message: format!(
                "Route requires {} hops, cumulative slippage may be significant",
                hops.len()
            ),
            severity: Severity::Info,
        });
    }

    for w in &warnings {
        warn!("route warning [{:?}] {}", w.kind, w.message);
    }

    warnings
}

/// Graph -> BFS -> estimation -> warnings, evaluated at the current time.
pub fn find_route(
    from: &Asset,
    to: &Asset,
    amount: Decimal,
    pairs: &[TradablePair],
    books: &HashMap<String, OrderBookSnapshot>,
    config: &RouterConfig,
) -> Result<Option<Route>, RouteError> {
    find_route_at(
        from,
        to,
        amount,
        pairs,
        books,
        config,
        Utc::now().timestamp_millis(),
    )
}

/// Same as [`find_route`] with an explicit evaluation time.
pub fn find_route_at(
    from: &Asset,
    to: &Asset,
    amount: Decimal,
    pairs: &[TradablePair],
    books: &HashMap<String, OrderBookSnapshot>,
    config: &RouterConfig,
    now_ms: i64,
) -> Result<Option<Route>, RouteError> {
    if from.symbol == to.symbol {
        return Err(RouteError::IdenticalAssets(from.symbol.clone()));
    }
    if amount <= Decimal::ZERO {
        return Err(RouteError::NonPositiveAmount(amount));
    }

    let graph = TokenGraph::build(pairs);
    let Some(edges) = find_path(&graph, &from.symbol, &to.symbol, config.max_hops) else {
        info!("No path {} -> {} within {} hops", from.symbol, to.symbol, config.max_hops);
        return Ok(None);
    };

    let route = assemble_route(from, to, amount, &edges, books, config, now_ms);
    if let Some(r) = &route {
        info!(
            "Route {} -> {}: {} ({} hops, est. output {})",
            from.symbol,
            to.symbol,
            r.pair_ids().join(" > "),
            r.hop_count(),
            r.estimated_output
        );
    }
    Ok(route)
}
