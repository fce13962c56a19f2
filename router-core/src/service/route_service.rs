// service/route_service.rs
// Drives the route state machine: discovery against live (or simulated)
// books, then optional execution through the order gateway.

use chrono::Utc;
use router_common::routing::{assemble_route, find_path, TokenGraph};
use router_common::{
    Asset, CancelResult, DiscoveryRequest, ExecutionOutcome, HopResult, MultiHopResult,
    MultiHopStatus, Route, RouteEvent, RouteMachine, RouteState, RouterConfig, TradablePair, TradeResult,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::errors::ServiceError;
use crate::config::ExecutionConfig;
use crate::exchange::market_data::fetch_snapshots;
use crate::exchange::{MarketDataProvider, OrderGateway, SpotMeta, Wallet};
use crate::execution::{cancel_order, MultiHopExecutor, OrderKind, TradeExecutor};

pub struct RouteService {
    market: Arc<dyn MarketDataProvider>,
    gateway: Arc<dyn OrderGateway>,
    routing: RouterConfig,
    execution: ExecutionConfig,
    meta: RwLock<Option<Arc<SpotMeta>>>,
    machine: Mutex<RouteMachine>,
    cancel_requested: AtomicBool,
}

impl RouteService {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        gateway: Arc<dyn OrderGateway>,
        routing: RouterConfig,
        execution: ExecutionConfig,
    ) -> Self {
        Self {
            market,
            gateway,
            routing,
            execution,
            meta: RwLock::new(None),
            machine: Mutex::new(RouteMachine::new()),
            cancel_requested: AtomicBool::new(false),
        }
    }

    // Never held across an await
    fn machine(&self) -> MutexGuard<'_, RouteMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: RouteEvent) -> Result<RouteState, ServiceError> {
        Ok(self.machine().dispatch(event)?.clone())
    }

    pub fn state(&self) -> RouteState {
        self.machine().state().clone()
    }

    pub async fn spot_meta(&self) -> Option<Arc<SpotMeta>> {
        self.meta.read().await.clone()
    }

    /// Load spot metadata; returns the number of listed pairs.
    pub async fn refresh_market_metadata(&self) -> Result<usize, ServiceError> {
        let meta = self.market.fetch_spot_meta().await?;
        let pair_count = meta.universe.len();
        info!(
            "Market metadata loaded: {} tokens, {} pairs",
            meta.tokens.len(),
            pair_count
        );
        *self.meta.write().await = Some(Arc::new(meta));
        Ok(pair_count)
    }

    /// Find and price a route from `from` to `to` for `amount`.
    ///
    /// Rejected with [`ServiceError::Busy`] while a discovery or execution is
    /// running. Input problems end in the `error` state, not in an `Err`.
    pub async fn discover(&self, from: &str, to: &str, amount: Decimal) -> Result<RouteState, ServiceError> {
        let meta = self.spot_meta().await;
        let lookup = |symbol: &str| -> Option<Asset> {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return None;
            }
            match &meta {
                Some(meta) => meta.asset(&symbol),
                // Unchecked until metadata arrives; validation reports the missing metadata
                None => Some(Asset::new(&symbol, &symbol, 0)),
            }
        };
        let request = DiscoveryRequest {
            from: lookup(from),
            to: lookup(to),
            amount,
            market_metadata_ready: meta.is_some(),
        };

        {
            let mut machine = self.machine();
            let current = machine.state();
            if current.is_busy() {
                return Err(ServiceError::Busy(current.name()));
            }
            if !matches!(current, RouteState::Idle) {
                machine.reset();
            }
            if let RouteState::Error { message } = machine.dispatch(RouteEvent::Discover(request.clone()))? {
                warn!("Discovery rejected: {}", message);
                return Ok(machine.state().clone());
            }
        }

        let (Some(meta), Some(from), Some(to)) = (meta, request.from, request.to) else {
            return self.dispatch(RouteEvent::Failed("Discovery inputs missing".to_string()));
        };

        let pairs = meta.tradable_pairs();
        let graph = TokenGraph::build(&pairs);
        let Some(edges) = find_path(&graph, &from.symbol, &to.symbol, self.routing.max_hops) else {
            info!("No route {} -> {} within {} hops", from.symbol, to.symbol, self.routing.max_hops);
            return self.dispatch(RouteEvent::NoRoute { from, to });
        };

        let path_pairs: Vec<TradablePair> = edges.iter().map(|e| e.pair.clone()).collect();
        let books = match fetch_snapshots(self.market.as_ref(), &meta, &path_pairs).await {
            Ok(books) => books,
            Err(e) => return self.dispatch(RouteEvent::Failed(e.to_string())),
        };

        let now_ms = Utc::now().timestamp_millis();
        match assemble_route(&from, &to, amount, &edges, &books, &self.routing, now_ms) {
            Some(route) => {
                info!(
                    "Route {} -> {}: {} hop(s) via [{}], est. {} {}",
                    from.symbol,
                    to.symbol,
                    route.hop_count(),
                    route.pair_ids().join(", "),
                    route.estimated_output,
                    to.symbol
                );
                self.dispatch(RouteEvent::RouteFound(route))
            }
            None => self.dispatch(RouteEvent::NoRoute { from, to }),
        }
    }

    /// Execute the discovered route with the agent key.
    ///
    /// Limit orders are only accepted for single-hop routes.
    pub async fn execute(&self, agent: &Wallet, kind: OrderKind) -> Result<RouteState, ServiceError> {
        let meta = self.spot_meta().await.ok_or(ServiceError::MetadataMissing)?;

        let route: Route = {
            let mut machine = self.machine();
            if let (RouteState::RouteFound { route }, OrderKind::Limit { .. }) = (machine.state(), kind) {
                if route.is_multi_hop() {
                    return Err(ServiceError::UnsupportedOrder(
                        "limit orders need a single-hop route".to_string(),
                    ));
                }
            }
            match machine.dispatch(RouteEvent::StartExecution)? {
                RouteState::Executing { route, .. } => route.clone(),
                other => return Ok(other.clone()),
            }
        };
        self.cancel_requested.store(false, Ordering::SeqCst);

        let trade = TradeExecutor::new(self.market.as_ref(), self.gateway.as_ref(), &meta, &self.execution);

        let event = if route.is_multi_hop() {
            let hop_count = route.hop_count();
            let result = MultiHopExecutor::new(&trade)
                .with_cancel_flag(&self.cancel_requested)
                .execute(agent, &route.hops, route.amount_in, |i, hop| {
                    if let Some(next) = next_hop(i, hop_count, hop) {
                        if let Err(e) = self.machine().dispatch(RouteEvent::HopProgress(next)) {
                            warn!("Hop progress not recorded: {}", e);
                        }
                    }
                })
                .await;
            multi_hop_event(result)
        } else {
            let hop = &route.hops[0];
            let result = trade
                .execute_trade(agent, hop.from_symbol(), hop.to_symbol(), route.amount_in, kind)
                .await;
            single_hop_event(result, kind)
        };

        self.dispatch(event)
    }

    /// Ask a running multi-hop execution to stop before its next hop.
    /// Returns false when nothing is executing.
    pub fn cancel_execution(&self) -> bool {
        if matches!(self.machine().state(), RouteState::Executing { .. }) {
            info!("Cancellation requested, stopping after the current hop");
            self.cancel_requested.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Cancel a resting (limit) order.
    pub async fn cancel_order(&self, agent: &Wallet, asset_id: u32, oid: u64) -> CancelResult {
        cancel_order(self.gateway.as_ref(), agent, asset_id, oid).await
    }

    pub fn reset(&self) {
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.machine().reset();
    }
}

// Only a filled hop moves execution on; a failed one halts the run.
fn next_hop(index: usize, hop_count: usize, hop: &HopResult) -> Option<usize> {
    let next = index + 1;
    (next < hop_count && matches!(hop.result, TradeResult::Filled { .. })).then_some(next)
}

fn single_hop_event(result: TradeResult, kind: OrderKind) -> RouteEvent {
    match (&result, kind) {
        (TradeResult::Filled { .. }, _) | (TradeResult::Resting { .. }, OrderKind::Limit { .. }) => {
            RouteEvent::Executed(ExecutionOutcome::SingleHop { result })
        }
        (TradeResult::Resting { oid }, OrderKind::Market) => RouteEvent::ExecutionFailed(format!(
            "Order {} resting (not filled), IOC orders should fill or cancel",
            oid
        )),
        (TradeResult::Error { message }, _) => RouteEvent::ExecutionFailed(message.clone()),
    }
}

fn multi_hop_event(result: MultiHopResult) -> RouteEvent {
    match result.status {
        MultiHopStatus::Completed | MultiHopStatus::Partial => {
            RouteEvent::Executed(ExecutionOutcome::MultiHop { result })
        }
        MultiHopStatus::Error => RouteEvent::ExecutionFailed(
            result
                .error
                .unwrap_or_else(|| "Execution failed".to_string()),
        ),
    }
}
