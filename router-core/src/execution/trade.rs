// execution/trade.rs
// Single-hop order: resolve pair, price off a fresh book, sign, submit.

use router_common::{CancelResult, OrderBookSnapshot, TradeResult, TradeSide};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ExecutionConfig;
use crate::exchange::market_data::{to_snapshot, ResolvedPair};
use crate::exchange::signing::{next_nonce, sign_l1_action};
use crate::exchange::types::{
    Action, CancelStatus, ExchangeRequest, ExchangeResponse, LimitWire, OrderStatus,
    OrderTypeWire, OrderWire, SpotMeta, Tif,
};
use crate::exchange::utils::{float_to_wire, parse_price, parse_size, round_price, round_size};
use crate::exchange::{MarketDataProvider, OrderGateway, Wallet};

/// How a hop is placed on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderKind {
    /// IOC at mid ± slippage
    #[default]
    Market,
    /// GTC at a caller-supplied price
    Limit { price: Decimal },
}

impl OrderKind {
    pub fn tif(self) -> Tif {
        match self {
            OrderKind::Market => Tif::Ioc,
            OrderKind::Limit { .. } => Tif::Gtc,
        }
    }
}

/// Everything one order needs besides the key.
pub struct TradeExecutor<'a> {
    pub market: &'a dyn MarketDataProvider,
    pub gateway: &'a dyn OrderGateway,
    pub meta: &'a SpotMeta,
    pub config: &'a ExecutionConfig,
}

impl<'a> TradeExecutor<'a> {
    pub fn new(
        market: &'a dyn MarketDataProvider,
        gateway: &'a dyn OrderGateway,
        meta: &'a SpotMeta,
        config: &'a ExecutionConfig,
    ) -> Self {
        Self {
            market,
            gateway,
            meta,
            config,
        }
    }

    /// Spend `amount` of `from_symbol` to obtain `to_symbol` through their direct pair.
    ///
    /// Every failure is reported as `TradeResult::Error`; nothing is retried.
    pub async fn execute_trade(
        &self,
        agent: &Wallet,
        from_symbol: &str,
        to_symbol: &str,
        amount: Decimal,
        kind: OrderKind,
    ) -> TradeResult {
        let Some(resolved) = self.meta.resolve_pair(from_symbol, to_symbol) else {
            return TradeResult::error(format!(
                "No direct spot pair found for {} → {}",
                from_symbol, to_symbol
            ));
        };

        let book = match self.market.fetch_l2_book(&resolved.coin).await {
            Ok(raw) => match to_snapshot(&resolved.coin, &raw) {
                Ok(book) => book,
                Err(e) => return TradeResult::error(e.to_string()),
            },
            Err(e) => return TradeResult::error(e.to_string()),
        };

        let order = match build_order(&resolved, amount, &book, kind, self.config) {
            Ok(order) => order,
            Err(message) => return TradeResult::error(message),
        };

        info!(
            "Submitting {} {} {} @ {} ({:?}) on {}",
            resolved.side, order.s, resolved.coin, order.p, kind.tif(), resolved.asset_id
        );

        let action = Action::single_order(order);
        let nonce = next_nonce();
        let signature = match sign_l1_action(agent, &action, nonce, self.gateway.is_mainnet()) {
            Ok(sig) => sig,
            Err(e) => return TradeResult::error(e.to_string()),
        };

        let response = self
            .gateway
            .submit_order(ExchangeRequest {
                action,
                nonce,
                signature,
                vault_address: None,
            })
            .await;

        let result = order_result(response);
        if let TradeResult::Error { message } = &result {
            warn!("Order {} → {} failed: {}", from_symbol, to_symbol, message);
        }
        result
    }
}

/// Cancel a resting order by asset id and order id.
pub async fn cancel_order(
    gateway: &dyn OrderGateway,
    agent: &Wallet,
    asset_id: u32,
    oid: u64,
) -> CancelResult {
    let action = Action::single_cancel(asset_id, oid);
    let nonce = next_nonce();
    let signature = match sign_l1_action(agent, &action, nonce, gateway.is_mainnet()) {
        Ok(sig) => sig,
        Err(e) => {
            return CancelResult::Error {
                message: e.to_string(),
            }
        }
    };

    info!("Cancelling order {} on asset {}", oid, asset_id);

    let response = gateway
        .submit_cancel(ExchangeRequest {
            action,
            nonce,
            signature,
            vault_address: None,
        })
        .await;

    let message = match response {
        Ok(ExchangeResponse::Ok(body)) => match body.data.and_then(|d| d.statuses.into_iter().next()) {
            Some(CancelStatus::Success) => return CancelResult::Success,
            Some(CancelStatus::Error(message)) => message,
            None => "Empty cancel response".to_string(),
        },
        Ok(ExchangeResponse::Err(message)) => message,
        Err(e) => e.to_string(),
    };
    warn!("Cancel of order {} failed: {}", oid, message);
    CancelResult::Error { message }
}

/// Price and size a single order against `book`.
///
/// Market orders use mid ± slippage rounded to significant figures (up for
/// buys, down for sells). Buys convert the quote amount into base size at the
/// reference price. Size is floored to the base token precision.
pub fn build_order(
    resolved: &ResolvedPair,
    amount: Decimal,
    book: &OrderBookSnapshot,
    kind: OrderKind,
    config: &ExecutionConfig,
) -> Result<OrderWire, String> {
    let mid = book
        .mid_price()
        .filter(|m| *m > Decimal::ZERO)
        .ok_or_else(|| "Orderbook is empty".to_string())?;

    let side = resolved.side;
    let raw_price = match kind {
        OrderKind::Market => match side {
            TradeSide::Sell => mid * (Decimal::ONE - config.slippage),
            TradeSide::Buy => mid * (Decimal::ONE + config.slippage),
        },
        OrderKind::Limit { price } => {
            if price <= Decimal::ZERO {
                return Err("Limit price must be greater than zero".to_string());
            }
            price
        }
    };
    let price = round_price(raw_price, side, config.price_sig_figs);

    let size = match (side, kind) {
        (TradeSide::Sell, _) => amount,
        (TradeSide::Buy, OrderKind::Market) => amount / mid,
        (TradeSide::Buy, OrderKind::Limit { .. }) => amount / price,
    };
    let size = round_size(size, resolved.sz_decimals);
    if size <= Decimal::ZERO {
        return Err("Trade size too small".to_string());
    }

    let order_value = match side {
        TradeSide::Sell => size * mid,
        TradeSide::Buy => amount,
    };
    if order_value < config.min_order_value {
        return Err(format!(
            "Order value (${}) is below the ${} minimum",
            order_value.round_dp(2),
            config.min_order_value.normalize()
        ));
    }

    Ok(OrderWire {
        a: resolved.asset_id,
        b: side.is_buy(),
        p: float_to_wire(price),
        s: float_to_wire(size),
        r: false,
        t: OrderTypeWire {
            limit: LimitWire { tif: kind.tif() },
        },
    })
}

fn order_result(
    response: Result<ExchangeResponse<OrderStatus>, crate::exchange::ExchangeError>,
) -> TradeResult {
    let body = match response {
        Ok(ExchangeResponse::Ok(body)) => body,
        Ok(ExchangeResponse::Err(message)) => return TradeResult::error(message),
        Err(e) => return TradeResult::error(e.to_string()),
    };

    match body.data.and_then(|d| d.statuses.into_iter().next()) {
        Some(OrderStatus::Filled(filled)) => {
            match (parse_size(&filled.total_sz), parse_price(&filled.avg_px)) {
                (Ok(total_sz), Ok(avg_px)) => TradeResult::Filled {
                    oid: filled.oid,
                    total_sz,
                    avg_px,
                },
                (Err(e), _) | (_, Err(e)) => TradeResult::error(e.to_string()),
            }
        }
        Some(OrderStatus::Resting(resting)) => TradeResult::Resting { oid: resting.oid },
        Some(OrderStatus::Error(message)) => TradeResult::error(message),
        None => TradeResult::error("Empty order response"),
    }
}
