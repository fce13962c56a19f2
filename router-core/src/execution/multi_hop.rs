// execution/multi_hop.rs
// Sequential hop execution: each hop spends what the previous one realized.

use router_common::{HopResult, MultiHopResult, RouteHop, TradeResult, TradeSide};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

use super::trade::{OrderKind, TradeExecutor};
use crate::exchange::Wallet;

pub const CANCELLED_MESSAGE: &str = "execution cancelled";

/// Amount received from a filled hop: quote for a sell, base for a buy.
pub fn realized_output(side: TradeSide, total_sz: Decimal, avg_px: Decimal) -> Decimal {
    match side {
        TradeSide::Sell => total_sz * avg_px,
        TradeSide::Buy => total_sz,
    }
}

pub struct MultiHopExecutor<'a> {
    trade: &'a TradeExecutor<'a>,
    hop_delay: Duration,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> MultiHopExecutor<'a> {
    pub fn new(trade: &'a TradeExecutor<'a>) -> Self {
        Self {
            trade,
            hop_delay: trade.config.hop_delay(),
            cancel: None,
        }
    }

    pub fn with_hop_delay(mut self, delay: Duration) -> Self {
        self.hop_delay = delay;
        self
    }

    /// Flag checked before every hop; a hop already submitted always completes.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Run `hops` in order starting from `initial_amount`.
    ///
    /// `on_hop` sees every attempted hop, including the one that halts the run.
    /// The first error or resting order stops execution: `error` if nothing
    /// completed, `partial` otherwise.
    pub async fn execute<F>(
        &self,
        agent: &Wallet,
        hops: &[RouteHop],
        initial_amount: Decimal,
        mut on_hop: F,
    ) -> MultiHopResult
    where
        F: FnMut(usize, &HopResult),
    {
        let mut completed: Vec<HopResult> = Vec::with_capacity(hops.len());
        let mut current_amount = initial_amount;

        for (i, hop) in hops.iter().enumerate() {
            if self.cancelled() {
                warn!("Multi-hop run cancelled before hop {} of {}", i + 1, hops.len());
                return MultiHopResult::halted(completed, None, CANCELLED_MESSAGE);
            }

            let from_symbol = hop.from_symbol().to_string();
            let to_symbol = hop.to_symbol().to_string();

            let result = self
                .trade
                .execute_trade(agent, &from_symbol, &to_symbol, current_amount, OrderKind::Market)
                .await;

            let hop_result = HopResult {
                hop_index: i,
                from_symbol,
                to_symbol,
                input_amount: current_amount,
                result,
            };
            on_hop(i, &hop_result);

            let output = match &hop_result.result {
                TradeResult::Filled { total_sz, avg_px, .. } => {
                    realized_output(hop.side, *total_sz, *avg_px)
                }
                TradeResult::Resting { oid } => {
                    warn!("Hop {} left order {} resting, halting", i + 1, oid);
                    return MultiHopResult::halted(
                        completed,
                        Some(hop_result),
                        "Order resting (not filled), IOC orders should fill or cancel",
                    );
                }
                TradeResult::Error { message } => {
                    warn!("Hop {} failed, halting: {}", i + 1, message);
                    let message = message.clone();
                    return MultiHopResult::halted(completed, Some(hop_result), message);
                }
            };

            info!(
                "Hop {}/{} {} → {} done: {} in, {} out",
                i + 1,
                hops.len(),
                hop_result.from_symbol,
                hop_result.to_symbol,
                current_amount,
                output
            );
            completed.push(hop_result);
            current_amount = output;

            if i + 1 < hops.len() && !self.hop_delay.is_zero() {
                tokio::time::sleep(self.hop_delay).await;
            }
        }

        MultiHopResult::completed(completed, current_amount)
    }
}
