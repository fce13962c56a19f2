// routing/estimator.rs
// Order book walk for a single hop. Never fails: thin or empty books give a
// pessimistic or zero estimate instead of an error.

use rust_decimal::Decimal;
use tracing::debug;

use super::graph::GraphEdge;
use crate::domain::{OrderBookLevel, OrderBookSnapshot, TradeSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopEstimate {
    /// Amount of the edge's `to` asset received
    pub output: Decimal,
    /// Volume-weighted average price, quote per base
    pub price: Decimal,
}

impl HopEstimate {
    pub const ZERO: HopEstimate = HopEstimate {
        output: Decimal::ZERO,
        price: Decimal::ZERO,
    };
}

/// Simulate a market order of `input` through `book` along `edge`.
///
/// Sell edges hit bids with `input` in base units, buy edges hit asks with
/// `input` in quote units. Depth beyond the last level is priced at that
/// last (worst) level.
pub fn estimate_hop(edge: &GraphEdge, input: Decimal, book: &OrderBookSnapshot) -> HopEstimate {
    let estimate = match edge.side {
        TradeSide::Sell => walk_bids(input, &book.bids),
        TradeSide::Buy => walk_asks(input, &book.asks),
    };

    debug!(
        "estimate {} {} {} -> {} @ {}",
        edge.pair.id, edge.side, input, estimate.output, estimate.price
    );
    estimate
}

/// Sell `amount` base into bids; returns quote received.
fn walk_bids(amount: Decimal, bids: &[OrderBookLevel]) -> HopEstimate {
    if amount <= Decimal::ZERO || bids.is_empty() {
        return HopEstimate::ZERO;
    }

    let mut remaining = amount;
    let mut total_output = Decimal::ZERO;

    for level in bids {
        if remaining <= Decimal::ZERO {
            break;
        }
        let filled = remaining.min(level.size);
        total_output = add_mul(total_output, filled, level.price);
        remaining -= filled;
    }

    if remaining > Decimal::ZERO {
        if let Some(worst) = bids.last() {
            total_output = add_mul(total_output, remaining, worst.price);
        }
    }

    HopEstimate {
        output: total_output,
        price: total_output.checked_div(amount).unwrap_or(Decimal::MAX),
    }
}

// Saturates at Decimal::MAX instead of overflowing on absurd amounts
fn add_mul(acc: Decimal, size: Decimal, price: Decimal) -> Decimal {
    size.checked_mul(price)
        .and_then(|v| acc.checked_add(v))
        .unwrap_or(Decimal::MAX)
}

/// Spend `quote_amount` on asks; returns base received.
fn walk_asks(quote_amount: Decimal, asks: &[OrderBookLevel]) -> HopEstimate {
    if quote_amount <= Decimal::ZERO || asks.is_empty() {
        return HopEstimate::ZERO;
    }

    let mut remaining_quote = quote_amount;
    let mut total_base = Decimal::ZERO;

    for level in asks {
        if remaining_quote <= Decimal::ZERO {
            break;
        }
        if level.price <= Decimal::ZERO {
            continue;
        }
        let max_base_at_level = remaining_quote.checked_div(level.price).unwrap_or(Decimal::MAX);
        let filled = max_base_at_level.min(level.size);
        total_base = total_base.saturating_add(filled);
        let spent = filled.checked_mul(level.price).unwrap_or(remaining_quote);
        remaining_quote -= spent.min(remaining_quote);
    }

    if remaining_quote > Decimal::ZERO {
        if let Some(worst) = asks.last().filter(|l| l.price > Decimal::ZERO) {
            let extra = remaining_quote.checked_div(worst.price).unwrap_or(Decimal::MAX);
            total_base = total_base.saturating_add(extra);
        }
    }

    let price = if total_base > Decimal::ZERO {
        quote_amount.checked_div(total_base).unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    HopEstimate {
        output: total_base,
        price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, TradablePair};
    use rust_decimal_macros::dec;

    fn edge(side: TradeSide) -> GraphEdge {
        let pair = TradablePair::new(
            Asset::new("SOL", "Solana", 4),
            Asset::new("USDC", "USD Coin", 2),
        );
        let (from, to) = match side {
            TradeSide::Sell => ("SOL", "USDC"),
            TradeSide::Buy => ("USDC", "SOL"),
        };
        GraphEdge {
            pair,
            from: from.to_string(),
            to: to.to_string(),
            side,
        }
    }

    fn level(price: Decimal, size: Decimal) -> OrderBookLevel {
        OrderBookLevel::new(price, size)
    }

    fn book() -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            "SOL/USDC",
            vec![
                level(dec!(100), dec!(1)),
                level(dec!(99), dec!(2)),
                level(dec!(98), dec!(3)),
                level(dec!(97), dec!(4)),
                level(dec!(96), dec!(5)),
            ],
            vec![
                level(dec!(101), dec!(1)),
                level(dec!(102), dec!(2)),
                level(dec!(103), dec!(3)),
            ],
            0,
        )
    }

    #[test]
    fn test_sell_within_depth_conserves_value() {
        let est = estimate_hop(&edge(TradeSide::Sell), dec!(2.5), &book());
        // 1 @ 100 + 1.5 @ 99
        assert_eq!(est.output, dec!(248.5));
        assert_eq!(est.price, dec!(99.4));
    }

    #[test]
    fn test_sell_beyond_depth_extrapolates_at_worst_bid() {
        // Total bid size is 15, overshoot by 4
        let est = estimate_hop(&edge(TradeSide::Sell), dec!(19), &book());
        let within = dec!(100) + dec!(198) + dec!(294) + dec!(388) + dec!(480);
        assert_eq!(est.output, within + dec!(4) * dec!(96));
        assert!(est.output > Decimal::ZERO);
    }

    #[test]
    fn test_buy_spends_quote_across_levels() {
        // 101 buys 1 at the first level, 204 buys 2 at the second
        let est = estimate_hop(&edge(TradeSide::Buy), dec!(305), &book());
        assert_eq!(est.output, dec!(3));
        assert_eq!(est.price.round_dp(4), dec!(101.6667));
    }

    #[test]
    fn test_buy_beyond_depth_extrapolates_at_worst_ask() {
        // Book absorbs 101 + 204 + 309 = 614 quote for 6 base
        let est = estimate_hop(&edge(TradeSide::Buy), dec!(717), &book());
        assert_eq!(est.output, dec!(7));
    }

    #[test]
    fn test_empty_side_yields_zero() {
        let empty = OrderBookSnapshot::new("SOL/USDC", vec![], vec![], 0);
        assert_eq!(
            estimate_hop(&edge(TradeSide::Sell), dec!(5), &empty),
            HopEstimate::ZERO
        );
        assert_eq!(
            estimate_hop(&edge(TradeSide::Buy), dec!(5), &empty),
            HopEstimate::ZERO
        );
    }

    #[test]
    fn test_zero_input_yields_zero() {
        assert_eq!(
            estimate_hop(&edge(TradeSide::Sell), Decimal::ZERO, &book()),
            HopEstimate::ZERO
        );
    }

    #[test]
    fn test_huge_sell_saturates() {
        let thin = OrderBookSnapshot::new(
            "SOL/USDC",
            vec![level(dec!(97500), dec!(1))],
            vec![level(dec!(97600), dec!(1))],
            0,
        );
        let est = estimate_hop(&edge(TradeSide::Sell), dec!(10000000000000000000000000), &thin);
        assert_eq!(est.output, Decimal::MAX);
        assert!(est.price > Decimal::ZERO);
    }

    #[test]
    fn test_huge_buy_against_tiny_ask_saturates() {
        let dust = OrderBookSnapshot::new(
            "SOL/USDC",
            vec![],
            vec![level(dec!(0.0000000000000000000001), dec!(1))],
            0,
        );
        let est = estimate_hop(&edge(TradeSide::Buy), dec!(10000000000000000000000000), &dust);
        assert_eq!(est.output, Decimal::MAX);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let e = edge(TradeSide::Buy);
        let b = book();
        assert_eq!(
            estimate_hop(&e, dec!(1234.5), &b),
            estimate_hop(&e, dec!(1234.5), &b)
        );
    }
}
