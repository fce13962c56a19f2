// domain/types.rs
// Spot market structure used by graph building, estimation and routing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tradable asset. Looked up by symbol, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Unique symbol used as identifier (e.g. "HYPE", "USDC")
    pub symbol: String,
    pub name: String,
    /// Decimal precision for display and calculation
    pub decimals: u32,
}

impl Asset {
    pub fn new(symbol: &str, name: &str, decimals: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
        }
    }
}

/// A spot pair. The base is bought or sold, the quote denominates the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradablePair {
    /// "BASE/QUOTE"
    pub id: String,
    pub base: Asset,
    pub quote: Asset,
}

impl TradablePair {
    pub fn new(base: Asset, quote: Asset) -> Self {
        Self {
            id: format!("{}/{}", base.symbol, quote.symbol),
            base,
            quote,
        }
    }

    /// Side needed to move from `from` to `to` through this pair, if the pair connects them.
    pub fn side_for(&self, from: &str, to: &str) -> Option<TradeSide> {
        if self.base.symbol == from && self.quote.symbol == to {
            Some(TradeSide::Sell)
        } else if self.quote.symbol == from && self.base.symbol == to {
            Some(TradeSide::Buy)
        } else {
            None
        }
    }

    /// Asset spent when trading this pair on `side`.
    pub fn input_asset(&self, side: TradeSide) -> &Asset {
        match side {
            TradeSide::Sell => &self.base,
            TradeSide::Buy => &self.quote,
        }
    }

    /// Asset received when trading this pair on `side`.
    pub fn output_asset(&self, side: TradeSide) -> &Asset {
        match side {
            TradeSide::Sell => &self.quote,
            TradeSide::Buy => &self.base,
        }
    }
}

/// Direction of a trade through a pair.
///
/// `Sell` disposes of the base asset (hits bids), `Buy` acquires it by
/// spending quote (hits asks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn is_buy(self) -> bool {
        matches!(self, TradeSide::Buy)
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl OrderBookLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Point-in-time L2 book for one pair.
///
/// Bids are kept in descending price order, asks ascending. Depth varies per
/// book; nothing here assumes a fixed number of levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub pair_id: String,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
    /// Capture time in ms since epoch
    pub timestamp: i64,
}

impl OrderBookSnapshot {
    pub fn new(
        pair_id: &str,
        mut bids: Vec<OrderBookLevel>,
        mut asks: Vec<OrderBookLevel>,
        timestamp: i64,
    ) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            pair_id: pair_id.to_string(),
            bids,
            asks,
            timestamp,
        }
    }

    /// Levels consumed by a trade on `side`: bids for a sell, asks for a buy.
    pub fn levels_for(&self, side: TradeSide) -> &[OrderBookLevel] {
        match side {
            TradeSide::Sell => &self.bids,
            TradeSide::Buy => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Mid price, only when both sides are populated.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usdc() -> Asset {
        Asset::new("USDC", "USD Coin", 2)
    }

    fn hype() -> Asset {
        Asset::new("HYPE", "Hyperliquid", 4)
    }

    #[test]
    fn test_pair_side_resolution() {
        let pair = TradablePair::new(hype(), usdc());
        assert_eq!(pair.id, "HYPE/USDC");
        assert_eq!(pair.side_for("HYPE", "USDC"), Some(TradeSide::Sell));
        assert_eq!(pair.side_for("USDC", "HYPE"), Some(TradeSide::Buy));
        assert_eq!(pair.side_for("USDC", "PURR"), None);
        assert_eq!(pair.output_asset(TradeSide::Buy).symbol, "HYPE");
        assert_eq!(pair.input_asset(TradeSide::Buy).symbol, "USDC");
    }

    #[test]
    fn test_snapshot_sorts_levels() {
        let book = OrderBookSnapshot::new(
            "HYPE/USDC",
            vec![
                OrderBookLevel::new(dec!(24.40), dec!(1)),
                OrderBookLevel::new(dec!(24.49), dec!(2)),
            ],
            vec![
                OrderBookLevel::new(dec!(24.60), dec!(1)),
                OrderBookLevel::new(dec!(24.51), dec!(2)),
            ],
            0,
        );

        assert_eq!(book.best_bid(), Some(dec!(24.49)));
        assert_eq!(book.best_ask(), Some(dec!(24.51)));
        assert_eq!(book.mid_price(), Some(dec!(24.50)));
        assert_eq!(book.levels_for(TradeSide::Buy)[0].price, dec!(24.51));
    }

    #[test]
    fn test_mid_price_requires_both_sides() {
        let book = OrderBookSnapshot::new(
            "HYPE/USDC",
            vec![OrderBookLevel::new(dec!(24.49), dec!(2))],
            vec![],
            0,
        );
        assert_eq!(book.mid_price(), None);
    }
}
