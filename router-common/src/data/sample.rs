// data/sample.rs
// Sample spot market: token registry, pair list and synthetic order books.
// Spreads and depths vary on purpose so that routing and warnings have
// something to chew on.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::{Asset, OrderBookLevel, OrderBookSnapshot, TradablePair};

const TOKENS: &[(&str, &str, u32)] = &[
    ("USDC", "USD Coin", 2),
    ("HYPE", "Hyperliquid", 4),
    ("PURR", "Purr", 4),
    ("BTC", "Bitcoin", 8),
    ("ETH", "Ethereum", 6),
    ("SOL", "Solana", 4),
    ("DOGE", "Dogecoin", 2),
    ("JEFF", "Jeff", 4),
    ("PIP", "Pip", 4),
    ("ANIME", "Anime", 4),
];

/// Not every combination has a direct pair. PIP only trades against HYPE,
/// so PIP -> USDC needs two hops.
const PAIRS: &[(&str, &str)] = &[
    ("HYPE", "USDC"),
    ("PURR", "USDC"),
    ("BTC", "USDC"),
    ("ETH", "USDC"),
    ("SOL", "USDC"),
    ("DOGE", "USDC"),
    ("JEFF", "USDC"),
    ("ANIME", "USDC"),
    ("PURR", "HYPE"),
    ("PIP", "HYPE"),
];

/// (pair, mid, spread bps, depth, age ms)
const BOOKS: &[(&str, &str, u32, &str, i64)] = &[
    ("HYPE/USDC", "24.5", 10, "5000", 0),
    ("BTC/USDC", "97500", 5, "2.5", 0),
    ("ETH/USDC", "3450", 8, "40", 0),
    ("SOL/USDC", "185", 12, "300", 0),
    ("PURR/USDC", "0.85", 30, "50000", 0),
    ("DOGE/USDC", "0.32", 25, "100000", 0),
    ("ANIME/USDC", "0.045", 40, "500000", 0),
    ("JEFF/USDC", "0.012", 60, "1000000", 0),
    ("PURR/HYPE", "0.035", 50, "30000", 0),
    ("PIP/HYPE", "0.0008", 80, "500000", 45_000),
];

const BOOK_DEPTH_LEVELS: u32 = 5;

pub fn tokens() -> Vec<Asset> {
    TOKENS
        .iter()
        .map(|(symbol, name, decimals)| Asset::new(symbol, name, *decimals))
        .collect()
}

pub fn token(symbol: &str) -> Option<Asset> {
    TOKENS
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(symbol, name, decimals)| Asset::new(symbol, name, *decimals))
}

pub fn spot_pairs() -> Vec<TradablePair> {
    PAIRS
        .iter()
        .filter_map(|(base, quote)| Some(TradablePair::new(token(base)?, token(quote)?)))
        .collect()
}

/// Synthetic books keyed by pair id, stamped relative to `now_ms`.
pub fn orderbooks(now_ms: i64) -> HashMap<String, OrderBookSnapshot> {
    BOOKS
        .iter()
        .filter_map(|(pair_id, mid, spread_bps, depth, age_ms)| {
            let mid = mid.parse::<Decimal>().ok()?;
            let depth = depth.parse::<Decimal>().ok()?;
            let book = make_orderbook(pair_id, mid, *spread_bps, depth, now_ms - age_ms);
            Some((pair_id.to_string(), book))
        })
        .collect()
}

/// Five levels per side around `mid`, thinning out away from the touch.
pub fn make_orderbook(
    pair_id: &str,
    mid: Decimal,
    spread_bps: u32,
    depth: Decimal,
    timestamp: i64,
) -> OrderBookSnapshot {
    let half_spread = mid * Decimal::from(spread_bps) / Decimal::from(20_000);
    let best_bid = mid - half_spread;
    let best_ask = mid + half_spread;
    let step = half_spread / Decimal::TWO;
    let thinning = Decimal::new(15, 2);

    let mut bids = Vec::with_capacity(BOOK_DEPTH_LEVELS as usize);
    let mut asks = Vec::with_capacity(BOOK_DEPTH_LEVELS as usize);
    for i in 0..BOOK_DEPTH_LEVELS {
        let i = Decimal::from(i);
        let size = (depth * (Decimal::ONE - i * thinning)).round_dp(4);
        bids.push(OrderBookLevel::new((best_bid - i * step).round_dp(6), size));
        asks.push(OrderBookLevel::new((best_ask + i * step).round_dp(6), size));
    }

    OrderBookSnapshot::new(pair_id, bids, asks, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_every_pair_has_a_book() {
        let books = orderbooks(0);
        for pair in spot_pairs() {
            assert!(books.contains_key(&pair.id), "missing book for {}", pair.id);
        }
        assert_eq!(spot_pairs().len(), PAIRS.len());
    }

    #[test]
    fn test_book_shape() {
        let book = make_orderbook("HYPE/USDC", dec!(24.5), 10, dec!(5000), 42);
        assert_eq!(book.bids.len(), 5);
        assert_eq!(book.asks.len(), 5);
        assert_eq!(book.best_bid(), Some(dec!(24.48775)));
        assert_eq!(book.best_ask(), Some(dec!(24.51225)));
        assert_eq!(book.bids[4].size, dec!(2000));
        assert!(book.bids.windows(2).all(|w| w[0].price > w[1].price));
        assert!(book.asks.windows(2).all(|w| w[0].price < w[1].price));
        assert_eq!(book.timestamp, 42);
    }

    #[test]
    fn test_pip_book_is_stale() {
        let books = orderbooks(100_000);
        assert_eq!(books["PIP/HYPE"].timestamp, 55_000);
        assert_eq!(books["HYPE/USDC"].timestamp, 100_000);
    }
}
