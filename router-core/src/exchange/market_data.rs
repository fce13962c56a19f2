// exchange/market_data.rs
// Spot metadata -> tradable pairs, L2 books -> order book snapshots.

use futures_util::future::join_all;
use router_common::{Asset, OrderBookLevel, OrderBookSnapshot, TradablePair, TradeSide};
use std::collections::HashMap;
use tracing::{debug, error};

use super::errors::ExchangeError;
use super::traits::MarketDataProvider;
use super::types::{L2Snapshot, LevelData, SpotMeta, SpotToken, SPOT_ASSET_OFFSET};
use super::utils::{display_name, parse_price, parse_size, spot_name};

/// Concrete spot pair and side for one hop from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    /// 10000 + universe index
    pub asset_id: u32,
    pub side: TradeSide,
    /// Pair name as listed in the universe, used as the L2 book coin
    pub coin: String,
    /// Size precision of the base token
    pub sz_decimals: u32,
}

impl SpotMeta {
    pub fn token(&self, index: u32) -> Option<&SpotToken> {
        self.tokens.iter().find(|t| t.index == index)
    }

    fn token_display(&self, index: u32) -> String {
        match self.token(index) {
            Some(token) => display_name(&token.name).to_string(),
            None => format!("@{}", index),
        }
    }

    /// Universe as routing pairs, with display symbols (UBTC -> BTC).
    pub fn tradable_pairs(&self) -> Vec<TradablePair> {
        self.universe
            .iter()
            .map(|pair| {
                let [base_idx, quote_idx] = pair.tokens;
                let base = self.token_display(base_idx);
                let quote = self.token_display(quote_idx);
                let decimals = |idx: u32| self.token(idx).map(|t| t.sz_decimals).unwrap_or(0);
                TradablePair::new(
                    Asset::new(&base, &base, decimals(base_idx)),
                    Asset::new(&quote, &quote, decimals(quote_idx)),
                )
            })
            .collect()
    }

    /// Display symbols of every listed token
    pub fn assets(&self) -> Vec<Asset> {
        self.tokens
            .iter()
            .map(|t| {
                let symbol = display_name(&t.name);
                Asset::new(symbol, symbol, t.sz_decimals)
            })
            .collect()
    }

    pub fn asset(&self, symbol: &str) -> Option<Asset> {
        self.assets().into_iter().find(|a| a.symbol == symbol)
    }

    /// Pair A/B resolves to a sell of A, pair B/A to a buy of B.
    pub fn resolve_pair(&self, from_symbol: &str, to_symbol: &str) -> Option<ResolvedPair> {
        let from_spot = spot_name(from_symbol);
        let to_spot = spot_name(to_symbol);

        self.universe.iter().find_map(|pair| {
            let base = self.token(pair.tokens[0])?;
            let quote = self.token(pair.tokens[1])?;

            let side = if base.name == from_spot && quote.name == to_spot {
                TradeSide::Sell
            } else if base.name == to_spot && quote.name == from_spot {
                TradeSide::Buy
            } else {
                return None;
            };

            Some(ResolvedPair {
                asset_id: SPOT_ASSET_OFFSET + pair.index,
                side,
                coin: pair.name.clone(),
                sz_decimals: base.sz_decimals,
            })
        })
    }
}

fn parse_levels(levels: Option<&Vec<LevelData>>) -> Result<Vec<OrderBookLevel>, ExchangeError> {
    levels
        .map(|side| {
            side.iter()
                .map(|l| Ok(OrderBookLevel::new(parse_price(&l.px)?, parse_size(&l.sz)?)))
                .collect::<Result<Vec<_>, ExchangeError>>()
        })
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Convert an L2 book into a snapshot keyed by the routing pair id.
pub fn to_snapshot(pair_id: &str, book: &L2Snapshot) -> Result<OrderBookSnapshot, ExchangeError> {
    let bids = parse_levels(book.levels.first())?;
    let asks = parse_levels(book.levels.get(1))?;
    Ok(OrderBookSnapshot::new(pair_id, bids, asks, book.time))
}

/// Fetch snapshots for `pairs` concurrently, keyed by pair id.
///
/// Pairs that are not listed in `meta` are left out; the route assembler
/// treats a missing book as "no route". Transport failures are returned.
pub async fn fetch_snapshots(
    provider: &dyn MarketDataProvider,
    meta: &SpotMeta,
    pairs: &[TradablePair],
) -> Result<HashMap<String, OrderBookSnapshot>, ExchangeError> {
    let requests: Vec<(String, String)> = pairs
        .iter()
        .filter_map(|pair| {
            let resolved = meta.resolve_pair(&pair.base.symbol, &pair.quote.symbol);
            if resolved.is_none() {
                debug!("Pair {} not listed, skipping book fetch", pair.id);
            }
            resolved.map(|r| (pair.id.clone(), r.coin))
        })
        .collect();

    let fetches = requests.iter().map(|(_, coin)| provider.fetch_l2_book(coin));
    let results = join_all(fetches).await;

    let mut books = HashMap::with_capacity(requests.len());
    for ((pair_id, coin), result) in requests.iter().zip(results) {
        match result {
            Ok(book) => {
                books.insert(pair_id.clone(), to_snapshot(pair_id, &book)?);
            }
            Err(e) => {
                error!("L2 book fetch for {} ({}) failed: {}", pair_id, coin, e);
                return Err(e);
            }
        }
    }

    Ok(books)
}
