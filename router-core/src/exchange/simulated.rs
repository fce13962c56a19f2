// exchange/simulated.rs
// Offline market built from the sample registry, served through the same
// MarketDataProvider seam as the live connector.

use async_trait::async_trait;
use router_common::data::sample;
use router_common::OrderBookLevel;
use std::collections::HashMap;

use super::errors::ExchangeError;
use super::traits::MarketDataProvider;
use super::types::{L2Snapshot, LevelData, SpotMeta, SpotPairMeta, SpotToken};
use super::utils::spot_name;

pub struct SimulatedMarket {
    meta: SpotMeta,
    /// coin -> book
    books: HashMap<String, L2Snapshot>,
}

impl SimulatedMarket {
    /// Sample tokens and pairs; universe entries are named "@<index>" and
    /// aliased tokens keep their exchange names (BTC is listed as UBTC).
    pub fn from_sample(now_ms: i64) -> Self {
        let tokens = sample::tokens();
        let token_index = |symbol: &str| tokens.iter().position(|t| t.symbol == symbol);

        let meta_tokens = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| SpotToken {
                name: spot_name(&t.symbol).to_string(),
                index: i as u32,
                sz_decimals: t.decimals,
                is_canonical: true,
            })
            .collect();

        let sample_books = sample::orderbooks(now_ms);
        let mut universe = Vec::new();
        let mut books = HashMap::new();

        for (i, pair) in sample::spot_pairs().iter().enumerate() {
            let (Some(base), Some(quote)) = (token_index(&pair.base.symbol), token_index(&pair.quote.symbol))
            else {
                continue;
            };
            let coin = format!("@{}", i);
            universe.push(SpotPairMeta {
                tokens: [base as u32, quote as u32],
                name: coin.clone(),
                index: i as u32,
                is_canonical: true,
            });
            if let Some(book) = sample_books.get(&pair.id) {
                books.insert(
                    coin.clone(),
                    L2Snapshot {
                        coin,
                        time: book.timestamp,
                        levels: vec![to_levels(&book.bids), to_levels(&book.asks)],
                    },
                );
            }
        }

        Self {
            meta: SpotMeta {
                tokens: meta_tokens,
                universe,
            },
            books,
        }
    }

    pub fn remove_book(&mut self, coin: &str) -> Option<L2Snapshot> {
        self.books.remove(coin)
    }
}

fn to_levels(levels: &[OrderBookLevel]) -> Vec<LevelData> {
    levels
        .iter()
        .map(|l| LevelData {
            px: l.price.to_string(),
            sz: l.size.to_string(),
            n: 1,
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for SimulatedMarket {
    async fn fetch_spot_meta(&self) -> Result<SpotMeta, ExchangeError> {
        Ok(self.meta.clone())
    }

    async fn fetch_l2_book(&self, coin: &str) -> Result<L2Snapshot, ExchangeError> {
        self.books
            .get(coin)
            .cloned()
            .ok_or_else(|| ExchangeError::ApiError(format!("No book for {}", coin)))
    }
}
