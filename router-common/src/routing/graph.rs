// routing/graph.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{TradablePair, TradeSide};

/// One direction of a tradable pair.
///
/// Every pair yields exactly two edges: base->quote (sell) and quote->base (buy).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub pair: TradablePair,
    pub from: String,
    pub to: String,
    pub side: TradeSide,
}

/// Adjacency list of the spot market, keyed by asset symbol.
///
/// Built fresh for every discovery from the current pair list. Most asset
/// combinations have no edge; that is the normal case.
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    adjacency: HashMap<String, Vec<GraphEdge>>,
}

impl TokenGraph {
    pub fn build(pairs: &[TradablePair]) -> Self {
        let mut graph = Self::default();
        for pair in pairs {
            graph.add_edge(&pair.base.symbol, &pair.quote.symbol, pair, TradeSide::Sell);
            graph.add_edge(&pair.quote.symbol, &pair.base.symbol, pair, TradeSide::Buy);
        }
        graph
    }

    fn add_edge(&mut self, from: &str, to: &str, pair: &TradablePair, side: TradeSide) {
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(GraphEdge {
                pair: pair.clone(),
                from: from.to_string(),
                to: to.to_string(),
                side,
            });
    }

    /// Outgoing edges in insertion order. Unknown symbols have none.
    pub fn edges_from(&self, symbol: &str) -> &[GraphEdge] {
        self.adjacency
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.adjacency.contains_key(symbol)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}
