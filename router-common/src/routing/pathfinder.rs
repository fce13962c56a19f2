// routing/pathfinder.rs

use std::collections::{HashSet, VecDeque};

use super::graph::{GraphEdge, TokenGraph};

/// Breadth-first search for the path with the fewest hops.
///
/// Returns `Some(vec![])` when `from == to`; callers reject zero-hop routes
/// before they get here. Nodes are marked visited on discovery, so the first
/// path reaching a node is a shortest one. Among equal-length paths the one
/// using earlier-inserted edges wins.
pub fn find_path(
    graph: &TokenGraph,
    from: &str,
    to: &str,
    max_hops: usize,
) -> Option<Vec<GraphEdge>> {
    if from == to {
        return Some(Vec::new());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(from);

    let mut queue: VecDeque<(&str, Vec<&GraphEdge>)> = VecDeque::new();
    queue.push_back((from, Vec::new()));

    while let Some((node, path)) = queue.pop_front() {
        if path.len() >= max_hops {
            continue;
        }

        for edge in graph.edges_from(node) {
            if visited.contains(edge.to.as_str()) {
                continue;
            }

            let mut next = path.clone();
            next.push(edge);

            if edge.to == to {
                return Some(next.into_iter().cloned().collect());
            }

            visited.insert(edge.to.as_str());
            queue.push_back((edge.to.as_str(), next));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample;
    use crate::domain::{Asset, TradablePair, TradeSide};

    fn asset(symbol: &str) -> Asset {
        Asset::new(symbol, symbol, 4)
    }

    fn pair(base: &str, quote: &str) -> TradablePair {
        TradablePair::new(asset(base), asset(quote))
    }

    #[test]
    fn test_two_hop_route_through_usdc() {
        let graph = TokenGraph::build(&[pair("SOL", "USDC"), pair("HYPE", "USDC")]);
        let path = find_path(&graph, "SOL", "HYPE", 3).unwrap();

        assert_eq!(path.len(), 2);
        assert_eq!(path[0].pair.id, "SOL/USDC");
        assert_eq!(path[0].side, TradeSide::Sell);
        assert_eq!(path[1].pair.id, "HYPE/USDC");
        assert_eq!(path[1].side, TradeSide::Buy);
        assert!(path.iter().all(|e| e.pair.id != "SOL/HYPE"));
    }

    #[test]
    fn test_direct_pair_is_preferred() {
        let graph = TokenGraph::build(&sample::spot_pairs());
        let path = find_path(&graph, "PURR", "HYPE", 3).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].pair.id, "PURR/HYPE");
    }

    #[test]
    fn test_same_asset_is_empty_path() {
        let graph = TokenGraph::build(&sample::spot_pairs());
        assert_eq!(find_path(&graph, "HYPE", "HYPE", 3), Some(Vec::new()));
    }

    #[test]
    fn test_disconnected_assets() {
        let graph = TokenGraph::build(&[pair("SOL", "USDC"), pair("PIP", "HYPE")]);
        assert!(find_path(&graph, "SOL", "PIP", 3).is_none());
        assert!(find_path(&graph, "SOL", "UNKNOWN", 3).is_none());
    }

    #[test]
    fn test_hop_bound_is_respected() {
        // A - B - C - D - E chain: A->E needs 4 hops
        let graph = TokenGraph::build(&[
            pair("A", "B"),
            pair("B", "C"),
            pair("C", "D"),
            pair("D", "E"),
        ]);

        assert!(find_path(&graph, "A", "E", 3).is_none());
        assert_eq!(find_path(&graph, "A", "D", 3).unwrap().len(), 3);
        assert_eq!(find_path(&graph, "A", "E", 4).unwrap().len(), 4);
        assert!(find_path(&graph, "A", "B", 0).is_none());
    }

    #[test]
    fn test_three_hop_route_in_sample_market() {
        let graph = TokenGraph::build(&sample::spot_pairs());
        let path = find_path(&graph, "PIP", "SOL", 3).unwrap();
        let ids: Vec<&str> = path.iter().map(|e| e.pair.id.as_str()).collect();
        assert_eq!(ids, vec!["PIP/HYPE", "HYPE/USDC", "SOL/USDC"]);
    }

    #[test]
    fn test_tie_break_follows_pair_order() {
        // Two 2-hop routes A->X->D and A->Y->D; whichever pair comes first wins
        let first = TokenGraph::build(&[
            pair("A", "X"),
            pair("A", "Y"),
            pair("D", "X"),
            pair("D", "Y"),
        ]);
        let path = find_path(&first, "A", "D", 3).unwrap();
        assert_eq!(path[0].to, "X");

        let swapped = TokenGraph::build(&[
            pair("A", "Y"),
            pair("A", "X"),
            pair("D", "X"),
            pair("D", "Y"),
        ]);
        let path = find_path(&swapped, "A", "D", 3).unwrap();
        assert_eq!(path[0].to, "Y");
    }

    #[test]
    fn test_search_is_deterministic() {
        let graph = TokenGraph::build(&sample::spot_pairs());
        let a = find_path(&graph, "PIP", "BTC", 3);
        let b = find_path(&graph, "PIP", "BTC", 3);
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
