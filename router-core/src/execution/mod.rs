// execution/mod.rs

pub mod multi_hop;
pub mod trade;

pub use multi_hop::{realized_output, MultiHopExecutor, CANCELLED_MESSAGE};
pub use trade::{build_order, cancel_order, OrderKind, TradeExecutor};
