pub mod execution;
pub mod types;

pub use execution::{
    CancelResult, ExecutionOutcome, HopResult, MultiHopResult, MultiHopStatus, TradeResult,
};
pub use types::{Asset, OrderBookLevel, OrderBookSnapshot, TradablePair, TradeSide};
