// domain/execution.rs
// Outcome types produced by order execution and consumed by the route state machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of one submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TradeResult {
    Filled {
        oid: u64,
        total_sz: Decimal,
        avg_px: Decimal,
    },
    /// Order rests on the book. Never expected for immediate-or-cancel orders.
    Resting { oid: u64 },
    Error { message: String },
}

impl TradeResult {
    pub fn error(message: impl Into<String>) -> Self {
        TradeResult::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TradeResult::Error { .. })
    }

    pub fn oid(&self) -> Option<u64> {
        match self {
            TradeResult::Filled { oid, .. } | TradeResult::Resting { oid } => Some(*oid),
            TradeResult::Error { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CancelResult {
    Success,
    Error { message: String },
}

/// One executed (or attempted) hop of a multi-hop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopResult {
    pub hop_index: usize,
    pub from_symbol: String,
    pub to_symbol: String,
    /// Amount handed to this hop
    pub input_amount: Decimal,
    pub result: TradeResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiHopStatus {
    Completed,
    Partial,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiHopResult {
    pub status: MultiHopStatus,
    pub completed_hops: Vec<HopResult>,
    pub failed_hop: Option<HopResult>,
    pub final_output: Option<Decimal>,
    pub error: Option<String>,
}

impl MultiHopResult {
    pub fn completed(completed_hops: Vec<HopResult>, final_output: Decimal) -> Self {
        Self {
            status: MultiHopStatus::Completed,
            completed_hops,
            failed_hop: None,
            final_output: Some(final_output),
            error: None,
        }
    }

    /// Halted run: `partial` when at least one hop went through, `error` otherwise.
    pub fn halted(
        completed_hops: Vec<HopResult>,
        failed_hop: Option<HopResult>,
        error: impl Into<String>,
    ) -> Self {
        let status = if completed_hops.is_empty() {
            MultiHopStatus::Error
        } else {
            MultiHopStatus::Partial
        };
        Self {
            status,
            completed_hops,
            failed_hop,
            final_output: None,
            error: Some(error.into()),
        }
    }
}

/// Final outcome attached to the `executed` state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    SingleHop { result: TradeResult },
    MultiHop { result: MultiHopResult },
}
