// state/machine.rs
// Route lifecycle as one tagged value. Loading flags and data never live side
// by side, so "discovering with a route already present" cannot be expressed.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Asset, ExecutionOutcome};
use crate::routing::Route;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteState {
    Idle,
    Discovering,
    RouteFound {
        route: Route,
    },
    NoRoute {
        from: Asset,
        to: Asset,
    },
    Error {
        message: String,
    },
    Executing {
        route: Route,
        /// Hop in flight for multi-hop routes
        current_hop: Option<usize>,
    },
    Executed {
        route: Route,
        outcome: ExecutionOutcome,
    },
    ExecutionError {
        route: Route,
        message: String,
    },
}

impl RouteState {
    pub fn name(&self) -> &'static str {
        match self {
            RouteState::Idle => "idle",
            RouteState::Discovering => "discovering",
            RouteState::RouteFound { .. } => "route_found",
            RouteState::NoRoute { .. } => "no_route",
            RouteState::Error { .. } => "error",
            RouteState::Executing { .. } => "executing",
            RouteState::Executed { .. } => "executed",
            RouteState::ExecutionError { .. } => "execution_error",
        }
    }

    /// A discovery or execution is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, RouteState::Discovering | RouteState::Executing { .. })
    }

    /// End of a cycle; only `Reset` leaves these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RouteState::NoRoute { .. }
                | RouteState::Error { .. }
                | RouteState::Executed { .. }
                | RouteState::ExecutionError { .. }
        )
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteState::RouteFound { route }
            | RouteState::Executing { route, .. }
            | RouteState::Executed { route, .. }
            | RouteState::ExecutionError { route, .. } => Some(route),
            RouteState::Idle
            | RouteState::Discovering
            | RouteState::NoRoute { .. }
            | RouteState::Error { .. } => None,
        }
    }
}

/// Inputs gathered by the caller before discovery starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryRequest {
    pub from: Option<Asset>,
    pub to: Option<Asset>,
    pub amount: Decimal,
    pub market_metadata_ready: bool,
}

impl DiscoveryRequest {
    /// First failing check as a user-facing message.
    pub fn validate(&self) -> Result<(), String> {
        let (Some(from), Some(to)) = (&self.from, &self.to) else {
            return Err("Select both tokens".to_string());
        };
        if from.symbol == to.symbol {
            return Err("Source and destination must differ".to_string());
        }
        if self.amount <= Decimal::ZERO {
            return Err("Amount must be greater than zero".to_string());
        }
        if !self.market_metadata_ready {
            return Err("Market metadata not loaded".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    Discover(DiscoveryRequest),
    RouteFound(Route),
    NoRoute { from: Asset, to: Asset },
    Failed(String),
    StartExecution,
    HopProgress(usize),
    Executed(ExecutionOutcome),
    ExecutionFailed(String),
    Reset,
}

impl RouteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RouteEvent::Discover(_) => "discover",
            RouteEvent::RouteFound(_) => "route_found",
            RouteEvent::NoRoute { .. } => "no_route",
            RouteEvent::Failed(_) => "failed",
            RouteEvent::StartExecution => "start_execution",
            RouteEvent::HopProgress(_) => "hop_progress",
            RouteEvent::Executed(_) => "executed",
            RouteEvent::ExecutionFailed(_) => "execution_failed",
            RouteEvent::Reset => "reset",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Event '{event}' is not valid in state '{state}'")]
    Illegal {
        state: &'static str,
        event: &'static str,
    },

    #[error("Hop {hop} out of range for a {hops}-hop route")]
    HopOutOfRange { hop: usize, hops: usize },
}

/// Pure transition function. Reads nothing but `state` and `event`.
pub fn transition(state: &RouteState, event: RouteEvent) -> Result<RouteState, TransitionError> {
    if let RouteEvent::Reset = event {
        return Ok(RouteState::Idle);
    }

    let illegal = |event: &RouteEvent| TransitionError::Illegal {
        state: state.name(),
        event: event.name(),
    };

    match state {
        RouteState::Idle => match event {
            RouteEvent::Discover(request) => Ok(match request.validate() {
                Ok(()) => RouteState::Discovering,
                Err(message) => RouteState::Error { message },
            }),
            other => Err(illegal(&other)),
        },
        RouteState::Discovering => match event {
            RouteEvent::RouteFound(route) if route.hops.is_empty() => Ok(RouteState::Error {
                message: "Route has no hops".to_string(),
            }),
            RouteEvent::RouteFound(route) => Ok(RouteState::RouteFound { route }),
            RouteEvent::NoRoute { from, to } => Ok(RouteState::NoRoute { from, to }),
            RouteEvent::Failed(message) => Ok(RouteState::Error { message }),
            other => Err(illegal(&other)),
        },
        RouteState::RouteFound { route } => match event {
            RouteEvent::StartExecution => Ok(RouteState::Executing {
                route: route.clone(),
                current_hop: route.is_multi_hop().then_some(0),
            }),
            other => Err(illegal(&other)),
        },
        RouteState::Executing { route, .. } => match event {
            RouteEvent::HopProgress(hop) if hop >= route.hop_count() => {
                Err(TransitionError::HopOutOfRange {
                    hop,
                    hops: route.hop_count(),
                })
            }
            RouteEvent::HopProgress(hop) => Ok(RouteState::Executing {
                route: route.clone(),
                current_hop: Some(hop),
            }),
            RouteEvent::Executed(outcome) => Ok(RouteState::Executed {
                route: route.clone(),
                outcome,
            }),
            RouteEvent::ExecutionFailed(message) => Ok(RouteState::ExecutionError {
                route: route.clone(),
                message,
            }),
            other => Err(illegal(&other)),
        },
        RouteState::NoRoute { .. }
        | RouteState::Error { .. }
        | RouteState::Executed { .. }
        | RouteState::ExecutionError { .. } => Err(illegal(&event)),
    }
}

/// Single-writer holder applying events one at a time.
#[derive(Debug, Clone)]
pub struct RouteMachine {
    state: RouteState,
}

impl Default for RouteMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteMachine {
    pub fn new() -> Self {
        Self {
            state: RouteState::Idle,
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    /// Apply `event`; on rejection the current state is kept.
    pub fn dispatch(&mut self, event: RouteEvent) -> Result<&RouteState, TransitionError> {
        let event_name = event.name();
        match transition(&self.state, event) {
            Ok(next) => {
                debug!("route state {} --{}--> {}", self.state.name(), event_name, next.name());
                self.state = next;
                Ok(&self.state)
            }
            Err(e) => {
                warn!("rejected transition: {}", e);
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = RouteState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample;
    use crate::domain::{MultiHopResult, TradeResult};
    use crate::routing::{find_route_at, RouterConfig};
    use rust_decimal_macros::dec;

    fn request(from: &str, to: &str, amount: Decimal) -> DiscoveryRequest {
        DiscoveryRequest {
            from: sample::token(from),
            to: sample::token(to),
            amount,
            market_metadata_ready: true,
        }
    }

    fn route(from: &str, to: &str) -> Route {
        find_route_at(
            &sample::token(from).unwrap(),
            &sample::token(to).unwrap(),
            dec!(100),
            &sample::spot_pairs(),
            &sample::orderbooks(0),
            &RouterConfig::default(),
            0,
        )
        .unwrap()
        .unwrap()
    }

    fn all_states() -> Vec<RouteState> {
        let r = route("SOL", "HYPE");
        vec![
            RouteState::Idle,
            RouteState::Discovering,
            RouteState::RouteFound { route: r.clone() },
            RouteState::NoRoute {
                from: sample::token("SOL").unwrap(),
                to: sample::token("PIP").unwrap(),
            },
            RouteState::Error {
                message: "x".to_string(),
            },
            RouteState::Executing {
                route: r.clone(),
                current_hop: Some(0),
            },
            RouteState::Executed {
                route: r.clone(),
                outcome: ExecutionOutcome::SingleHop {
                    result: TradeResult::Resting { oid: 1 },
                },
            },
            RouteState::ExecutionError {
                route: r,
                message: "x".to_string(),
            },
        ]
    }

    #[test]
    fn test_validated_discover_reaches_discovering() {
        let next = transition(&RouteState::Idle, RouteEvent::Discover(request("SOL", "HYPE", dec!(1))));
        assert_eq!(next, Ok(RouteState::Discovering));
    }

    #[test]
    fn test_invalid_discover_maps_to_error() {
        let cases = vec![
            (
                DiscoveryRequest {
                    from: None,
                    ..request("SOL", "HYPE", dec!(1))
                },
                "Select both tokens",
            ),
            (request("SOL", "SOL", dec!(1)), "Source and destination must differ"),
            (request("SOL", "HYPE", dec!(0)), "Amount must be greater than zero"),
            (request("SOL", "HYPE", dec!(-3)), "Amount must be greater than zero"),
            (
                DiscoveryRequest {
                    market_metadata_ready: false,
                    ..request("SOL", "HYPE", dec!(1))
                },
                "Market metadata not loaded",
            ),
        ];

        for (req, expected) in cases {
            let next = transition(&RouteState::Idle, RouteEvent::Discover(req)).unwrap();
            assert_eq!(
                next,
                RouteState::Error {
                    message: expected.to_string()
                }
            );
        }
    }

    #[test]
    fn test_discover_only_from_idle() {
        for state in all_states().into_iter().skip(1) {
            let res = transition(&state, RouteEvent::Discover(request("SOL", "HYPE", dec!(1))));
            assert!(res.is_err(), "discover accepted in {}", state.name());
        }
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in all_states() {
            assert_eq!(transition(&state, RouteEvent::Reset), Ok(RouteState::Idle));
        }
    }

    #[test]
    fn test_executing_only_from_route_found() {
        for state in all_states() {
            let res = transition(&state, RouteEvent::StartExecution);
            match state {
                RouteState::RouteFound { .. } => {
                    assert!(matches!(res, Ok(RouteState::Executing { .. })))
                }
                _ => assert!(res.is_err()),
            }
        }
    }

    #[test]
    fn test_full_multi_hop_cycle() {
        let r = route("SOL", "HYPE");
        let mut machine = RouteMachine::new();

        machine
            .dispatch(RouteEvent::Discover(request("SOL", "HYPE", dec!(100))))
            .unwrap();
        machine.dispatch(RouteEvent::RouteFound(r.clone())).unwrap();
        let state = machine.dispatch(RouteEvent::StartExecution).unwrap();
        assert_eq!(
            state,
            &RouteState::Executing {
                route: r.clone(),
                current_hop: Some(0)
            }
        );

        machine.dispatch(RouteEvent::HopProgress(1)).unwrap();
        assert!(machine.dispatch(RouteEvent::HopProgress(2)).is_err());
        assert!(matches!(
            machine.state(),
            RouteState::Executing {
                current_hop: Some(1),
                ..
            }
        ));

        let outcome = ExecutionOutcome::MultiHop {
            result: MultiHopResult::completed(Vec::new(), dec!(3.2)),
        };
        machine.dispatch(RouteEvent::Executed(outcome)).unwrap();
        assert!(machine.state().is_terminal());
        assert_eq!(machine.state().route(), Some(&r));

        machine.dispatch(RouteEvent::Reset).unwrap();
        assert_eq!(machine.state(), &RouteState::Idle);
    }

    #[test]
    fn test_single_hop_has_no_current_hop() {
        let r = route("HYPE", "USDC");
        let next = transition(&RouteState::RouteFound { route: r }, RouteEvent::StartExecution);
        assert!(matches!(
            next,
            Ok(RouteState::Executing {
                current_hop: None,
                ..
            })
        ));
    }

    #[test]
    fn test_rejected_event_keeps_state() {
        let mut machine = RouteMachine::new();
        assert!(machine.dispatch(RouteEvent::StartExecution).is_err());
        assert_eq!(machine.state(), &RouteState::Idle);
    }

    #[test]
    fn test_discovery_outcomes() {
        let no_route = transition(
            &RouteState::Discovering,
            RouteEvent::NoRoute {
                from: sample::token("SOL").unwrap(),
                to: sample::token("PIP").unwrap(),
            },
        )
        .unwrap();
        assert_eq!(no_route.name(), "no_route");

        let failed = transition(&RouteState::Discovering, RouteEvent::Failed("boom".to_string()));
        assert_eq!(
            failed,
            Ok(RouteState::Error {
                message: "boom".to_string()
            })
        );
    }
}
