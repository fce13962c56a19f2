// router-common/src/lib.rs
// Spot routing - pure domain: graph, path search, estimation, route lifecycle

pub mod data;
pub mod domain;
pub mod routing;
pub mod state;

pub use domain::*;
pub use routing::{Route, RouteHop, RouteWarning, RouterConfig, Severity, WarningKind};
pub use state::{DiscoveryRequest, RouteEvent, RouteMachine, RouteState, TransitionError};
