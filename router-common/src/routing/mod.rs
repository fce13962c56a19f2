pub mod config;
pub mod errors;
pub mod estimator;
pub mod graph;
pub mod pathfinder;
pub mod route;

pub use config::RouterConfig;
pub use errors::RouteError;
pub use estimator::{estimate_hop, HopEstimate};
pub use graph::{GraphEdge, TokenGraph};
pub use pathfinder::find_path;
pub use route::{
    assemble_route, find_route, find_route_at, generate_warnings, Route, RouteHop, RouteWarning,
    Severity, WarningKind,
};
