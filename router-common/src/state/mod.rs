pub mod machine;

pub use machine::{
    transition, DiscoveryRequest, RouteEvent, RouteMachine, RouteState, TransitionError,
};
