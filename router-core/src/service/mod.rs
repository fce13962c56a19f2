pub mod errors;
pub mod route_service;

pub use errors::ServiceError;
pub use route_service::RouteService;
