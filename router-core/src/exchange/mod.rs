// exchange/mod.rs

pub mod connector;
pub mod errors;
pub mod market_data;
pub mod signing;
pub mod simulated;
pub mod traits;
pub mod types;
pub mod utils;
pub mod wallet;

pub use connector::HyperliquidConnector;
pub use errors::ExchangeError;
pub use market_data::{fetch_snapshots, to_snapshot, ResolvedPair};
pub use signing::{sign_approve_agent, sign_l1_action, ApproveAgentAction};
pub use simulated::SimulatedMarket;
pub use traits::{MarketDataProvider, OrderGateway};
pub use types::*;
pub use wallet::Wallet;
