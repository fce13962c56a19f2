// exchange/traits.rs
// Seams between the routing engine and the exchange. The HTTP connector
// implements both; tests plug in in-memory doubles.

use async_trait::async_trait;

use crate::exchange::errors::ExchangeError;
use crate::exchange::types::{
    Action, CancelStatus, ExchangeRequest, ExchangeResponse, L2Snapshot, OrderStatus, SpotMeta,
};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Spot token list and pair universe
    async fn fetch_spot_meta(&self) -> Result<SpotMeta, ExchangeError>;

    /// Current L2 book for a spot coin ("PURR/USDC" or "@107")
    async fn fetch_l2_book(&self, coin: &str) -> Result<L2Snapshot, ExchangeError>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a signed order action
    async fn submit_order(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<OrderStatus>, ExchangeError>;

    /// Submit a signed cancel action
    async fn submit_cancel(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<CancelStatus>, ExchangeError>;

    /// Whether signatures must carry the mainnet source
    fn is_mainnet(&self) -> bool;
}
