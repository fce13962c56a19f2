// ====
// Hyperliquid API Connector
// ====
// REST client for the /info and /exchange endpoints
// Signing happens before requests reach this layer
// ====

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use super::errors::ExchangeError;
use super::traits::{MarketDataProvider, OrderGateway};
use super::types::{
    Action, CancelStatus, ExchangeRequest, ExchangeResponse, L2Snapshot, OrderStatus, SpotMeta,
};
use super::utils::validate_symbol;
use crate::config::ApiConfig;

/// Hyperliquid Connector
///
/// Stateless apart from the HTTP client; safe to share behind an `Arc`.
pub struct HyperliquidConnector {
    /// HTTP client
    client: Client,
    /// API base URL
    base_url: String,
    is_mainnet: bool,
}

impl HyperliquidConnector {
    pub fn new(api: &ApiConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(api.timeout()).build()?;

        Ok(Self {
            client,
            base_url: api.endpoint().trim_end_matches('/').to_string(),
            is_mainnet: api.network.is_mainnet(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ====================================================================
    // INTERNAL
    // ====================================================================

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ExchangeError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!("POST {} failed: {}", url, e);
            ExchangeError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ExchangeError::ApiError(format!("HTTP {}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            ExchangeError::ParseError(format!("Unexpected response from {}: {} ({})", path, e, text))
        })
    }
}

#[async_trait]
impl MarketDataProvider for HyperliquidConnector {
    async fn fetch_spot_meta(&self) -> Result<SpotMeta, ExchangeError> {
        let meta: SpotMeta = self.post("info", &json!({ "type": "spotMeta" })).await?;
        debug!(
            tokens = meta.tokens.len(),
            pairs = meta.universe.len(),
            "Fetched spot metadata"
        );
        Ok(meta)
    }

    async fn fetch_l2_book(&self, coin: &str) -> Result<L2Snapshot, ExchangeError> {
        // "@107" style names are not symbols; only plain names are checked
        if !coin.starts_with('@') && !coin.contains('/') {
            validate_symbol(coin)?;
        }
        self.post("info", &json!({ "type": "l2Book", "coin": coin }))
            .await
    }
}

#[async_trait]
impl OrderGateway for HyperliquidConnector {
    async fn submit_order(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<OrderStatus>, ExchangeError> {
        self.post("exchange", &request).await
    }

    async fn submit_cancel(
        &self,
        request: ExchangeRequest<Action>,
    ) -> Result<ExchangeResponse<CancelStatus>, ExchangeError> {
        self.post("exchange", &request).await
    }

    fn is_mainnet(&self) -> bool {
        self.is_mainnet
    }
}
