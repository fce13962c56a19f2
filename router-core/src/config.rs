// config.rs
// Settings: defaults < router.toml < ROUTER_* environment.
// The agent key is only ever read from AGENT_PRIVATE_KEY.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use router_common::RouterConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

pub const MAINNET_API: &str = "https://api.hyperliquid.xyz";
pub const TESTNET_API: &str = "https://api.hyperliquid-testnet.xyz";

/// Environment variable holding the delegated agent key
pub const AGENT_KEY_ENV: &str = "AGENT_PRIVATE_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn is_mainnet(self) -> bool {
        matches!(self, Network::Mainnet)
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_API,
            Network::Testnet => TESTNET_API,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub network: Network,
    /// Overrides the network's default endpoint
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.network.base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutionConfig {
    /// IOC price allowance around mid (0.01 = 1%)
    pub slippage: Decimal,
    pub price_sig_figs: u32,
    /// Minimum notional in quote units
    pub min_order_value: Decimal,
    /// Pause between hops of a multi-hop run
    pub hop_delay_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            slippage: Decimal::new(1, 2),
            price_sig_figs: 5,
            min_order_value: Decimal::TEN,
            hop_delay_ms: 500,
        }
    }
}

impl ExecutionConfig {
    pub fn hop_delay(&self) -> Duration {
        Duration::from_millis(self.hop_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub routing: RouterConfig,
    pub execution: ExecutionConfig,
    #[serde(skip)]
    pub agent_private_key: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let s = Self::defaults()?
            .add_source(File::with_name("router").required(false))
            .add_source(
                Environment::with_prefix("ROUTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.agent_private_key = std::env::var(AGENT_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.network", "mainnet")?
            .set_default("api.timeout_secs", 30)?
            .set_default("routing.max_hops", 3)?
            .set_default("routing.stale_threshold_ms", 30_000)?
            .set_default("routing.low_liquidity_ratio", 0.5)?
            .set_default("execution.slippage", 0.01)?
            .set_default("execution.price_sig_figs", 5)?
            .set_default("execution.min_order_value", 10.0)?
            .set_default("execution.hop_delay_ms", 500)
    }

    pub fn is_mainnet(&self) -> bool {
        self.api.network.is_mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use rust_decimal_macros::dec;

    fn from_toml(toml: &str) -> Settings {
        Settings::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let s = from_toml("");
        assert_eq!(s.api.network, Network::Mainnet);
        assert_eq!(s.api.endpoint(), MAINNET_API);
        assert_eq!(s.api.timeout(), Duration::from_secs(30));
        assert_eq!(s.routing.max_hops, 3);
        assert_eq!(s.routing.stale_threshold_ms, 30_000);
        assert_eq!(s.routing.low_liquidity_ratio, dec!(0.5));
        assert_eq!(s.execution.slippage, dec!(0.01));
        assert_eq!(s.execution.price_sig_figs, 5);
        assert_eq!(s.execution.min_order_value, dec!(10));
        assert_eq!(s.execution.hop_delay(), Duration::from_millis(500));
        assert!(s.agent_private_key.is_none());
    }

    #[test]
    fn test_file_overrides() {
        let s = from_toml(
            r#"
            [api]
            network = "testnet"

            [routing]
            stale_threshold_ms = 10000

            [execution]
            hop_delay_ms = 0
            "#,
        );
        assert!(!s.is_mainnet());
        assert_eq!(s.api.endpoint(), TESTNET_API);
        assert_eq!(s.routing.stale_threshold_ms, 10_000);
        assert_eq!(s.routing.max_hops, 3);
        assert_eq!(s.execution.hop_delay_ms, 0);
    }

    #[test]
    fn test_base_url_override() {
        let s = from_toml("[api]\nbase_url = \"http://localhost:3001\"");
        assert_eq!(s.api.endpoint(), "http://localhost:3001");
    }
}
