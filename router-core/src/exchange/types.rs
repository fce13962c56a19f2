// exchange/types.rs
// Wire types for the info and exchange endpoints.

use serde::{Deserialize, Serialize, Serializer};

/// Base offset added to a spot universe index to form the order asset id.
pub const SPOT_ASSET_OFFSET: u32 = 10_000;

// ====================================================================
// INFO: SPOT METADATA
// ====================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotMeta {
    pub tokens: Vec<SpotToken>,
    pub universe: Vec<SpotPairMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotToken {
    pub name: String,
    pub index: u32,
    #[serde(rename = "szDecimals")]
    pub sz_decimals: u32,
    #[serde(rename = "isCanonical", default)]
    pub is_canonical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotPairMeta {
    /// [base token index, quote token index]
    pub tokens: [u32; 2],
    pub name: String,
    pub index: u32,
    #[serde(rename = "isCanonical", default)]
    pub is_canonical: bool,
}

// ====================================================================
// INFO: L2 BOOK
// ====================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Snapshot {
    pub coin: String,
    #[serde(default)]
    pub time: i64,
    pub levels: Vec<Vec<LevelData>>, // [bids, asks]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub px: String,
    pub sz: String,
    pub n: u32,
}

// ====================================================================
// L1 ACTIONS
// ====================================================================

/// Actions signed with the agent key. Field order is part of the hash:
/// the msgpack encoding follows declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Order(BulkOrder),
    Cancel(BulkCancel),
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkOrder {
    pub orders: Vec<OrderWire>,
    pub grouping: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWire {
    /// asset index
    pub a: u32,
    /// is buy
    pub b: bool,
    /// price
    pub p: String,
    /// size
    pub s: String,
    /// reduce only
    pub r: bool,
    /// order type
    pub t: OrderTypeWire,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderTypeWire {
    pub limit: LimitWire,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitWire {
    pub tif: Tif,
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tif {
    /// Immediate or cancel
    Ioc,
    /// Good till cancel
    Gtc,
}

impl Tif {
    pub fn as_str(self) -> &'static str {
        match self {
            Tif::Ioc => "Ioc",
            Tif::Gtc => "Gtc",
        }
    }
}

impl Serialize for Tif {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkCancel {
    pub cancels: Vec<CancelWire>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelWire {
    pub a: u32,
    pub o: u64,
}

impl Action {
    pub fn single_order(order: OrderWire) -> Self {
        Action::Order(BulkOrder {
            orders: vec![order],
            grouping: "na".to_string(),
        })
    }

    pub fn single_cancel(asset: u32, oid: u64) -> Self {
        Action::Cancel(BulkCancel {
            cancels: vec![CancelWire { a: asset, o: oid }],
        })
    }
}

// ====================================================================
// EXCHANGE REQUEST / RESPONSE
// ====================================================================

/// Signature split into its components for transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureWire {
    pub r: String,
    pub s: String,
    pub v: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRequest<A: Serialize> {
    pub action: A,
    pub nonce: u64,
    pub signature: SignatureWire,
    #[serde(rename = "vaultAddress", skip_serializing_if = "Option::is_none")]
    pub vault_address: Option<String>,
}

/// `{"status": "ok", "response": {...}}` or `{"status": "err", "response": "<message>"}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", content = "response", rename_all = "lowercase")]
pub enum ExchangeResponse<T> {
    Ok(ResponseBody<T>),
    Err(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBody<T> {
    pub data: Option<StatusList<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusList<T> {
    pub statuses: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Filled(FilledStatus),
    Resting(RestingStatus),
    Error(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledStatus {
    pub total_sz: String,
    pub avg_px: String,
    pub oid: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestingStatus {
    pub oid: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelStatus {
    Success,
    Error(String),
}
