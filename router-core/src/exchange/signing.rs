// exchange/signing.rs
// Phantom-agent signing for L1 actions and the user-signed agent approval.
//
// L1 actions (order, cancel) are never signed directly: the msgpack bytes of
// the action plus nonce and vault flag are hashed into a connection id, and the
// agent key signs a tiny `Agent { source, connectionId }` struct instead.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::errors::ExchangeError;
use super::types::{Action, SignatureWire};
use super::wallet::{keccak256, EIP712Domain, TypedData, Wallet};

/// Chain id of the L1 signing domain
pub const L1_CHAIN_ID: u64 = 1337;
/// Chain id of user-signed actions (Arbitrum One)
pub const USER_SIGNED_CHAIN_ID: u64 = 42161;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Milliseconds since epoch; the exchange expects a fresh nonce per request.
pub fn next_nonce() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// msgpack(action) ‖ nonce (u64 BE) ‖ 0x00 (no vault)
pub fn action_bytes<A: Serialize>(action: &A, nonce: u64) -> Result<Vec<u8>, ExchangeError> {
    let mut bytes = rmp_serde::to_vec_named(action)?;
    bytes.extend_from_slice(&nonce.to_be_bytes());
    bytes.push(0x00);
    Ok(bytes)
}

/// Connection id signed by the agent
pub fn action_hash<A: Serialize>(action: &A, nonce: u64) -> Result<[u8; 32], ExchangeError> {
    Ok(keccak256(&action_bytes(action, nonce)?))
}

/// Typed data for an L1 action. `source` is "a" on mainnet, "b" on testnet.
pub fn l1_typed_data(connection_id: &[u8; 32], is_mainnet: bool) -> TypedData {
    TypedData {
        domain: EIP712Domain {
            name: "Exchange".to_string(),
            version: "1".to_string(),
            chain_id: L1_CHAIN_ID,
            verifying_contract: ZERO_ADDRESS.to_string(),
        },
        primary_type: "Agent".to_string(),
        types: json!({
            "Agent": [
                { "name": "source", "type": "string" },
                { "name": "connectionId", "type": "bytes32" }
            ]
        }),
        message: json!({
            "source": if is_mainnet { "a" } else { "b" },
            "connectionId": format!("0x{}", hex::encode(connection_id)),
        }),
    }
}

/// Sign an order or cancel action with the agent key.
pub fn sign_l1_action(
    agent: &Wallet,
    action: &Action,
    nonce: u64,
    is_mainnet: bool,
) -> Result<SignatureWire, ExchangeError> {
    let connection_id = action_hash(action, nonce)?;
    debug!(
        agent = %agent.address,
        nonce,
        connection_id = %hex::encode(connection_id),
        "Signing L1 action"
    );
    agent.sign_typed_data(&l1_typed_data(&connection_id, is_mainnet))
}

// ====================================================================
// AGENT APPROVAL (signed once by the user's wallet)
// ====================================================================

/// `approveAgent` as submitted to the exchange endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAgentAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub signature_chain_id: String,
    pub hyperliquid_chain: String,
    pub agent_address: String,
    /// Submitted as null; signed as the empty string.
    pub agent_name: Option<String>,
    pub nonce: u64,
}

impl ApproveAgentAction {
    pub fn new(agent_address: &str, nonce: u64, is_mainnet: bool) -> Self {
        Self {
            kind: "approveAgent".to_string(),
            signature_chain_id: format!("{:#x}", USER_SIGNED_CHAIN_ID),
            hyperliquid_chain: if is_mainnet { "Mainnet" } else { "Testnet" }.to_string(),
            agent_address: agent_address.to_lowercase(),
            agent_name: None,
            nonce,
        }
    }

    pub fn typed_data(&self) -> TypedData {
        TypedData {
            domain: EIP712Domain {
                name: "HyperliquidSignTransaction".to_string(),
                version: "1".to_string(),
                chain_id: USER_SIGNED_CHAIN_ID,
                verifying_contract: ZERO_ADDRESS.to_string(),
            },
            primary_type: "HyperliquidTransaction:ApproveAgent".to_string(),
            types: json!({
                "HyperliquidTransaction:ApproveAgent": [
                    { "name": "hyperliquidChain", "type": "string" },
                    { "name": "agentAddress", "type": "address" },
                    { "name": "agentName", "type": "string" },
                    { "name": "nonce", "type": "uint64" }
                ]
            }),
            message: json!({
                "hyperliquidChain": self.hyperliquid_chain,
                "agentAddress": self.agent_address,
                "agentName": self.agent_name.clone().unwrap_or_default(),
                "nonce": self.nonce,
            }),
        }
    }
}

/// Sign the agent approval with the user's primary wallet.
pub fn sign_approve_agent(
    user: &Wallet,
    action: &ApproveAgentAction,
) -> Result<SignatureWire, ExchangeError> {
    user.sign_typed_data(&action.typed_data())
}
