// ====
// Hyperliquid Wallet - Custom Implementation
// ====
// EIP-712 Signing für Hyperliquid API
// Keine externen Wallet-Libraries
// ====

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::SecretKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::{Digest, Keccak256};

use super::errors::ExchangeError;
use super::types::SignatureWire;

/// Local secp256k1 key used for signing.
///
/// Holds either the delegated agent key (L1 actions) or the user's wallet key
/// (one-time agent approval). The key is borrowed by callers per signature
/// and never persisted here.
pub struct Wallet {
    /// Private key
    private_key: SigningKey,
    /// Public address (0x..., lowercase)
    pub address: String,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Wallet {
    /// Create wallet from private key hex string (with or without 0x)
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, ExchangeError> {
        let key_hex = private_key_hex.trim().trim_start_matches("0x");

        let key_bytes = hex::decode(key_hex)
            .map_err(|e| ExchangeError::SigningError(format!("Malformed private key hex: {}", e)))?;
        if key_bytes.len() != 32 {
            return Err(ExchangeError::SigningError(format!(
                "Private key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let secret_key = SecretKey::from_slice(&key_bytes)
            .map_err(|_| ExchangeError::SigningError("Invalid private key".to_string()))?;
        let signing_key = SigningKey::from(secret_key);
        let address = derive_address(signing_key.verifying_key());

        Ok(Self {
            private_key: signing_key,
            address,
        })
    }

    /// Sign EIP-712 typed data
    pub fn sign_typed_data(&self, typed_data: &TypedData) -> Result<SignatureWire, ExchangeError> {
        let digest = typed_data.encode()?;
        self.sign_hash(&digest)
    }

    /// Recoverable signature over a 32-byte digest, split into (r, s, v).
    pub fn sign_hash(&self, digest: &[u8; 32]) -> Result<SignatureWire, ExchangeError> {
        let (signature, recovery_id) = self.private_key.sign_prehash_recoverable(digest)?;

        let sig_bytes = signature.to_bytes();
        Ok(SignatureWire {
            r: format!("0x{}", hex::encode(&sig_bytes[..32])),
            s: format!("0x{}", hex::encode(&sig_bytes[32..64])),
            // For Ethereum, v = 27 + recovery_id
            v: 27 + recovery_id.to_byte(),
        })
    }
}

/// Derive Ethereum address from a public key
pub fn derive_address(verifying_key: &VerifyingKey) -> String {
    let public_key_bytes = verifying_key.to_encoded_point(false);

    // Skip first byte (0x04 prefix for uncompressed key)
    let hash = keccak256(&public_key_bytes.as_bytes()[1..]);

    // Take last 20 bytes
    format!("0x{}", hex::encode(&hash[12..]))
}

/// EIP-712 Domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EIP712Domain {
    pub name: String,
    pub version: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(rename = "verifyingContract")]
    pub verifying_contract: String,
}

/// EIP-712 Typed Data
///
/// `types` maps a struct name to its `[{name, type}]` field list. Only flat
/// structs with atomic field types are supported; that covers every payload
/// the exchange asks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedData {
    pub domain: EIP712Domain,
    #[serde(rename = "primaryType")]
    pub primary_type: String,
    pub types: Value,
    pub message: Value,
}

impl TypedData {
    /// keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))
    pub fn encode(&self) -> Result<[u8; 32], ExchangeError> {
        let domain_separator = self.hash_domain()?;
        let message_hash = self.hash_struct(&self.primary_type, &self.message)?;

        let mut encoded = Vec::with_capacity(66);
        encoded.push(0x19);
        encoded.push(0x01);
        encoded.extend_from_slice(&domain_separator);
        encoded.extend_from_slice(&message_hash);

        Ok(keccak256(&encoded))
    }

    /// Hash domain separator
    pub fn hash_domain(&self) -> Result<[u8; 32], ExchangeError> {
        let type_hash = keccak256(
            b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
        );

        let mut encoded = Vec::with_capacity(32 * 5);
        encoded.extend_from_slice(&type_hash);
        encoded.extend_from_slice(&keccak256(self.domain.name.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.domain.version.as_bytes()));
        encoded.extend_from_slice(&encode_uint(self.domain.chain_id));
        encoded.extend_from_slice(&encode_address(&self.domain.verifying_contract)?);

        Ok(keccak256(&encoded))
    }

    fn hash_struct(&self, struct_type: &str, data: &Value) -> Result<[u8; 32], ExchangeError> {
        let fields = self.fields(struct_type)?;
        let type_string = encode_type(struct_type, &fields);

        let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
        encoded.extend_from_slice(&keccak256(type_string.as_bytes()));

        for (field_name, field_type) in &fields {
            let field_encoded = encode_field(field_type, &data[field_name.as_str()])
                .map_err(|e| {
                    ExchangeError::SigningError(format!("Field '{}': {}", field_name, e))
                })?;
            encoded.extend_from_slice(&field_encoded);
        }

        Ok(keccak256(&encoded))
    }

    /// (name, type) pairs for `struct_type`
    fn fields(&self, struct_type: &str) -> Result<Vec<(String, String)>, ExchangeError> {
        let type_def = self
            .types
            .get(struct_type)
            .and_then(Value::as_array)
            .ok_or_else(|| ExchangeError::SigningError(format!("Type {} not found", struct_type)))?;

        type_def
            .iter()
            .map(|field| {
                let name = field["name"].as_str();
                let ty = field["type"].as_str();
                match (name, ty) {
                    (Some(n), Some(t)) => Ok((n.to_string(), t.to_string())),
                    _ => Err(ExchangeError::SigningError(format!(
                        "Malformed field in type {}",
                        struct_type
                    ))),
                }
            })
            .collect()
    }
}

/// "Agent(string source,bytes32 connectionId)"
fn encode_type(struct_type: &str, fields: &[(String, String)]) -> String {
    let field_strings: Vec<String> = fields
        .iter()
        .map(|(name, ty)| format!("{} {}", ty, name))
        .collect();
    format!("{}({})", struct_type, field_strings.join(","))
}

fn encode_field(field_type: &str, value: &Value) -> Result<[u8; 32], String> {
    match field_type {
        "string" => {
            let s = value.as_str().ok_or("Expected string")?;
            Ok(keccak256(s.as_bytes()))
        }
        "uint256" | "uint64" | "uint32" | "uint8" => {
            let n = value.as_u64().ok_or("Expected number")?;
            Ok(encode_uint(n))
        }
        "address" => {
            let addr = value.as_str().ok_or("Expected address")?;
            encode_address(addr).map_err(|e| e.to_string())
        }
        "bytes32" => {
            let s = value.as_str().ok_or("Expected bytes32 hex")?;
            let bytes = hex::decode(s.trim_start_matches("0x")).map_err(|e| e.to_string())?;
            <[u8; 32]>::try_from(bytes.as_slice())
                .map_err(|_| format!("Expected 32 bytes, got {}", bytes.len()))
        }
        "bool" => {
            let b = value.as_bool().ok_or("Expected bool")?;
            let mut bytes = [0u8; 32];
            bytes[31] = u8::from(b);
            Ok(bytes)
        }
        _ => Err(format!("Unsupported field type: {}", field_type)),
    }
}

fn encode_uint(n: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    bytes
}

fn encode_address(addr: &str) -> Result<[u8; 32], ExchangeError> {
    let addr_bytes = hex::decode(addr.trim_start_matches("0x"))
        .map_err(|e| ExchangeError::SigningError(format!("Invalid address {}: {}", addr, e)))?;
    if addr_bytes.len() != 20 {
        return Err(ExchangeError::SigningError(format!(
            "Invalid address length: {}",
            addr
        )));
    }
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(&addr_bytes);
    Ok(bytes)
}

/// Helper: Keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
