//! Base identifiers, JSON-RPC response records and error definitions.
//!
//! Response shapes follow the full node's JSON encoding. Only the fields this
//! crate reads are modelled; everything else is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::resilience::Retryable;

/// JSON-RPC "invalid params" error code.
pub const INVALID_PARAMS_CODE: i64 = -32602;

/// Errors that can occur while talking to a full node.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Endpoint URL could not be parsed.
    #[error("Invalid RPC endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Connection or HTTP-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC call rejected ({code}): {message}")]
    Call { code: i64, message: String },

    /// The response could not be decoded into the expected record.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Every configured endpoint failed at the transport level.
    #[error("All RPC endpoints failed: {0}")]
    AllEndpointsFailed(String),
}

impl Retryable for RpcError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcError::Transport(_) | RpcError::Timeout(_) | RpcError::AllEndpointsFailed(_)
        )
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Error returned when parsing an identifier or address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{input}': {reason}")]
pub struct ParseIdError {
    pub input: String,
    pub reason: &'static str,
}

fn parse_hex_body(input: &str) -> Result<&str, ParseIdError> {
    let err = |reason| ParseIdError {
        input: input.to_string(),
        reason,
    };
    let body = input.strip_prefix("0x").ok_or_else(|| err("missing 0x prefix"))?;
    if body.is_empty() {
        return Err(err("empty"));
    }
    if body.len() > 64 {
        return Err(err("longer than 32 bytes"));
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err("not hexadecimal"));
    }
    Ok(body)
}

/// Opaque on-chain object identifier (`0x`-prefixed hex, lowercased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// The shared system clock object.
    pub fn clock() -> Self {
        Self("0x6".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        parse_hex_body(&lowered)?;
        Ok(Self(lowered))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 32]);

impl Address {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex string with 0x prefix, always 64 digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    /// Short forms such as `0x6` are left-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let body = parse_hex_body(&lowered)?;
        let padded = format!("{:0>64}", body);
        let bytes = hex::decode(padded).map_err(|_| ParseIdError {
            input: s.to_string(),
            reason: "not hexadecimal",
        })?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl TryFrom<String> for Address {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_hex()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Which parts of an object to include in a `sui_getObject` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_type: bool,
    pub show_owner: bool,
    pub show_content: bool,
    pub show_previous_transaction: bool,
}

impl ObjectDataOptions {
    /// Type plus parsed Move content.
    pub fn with_content() -> Self {
        Self {
            show_type: true,
            show_content: true,
            ..Self::default()
        }
    }
}

/// Response to `sui_getObject` and `suix_getDynamicFieldObject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ObjectData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ObjectResponseError>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub version: u64,
    pub digest: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ObjectContent>,
}

impl ObjectData {
    /// Field map of a Move object, if content was requested and the object is not a package.
    pub fn move_fields(&self) -> Option<&Value> {
        match &self.content {
            Some(ObjectContent::MoveObject { fields, .. }) => Some(fields),
            _ => None,
        }
    }
}

/// Parsed object content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataType", rename_all = "camelCase")]
pub enum ObjectContent {
    MoveObject {
        #[serde(rename = "type")]
        type_: String,
        #[serde(rename = "hasPublicTransfer", default)]
        has_public_transfer: bool,
        fields: Value,
    },
    Package {
        #[serde(default)]
        disassembled: Value,
    },
}

/// Per-object error reported inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum ObjectResponseError {
    #[error("object {object_id} does not exist")]
    NotExists { object_id: String },

    #[error("dynamic field not found under parent {parent_object_id}")]
    DynamicFieldNotFound { parent_object_id: String },

    #[error("object {object_id} was deleted")]
    Deleted { object_id: String },

    #[error("unknown object error")]
    Unknown,

    #[error("display error: {error}")]
    DisplayError { error: String },
}

/// Typed key of a dynamic field, e.g. `{type: "address", value: "0x…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldName {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: Value,
}

impl DynamicFieldName {
    pub fn new(type_: impl Into<String>, value: Value) -> Self {
        Self {
            type_: type_.into(),
            value,
        }
    }

    /// Key of a `Table<address, _>` entry.
    pub fn address(addr: &Address) -> Self {
        Self::new("address", Value::String(addr.to_hex()))
    }
}

impl fmt::Display for DynamicFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicFieldType {
    DynamicField,
    DynamicObject,
}

/// One entry of `suix_getDynamicFields`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: DynamicFieldName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcs_name: Option<String>,
    #[serde(rename = "type")]
    pub type_: DynamicFieldType,
    pub object_type: String,
    pub object_id: ObjectId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub version: u64,
    pub digest: String,
}

/// `next_cursor` points to the last item in the page; reading with it
/// continues after that item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T, C> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<C>,
    pub has_next_page: bool,
}

pub type DynamicFieldPage = Page<DynamicFieldInfo, String>;

/// Unsigned transaction bytes built by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockBytes {
    /// Base64 BCS `TransactionData`.
    pub tx_bytes: String,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub version: u64,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedObjectRef {
    pub reference: ObjectRef,
    #[serde(default)]
    pub owner: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub created: Vec<OwnedObjectRef>,
}

/// Response to `sui_executeTransactionBlock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBlockResponse {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
}
