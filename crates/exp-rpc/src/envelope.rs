//! Request and response envelopes

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{BindingError, BindingResult};

/// JSON-RPC protocol version tag
pub const JSONRPC_VERSION: &str = "2.0";

/// A single remote call, ready to hand to a provider
///
/// Built fresh for every invocation. The correlation id is not part of the
/// envelope; the provider assigns one when it frames the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// Target-operation name
    pub method: String,
    /// Formatted arguments, in order
    pub params: Vec<Value>,
}

impl RequestEnvelope {
    /// Build an envelope for `method` with already-formatted `params`
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> BindingResult<Self> {
        let method = method.into();
        if method.is_empty() {
            return Err(BindingError::InvalidDescriptor(
                "target operation name must not be empty".to_string(),
            ));
        }
        Ok(Self { method, params })
    }

    /// Frame as a JSON-RPC 2.0 request object
    pub fn to_payload(&self, id: u64) -> JsonRpcRequest<'_> {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: &self.method,
            params: &self.params,
        }
    }
}

/// JSON-RPC 2.0 request, borrowing from a [`RequestEnvelope`]
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    /// JSON-RPC version
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: u64,
    /// Method name
    pub method: &'a str,
    /// Method parameters
    pub params: &'a [Value],
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorObject {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 response as received from a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    /// JSON-RPC version
    #[serde(default)]
    pub jsonrpc: String,
    /// Request ID
    #[serde(default)]
    pub id: Value,
    /// Result on success; `Some(Value::Null)` is a present null result
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl ResponseEnvelope {
    /// Successful response
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Validate the response and extract the raw protocol result
    pub fn into_result(self) -> BindingResult<Value> {
        if let Some(error) = self.error {
            return Err(BindingError::Remote {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(BindingError::InvalidResponse(format!(
                "unsupported jsonrpc version {:?}",
                self.jsonrpc
            )));
        }
        self.result
            .ok_or_else(|| BindingError::InvalidResponse("no result in response".to_string()))
    }
}

/// Keeps an explicit `null` distinct from an absent field
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
