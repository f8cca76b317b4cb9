//! Binding error types

use serde_json::Value;
use thiserror::Error;

use exp_primitives::{AddressError, QuantityError};

/// Standard JSON-RPC 2.0 error codes
pub mod error_code {
    /// Parse error: Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid Request: The JSON is not a valid Request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// A formatter was handed a value outside its accepted shape
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormatError {
    /// Not a 20-byte address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Not a parseable integer quantity
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Wrong JSON type
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        /// What the formatter accepts
        expected: &'static str,
        /// What it got
        found: String,
    },

    /// Value does not fit the target representation
    #[error("value out of range: {0}")]
    Overflow(String),

    /// A mandatory object field is absent
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

impl FormatError {
    /// Build an `UnexpectedType` error describing `found`
    pub fn unexpected(expected: &'static str, found: &Value) -> Self {
        FormatError::UnexpectedType {
            expected,
            found: describe(found),
        }
    }
}

impl From<QuantityError> for FormatError {
    fn from(e: QuantityError) -> Self {
        match e {
            QuantityError::Overflow(v) => FormatError::Overflow(v),
            other => FormatError::InvalidQuantity(other.to_string()),
        }
    }
}

impl From<AddressError> for FormatError {
    fn from(e: AddressError) -> Self {
        FormatError::InvalidAddress(e.to_string())
    }
}

/// Where a formatter failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterSlot {
    /// Input formatter at the given argument position
    Input(usize),
    /// The output formatter
    Output,
}

impl std::fmt::Display for FormatterSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatterSlot::Input(i) => write!(f, "argument {}", i),
            FormatterSlot::Output => f.write_str("result"),
        }
    }
}

/// Provider could not complete the exchange
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection-level failure
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("unexpected status: {0}")]
    Status(u16),

    /// Response body was not a JSON-RPC response
    #[error("decode error: {0}")]
    Decode(String),
}

/// Error returned by bound methods and properties
#[derive(Debug, Clone, Error)]
pub enum BindingError {
    /// Required arguments are missing (or surplus ones were given)
    #[error("invalid number of arguments to {method}: expected {expected}, got {got}")]
    InvalidArgumentCount {
        /// Logical method name
        method: String,
        /// Declared arity
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// An input or output formatter rejected a value
    #[error("{method}: {slot} rejected: {source}")]
    FormatterRejected {
        /// Logical method or property name
        method: String,
        /// Which formatter failed
        slot: FormatterSlot,
        /// Formatter error
        #[source]
        source: FormatError,
    },

    /// The node answered with a JSON-RPC error
    #[error("RPC error: {code} - {message}")]
    Remote {
        /// Error code
        code: i64,
        /// Error message
        message: String,
        /// Optional additional data
        data: Option<Value>,
    },

    /// The provider failed to complete the exchange
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    /// The node answered with something that is not a valid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A descriptor violates its own invariants
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}

impl BindingError {
    /// Whether the error was raised locally, before any request was issued
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            BindingError::InvalidArgumentCount { .. } | BindingError::InvalidDescriptor(_)
        ) || matches!(
            self,
            BindingError::FormatterRejected {
                slot: FormatterSlot::Input(_),
                ..
            }
        )
    }
}

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingError>;

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code::PARSE_ERROR, -32700);
        assert_eq!(error_code::INVALID_REQUEST, -32600);
        assert_eq!(error_code::METHOD_NOT_FOUND, -32601);
        assert_eq!(error_code::INVALID_PARAMS, -32602);
        assert_eq!(error_code::INTERNAL_ERROR, -32603);
    }

    #[test]
    fn test_unexpected_type_message() {
        let err = FormatError::unexpected("hex string", &json!(12));
        assert_eq!(err.to_string(), "expected hex string, found number 12");
    }

    #[test]
    fn test_quantity_overflow_maps_to_overflow() {
        let err: FormatError = QuantityError::Overflow("0x1".to_string()).into();
        assert!(matches!(err, FormatError::Overflow(_)));
        let err: FormatError = QuantityError::Empty.into();
        assert!(matches!(err, FormatError::InvalidQuantity(_)));
    }

    #[test]
    fn test_argument_count_display() {
        let err = BindingError::InvalidArgumentCount {
            method: "getBalance".to_string(),
            expected: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid number of arguments to getBalance: expected 2, got 1"
        );
        assert!(err.is_local());
    }

    #[test]
    fn test_formatter_rejected_display() {
        let err = BindingError::FormatterRejected {
            method: "getCode".to_string(),
            slot: FormatterSlot::Input(0),
            source: FormatError::InvalidAddress("bad".to_string()),
        };
        assert!(err.to_string().contains("argument 0"));
        assert!(err.is_local());

        let err = BindingError::FormatterRejected {
            method: "gasPrice".to_string(),
            slot: FormatterSlot::Output,
            source: FormatError::InvalidQuantity("x".to_string()),
        };
        assert!(err.to_string().contains("result"));
        assert!(!err.is_local());
    }

    #[test]
    fn test_remote_and_transport_are_not_local() {
        let remote = BindingError::Remote {
            code: -32000,
            message: "boom".to_string(),
            data: None,
        };
        assert_eq!(remote.to_string(), "RPC error: -32000 - boom");
        assert!(!remote.is_local());

        let transport: BindingError = TransportError::Connection("refused".to_string()).into();
        assert!(matches!(transport, BindingError::TransportFailure(_)));
        assert!(!transport.is_local());
    }
}
