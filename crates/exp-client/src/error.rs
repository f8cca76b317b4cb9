//! Client error types

use exp_rpc::{BindingError, FormatError, TransportError};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Binding failure (arity, formatting, remote or transport)
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Provider could not be constructed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or is inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// No binding with this name
    #[error("Unknown binding: {0}")]
    UnknownBinding(String),

    /// Result did not have the expected shape
    #[error("Unexpected result from {method}: {source}")]
    UnexpectedResult {
        /// Binding that produced the result
        method: &'static str,
        /// What was wrong with it
        source: FormatError,
    },
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
