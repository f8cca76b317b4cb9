//! # exp-rpc
//!
//! Declarative RPC bindings for the exp namespace.
//!
//! A [`MethodDescriptor`] or [`PropertyDescriptor`] is plain data. Compiling
//! it produces a [`BoundMethod`] or [`BoundProperty`] that validates
//! arguments, resolves the remote operation, formats inputs, sends the
//! request through a [`Provider`] and formats the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use exp_rpc::{formatters, BoundMethod, MethodDescriptor, MockProvider, Settings};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(MockProvider::new());
//!     provider.set_result("exp_getBalance", json!("0x2386f26fc10000"));
//!
//!     let get_balance = BoundMethod::compile(
//!         MethodDescriptor::new("getBalance", "exp_getBalance", 2)
//!             .input(formatters::input_address)
//!             .input(formatters::input_default_block_number)
//!             .output(formatters::output_big_number),
//!         provider,
//!         Arc::new(Settings::default()),
//!     )?;
//!
//!     let balance = get_balance
//!         .call(&[json!("0x407d73d8a49eeb85d32cf465507dd71d507100c1"), Value::Null])
//!         .await?;
//!     assert_eq!(balance, json!("10000000000000000"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod descriptor;
mod envelope;
mod error;
pub mod formatters;
mod method;
mod property;
mod provider;
mod types;

pub use descriptor::{
    BlockRef, CallTarget, InputFormatter, MethodDescriptor, OutputFormatter, PropertyDescriptor,
    ReadPolicy, Resolver,
};
pub use envelope::{JsonRpcRequest, RequestEnvelope, ResponseEnvelope, RpcErrorObject, JSONRPC_VERSION};
pub use error::{error_code, BindingError, BindingResult, FormatError, FormatterSlot, TransportError};
pub use method::BoundMethod;
pub use property::BoundProperty;
pub use provider::{MockProvider, Provider, DEFAULT_HTTP_TIMEOUT};
pub use types::{BlockParam, FormatContext, Settings};

#[cfg(feature = "http")]
pub use provider::HttpProvider;

// Re-export primitives for convenience
pub use exp_primitives::{Address, Quantity, U256};
