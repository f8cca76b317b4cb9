//! # exp-client
//!
//! Client for the `exp` JSON-RPC namespace.
//!
//! ## Features
//!
//! - **ExpClient**: the `exp` methods and properties bound to one provider
//! - **Namespace**: dotted binding names filed as nested namespaces
//! - **ClientConfig**: endpoint, defaults and cache policy from TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use exp_client::ExpClient;
//! use exp_rpc::{MockProvider, Settings};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(MockProvider::new());
//!     provider.set_result("exp_getCompilers", json!(["solidity"]));
//!
//!     let client = ExpClient::new(provider, Arc::new(Settings::default()))?;
//!     let compilers = client.call("getCompilers", &[]).await?;
//!     assert_eq!(compilers, json!(["solidity"]));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
mod methods;
mod namespace;

pub use client::ExpClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use methods::{exp_methods, exp_properties};
pub use namespace::Namespace;

pub use exp_primitives::{Address, U256};
pub use exp_rpc::{BlockParam, ReadPolicy};
