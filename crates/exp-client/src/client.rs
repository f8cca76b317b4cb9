//! ExpClient - the assembled `exp` namespace

use std::sync::Arc;

use exp_primitives::{Address, Quantity, U256};
use exp_rpc::{
    BlockParam, BoundMethod, BoundProperty, FormatError, PropertyDescriptor, Provider, ReadPolicy,
    Settings,
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::methods::{exp_methods, exp_properties};
use crate::namespace::Namespace;

#[cfg(feature = "http")]
use exp_rpc::HttpProvider;

/// Client for the `exp` namespace
///
/// Every binding shares one provider and one [`Settings`]; changing the
/// default block or account affects all subsequent calls.
#[derive(Debug, Clone)]
pub struct ExpClient {
    namespace: Namespace,
    settings: Arc<Settings>,
}

impl ExpClient {
    /// Assemble the namespace over `provider` with all properties live
    pub fn new(provider: Arc<dyn Provider>, settings: Arc<Settings>) -> ClientResult<Self> {
        Self::assemble(provider, settings, exp_properties())
    }

    /// Assemble over `provider`, taking defaults and cache policy from `config`
    pub fn with_provider(provider: Arc<dyn Provider>, config: &ClientConfig) -> ClientResult<Self> {
        let settings = Arc::new(Settings::new(config.default_block, config.default_account()?));
        let properties = exp_properties()
            .into_iter()
            .map(|property| apply_policy(property, config))
            .collect();
        Self::assemble(provider, settings, properties)
    }

    /// Connect over HTTP as described by `config`
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let provider = HttpProvider::with_timeout(
            &config.rpc_url,
            std::time::Duration::from_secs(config.timeout_secs),
        )?;
        tracing::info!(url = %config.rpc_url, "using HTTP provider");
        Self::with_provider(Arc::new(provider), config)
    }

    /// Connect over HTTP with default settings
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> ClientResult<Self> {
        let config = ClientConfig {
            rpc_url: url.to_string(),
            ..ClientConfig::default()
        };
        Self::from_config(&config)
    }

    fn assemble(
        provider: Arc<dyn Provider>,
        settings: Arc<Settings>,
        properties: Vec<PropertyDescriptor>,
    ) -> ClientResult<Self> {
        let namespace =
            Namespace::assemble(exp_methods(), properties, provider, Arc::clone(&settings))?;
        Ok(Self {
            namespace,
            settings,
        })
    }

    // ==================== Settings ====================

    /// Block used when a block argument is left null
    pub fn default_block(&self) -> BlockParam {
        self.settings.default_block()
    }

    /// Change the default block; local only
    pub fn set_default_block(&self, block: BlockParam) {
        self.settings.set_default_block(block);
    }

    /// Sender used when a call object has no `from`
    pub fn default_account(&self) -> Option<Address> {
        self.settings.default_account()
    }

    /// Change the default account; local only
    pub fn set_default_account(&self, account: Option<Address>) {
        self.settings.set_default_account(account);
    }

    /// Shared settings
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    // ==================== Bindings ====================

    /// The assembled namespace
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Method by dotted name
    pub fn method(&self, name: &str) -> ClientResult<&BoundMethod> {
        self.namespace
            .method_at(name)
            .ok_or_else(|| ClientError::UnknownBinding(name.to_string()))
    }

    /// Property by name
    pub fn property(&self, name: &str) -> ClientResult<&BoundProperty> {
        self.namespace
            .property_at(name)
            .ok_or_else(|| ClientError::UnknownBinding(name.to_string()))
    }

    /// Invoke a method by name
    pub async fn call(&self, name: &str, args: &[Value]) -> ClientResult<Value> {
        Ok(self.method(name)?.call(args).await?)
    }

    /// Read a property by name
    pub async fn get(&self, name: &str) -> ClientResult<Value> {
        Ok(self.property(name)?.get().await?)
    }

    // ==================== Typed Helpers ====================

    /// Balance of `address`; `None` uses the default block
    pub async fn get_balance(
        &self,
        address: &Address,
        block: Option<BlockParam>,
    ) -> ClientResult<U256> {
        let args = [
            Value::String(address.to_hex()),
            block.map(|b| b.to_value()).unwrap_or(Value::Null),
        ];
        let value = self.call("getBalance", &args).await?;
        let quantity = expect_str(&value)
            .and_then(|s| Quantity::from_decimal(s).map_err(FormatError::from))
            .and_then(|q| {
                if q.is_negative() {
                    Err(FormatError::InvalidQuantity(format!(
                        "negative balance {}",
                        q.to_decimal_string()
                    )))
                } else {
                    Ok(q)
                }
            })
            .map_err(|source| unexpected("getBalance", source))?;
        Ok(quantity.magnitude())
    }

    /// Number of transactions sent from `address`
    pub async fn get_transaction_count(
        &self,
        address: &Address,
        block: Option<BlockParam>,
    ) -> ClientResult<u64> {
        let args = [
            Value::String(address.to_hex()),
            block.map(|b| b.to_value()).unwrap_or(Value::Null),
        ];
        let value = self.call("getTransactionCount", &args).await?;
        expect_u64("getTransactionCount", &value)
    }

    /// Current block number
    pub async fn block_number(&self) -> ClientResult<u64> {
        let value = self.get("blockNumber").await?;
        expect_u64("blockNumber", &value)
    }

    /// Mining reward address of the node
    pub async fn coinbase(&self) -> ClientResult<String> {
        let value = self.get("coinbase").await?;
        expect_str(&value)
            .map(str::to_string)
            .map_err(|source| unexpected("coinbase", source))
    }

    /// Accounts controlled by the node
    pub async fn accounts(&self) -> ClientResult<Vec<Address>> {
        let value = self.get("accounts").await?;
        let entries = match &value {
            Value::Array(entries) => entries,
            other => {
                return Err(unexpected(
                    "accounts",
                    FormatError::unexpected("address array", other),
                ))
            }
        };
        entries
            .iter()
            .map(|entry| {
                expect_str(entry)
                    .and_then(|s| Address::from_hex(s).map_err(FormatError::from))
                    .map_err(|source| unexpected("accounts", source))
            })
            .collect()
    }

    /// Drop every cached property value
    pub fn invalidate_cache(&self) {
        for name in self.namespace.property_names() {
            if let Some(property) = self.namespace.property(name) {
                property.invalidate();
            }
        }
    }

    /// Re-read a cached property from the node
    pub async fn refresh(&self, name: &str) -> ClientResult<Value> {
        Ok(self.property(name)?.refresh().await?)
    }
}

fn apply_policy(property: PropertyDescriptor, config: &ClientConfig) -> PropertyDescriptor {
    if config.is_cached(property.name) {
        property.policy(ReadPolicy::Cached)
    } else {
        property
    }
}

fn expect_str(value: &Value) -> Result<&str, FormatError> {
    value
        .as_str()
        .ok_or_else(|| FormatError::unexpected("string", value))
}

fn expect_u64(method: &'static str, value: &Value) -> ClientResult<u64> {
    value
        .as_u64()
        .ok_or_else(|| unexpected(method, FormatError::unexpected("unsigned integer", value)))
}

fn unexpected(method: &'static str, source: FormatError) -> ClientError {
    ClientError::UnexpectedResult { method, source }
}
