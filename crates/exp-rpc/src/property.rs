//! Property binding: descriptor to read-only accessor

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::descriptor::{PropertyDescriptor, ReadPolicy};
use crate::envelope::RequestEnvelope;
use crate::error::BindingResult;
use crate::method::execute;
use crate::provider::Provider;

/// Compiled accessor for one [`PropertyDescriptor`]
///
/// With [`ReadPolicy::Live`] every read issues a request. With
/// [`ReadPolicy::Cached`] the last successfully fetched value is served until
/// [`refresh`](Self::refresh) or [`invalidate`](Self::invalidate) is called.
/// Clones share the cache.
#[derive(Clone)]
pub struct BoundProperty {
    descriptor: PropertyDescriptor,
    provider: Arc<dyn Provider>,
    cache: Arc<RwLock<Option<Value>>>,
}

impl BoundProperty {
    /// Compile a descriptor against a provider
    pub fn compile(
        descriptor: PropertyDescriptor,
        provider: Arc<dyn Provider>,
    ) -> BindingResult<Self> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            provider,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Logical name
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Read policy
    pub fn policy(&self) -> ReadPolicy {
        self.descriptor.policy
    }

    /// The descriptor this binding was compiled from
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// The request a read would send
    pub fn prepare(&self) -> BindingResult<RequestEnvelope> {
        RequestEnvelope::new(self.descriptor.getter, Vec::new())
    }

    /// Read the property according to its policy
    pub async fn get(&self) -> BindingResult<Value> {
        if let Some(value) = self.cached() {
            return Ok(value);
        }
        match self.descriptor.policy {
            ReadPolicy::Live => self.fetch().await,
            ReadPolicy::Cached => self.refresh().await,
        }
    }

    /// Fetch from the node, updating the cache on success
    pub async fn refresh(&self) -> BindingResult<Value> {
        let value = self.fetch().await?;
        *self.cache.write() = Some(value.clone());
        Ok(value)
    }

    /// Last cached value; always `None` for live properties
    pub fn cached(&self) -> Option<Value> {
        match self.descriptor.policy {
            ReadPolicy::Live => None,
            ReadPolicy::Cached => self.cache.read().clone(),
        }
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    /// Read and deliver the result to `callback` exactly once
    ///
    /// A cache hit is delivered inline and `None` is returned.
    ///
    /// # Panics
    ///
    /// Panics if a request is needed and no Tokio runtime is running.
    pub fn get_with_callback<F>(&self, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(BindingResult<Value>) + Send + 'static,
    {
        if let Some(value) = self.cached() {
            callback(Ok(value));
            return None;
        }
        let this = self.clone();
        Some(tokio::spawn(async move {
            callback(this.get().await);
        }))
    }

    async fn fetch(&self) -> BindingResult<Value> {
        let request = self.prepare()?;
        execute(
            self.provider.as_ref(),
            self.descriptor.name,
            request,
            self.descriptor.output_formatter,
        )
        .await
    }
}

impl std::fmt::Debug for BoundProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundProperty")
            .field("descriptor", &self.descriptor)
            .field("cached", &self.cache.read().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingError;
    use crate::formatters::output_decimal;
    use crate::provider::MockProvider;
    use serde_json::json;

    fn bind(descriptor: PropertyDescriptor) -> (BoundProperty, Arc<MockProvider>) {
        let provider = Arc::new(MockProvider::new());
        let property = BoundProperty::compile(descriptor, provider.clone()).unwrap();
        (property, provider)
    }

    #[tokio::test]
    async fn test_live_reads_every_time() {
        let (property, provider) =
            bind(PropertyDescriptor::new("blockNumber", "exp_blockNumber").output(output_decimal));
        provider.set_result("exp_blockNumber", json!("0x100"));

        assert_eq!(property.get().await.unwrap(), json!(256));
        assert_eq!(property.get().await.unwrap(), json!(256));
        assert_eq!(provider.request_count(), 2);
        assert!(property.cached().is_none());
    }

    #[tokio::test]
    async fn test_cached_reads_once_until_refreshed() {
        let (property, provider) = bind(
            PropertyDescriptor::new("coinbase", "exp_coinbase").policy(ReadPolicy::Cached),
        );
        provider.set_result("exp_coinbase", json!("0x01"));

        assert!(property.cached().is_none());
        assert_eq!(property.get().await.unwrap(), json!("0x01"));
        provider.set_result("exp_coinbase", json!("0x02"));
        assert_eq!(property.get().await.unwrap(), json!("0x01"));
        assert_eq!(provider.request_count(), 1);

        assert_eq!(property.refresh().await.unwrap(), json!("0x02"));
        assert_eq!(property.cached(), Some(json!("0x02")));
        assert_eq!(provider.request_count(), 2);

        property.invalidate();
        assert!(property.cached().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache() {
        let (property, provider) = bind(
            PropertyDescriptor::new("mining", "exp_mining").policy(ReadPolicy::Cached),
        );
        provider.set_result("exp_mining", json!(true));
        property.get().await.unwrap();

        provider.set_error("exp_mining", -32000, "node syncing");
        let err = property.refresh().await.unwrap_err();
        assert!(matches!(err, BindingError::Remote { code: -32000, .. }));
        assert_eq!(property.cached(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_callback_cache_hit_is_inline() {
        let (property, provider) = bind(
            PropertyDescriptor::new("accounts", "exp_accounts").policy(ReadPolicy::Cached),
        );
        provider.set_result("exp_accounts", json!([]));
        property.refresh().await.unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let handle = property.get_with_callback(move |result| tx.send(result).unwrap());
        assert!(handle.is_none());
        assert_eq!(rx.try_recv().unwrap().unwrap(), json!([]));
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_callback_live_read() {
        let (property, provider) = bind(PropertyDescriptor::new("mining", "exp_mining"));
        provider.set_result("exp_mining", json!(false));

        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = property
            .get_with_callback(move |result| {
                let _ = tx.send(result);
            })
            .unwrap();
        handle.await.unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), json!(false));
    }
}
