//! Method binding: descriptor to callable
//!
//! A [`BoundMethod`] runs every invocation through the same pipeline:
//!
//! 1. arity check against `params` (no request on failure)
//! 2. target resolution over the *raw* arguments
//! 3. input formatting, slot by slot
//! 4. envelope construction and dispatch through the provider
//! 5. output formatting of non-null results
//!
//! Steps 1-4 are synchronous and shared by both execution modes; only the
//! way the caller learns about completion differs.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::descriptor::{MethodDescriptor, OutputFormatter};
use crate::envelope::RequestEnvelope;
use crate::error::{BindingError, BindingResult, FormatterSlot};
use crate::provider::Provider;
use crate::types::Settings;

/// Compiled, reusable callable for one [`MethodDescriptor`]
///
/// Holds no mutable state of its own; clones share the provider and
/// settings and may be invoked concurrently.
#[derive(Clone)]
pub struct BoundMethod {
    descriptor: MethodDescriptor,
    provider: Arc<dyn Provider>,
    settings: Arc<Settings>,
}

impl BoundMethod {
    /// Compile a descriptor against a provider and shared settings
    pub fn compile(
        descriptor: MethodDescriptor,
        provider: Arc<dyn Provider>,
        settings: Arc<Settings>,
    ) -> BindingResult<Self> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            provider,
            settings,
        })
    }

    /// Logical name
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Required argument count
    pub fn params(&self) -> usize {
        self.descriptor.params
    }

    /// The descriptor this binding was compiled from
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Validate, resolve and format without sending anything
    pub fn prepare(&self, args: &[Value]) -> BindingResult<RequestEnvelope> {
        self.validate_args(args)?;
        let target = self.descriptor.call.resolve(args);
        let params = self.format_input(args)?;
        RequestEnvelope::new(target, params)
    }

    /// Invoke and wait for the formatted result
    pub async fn call(&self, args: &[Value]) -> BindingResult<Value> {
        let request = self.prepare(args)?;
        execute(
            self.provider.as_ref(),
            self.descriptor.name,
            request,
            self.descriptor.output_formatter,
        )
        .await
    }

    /// Invoke and deliver the formatted result to `callback` exactly once
    ///
    /// Local failures (argument count, input formatting) are delivered
    /// inline before this returns, and `None` is returned since no request
    /// was issued. Otherwise the request runs on a spawned task whose handle
    /// is returned.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn call_with_callback<F>(&self, args: &[Value], callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(BindingResult<Value>) + Send + 'static,
    {
        let request = match self.prepare(args) {
            Ok(request) => request,
            Err(e) => {
                callback(Err(e));
                return None;
            }
        };

        let provider = Arc::clone(&self.provider);
        let name = self.descriptor.name;
        let output_formatter = self.descriptor.output_formatter;
        Some(tokio::spawn(async move {
            let result = execute(provider.as_ref(), name, request, output_formatter).await;
            callback(result);
        }))
    }

    fn validate_args(&self, args: &[Value]) -> BindingResult<()> {
        if args.len() != self.descriptor.params {
            return Err(BindingError::InvalidArgumentCount {
                method: self.descriptor.name.to_string(),
                expected: self.descriptor.params,
                got: args.len(),
            });
        }
        Ok(())
    }

    fn format_input(&self, args: &[Value]) -> BindingResult<Vec<Value>> {
        let ctx = self.settings.snapshot();
        args.iter()
            .enumerate()
            .map(|(i, arg)| match self.descriptor.input_formatters.get(i) {
                Some(Some(formatter)) => {
                    formatter(arg, &ctx).map_err(|source| BindingError::FormatterRejected {
                        method: self.descriptor.name.to_string(),
                        slot: FormatterSlot::Input(i),
                        source,
                    })
                }
                _ => Ok(arg.clone()),
            })
            .collect()
    }
}

impl std::fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundMethod")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Send a prepared request and format its result
pub(crate) async fn execute(
    provider: &dyn Provider,
    name: &str,
    request: RequestEnvelope,
    output_formatter: Option<OutputFormatter>,
) -> BindingResult<Value> {
    tracing::debug!(
        binding = name,
        target = %request.method,
        params = request.params.len(),
        "dispatching request"
    );
    tracing::trace!(binding = name, params = ?request.params, "formatted params");

    let response = provider.send(request).await.map_err(|e| {
        tracing::warn!(binding = name, error = %e, "transport failure");
        BindingError::from(e)
    })?;

    let raw = response.into_result().map_err(|e| {
        tracing::warn!(binding = name, error = %e, "request failed");
        e
    })?;

    format_output(name, output_formatter, raw)
}

/// Apply the output formatter; null results are returned as-is
pub(crate) fn format_output(
    name: &str,
    output_formatter: Option<OutputFormatter>,
    raw: Value,
) -> BindingResult<Value> {
    match output_formatter {
        Some(formatter) if !raw.is_null() => {
            formatter(raw).map_err(|source| BindingError::FormatterRejected {
                method: name.to_string(),
                slot: FormatterSlot::Output,
                source,
            })
        }
        _ => Ok(raw),
    }
}
