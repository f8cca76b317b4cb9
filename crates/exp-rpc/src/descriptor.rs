//! Method and property descriptors
//!
//! A descriptor is plain data: the logical name, how to pick the remote
//! operation, the arity and the formatters. Descriptors are compiled into
//! bindings once, at namespace assembly time.

use std::fmt;

use serde_json::Value;

use crate::error::{BindingError, BindingResult, FormatError};
use crate::formatters::is_hex_prefixed;
use crate::types::FormatContext;

/// Transforms one raw argument into its protocol form
pub type InputFormatter = fn(&Value, &FormatContext) -> Result<Value, FormatError>;

/// Transforms a raw protocol result into its application form
pub type OutputFormatter = fn(Value) -> Result<Value, FormatError>;

/// Picks a target-operation name from the raw, unformatted arguments
pub type Resolver = fn(&[Value]) -> &'static str;

/// How a block is addressed by the first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    /// A `0x`-prefixed string: a block hash
    Hash,
    /// Anything else: a number or predefined token
    Number,
}

impl BlockRef {
    /// Classify the first argument of `args`
    pub fn classify(args: &[Value]) -> Self {
        match args.first() {
            Some(first) if is_hex_prefixed(first) => BlockRef::Hash,
            _ => BlockRef::Number,
        }
    }
}

/// Target-operation selection
#[derive(Clone, Copy)]
pub enum CallTarget {
    /// Always the same operation
    Fixed(&'static str),
    /// Hash-addressed or number-addressed variant, chosen by [`BlockRef`]
    ByBlockRef {
        /// Operation used when the first argument is a hash
        by_hash: &'static str,
        /// Operation used otherwise
        by_number: &'static str,
    },
    /// Arbitrary pure resolver over the raw arguments
    Resolver(Resolver),
}

impl CallTarget {
    /// Resolve the target-operation name; sees raw arguments only
    pub fn resolve(&self, args: &[Value]) -> &'static str {
        match *self {
            CallTarget::Fixed(name) => name,
            CallTarget::ByBlockRef { by_hash, by_number } => match BlockRef::classify(args) {
                BlockRef::Hash => by_hash,
                BlockRef::Number => by_number,
            },
            CallTarget::Resolver(resolve) => resolve(args),
        }
    }
}

impl From<&'static str> for CallTarget {
    fn from(name: &'static str) -> Self {
        CallTarget::Fixed(name)
    }
}

impl fmt::Debug for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Fixed(name) => f.debug_tuple("Fixed").field(name).finish(),
            CallTarget::ByBlockRef { by_hash, by_number } => f
                .debug_struct("ByBlockRef")
                .field("by_hash", by_hash)
                .field("by_number", by_number)
                .finish(),
            CallTarget::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Describes one remote method
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Logical name; dots denote nested namespaces (`compile.solidity`)
    pub name: &'static str,
    /// Target-operation selection
    pub call: CallTarget,
    /// Number of required arguments
    pub params: usize,
    /// Per-position formatters; `None` passes the argument through
    pub input_formatters: Vec<Option<InputFormatter>>,
    /// Applied to non-null results
    pub output_formatter: Option<OutputFormatter>,
}

impl MethodDescriptor {
    /// Start a descriptor with no formatters
    pub fn new(name: &'static str, call: impl Into<CallTarget>, params: usize) -> Self {
        Self {
            name,
            call: call.into(),
            params,
            input_formatters: Vec::new(),
            output_formatter: None,
        }
    }

    /// Append a formatter for the next argument position
    pub fn input(mut self, formatter: InputFormatter) -> Self {
        self.input_formatters.push(Some(formatter));
        self
    }

    /// Append a pass-through marker for the next argument position
    pub fn skip(mut self) -> Self {
        self.input_formatters.push(None);
        self
    }

    /// Set the output formatter
    pub fn output(mut self, formatter: OutputFormatter) -> Self {
        self.output_formatter = Some(formatter);
        self
    }

    /// Check the descriptor's own invariants
    pub fn validate(&self) -> BindingResult<()> {
        validate_name(self.name)?;
        if let CallTarget::Fixed("") = self.call {
            return Err(BindingError::InvalidDescriptor(format!(
                "{}: empty target operation",
                self.name
            )));
        }
        if self.input_formatters.len() > self.params {
            return Err(BindingError::InvalidDescriptor(format!(
                "{}: {} input formatters for {} params",
                self.name,
                self.input_formatters.len(),
                self.params
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("call", &self.call)
            .field("params", &self.params)
            .field(
                "input_formatters",
                &self
                    .input_formatters
                    .iter()
                    .map(|slot| if slot.is_some() { "fn" } else { "none" })
                    .collect::<Vec<_>>(),
            )
            .field("output_formatter", &self.output_formatter.is_some())
            .finish()
    }
}

/// Whether a property read goes to the node every time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Every read issues a request
    #[default]
    Live,
    /// Reads are served from the last fetched value until refreshed
    Cached,
}

/// Describes one read-only remote property
#[derive(Clone)]
pub struct PropertyDescriptor {
    /// Logical name
    pub name: &'static str,
    /// Target-operation name
    pub getter: &'static str,
    /// Applied to non-null results
    pub output_formatter: Option<OutputFormatter>,
    /// Cache-or-live policy
    pub policy: ReadPolicy,
}

impl PropertyDescriptor {
    /// Start a live property with no formatter
    pub fn new(name: &'static str, getter: &'static str) -> Self {
        Self {
            name,
            getter,
            output_formatter: None,
            policy: ReadPolicy::Live,
        }
    }

    /// Set the output formatter
    pub fn output(mut self, formatter: OutputFormatter) -> Self {
        self.output_formatter = Some(formatter);
        self
    }

    /// Set the read policy
    pub fn policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the descriptor's own invariants
    pub fn validate(&self) -> BindingResult<()> {
        validate_name(self.name)?;
        if self.getter.is_empty() {
            return Err(BindingError::InvalidDescriptor(format!(
                "{}: empty getter",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("getter", &self.getter)
            .field("output_formatter", &self.output_formatter.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

fn validate_name(name: &str) -> BindingResult<()> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(BindingError::InvalidDescriptor(format!(
            "invalid binding name {:?}",
            name
        )));
    }
    Ok(())
}
