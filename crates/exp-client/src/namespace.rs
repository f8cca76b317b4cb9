//! Namespace assembly: descriptor tables to a tree of bindings

use std::collections::BTreeMap;
use std::sync::Arc;

use exp_rpc::{
    BindingError, BindingResult, BoundMethod, BoundProperty, MethodDescriptor, PropertyDescriptor,
    Provider, Settings,
};

/// Bindings filed under their dotted names
///
/// `compile.solidity` lives in the `compile` child namespace as `solidity`.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    methods: BTreeMap<&'static str, BoundMethod>,
    properties: BTreeMap<&'static str, BoundProperty>,
    children: BTreeMap<&'static str, Namespace>,
}

impl Namespace {
    /// Compile every descriptor once and file it by name
    ///
    /// Fails on the first invalid descriptor or on a name used twice.
    pub fn assemble(
        methods: Vec<MethodDescriptor>,
        properties: Vec<PropertyDescriptor>,
        provider: Arc<dyn Provider>,
        settings: Arc<Settings>,
    ) -> BindingResult<Self> {
        let mut root = Namespace::default();

        for descriptor in methods {
            let name = descriptor.name;
            let method = BoundMethod::compile(descriptor, Arc::clone(&provider), Arc::clone(&settings))?;
            let (ns, leaf) = root.slot_for(name)?;
            if ns.methods.insert(leaf, method).is_some() {
                return Err(duplicate(name));
            }
        }

        for descriptor in properties {
            let name = descriptor.name;
            let property = BoundProperty::compile(descriptor, Arc::clone(&provider))?;
            let (ns, leaf) = root.slot_for(name)?;
            if ns.methods.contains_key(leaf) || ns.properties.insert(leaf, property).is_some() {
                return Err(duplicate(name));
            }
        }

        tracing::debug!(
            methods = root.method_count(),
            properties = root.property_count(),
            "namespace assembled"
        );
        Ok(root)
    }

    /// Method bound directly in this namespace
    pub fn method(&self, name: &str) -> Option<&BoundMethod> {
        self.methods.get(name)
    }

    /// Property bound directly in this namespace
    pub fn property(&self, name: &str) -> Option<&BoundProperty> {
        self.properties.get(name)
    }

    /// Child namespace
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.children.get(name)
    }

    /// Method by dotted path, e.g. `compile.solidity`
    pub fn method_at(&self, path: &str) -> Option<&BoundMethod> {
        let (ns, leaf) = self.walk(path)?;
        ns.method(leaf)
    }

    /// Property by dotted path
    pub fn property_at(&self, path: &str) -> Option<&BoundProperty> {
        let (ns, leaf) = self.walk(path)?;
        ns.property(leaf)
    }

    /// Names of methods bound directly in this namespace
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }

    /// Names of properties bound directly in this namespace
    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.keys().copied()
    }

    /// Methods in this namespace and all children
    pub fn method_count(&self) -> usize {
        self.methods.len() + self.children.values().map(Namespace::method_count).sum::<usize>()
    }

    /// Properties in this namespace and all children
    pub fn property_count(&self) -> usize {
        self.properties.len()
            + self
                .children
                .values()
                .map(Namespace::property_count)
                .sum::<usize>()
    }

    fn walk<'a>(&self, path: &'a str) -> Option<(&Namespace, &'a str)> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let leaf = segments.pop()?;
        let mut ns = self;
        for segment in segments {
            ns = ns.children.get(segment)?;
        }
        Some((ns, leaf))
    }

    fn slot_for(&mut self, name: &'static str) -> BindingResult<(&mut Namespace, &'static str)> {
        let mut segments: Vec<&'static str> = name.split('.').collect();
        let leaf = segments.pop().ok_or_else(|| duplicate(name))?;
        let mut ns = self;
        for segment in segments {
            if ns.methods.contains_key(segment) || ns.properties.contains_key(segment) {
                return Err(BindingError::InvalidDescriptor(format!(
                    "{}: segment {:?} is already a binding",
                    name, segment
                )));
            }
            ns = ns.children.entry(segment).or_default();
        }
        if ns.children.contains_key(leaf) {
            return Err(duplicate(name));
        }
        Ok((ns, leaf))
    }
}

fn duplicate(name: &str) -> BindingError {
    BindingError::InvalidDescriptor(format!("duplicate binding name {:?}", name))
}
