//! # Factory Registry
//!
//! Explicit name → controller-factory mapping, populated by the host at
//! startup and injected wherever names are resolved.
//!
//! Names are fully-qualified strings (`mail.Inbox`). Relative names (leading
//! `.`) are qualified against the `RenderContext` namespace before lookup.
//! All data structures use `BTreeMap` for deterministic ordering.

use crate::controller::{BoxError, Controller, ControllerFactory, RenderContext};
use crate::error::NavError;
use crate::Args;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Lookup statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered factories.
    pub registered: usize,
    /// Successful resolutions.
    pub hits: u64,
    /// Failed resolutions.
    pub misses: u64,
}

/// Registry of controller factories keyed by qualified name.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Rc<dyn ControllerFactory>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}

impl FactoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Re-registering a name replaces the previous
    /// factory and returns `true`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: ControllerFactory + 'static,
    {
        let name = name.into();
        tracing::debug!(name = %name, "registering controller factory");
        let factory: Rc<dyn ControllerFactory> = Rc::new(factory);
        self.factories.insert(name, factory).is_some()
    }

    /// Register a controller type that is built from its arguments alone.
    pub fn register_fn<C, F>(&mut self, name: impl Into<String>, build: F) -> bool
    where
        C: Controller + 'static,
        F: Fn(Option<&Args>) -> C + 'static,
    {
        self.register(
            name,
            move |_: &RenderContext, args: Option<&Args>| -> Result<Box<dyn Controller>, BoxError> {
                Ok(Box::new(build(args)))
            },
        )
    }

    /// Resolve a (possibly relative) name to its factory.
    pub fn resolve(
        &self,
        context: &RenderContext,
        name: &str,
    ) -> Result<Rc<dyn ControllerFactory>, NavError> {
        let qualified = context.qualify(name);
        match self.factories.get(&qualified) {
            Some(factory) => {
                self.hits.set(self.hits.get().saturating_add(1));
                Ok(Rc::clone(factory))
            }
            None => {
                self.misses.set(self.misses.get().saturating_add(1));
                tracing::warn!(name = %qualified, "unknown controller name");
                Err(NavError::UnknownController { name: qualified })
            }
        }
    }

    /// Registered names in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            registered: self.factories.len(),
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
