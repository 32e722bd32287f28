//! Engine factory keyed by identifier.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::footprint::{FootprintEngine, FOOTPRINT_ENGINE_ID};
use super::{EngineError, MappingEngine};

/// Constructor for a registered engine.
pub type EngineConstructor =
    Arc<dyn Fn() -> Result<Box<dyn MappingEngine>, EngineError> + Send + Sync>;

/// Resolves engine identifiers to constructors.
///
/// Lookups are exact and case-sensitive.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    constructors: BTreeMap<String, EngineConstructor>,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the engines shipped in this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(FOOTPRINT_ENGINE_ID, || {
            Ok(Box::new(FootprintEngine::new()) as Box<dyn MappingEngine>)
        });
        registry
    }

    /// Register (or replace) an engine constructor.
    pub fn register<F>(&mut self, id: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn MappingEngine>, EngineError> + Send + Sync + 'static,
    {
        self.constructors.insert(id.into(), Arc::new(constructor));
        self
    }

    /// Whether an engine is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Construct the engine registered under `id`.
    pub fn load(&self, id: &str) -> Result<Box<dyn MappingEngine>, EngineError> {
        let constructor = self
            .constructors
            .get(id)
            .ok_or_else(|| EngineError::Unknown {
                id: id.to_string(),
                available: self.identifiers().join(", "),
            })?;

        debug!(engine = id, "Constructing engine");
        constructor()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.identifiers())
            .finish()
    }
}
