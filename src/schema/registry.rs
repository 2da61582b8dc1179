use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::{SchemaDescriptor, SchemaError};

/// Maps record type names to their descriptors.
///
/// A registry is filled once and only read afterwards, which lets any number
/// of decoders share it without locking.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Arc<SchemaDescriptor>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every ORSO header record type
    pub fn orso() -> Self {
        let mut registry = Self::new();
        for descriptor in crate::header::orso_schemas() {
            // The built-in catalogue is fixed and checked by its tests.
            #[allow(clippy::expect_used)]
            registry
                .register(descriptor)
                .expect("built-in ORSO schema names are unique");
        }
        registry
    }

    /// Add a descriptor; fails if its name is taken
    pub fn register(&mut self, descriptor: SchemaDescriptor) -> Result<(), SchemaError> {
        let name = descriptor.name();
        if self.schemas.contains_key(name) {
            return Err(SchemaError::DuplicateSchema(name.to_string()));
        }
        self.schemas.insert(name, Arc::new(descriptor));
        Ok(())
    }

    /// Descriptor registered under `name`
    pub fn lookup(&self, name: &str) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Process-wide registry of the ORSO record types, built on first use
pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(SchemaRegistry::orso)
}
