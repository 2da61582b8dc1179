//! # Record Schema
//!
//! Declarative description of every header record type: field names, their
//! declared [`TypeExpr`], and which fields may be omitted.
//!
//! A [`SchemaRegistry`] maps record type names to descriptors. Tree encodings
//! only carry the type name as a tag, so decoders use the registry to rebuild
//! concrete records. The process-wide [`registry()`] is filled with the ORSO
//! record types on first use and is read-only afterwards.
//!
//! ```rust
//! use orso::schema::{registry, SchemaDescriptor, SchemaRegistry, TypeExpr};
//!
//! assert!(registry().contains("Orso"));
//!
//! let mut custom = SchemaRegistry::new();
//! custom
//!     .register(SchemaDescriptor::new("Point").field("xyz", TypeExpr::tuple(vec![
//!         TypeExpr::float(),
//!         TypeExpr::float(),
//!         TypeExpr::float(),
//!     ])))
//!     .unwrap();
//! assert!(custom.register(SchemaDescriptor::new("Point")).is_err());
//! ```

mod constants;
mod error;
mod registry;
mod types;

#[cfg(test)]
mod tests;

pub use constants::*;
pub use error::SchemaError;
pub use registry::{registry, SchemaRegistry};
pub use types::{FieldDescriptor, RecordCheck, ScalarKind, SchemaDescriptor, TypeExpr};
