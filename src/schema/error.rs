/// Errors raised by the schema registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A schema with this name is already registered
    #[error("Schema already registered: {0}")]
    DuplicateSchema(String),

    /// No schema with this name is registered
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),
}
