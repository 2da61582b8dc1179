use std::fmt;

use crate::schema::SchemaError;

/// Fatal failure to construct a value of its declared type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    /// The raw value has a kind the declared type cannot accept
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Dotted location of the value
        path: String,
        /// Declared type
        expected: String,
        /// Kind of the raw value
        found: String,
    },

    /// A tuple with the wrong number of elements
    #[error("{path}: expected {expected} elements, found {found}")]
    TupleArity {
        /// Dotted location of the value
        path: String,
        /// Declared arity
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// A string outside the allowed enumeration
    #[error("{path}: '{value}' is not one of {allowed}")]
    InvalidLiteral {
        /// Dotted location of the value
        path: String,
        /// Offending value
        value: String,
        /// Allowed values
        allowed: String,
    },

    /// No union candidate accepted the value
    #[error("{path}: no candidate of {expected} accepted the value ({source})")]
    UnionMismatch {
        /// Dotted location of the value
        path: String,
        /// Declared union
        expected: String,
        /// First candidate failure
        source: Box<ResolutionError>,
    },

    /// A required field is absent or null
    #[error("{record}: missing required field '{field}'")]
    MissingField {
        /// Record type name
        record: String,
        /// Field name
        field: String,
    },

    /// A record-level constructor check rejected the record
    #[error("{record}: {message}")]
    Validation {
        /// Record type name
        record: String,
        /// Check message
        message: String,
    },

    /// A required field of the root record could not be resolved
    #[error("{record}.{field}: {source}")]
    Field {
        /// Record type name
        record: String,
        /// Field name
        field: String,
        /// Underlying failure
        source: Box<ResolutionError>,
    },

    /// Schema lookup failure
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// What kind of recoverable problem a warning reports
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// Raw value kept because it could not be coerced
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Kind of the raw value
        found: String,
    },
    /// Tuple truncated to its declared arity, or left short
    TupleArity {
        /// Declared arity
        expected: usize,
        /// Actual length
        found: usize,
    },
    /// Value kept as a string outside its enumeration
    InvalidLiteral {
        /// Offending value
        value: String,
        /// Allowed values
        allowed: String,
    },
    /// Mapping kept raw because key/value types are undeclared
    UntypedMap,
    /// A whole field kept raw after it failed to resolve
    FieldFallback {
        /// Why the field failed
        cause: String,
    },
    /// Value could not be encoded and was replaced by a placeholder
    Unrepresentable {
        /// Why the value could not be encoded
        reason: String,
    },
    /// A record tag the declared type does not admit
    UnexpectedTag {
        /// Declared type
        expected: String,
        /// Tag found in the input
        found: String,
    },
}

/// Recoverable problem found while resolving or encoding a value
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionWarning {
    /// Dotted location of the value
    pub path: String,
    /// What went wrong
    pub kind: WarningKind,
}

impl ResolutionWarning {
    /// Create a warning at `path`
    pub fn new(path: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        match &self.kind {
            WarningKind::TypeMismatch { expected, found } => {
                write!(f, "{}: expected {}, kept {} value", path, expected, found)
            }
            WarningKind::TupleArity { expected, found } => write!(
                f,
                "{}: expected {} elements, found {}; kept the first {}",
                path,
                expected,
                found,
                expected.min(found)
            ),
            WarningKind::InvalidLiteral { value, allowed } => {
                write!(f, "{}: '{}' is not one of {}", path, value, allowed)
            }
            WarningKind::UntypedMap => write!(f, "{}: untyped mapping kept as is", path),
            WarningKind::FieldFallback { cause } => {
                write!(f, "{}: kept raw value ({})", path, cause)
            }
            WarningKind::Unrepresentable { reason } => {
                write!(f, "{}: replaced by placeholder ({})", path, reason)
            }
            WarningKind::UnexpectedTag { expected, found } => {
                write!(f, "{}: record '{}' where {} was declared", path, found, expected)
            }
        }
    }
}
