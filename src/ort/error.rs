use crate::dataset::DatasetError;
use crate::resolve::ResolutionError;

/// Errors that can occur while reading or writing text files
#[derive(Debug, thiserror::Error)]
pub enum OrtError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing or emitting YAML header documents
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The first line is not a valid ORSO magic line
    #[error("Not an ORSO reflectivity text file: first line is {0:?}")]
    NotCompatibleFormat(String),

    /// The dataset separator contains non-whitespace characters
    #[error("Data separator may only contain spaces, tabs and line breaks, got {0:?}")]
    InvalidSeparator(String),

    /// A data row holds a value that is not a number
    #[error("Malformed data at line {line}: {message}")]
    MalformedData {
        /// 1-based line number
        line: usize,
        /// What could not be parsed
        message: String,
    },

    /// Header documents do not pair up with data blocks
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Nothing to write
    #[error("No datasets to write")]
    NoDatasets,

    /// A header could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Dataset shape or batch rules violated
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Headers rejected by an external schema validator
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] crate::validator::SchemaViolation),
}
