use crate::dataset::DatasetError;
use crate::resolve::ResolutionError;

/// Errors that can occur while reading or writing hierarchical files
#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the ZIP container library
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error serializing/deserializing node payloads
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Container is not an ORSO hierarchical file
    #[error("Not an ORSO hierarchical file: {0}")]
    NotOrbFile(String),

    /// Tree structure does not follow the expected layout
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    /// Two datasets map to the same entry name
    #[error("Duplicate entry name: {0}")]
    DuplicateEntry(String),

    /// Nothing to write
    #[error("No datasets to write")]
    NoDatasets,

    /// A header could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Dataset shape or batch rules violated
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}
