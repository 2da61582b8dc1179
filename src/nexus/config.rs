use serde::{Deserialize, Serialize};
use zip::CompressionMethod;

/// Compression applied to tree entries (the mimetype entry is always stored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryCompression {
    /// No compression
    Stored,
    /// Deflate, smaller files
    #[default]
    Deflated,
}

impl EntryCompression {
    pub(super) fn method(self) -> CompressionMethod {
        match self {
            EntryCompression::Stored => CompressionMethod::Stored,
            EntryCompression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Configuration for the hierarchical writer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NexusWriterConfig {
    /// Entry compression
    pub compression: EntryCompression,
    /// Free-text comment stored on the root group
    pub comment: Option<String>,
}

impl NexusWriterConfig {
    /// Uncompressed entries, fastest to write and read
    pub fn uncompressed() -> Self {
        Self {
            compression: EntryCompression::Stored,
            ..Self::default()
        }
    }

    /// Default layout with a comment
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }
}
