use serde::{Deserialize, Serialize};

use super::OrtError;

/// Configuration for the text writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrtWriterConfig {
    /// Free-text comment written below the magic line, one `# # ` line per
    /// text line
    pub comment: Option<String>,

    /// Inserted before every dataset after the first.
    /// May only contain spaces, tabs and line breaks.
    pub data_separator: String,

    /// Significant digits after the decimal point of each value
    pub precision: usize,

    /// Minimum width of each value column
    pub column_width: usize,
}

impl Default for OrtWriterConfig {
    fn default() -> Self {
        Self {
            comment: None,
            data_separator: String::new(),
            precision: 16,
            column_width: 22,
        }
    }
}

impl OrtWriterConfig {
    /// Default layout with a comment line
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// Compact layout: fewer digits, narrower columns
    pub fn compact() -> Self {
        Self {
            precision: 8,
            column_width: 15,
            ..Self::default()
        }
    }

    /// Blank line between datasets
    pub fn spaced() -> Self {
        Self {
            data_separator: "\n".to_string(),
            ..Self::default()
        }
    }

    /// Check the separator only holds whitespace the reader ignores
    pub fn validate(&self) -> Result<(), OrtError> {
        if self
            .data_separator
            .chars()
            .any(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
        {
            return Err(OrtError::InvalidSeparator(self.data_separator.clone()));
        }
        Ok(())
    }
}
