//! TOML configuration for both writers.
//!
//! ```toml
//! # orso.toml
//! [ort]
//! comment = "Reduced with eos"
//! data_separator = "\n"
//! precision = 10
//! column_width = 18
//!
//! [nexus]
//! compression = "stored"
//! ```
//!
//! Every key is optional and falls back to the writer defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::nexus::NexusWriterConfig;
use crate::ort::{OrtError, OrtWriterConfig};

/// Errors loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path of the config file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The content is not valid TOML for this layout
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A text writer setting is out of range
    #[error("Invalid [ort] settings: {0}")]
    Ort(#[from] OrtError),
}

/// Settings of both writers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Text writer settings
    pub ort: OrtWriterConfig,
    /// Hierarchical writer settings
    pub nexus: NexusWriterConfig,
}

impl CodecConfig {
    /// Load and check a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded codec configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and check TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.ort.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nexus::EntryCompression;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(CodecConfig::parse("").unwrap(), CodecConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = CodecConfig::parse(
            r#"
[ort]
comment = "Reduced with eos"
data_separator = "\n"
precision = 10

[nexus]
compression = "stored"
comment = "batch"
"#,
        )
        .unwrap();

        assert_eq!(config.ort.comment.as_deref(), Some("Reduced with eos"));
        assert_eq!(config.ort.data_separator, "\n");
        assert_eq!(config.ort.precision, 10);
        assert_eq!(config.ort.column_width, 22);
        assert_eq!(config.nexus.compression, EntryCompression::Stored);
        assert_eq!(config.nexus.comment.as_deref(), Some("batch"));
    }

    #[test]
    fn test_invalid_separator_rejected() {
        let err = CodecConfig::parse("[ort]\ndata_separator = \"--\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Ort(OrtError::InvalidSeparator(_))), "{}", err);
    }

    #[test]
    fn test_unknown_compression_rejected() {
        let err = CodecConfig::parse("[nexus]\ncompression = \"zstd\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orso.toml");
        std::fs::write(&path, "[ort]\nprecision = 6\n").unwrap();
        assert_eq!(CodecConfig::from_file(&path).unwrap().ort.precision, 6);

        let err = CodecConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
