use std::fmt;

use serde_json::Value as Json;

use crate::schema::COLUMNS_FIELD;

/// A header rejected by a [`HeaderValidator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    message: String,
}

impl SchemaViolation {
    /// Violation with a human-readable reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Why the header was rejected
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchemaViolation {}

/// Checks plain header mappings before they are resolved.
///
/// Readers hand over every header of a file at once, after later headers
/// have been merged onto the first, so implementations see complete
/// mappings. A JSON-Schema engine can be plugged in here.
pub trait HeaderValidator {
    /// Accept or reject the headers of one file
    fn validate(&self, headers: &[Json]) -> Result<(), SchemaViolation>;
}

/// Accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl HeaderValidator for AcceptAll {
    fn validate(&self, _headers: &[Json]) -> Result<(), SchemaViolation> {
        Ok(())
    }
}

/// Requires a set of top-level keys in every header and a non-empty
/// column list
#[derive(Debug, Clone)]
pub struct RequiredKeys {
    keys: Vec<String>,
}

impl RequiredKeys {
    /// Validator requiring `keys` on top of the column list
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for RequiredKeys {
    fn default() -> Self {
        Self::new(["data_source", "reduction"])
    }
}

impl HeaderValidator for RequiredKeys {
    fn validate(&self, headers: &[Json]) -> Result<(), SchemaViolation> {
        for (i, header) in headers.iter().enumerate() {
            let Some(object) = header.as_object() else {
                return Err(SchemaViolation::new(format!("header {} is not a mapping", i)));
            };
            if let Some(key) = self.keys.iter().find(|k| !object.contains_key(k.as_str())) {
                return Err(SchemaViolation::new(format!(
                    "header {} has no '{}'",
                    i, key
                )));
            }
            match object.get(COLUMNS_FIELD) {
                Some(Json::Array(columns)) if !columns.is_empty() => {}
                _ => {
                    return Err(SchemaViolation::new(format!(
                        "header {} has no column descriptors",
                        i
                    )))
                }
            }
        }
        Ok(())
    }
}
