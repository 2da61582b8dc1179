//! # ORSO File Validation
//!
//! Integrity report for `.ort` and `.orb` files, plus the seam through which
//! readers hand plain headers to an external schema checker.
//!
//! ## Validation Checklist
//!
//! 1. **Structure Check**: the file exists, its format is recognised, and the
//!    magic line or container mimetype is in place
//! 2. **Header Resolution**: every header resolves; recoverable problems are
//!    listed as warnings
//! 3. **Schema Contract**: the plain headers pass a [`HeaderValidator`]
//! 4. **Data Sanity**: row counts, non-finite values, units and error columns
//!
//! ## Usage
//!
//! ```rust,no_run
//! use orso::validator::validate_orso_file;
//! use std::path::Path;
//!
//! match validate_orso_file(Path::new("data.ort")) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("Validation failed: {}", e),
//! }
//! ```

use std::path::Path;

use anyhow::Result;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};
pub use schema::{AcceptAll, HeaderValidator, RequiredKeys, SchemaViolation};
pub use structure::detect_format;

mod data;
mod header;
mod report;
mod schema;
mod structure;

#[cfg(test)]
mod tests;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The file is missing or not an ORSO file
    #[error("Structure error: {0}")]
    Structure(String),

    /// A header failed to resolve or was rejected
    #[error("Header error: {0}")]
    Header(String),
}

/// Encoding of an ORSO file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.ort` text
    Text,
    /// `.orb` ZIP container
    Hierarchical,
}

/// Validate a file with the [`RequiredKeys`] schema contract
pub fn validate_orso_file(path: &Path) -> Result<ValidationReport> {
    validate_orso_file_with(path, &RequiredKeys::default())
}

/// Validate a file, using `validator` for the schema contract.
///
/// Checks stop at the first step that leaves nothing to inspect; the error
/// carries the reason and the report up to that point is lost.
pub fn validate_orso_file_with(
    path: &Path,
    validator: &dyn HeaderValidator,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());

    // 1. Structure Check
    let format = structure::check_structure(path, &mut report)?;

    // 2 and 3. Header Resolution and Schema Contract
    let datasets = header::check_headers(path, format, validator, &mut report)?;

    // 4. Data Sanity Check
    data::check_data_sanity(&datasets, &mut report)?;

    log::debug!(
        "Validated {}: {} passed, {} warnings, {} failed",
        report.file_path,
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    Ok(report)
}
