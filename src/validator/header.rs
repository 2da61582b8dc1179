use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as Json;

use crate::dataset::OrsoDataset;
use crate::nexus::load_nexus_file;
use crate::ort::{read_ort_validated, OrtError};
use crate::resolve::ResolutionWarning;

use super::{FileFormat, HeaderValidator, ValidationCheck, ValidationError, ValidationReport};

/// Warnings listed one by one before they are summarized
const MAX_LISTED_WARNINGS: usize = 10;

/// Step 2 and 3: header resolution and schema contract
pub(crate) fn check_headers(
    path: &Path,
    format: FileFormat,
    validator: &dyn HeaderValidator,
    report: &mut ValidationReport,
) -> Result<Vec<OrsoDataset>> {
    let (version, datasets, warnings) = match format {
        FileFormat::Text => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match read_ort_validated(&text, validator) {
                Ok(ort) => {
                    report.add_check(ValidationCheck::ok("Header schema contract"));
                    (ort.version, ort.datasets, ort.warnings)
                }
                Err(OrtError::SchemaViolation(violation)) => {
                    report.add_check(ValidationCheck::failed(
                        "Header schema contract",
                        violation.to_string(),
                    ));
                    anyhow::bail!(ValidationError::Header(violation.to_string()));
                }
                Err(e) => return fail_resolution(report, e.to_string()),
            }
        }
        FileFormat::Hierarchical => {
            let nexus = match load_nexus_file(path) {
                Ok(nexus) => nexus,
                Err(e) => return fail_resolution(report, e.to_string()),
            };
            let plain: Vec<Json> = nexus.datasets.iter().map(|d| d.info().to_plain()).collect();
            match validator.validate(&plain) {
                Ok(()) => report.add_check(ValidationCheck::ok("Header schema contract")),
                Err(violation) => {
                    report.add_check(ValidationCheck::failed(
                        "Header schema contract",
                        violation.to_string(),
                    ));
                    anyhow::bail!(ValidationError::Header(violation.to_string()));
                }
            }
            (nexus.version, nexus.datasets, nexus.warnings)
        }
    };

    report.add_check(ValidationCheck::ok(format!(
        "Headers resolved ({} datasets, ORSO {})",
        datasets.len(),
        version
    )));
    report_warnings(&warnings, report);
    Ok(datasets)
}

fn fail_resolution(report: &mut ValidationReport, message: String) -> Result<Vec<OrsoDataset>> {
    report.add_check(ValidationCheck::failed("Headers resolved", message.clone()));
    anyhow::bail!(ValidationError::Header(message))
}

fn report_warnings(warnings: &[ResolutionWarning], report: &mut ValidationReport) {
    for warning in warnings.iter().take(MAX_LISTED_WARNINGS) {
        report.add_check(ValidationCheck::warning("Header value", warning.to_string()));
    }
    if warnings.len() > MAX_LISTED_WARNINGS {
        report.add_check(ValidationCheck::warning(
            "Header value",
            format!("{} more warnings", warnings.len() - MAX_LISTED_WARNINGS),
        ));
    }
}
