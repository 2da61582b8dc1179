use std::path::PathBuf;

use serde_json::json;

use super::*;
use crate::dataset::{DataTable, OrsoDataset};
use crate::header::{empty_header, ColumnSpec};
use crate::nexus::{save_nexus, NexusWriterConfig};
use crate::ort::{save_orso, OrtWriterConfig};

fn dataset(columns: &[ColumnSpec], data: Vec<Vec<f64>>) -> OrsoDataset {
    let header = empty_header(columns).unwrap();
    OrsoDataset::new(header, DataTable::from_columns(data).unwrap()).unwrap()
}

fn reflectivity() -> OrsoDataset {
    dataset(
        &[
            ColumnSpec::with_unit("Qz", "1/angstrom"),
            ColumnSpec::new("R"),
            ColumnSpec::error_of("R"),
        ],
        vec![vec![0.01, 0.02], vec![1.0, 0.8], vec![0.01, 0.02]],
    )
}

fn save_text(dir: &tempfile::TempDir, name: &str, datasets: &[OrsoDataset]) -> PathBuf {
    let path = dir.path().join(name);
    save_orso(datasets, &path, &OrtWriterConfig::default()).unwrap();
    path
}

#[test]
fn test_validation_report_display() {
    let mut report = ValidationReport::new("test.ort");
    report.add_check(ValidationCheck::ok("Test check 1"));
    report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Test check 3", "This failed"));

    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
    assert!(!report.is_valid());
}

#[test]
fn test_valid_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_text(&dir, "good.ort", &[reflectivity()]);

    let report = validate_orso_file(&path).unwrap();
    assert!(report.is_valid(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    assert!(report
        .checks
        .iter()
        .any(|c| c.name == "Magic line (ORSO 1.0)"));
}

#[test]
fn test_valid_container_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("good.orb");
    save_nexus(&[reflectivity()], &path, &NexusWriterConfig::default()).unwrap();

    assert_eq!(detect_format(&path), Some(FileFormat::Hierarchical));
    let report = validate_orso_file(&path).unwrap();
    assert!(report.is_valid(), "{}", report);
}

#[test]
fn test_format_detected_from_content() {
    let dir = tempfile::tempdir().unwrap();
    let text = save_text(&dir, "good.ort", &[reflectivity()]);
    let renamed = dir.path().join("good.dat");
    std::fs::rename(&text, &renamed).unwrap();
    assert_eq!(detect_format(&renamed), Some(FileFormat::Text));

    let other = dir.path().join("notes.txt");
    std::fs::write(&other, "hello\n").unwrap();
    assert_eq!(detect_format(&other), None);
    assert!(validate_orso_file(&other).is_err());
}

#[test]
fn test_missing_file() {
    let err = validate_orso_file(std::path::Path::new("/nonexistent/data.ort")).unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{}", err);
}

#[test]
fn test_missing_magic_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ort");
    std::fs::write(&path, "# not an ORSO file\n1 2\n").unwrap();
    assert!(validate_orso_file(&path).is_err());
}

#[test]
fn test_custom_schema_contract() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_text(&dir, "good.ort", &[reflectivity()]);

    let strict = RequiredKeys::new(["data_source", "reduction", "instrument_log"]);
    let err = validate_orso_file_with(&path, &strict).unwrap_err();
    assert!(err.to_string().contains("instrument_log"), "{}", err);

    assert!(validate_orso_file_with(&path, &AcceptAll).is_ok());
}

#[test]
fn test_required_keys() {
    let validator = RequiredKeys::default();
    assert!(validator
        .validate(&[json!({"data_source": {}, "reduction": {}, "columns": [{"name": "Qz"}]})])
        .is_ok());
    assert!(validator
        .validate(&[json!({"data_source": {}, "reduction": {}, "columns": []})])
        .is_err());
    assert!(validator.validate(&[json!([1, 2])]).is_err());
}

#[test]
fn test_data_sanity_findings() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dataset(
        &[
            ColumnSpec::new("Qz"),
            ColumnSpec::new("R"),
            ColumnSpec::error_of("dR"),
        ],
        vec![vec![0.01, 0.02], vec![1.0, f64::NAN], vec![0.1, 0.2]],
    );
    let path = save_text(&dir, "odd.ort", &[broken]);

    let report = validate_orso_file(&path).unwrap();
    assert_eq!(report.failure_count(), 1, "{}", report);
    let failed = report
        .checks
        .iter()
        .find(|c| matches!(c.status, CheckStatus::Failed(_)))
        .unwrap();
    assert_eq!(failed.name, "[0] Error column sdR");

    let warned: Vec<&str> = report
        .checks
        .iter()
        .filter(|c| matches!(c.status, CheckStatus::Warning(_)))
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(warned, vec!["[0] Finite values", "[0] Abscissa unit"]);
}

#[test]
fn test_negative_errors_warned() {
    let dir = tempfile::tempdir().unwrap();
    let negative = dataset(
        &[
            ColumnSpec::with_unit("Qz", "1/angstrom"),
            ColumnSpec::new("R"),
            ColumnSpec::error_of("R"),
        ],
        vec![vec![0.01, 0.02], vec![1.0, 0.8], vec![-0.01, 0.02]],
    );
    let path = save_text(&dir, "negative.ort", &[negative]);

    let report = validate_orso_file(&path).unwrap();
    assert!(report.is_valid());
    assert_eq!(report.warning_count(), 1, "{}", report);
}
