//! Integration tests for orso
//!
//! These tests drive both encodings through real files and check that the
//! datasets, the file metadata and the extras survive.

use orso::dataset::{DataTable, OrsoDataset};
use orso::header::{empty_header, ColumnSpec, DataSetId};
use orso::nexus::{load_nexus, load_nexus_file, save_nexus, NexusWriterConfig};
use orso::ort::{load_orso, load_orso_file, save_orso, OrtWriterConfig};
use orso::resolve::Value;
use orso::validator::validate_orso_file;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::with_unit("Qz", "1/angstrom"),
        ColumnSpec::new("R"),
        ColumnSpec::error_of("R"),
    ]
}

fn reflectivity_curve(points: usize) -> DataTable {
    let qz: Vec<f64> = (0..points).map(|i| 0.005 + i as f64 * 0.002).collect();
    let r: Vec<f64> = qz.iter().map(|q| (0.01 / q).powi(4).min(1.0)).collect();
    let dr: Vec<f64> = r.iter().map(|r| r * 0.05).collect();
    DataTable::from_columns(vec![qz, r, dr]).unwrap()
}

fn dataset(id: Option<Value>, sample: &str) -> OrsoDataset {
    let mut header = empty_header(&columns()).unwrap();
    let mut source = header.get("data_source").and_then(Value::as_record).unwrap().clone();
    let mut sample_record = source.get("sample").and_then(Value::as_record).unwrap().clone();
    sample_record.set("name", Value::from(sample)).unwrap();
    source.set("sample", sample_record.into()).unwrap();
    header.set("data_source", source.into()).unwrap();
    if let Some(id) = id {
        header.set("data_set", id).unwrap();
    }
    OrsoDataset::new(header, reflectivity_curve(40)).unwrap()
}

fn batch() -> Vec<OrsoDataset> {
    let first = dataset(None, "Ni on Si");
    let (mut info, data) = dataset(Some(Value::from("spin_down")), "Ni on Si").into_parts();
    info.insert_extra("beamline_notes", json!({"slit": [0.4, 0.8], "operator": "night shift"}));
    let second = OrsoDataset::new(info, data).unwrap();
    vec![first, second]
}

/// Test the complete write-read cycle of the text encoding
#[test]
fn test_text_write_read_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan.ort");
    let datasets = batch();

    let warnings =
        save_orso(&datasets, &path, &OrtWriterConfig::with_comment("reduced on site")).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);

    let file = load_orso_file(&path).unwrap();
    assert_eq!(file.version, "1.0");
    assert_eq!(file.comment.as_deref(), Some("reduced on site"));
    assert!(file.warnings.is_empty(), "{:?}", file.warnings);
    assert_eq!(file.datasets, datasets);
    assert_eq!(
        file.datasets[1].info().extra()["beamline_notes"],
        json!({"slit": [0.4, 0.8], "operator": "night shift"})
    );
}

/// Test the complete write-read cycle of the hierarchical encoding
#[test]
fn test_hierarchical_write_read_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan.orb");
    let datasets = batch();

    let warnings =
        save_nexus(&datasets, &path, &NexusWriterConfig::with_comment("reduced on site")).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);

    let file = load_nexus_file(&path).unwrap();
    assert_eq!(file.comment.as_deref(), Some("reduced on site"));
    assert!(file.warnings.is_empty(), "{:?}", file.warnings);
    assert_eq!(file.datasets, datasets);
}

/// Test that a file converted between encodings keeps its datasets
#[test]
fn test_cross_encoding_conversion() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("scan.ort");
    let tree_path = dir.path().join("scan.orb");
    let back_path = dir.path().join("again.ort");
    let datasets = batch();

    save_orso(&datasets, &text_path, &OrtWriterConfig::default()).unwrap();
    let from_text = load_orso(&text_path).unwrap();
    save_nexus(&from_text, &tree_path, &NexusWriterConfig::default()).unwrap();
    let from_tree = load_nexus(&tree_path).unwrap();
    save_orso(&from_tree, &back_path, &OrtWriterConfig::default()).unwrap();

    assert_eq!(from_tree, datasets);
    assert_eq!(load_orso(&back_path).unwrap(), datasets);
}

/// Test that identifiers default to the batch position
#[test]
fn test_default_identifiers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("three.ort");
    let datasets = vec![dataset(None, "a"), dataset(None, "b"), dataset(None, "c")];

    save_orso(&datasets, &path, &OrtWriterConfig::default()).unwrap();
    let loaded = load_orso(&path).unwrap();

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].data_set(), None);
    assert_eq!(loaded[1].data_set(), Some(DataSetId::Index(1)));
    assert_eq!(loaded[2].data_set(), Some(DataSetId::Index(2)));
    let names: Vec<&str> = loaded
        .iter()
        .map(|d| d.info().path("data_source.sample.name").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

/// Test that a failing save leaves an existing file untouched
#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan.ort");
    save_orso(&batch(), &path, &OrtWriterConfig::default()).unwrap();
    let before = fs::read(&path).unwrap();

    let clash = vec![dataset(Some(Value::Int(3)), "a"), dataset(Some(Value::Int(3)), "b")];
    assert!(save_orso(&clash, &path, &OrtWriterConfig::default()).is_err());
    assert!(save_nexus(&clash, dir.path().join("scan.orb"), &NexusWriterConfig::default()).is_err());

    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!dir.path().join("scan.orb").exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

/// Test the validator over files written by both codecs
#[test]
fn test_validate_written_files() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("scan.ort");
    let tree_path = dir.path().join("scan.orb");
    save_orso(&batch(), &text_path, &OrtWriterConfig::default()).unwrap();
    save_nexus(&batch(), &tree_path, &NexusWriterConfig::default()).unwrap();

    for path in [&text_path, &tree_path] {
        let report = validate_orso_file(path).unwrap();
        assert!(report.is_valid(), "{}", report);
        assert!(!report.has_failures());
    }
}
