use serde_json::{json, Value as Json};

use super::*;
use crate::dataset::{DataTable, DatasetError, OrsoDataset};
use crate::header::{empty_header, ColumnSpec};
use crate::resolve::{Value, WarningKind};
use crate::validator::{HeaderValidator, SchemaViolation};

fn qz_r_dataset() -> OrsoDataset {
    let header = empty_header(&[ColumnSpec::with_unit("Qz", "1/angstrom"), ColumnSpec::new("R")])
        .unwrap();
    let data = DataTable::from_columns(vec![vec![0.1, 0.2], vec![1.0, 0.5]]).unwrap();
    OrsoDataset::new(header, data).unwrap()
}

fn with_data_set(dataset: &OrsoDataset, id: Value) -> OrsoDataset {
    let (mut info, data) = dataset.clone().into_parts();
    info.set("data_set", id).unwrap();
    OrsoDataset::new(info, data).unwrap()
}

fn with_sample_name(dataset: &OrsoDataset, name: &str) -> OrsoDataset {
    let (mut info, data) = dataset.clone().into_parts();
    let mut source = info.get("data_source").and_then(Value::as_record).unwrap().clone();
    let mut sample = source.get("sample").and_then(Value::as_record).unwrap().clone();
    sample.set("name", Value::from(name)).unwrap();
    source.set("sample", sample.into()).unwrap();
    info.set("data_source", source.into()).unwrap();
    OrsoDataset::new(info, data).unwrap()
}

fn data_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.starts_with('#') && !l.trim().is_empty()).collect()
}

#[test]
fn test_qz_r_scenario() {
    let dataset = qz_r_dataset();
    let (text, _) = encode_ort(&[dataset.clone()], &OrtWriterConfig::default()).unwrap();

    assert!(text.starts_with(
        "# ORSO reflectivity data file | 1.0 standard | YAML encoding | https://www.reflectometry.org/\n"
    ));
    assert!(text.contains("\n# # Qz (1/angstrom)    R\n"), "{}", text);

    let rows = data_lines(&text);
    assert_eq!(rows.len(), 2);
    let parse = |line: &str| -> Vec<f64> {
        line.split_whitespace().map(|t| t.parse().unwrap()).collect()
    };
    assert_eq!(parse(rows[0]), vec![0.1, 1.0]);
    assert_eq!(parse(rows[1]), vec![0.2, 0.5]);
    assert_eq!(rows[0], "1.0000000000000001e-01 1.0000000000000000e+00");

    let decoded = decode_ort(&text).unwrap();
    assert_eq!(decoded.version, "1.0");
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded.datasets, vec![dataset]);
}

#[test]
fn test_second_document_holds_only_changes() {
    let first = qz_r_dataset();
    let second = with_sample_name(&first, "changed");
    let (text, _) = encode_ort(&[first.clone(), second.clone()], &OrtWriterConfig::default()).unwrap();

    let (_, tail) = text.split_once("# ---\n").unwrap();
    let yaml: String = tail
        .lines()
        .take_while(|l| l.starts_with("# ") && !l.starts_with("# # "))
        .map(|l| format!("{}\n", &l[2..]))
        .collect();
    assert!(tail.starts_with("# data_set: 1\n"), "{}", tail);

    let document: Json = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(
        document,
        json!({"data_set": 1, "data_source": {"sample": {"name": "changed"}}})
    );

    let decoded = decode_ort(&text).unwrap();
    assert_eq!(decoded.datasets[0], first);
    assert_eq!(decoded.datasets[1], with_data_set(&second, Value::Int(1)));
}

#[test]
fn test_round_trip_with_separator_and_comment() {
    let a = with_data_set(&qz_r_dataset(), Value::from("up"));
    let b = with_sample_name(&with_data_set(&a, Value::from("down")), "other");
    let c = with_data_set(&a, Value::Int(7));

    let config = OrtWriterConfig {
        comment: Some("Interdiffusion\nsecond line".to_string()),
        data_separator: "\n\n".to_string(),
        ..OrtWriterConfig::default()
    };
    let (text, _) = encode_ort(&[a.clone(), b.clone(), c.clone()], &config).unwrap();
    assert!(text.contains("\n# # Interdiffusion\n# # second line\n"));

    let decoded = decode_ort(&text).unwrap();
    assert_eq!(decoded.comment.as_deref(), Some("Interdiffusion\nsecond line"));
    assert_eq!(decoded.datasets, vec![a, b, c]);
}

#[test]
fn test_invalid_separator_rejected() {
    let config = OrtWriterConfig {
        data_separator: "\na\n".to_string(),
        ..OrtWriterConfig::default()
    };
    let err = encode_ort(&[qz_r_dataset()], &config).unwrap_err();
    assert!(matches!(err, OrtError::InvalidSeparator(_)));
}

#[test]
fn test_duplicate_ids_rejected_on_save() {
    let a = with_data_set(&qz_r_dataset(), Value::Int(0));
    let b = with_data_set(&qz_r_dataset(), Value::Int(0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.ort");
    let err = save_orso(&[a, b], &path, &OrtWriterConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        OrtError::Dataset(DatasetError::DuplicateDataSet(ref id)) if id == "0"
    ));
    assert!(!path.exists());
}

#[test]
fn test_empty_batch_rejected() {
    assert!(matches!(
        encode_ort(&[], &OrtWriterConfig::default()),
        Err(OrtError::NoDatasets)
    ));
}

#[test]
fn test_bad_magic_line() {
    let err = decode_ort("# ORSO reflectivity data file | 1.0 standard | JSON encoding\n").unwrap_err();
    assert!(matches!(err, OrtError::NotCompatibleFormat(_)));

    assert!(matches!(decode_ort(""), Err(OrtError::NotCompatibleFormat(_))));
}

#[test]
fn test_magic_line_versions() {
    assert_eq!(
        parse_magic_line(
            "# ORSO reflectivity data file | 1.0 standard | YAML encoding | https://www.reflectometry.org/"
        ),
        Some("1.0".to_string())
    );
    assert_eq!(
        parse_magic_line(
            "# ORSO reflectivity data file | 2 standard | YAML encoding | https://www.reflectometry.org/  "
        ),
        Some("2".to_string())
    );
    assert_eq!(
        parse_magic_line(
            "# ORSO reflectivity data file | 1.x standard | YAML encoding | https://www.reflectometry.org/"
        ),
        None
    );
}

#[test]
fn test_extra_fields_round_trip() {
    let (mut info, data) = qz_r_dataset().into_parts();
    info.insert_extra("ci", json!(1));
    info.insert_extra("foo", json!(["bar", 1, 2, 3.4]));
    let mut source = info.get("data_source").and_then(Value::as_record).unwrap().clone();
    source.insert_extra("test_entry", json!("test"));
    info.set("data_source", source.into()).unwrap();
    let dataset = OrsoDataset::new(info, data).unwrap();

    let decoded = decode_ort(&encode_ort(&[dataset.clone()], &OrtWriterConfig::default()).unwrap().0)
        .unwrap();
    let info = decoded.datasets[0].info();
    assert_eq!(info.extra().get("foo"), Some(&json!(["bar", 1, 2, 3.4])));
    assert_eq!(
        info.path("data_source")
            .and_then(Value::as_record)
            .and_then(|r| r.extra().get("test_entry")),
        Some(&json!("test"))
    );
    assert_eq!(decoded.datasets, vec![dataset]);
}

#[test]
fn test_removed_fields_stay_removed() {
    let second = with_data_set(&qz_r_dataset(), Value::Int(1));

    let (mut info, data) = qz_r_dataset().into_parts();
    info.insert_extra("ci", json!(1));
    let mut source = info.get("data_source").and_then(Value::as_record).unwrap().clone();
    let mut sample = source.get("sample").and_then(Value::as_record).unwrap().clone();
    sample.set("composition", Value::from("Ni")).unwrap();
    sample.insert_extra("batch", json!({"id": "A", "tray": 3}));
    source.set("sample", sample.into()).unwrap();
    info.set("data_source", source.into()).unwrap();
    let first = OrsoDataset::new(info, data).unwrap();

    let (text, _) = encode_ort(&[first.clone(), second.clone()], &OrtWriterConfig::default()).unwrap();
    assert!(text.contains("# ci: null\n"), "{}", text);

    let decoded = decode_ort(&text).unwrap();
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert!(decoded.datasets[1].info().extra().is_empty());
    assert_eq!(decoded.datasets, vec![first, second]);
}

#[test]
fn test_unrepresentable_header_value_is_reported() {
    let (mut info, data) = with_data_set(&qz_r_dataset(), Value::Int(1)).into_parts();
    let mut source = info.get("data_source").and_then(Value::as_record).unwrap().clone();
    let mut measurement = source.get("measurement").and_then(Value::as_record).unwrap().clone();
    let mut settings = measurement
        .get("instrument_settings")
        .and_then(Value::as_record)
        .unwrap()
        .clone();
    let angle = crate::resolve::Record::build("Value", [("magnitude", Value::Float(f64::NAN))])
        .unwrap();
    settings.set("incident_angle", angle.into()).unwrap();
    measurement.set("instrument_settings", settings.into()).unwrap();
    source.set("measurement", measurement.into()).unwrap();
    info.set("data_source", source.into()).unwrap();
    let second = OrsoDataset::new(info, data).unwrap();

    let (text, warnings) = encode_ort(&[qz_r_dataset(), second], &OrtWriterConfig::default()).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].path,
        "[1].data_source.measurement.instrument_settings.incident_angle.magnitude"
    );
    assert!(matches!(warnings[0].kind, WarningKind::Unrepresentable { .. }));

    let decoded = decode_ort(&text).unwrap();
    assert_eq!(decoded.datasets.len(), 2);
    assert!(decoded.warnings.iter().all(|w| w.path.starts_with("[1].")));
}

#[test]
fn test_non_finite_values_round_trip() {
    let header = empty_header(&[ColumnSpec::new("Qz"), ColumnSpec::new("R")]).unwrap();
    let data = DataTable::from_columns(vec![
        vec![f64::NAN, 0.2],
        vec![f64::INFINITY, f64::NEG_INFINITY],
    ])
    .unwrap();
    let dataset = OrsoDataset::new(header, data).unwrap();

    let (text, _) = encode_ort(&[dataset.clone()], &OrtWriterConfig::compact()).unwrap();
    let rows = data_lines(&text);
    assert!(rows[0].starts_with("nan"));
    assert!(rows[1].ends_with("-inf"));
    assert_eq!(decode_ort(&text).unwrap().datasets, vec![dataset]);
}

#[test]
fn test_format_float() {
    assert_eq!(format_float(0.1, 16), "1.0000000000000001e-01");
    assert_eq!(format_float(1.0, 16), "1.0000000000000000e+00");
    assert_eq!(format_float(-2.5e-10, 3), "-2.500e-10");
    assert_eq!(format_float(1e100, 3), "1.000e+100");
    assert_eq!(format_float(f64::NAN, 3), "nan");
    assert_eq!(format_float(f64::NEG_INFINITY, 3), "-inf");
}

#[test]
fn test_malformed_row() {
    let (text, _) = encode_ort(&[qz_r_dataset()], &OrtWriterConfig::default()).unwrap();
    let broken = text.replacen("1.0000000000000001e-01", "zero", 1);
    let line = broken.lines().position(|l| l.starts_with("zero")).unwrap() + 1;

    match decode_ort(&broken).unwrap_err() {
        OrtError::MalformedData { line: reported, .. } => assert_eq!(reported, line),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_hand_written_file_without_separators() {
    let text = "\
# ORSO reflectivity data file | 1.0 standard | YAML encoding | https://www.reflectometry.org/
# data_source:
#   owner: {name: A, affiliation: B}
#   experiment: {title: t, instrument: i, start_date: 2024-01-02T10:00:00+01:00, probe: x-ray}
#   sample: {name: s}
#   measurement:
#     instrument_settings:
#       incident_angle: {magnitude: 0.3, unit: deg}
#       wavelength: {magnitude: 1.54, unit: angstrom}
#       polarization: pp
#     data_files: scan.raw
# reduction: {software: {name: red}}
# columns:
# - {name: Qz, unit: 1/angstrom}
# - {name: R}
# - {error_of: R, distribution: undefined}
  0.1 1.0 0.01
  0.2 0.5 0.02
# data_set: 1
# data_source: {sample: {name: t}}
0.3 0.1 0.001
";
    let decoded = decode_ort(text).unwrap();
    assert_eq!(decoded.datasets.len(), 2);
    assert_eq!(decoded.datasets[1].data().num_rows(), 1);

    let first = decoded.datasets[0].info();
    let files = first.path("data_source.measurement.data_files").unwrap();
    assert_eq!(files, &Value::List(vec![Value::from("scan.raw")]));

    assert_eq!(decoded.warnings.len(), 2);
    assert!(decoded
        .warnings
        .iter()
        .all(|w| matches!(&w.kind, WarningKind::InvalidLiteral { value, .. } if value == "undefined")));
    assert!(decoded.warnings[0].path.starts_with("[0]."));
    assert!(decoded.warnings[1].path.starts_with("[1]."));
    assert_eq!(
        decoded.datasets[1]
            .info()
            .path("data_source.sample.name")
            .and_then(Value::as_str),
        Some("t")
    );
}

struct RejectAll;

impl HeaderValidator for RejectAll {
    fn validate(&self, headers: &[Json]) -> Result<(), SchemaViolation> {
        Err(SchemaViolation::new(format!("{} headers rejected", headers.len())))
    }
}

#[test]
fn test_validator_hook() {
    let (text, _) = encode_ort(&[qz_r_dataset()], &OrtWriterConfig::default()).unwrap();
    let err = read_ort_validated(&text, &RejectAll).unwrap_err();
    assert!(matches!(err, OrtError::SchemaViolation(_)));
    assert!(err.to_string().contains("1 headers rejected"));
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.ort");
    let dataset = qz_r_dataset();

    save_orso(&[dataset.clone()], &path, &OrtWriterConfig::default()).unwrap();
    let loaded: Vec<OrsoDataset> = load_orso(&path).unwrap();
    assert_eq!(loaded, vec![dataset]);
}
