use serde_json::json;

use super::*;
use crate::resolve::{Record, ResolutionError, Value, WarningKind};

fn header_json() -> serde_json::Value {
    json!({
        "data_source": {
            "owner": {"name": "A. User", "affiliation": "Institute"},
            "experiment": {
                "title": "Ni on Si",
                "instrument": "Amor",
                "start_date": "2024-03-01",
                "probe": "neutron"
            },
            "sample": {"name": "Ni1000"},
            "measurement": {
                "instrument_settings": {
                    "incident_angle": {"magnitude": 0.5, "unit": "deg"},
                    "wavelength": {"min": 3.0, "max": 12.0, "unit": "angstrom"}
                },
                "data_files": ["run_0001.hdf", {"file": "run_0002.hdf"}]
            }
        },
        "reduction": {"software": {"name": "eos"}},
        "columns": [
            {"name": "Qz", "unit": "1/angstrom"},
            {"name": "R"},
            {"error_of": "R", "error_type": "uncertainty"}
        ],
        "data_set": "spin_up"
    })
}

#[test]
fn test_full_header_resolves_without_warnings() {
    let (header, warnings) = Record::from_raw("Orso", &header_json()).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);

    let wavelength = header
        .path("data_source.measurement.instrument_settings.wavelength")
        .and_then(Value::as_record)
        .unwrap();
    assert_eq!(wavelength.schema_name(), "ValueRange");

    let files = header
        .path("data_source.measurement.data_files")
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(files[0], Value::Str("run_0001.hdf".to_string()));
    assert_eq!(files[1].as_record().unwrap().schema_name(), "File");

    assert_eq!(data_set(&header), Some(DataSetId::Name("spin_up".to_string())));
}

#[test]
fn test_columns_view() {
    let (header, _) = Record::from_raw("Orso", &header_json()).unwrap();
    let cols = columns(&header);

    assert_eq!(cols.len(), 3);
    assert_eq!(cols[0].label(), "Qz (1/angstrom)");
    assert_eq!(cols[1].label(), "R");
    assert_eq!(cols[2].name(), "sR");
    match &cols[2] {
        ColumnSpec::Error { error_of, model } => {
            assert_eq!(error_of, "R");
            assert_eq!(model.error_type.as_deref(), Some("uncertainty"));
            assert_eq!(model.value_is, None);
        }
        other => panic!("unexpected column {:?}", other),
    }
}

#[test]
fn test_missing_required_root_field_is_fatal() {
    let mut raw = header_json();
    raw.as_object_mut().unwrap().remove("reduction");

    let err = Record::from_raw("Orso", &raw).unwrap_err();
    assert_eq!(
        err,
        ResolutionError::MissingField {
            record: "Orso".to_string(),
            field: "reduction".to_string(),
        }
    );
}

#[test]
fn test_nested_failure_degrades_to_warning() {
    let mut raw = header_json();
    raw["data_source"]["sample"] = json!({"composition": "Ni"});

    let (header, warnings) = Record::from_raw("Orso", &raw).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].path, "data_source.sample");
    assert!(matches!(warnings[0].kind, WarningKind::FieldFallback { .. }));
    assert_eq!(
        header.path("data_source.sample"),
        Some(&Value::Raw(json!({"composition": "Ni"})))
    );
}

#[test]
fn test_invalid_polarization_keeps_raw() {
    let mut raw = header_json();
    raw["data_source"]["measurement"]["instrument_settings"]["polarization"] = json!("sideways");

    let (header, warnings) = Record::from_raw("Orso", &raw).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        header.path("data_source.measurement.instrument_settings.polarization"),
        Some(&Value::Raw(json!("sideways")))
    );
}

#[test]
fn test_non_ascii_unit_rejected() {
    let err = Record::from_raw("Value", &json!({"magnitude": 1.0, "unit": "Å"})).unwrap_err();
    assert!(matches!(err, ResolutionError::Validation { .. }));
}

#[test]
fn test_sample_parameters_union() {
    let raw = json!({
        "name": "multilayer",
        "sample_parameters": {
            "thickness": {"magnitude": 50, "unit": "nm"},
            "roughness": {"min": 1.0, "max": 3.0, "unit": "angstrom"},
            "sld": {"real": 4.1e-6, "imag": 1.0e-9}
        }
    });
    let (sample, warnings) = Record::from_raw("Sample", &raw).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);

    let Some(Value::Map(entries)) = sample.get("sample_parameters") else {
        panic!("sample_parameters not resolved");
    };
    let kinds: Vec<_> = entries
        .iter()
        .map(|(_, v)| v.as_record().unwrap().schema_name())
        .collect();
    assert_eq!(kinds, vec!["Value", "ValueRange", "ComplexValue"]);
    assert_eq!(
        entries[0].1.as_record().unwrap().get("magnitude"),
        Some(&Value::Float(50.0))
    );
}

#[test]
fn test_sigma_factors() {
    let fwhm = |distribution: &str| ErrorModel {
        error_type: None,
        value_is: Some("FWHM".to_string()),
        distribution: Some(distribution.to_string()),
    };

    assert_eq!(ErrorModel::sigma().to_sigma(), Ok(1.0));
    assert_eq!(ErrorModel::default().to_sigma(), Ok(1.0));

    let gaussian = fwhm("gaussian").to_sigma().unwrap();
    assert!((gaussian - 0.424_660_900_144_009_5).abs() < 1e-12);
    assert!((fwhm("triangular").to_sigma().unwrap() - 1.0 / 6f64.sqrt()).abs() < 1e-15);
    assert!((fwhm("uniform").to_sigma().unwrap() - 1.0 / 12f64.sqrt()).abs() < 1e-15);
    assert_eq!(
        fwhm("lorentzian").to_sigma(),
        Err(SigmaError::Undefined("lorentzian".to_string()))
    );
    assert!(matches!(fwhm("undefined").to_sigma(), Err(SigmaError::NotImplemented(_))));
}

#[test]
fn test_empty_header_round_trips_through_plain() {
    let header = empty_header(&[ColumnSpec::with_unit("Qz", "1/angstrom"), ColumnSpec::new("R")])
        .unwrap();
    let (again, warnings) = Record::from_raw("Orso", &header.to_plain()).unwrap();
    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(again, header);
    assert_eq!(column_count(&header), 2);
    assert_eq!(data_set(&header), None);
}
