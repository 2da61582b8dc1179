use crate::resolve::{Record, Value};
use crate::schema::{SchemaDescriptor, TypeExpr};

/// Kinds of uncertainty an error value or error column can express
pub const ERROR_TYPES: &[&str] = &["uncertainty", "resolution"];

/// Whether an error is a one-sigma width or a full width at half maximum
pub const VALUE_IS: &[&str] = &["sigma", "FWHM"];

/// Assumed shape of an error distribution
pub const DISTRIBUTIONS: &[&str] = &["gaussian", "triangular", "uniform", "lorentzian"];

/// Radiation used for the measurement
pub const PROBES: &[&str] = &["neutron", "x-ray"];

/// Polarization states of incoming/outgoing beam
pub const POLARIZATIONS: &[&str] = &["unpolarized", "po", "mo", "op", "om", "mm", "mp", "pm", "pp"];

/// Measurement schemes
pub const SCHEMES: &[&str] = &[
    "angle- and energy-dispersive",
    "angle-dispersive",
    "energy-dispersive",
];

fn error_value() -> TypeExpr {
    TypeExpr::record("ErrorValue")
}

fn scalar_or_range() -> TypeExpr {
    TypeExpr::union(vec![TypeExpr::record("Value"), TypeExpr::record("ValueRange")])
}

fn file_or_name() -> TypeExpr {
    TypeExpr::list(TypeExpr::union(vec![TypeExpr::record("File"), TypeExpr::str()]))
}

/// Units are written into plain-text headers and must stay ASCII
fn check_unit(record: &Record) -> Result<(), String> {
    match record.get("unit") {
        Some(Value::Str(unit)) if !unit.is_ascii() => {
            Err(format!("unit '{}' must only contain ASCII characters", unit))
        }
        _ => Ok(()),
    }
}

/// Every record type of the ORSO header, in dependency order
pub fn orso_schemas() -> Vec<SchemaDescriptor> {
    vec![
        SchemaDescriptor::new("ErrorValue")
            .field("error_value", TypeExpr::float())
            .optional_field("error_type", TypeExpr::literal(ERROR_TYPES))
            .optional_field("value_is", TypeExpr::literal(VALUE_IS))
            .optional_field("distribution", TypeExpr::literal(DISTRIBUTIONS))
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Value")
            .field("magnitude", TypeExpr::float())
            .optional_field("unit", TypeExpr::str())
            .optional_field("error", error_value())
            .optional_field("offset", TypeExpr::float())
            .optional_field("comment", TypeExpr::str())
            .with_check(check_unit),
        SchemaDescriptor::new("ValueRange")
            .field("min", TypeExpr::float())
            .field("max", TypeExpr::float())
            .optional_field("unit", TypeExpr::str())
            .optional_field("individual_magnitudes", TypeExpr::list(TypeExpr::float()))
            .optional_field("offset", TypeExpr::float())
            .optional_field("comment", TypeExpr::str())
            .with_check(check_unit),
        SchemaDescriptor::new("ValueVector")
            .field("x", TypeExpr::float())
            .field("y", TypeExpr::float())
            .field("z", TypeExpr::float())
            .optional_field("unit", TypeExpr::str())
            .optional_field("error", error_value())
            .optional_field("comment", TypeExpr::str())
            .with_check(check_unit),
        SchemaDescriptor::new("ComplexValue")
            .field("real", TypeExpr::float())
            .optional_field("imag", TypeExpr::float())
            .optional_field("unit", TypeExpr::str())
            .optional_field("error", error_value())
            .optional_field("comment", TypeExpr::str())
            .with_check(check_unit),
        SchemaDescriptor::new("Person")
            .field("name", TypeExpr::str())
            .field("affiliation", TypeExpr::str())
            .optional_field("contact", TypeExpr::str())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Column")
            .field("name", TypeExpr::str())
            .optional_field("unit", TypeExpr::str())
            .optional_field("physical_quantity", TypeExpr::str())
            .optional_field("comment", TypeExpr::str())
            .with_check(check_unit),
        SchemaDescriptor::new("ErrorColumn")
            .field("error_of", TypeExpr::str())
            .optional_field("error_type", TypeExpr::literal(ERROR_TYPES))
            .optional_field("value_is", TypeExpr::literal(VALUE_IS))
            .optional_field("distribution", TypeExpr::literal(DISTRIBUTIONS))
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("File")
            .field("file", TypeExpr::str())
            .optional_field("timestamp", TypeExpr::datetime())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Experiment")
            .field("title", TypeExpr::str())
            .field("instrument", TypeExpr::str())
            .field("start_date", TypeExpr::datetime())
            .field("probe", TypeExpr::literal(PROBES))
            .optional_field("facility", TypeExpr::str())
            .optional_field("proposalID", TypeExpr::str())
            .optional_field("doi", TypeExpr::str())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Sample")
            .field("name", TypeExpr::str())
            .optional_field("category", TypeExpr::str())
            .optional_field("composition", TypeExpr::str())
            .optional_field("description", TypeExpr::str())
            .optional_field("size", TypeExpr::record("ValueVector"))
            .optional_field("environment", TypeExpr::list(TypeExpr::str()))
            .optional_field(
                "sample_parameters",
                TypeExpr::map(
                    TypeExpr::str(),
                    TypeExpr::union(vec![
                        TypeExpr::record("Value"),
                        TypeExpr::record("ValueRange"),
                        TypeExpr::record("ValueVector"),
                        TypeExpr::record("ComplexValue"),
                    ]),
                ),
            )
            .optional_field("model", TypeExpr::any())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("InstrumentSettings")
            .field("incident_angle", scalar_or_range())
            .field("wavelength", scalar_or_range())
            .optional_field(
                "polarization",
                TypeExpr::union(vec![
                    TypeExpr::literal(POLARIZATIONS),
                    TypeExpr::record("ValueVector"),
                ]),
            )
            .optional_field("configuration", TypeExpr::str())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Measurement")
            .field("instrument_settings", TypeExpr::record("InstrumentSettings"))
            .field("data_files", file_or_name())
            .optional_field("additional_files", file_or_name())
            .optional_field("scheme", TypeExpr::literal(SCHEMES))
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("DataSource")
            .field("owner", TypeExpr::record("Person"))
            .field("experiment", TypeExpr::record("Experiment"))
            .field("sample", TypeExpr::record("Sample"))
            .field("measurement", TypeExpr::record("Measurement"))
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Software")
            .field("name", TypeExpr::str())
            .optional_field("version", TypeExpr::str())
            .optional_field("platform", TypeExpr::str())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Reduction")
            .field("software", TypeExpr::record("Software"))
            .optional_field("timestamp", TypeExpr::datetime())
            .optional_field("creator", TypeExpr::record("Person"))
            .optional_field("corrections", TypeExpr::list(TypeExpr::str()))
            .optional_field("computer", TypeExpr::str())
            .optional_field("call", TypeExpr::str())
            .optional_field("binary", TypeExpr::str())
            .optional_field("comment", TypeExpr::str()),
        SchemaDescriptor::new("Orso")
            .field("data_source", TypeExpr::record("DataSource"))
            .field("reduction", TypeExpr::record("Reduction"))
            .field(
                "columns",
                TypeExpr::list(TypeExpr::union(vec![
                    TypeExpr::record("Column"),
                    TypeExpr::record("ErrorColumn"),
                ])),
            )
            .optional_field(
                "data_set",
                TypeExpr::union(vec![TypeExpr::int(), TypeExpr::str()]),
            ),
    ]
}
