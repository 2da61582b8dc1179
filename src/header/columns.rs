use std::fmt;

use crate::resolve::{Record, ResolutionError, Value};
use crate::schema::{COLUMNS_FIELD, DATA_SET_FIELD};

/// Failure to convert an error model to a one-sigma factor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigmaError {
    /// The distribution has no finite standard deviation for its FWHM
    #[error("a {0} distribution has no sigma for a given FWHM")]
    Undefined(String),

    /// The distribution is not one of the known shapes
    #[error("sigma conversion not implemented for distribution '{0}'")]
    NotImplemented(String),
}

/// Error model attached to an error column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorModel {
    /// `uncertainty` or `resolution`
    pub error_type: Option<String>,
    /// `sigma` or `FWHM`; unset means sigma
    pub value_is: Option<String>,
    /// Distribution shape; unset means gaussian
    pub distribution: Option<String>,
}

impl ErrorModel {
    /// One-sigma uncertainty with a gaussian distribution
    pub fn sigma() -> Self {
        Self {
            error_type: Some("uncertainty".to_string()),
            value_is: Some("sigma".to_string()),
            distribution: Some("gaussian".to_string()),
        }
    }

    /// Factor converting a stored error value to one standard deviation
    pub fn to_sigma(&self) -> Result<f64, SigmaError> {
        if self.value_is.as_deref().unwrap_or("sigma") == "sigma" {
            return Ok(1.0);
        }
        match self.distribution.as_deref().unwrap_or("gaussian") {
            "gaussian" => Ok(1.0 / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt())),
            "triangular" => Ok(1.0 / 6f64.sqrt()),
            "uniform" => Ok(1.0 / 12f64.sqrt()),
            "lorentzian" => Err(SigmaError::Undefined("lorentzian".to_string())),
            other => Err(SigmaError::NotImplemented(other.to_string())),
        }
    }
}

/// Typed view of one column descriptor of a header
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSpec {
    /// A measured or derived quantity
    Data {
        /// Column name, e.g. `Qz`
        name: String,
        /// Physical unit
        unit: Option<String>,
        /// Semantic quantity tag
        physical_quantity: Option<String>,
    },
    /// Uncertainty of another column
    Error {
        /// Name of the annotated column
        error_of: String,
        /// How the error is expressed
        model: ErrorModel,
    },
}

impl ColumnSpec {
    /// Data column without unit
    pub fn new(name: impl Into<String>) -> Self {
        ColumnSpec::Data {
            name: name.into(),
            unit: None,
            physical_quantity: None,
        }
    }

    /// Data column with a unit
    pub fn with_unit(name: impl Into<String>, unit: impl Into<String>) -> Self {
        ColumnSpec::Data {
            name: name.into(),
            unit: Some(unit.into()),
            physical_quantity: None,
        }
    }

    /// One-sigma gaussian uncertainty of `error_of`
    pub fn error_of(error_of: impl Into<String>) -> Self {
        ColumnSpec::Error {
            error_of: error_of.into(),
            model: ErrorModel::sigma(),
        }
    }

    /// Column name; error columns are named after the column they annotate
    pub fn name(&self) -> String {
        match self {
            ColumnSpec::Data { name, .. } => name.clone(),
            ColumnSpec::Error { error_of, .. } => format!("s{}", error_of),
        }
    }

    /// Unit, for data columns
    pub fn unit(&self) -> Option<&str> {
        match self {
            ColumnSpec::Data { unit, .. } => unit.as_deref(),
            ColumnSpec::Error { .. } => None,
        }
    }

    /// Label used in column header lines: `name (unit)` or `name`
    pub fn label(&self) -> String {
        match self.unit() {
            Some(unit) => format!("{} ({})", self.name(), unit),
            None => self.name(),
        }
    }

    /// Read a `Column` or `ErrorColumn` record
    pub fn from_record(record: &Record) -> Option<Self> {
        let text = |name: &str| record.get(name).and_then(Value::as_str).map(str::to_string);
        match record.schema_name() {
            "Column" => Some(ColumnSpec::Data {
                name: text("name")?,
                unit: text("unit"),
                physical_quantity: text("physical_quantity"),
            }),
            "ErrorColumn" => Some(ColumnSpec::Error {
                error_of: text("error_of")?,
                model: ErrorModel {
                    error_type: text("error_type"),
                    value_is: text("value_is"),
                    distribution: text("distribution"),
                },
            }),
            _ => None,
        }
    }

    /// Build the matching `Column` or `ErrorColumn` record
    pub fn to_record(&self) -> Result<Record, ResolutionError> {
        match self {
            ColumnSpec::Data {
                name,
                unit,
                physical_quantity,
            } => Record::build(
                "Column",
                [
                    ("name", Value::from(name.as_str())),
                    ("unit", Value::from(unit.clone())),
                    ("physical_quantity", Value::from(physical_quantity.clone())),
                ],
            ),
            ColumnSpec::Error { error_of, model } => Record::build(
                "ErrorColumn",
                [
                    ("error_of", Value::from(error_of.as_str())),
                    ("error_type", Value::from(model.error_type.clone())),
                    ("value_is", Value::from(model.value_is.clone())),
                    ("distribution", Value::from(model.distribution.clone())),
                ],
            ),
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Identifier of a dataset within a file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSetId {
    /// Positional or explicit integer identifier
    Index(i64),
    /// Named dataset
    Name(String),
}

impl DataSetId {
    /// Header value for this identifier
    pub fn to_value(&self) -> Value {
        match self {
            DataSetId::Index(i) => Value::Int(*i),
            DataSetId::Name(n) => Value::Str(n.clone()),
        }
    }
}

impl fmt::Display for DataSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSetId::Index(i) => write!(f, "{}", i),
            DataSetId::Name(n) => f.write_str(n),
        }
    }
}

/// Column descriptors of an `Orso` header, in order.
///
/// Entries that did not resolve to a column record are skipped.
pub fn columns(header: &Record) -> Vec<ColumnSpec> {
    header
        .get(COLUMNS_FIELD)
        .and_then(Value::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_record)
                .filter_map(ColumnSpec::from_record)
                .collect()
        })
        .unwrap_or_default()
}

/// Number of entries in the `columns` field of a header
pub fn column_count(header: &Record) -> usize {
    header
        .get(COLUMNS_FIELD)
        .and_then(Value::as_list)
        .map(<[Value]>::len)
        .unwrap_or(0)
}

/// Explicit dataset identifier; unset and empty names count as unset
pub fn data_set(header: &Record) -> Option<DataSetId> {
    match header.get(DATA_SET_FIELD)? {
        Value::Int(i) => Some(DataSetId::Index(*i)),
        Value::Str(s) if !s.is_empty() => Some(DataSetId::Name(s.clone())),
        Value::Raw(raw) => match raw {
            serde_json::Value::Number(n) => n.as_i64().map(DataSetId::Index),
            serde_json::Value::String(s) if !s.is_empty() => Some(DataSetId::Name(s.clone())),
            _ => None,
        },
        _ => None,
    }
}

/// Header with placeholder provenance, ready to be filled in.
///
/// Every required field gets an empty value so the record can be built and
/// later completed with [`Record::set`].
pub fn empty_header(columns: &[ColumnSpec]) -> Result<Record, ResolutionError> {
    let person = || {
        Record::build(
            "Person",
            [("name", Value::from("")), ("affiliation", Value::from(""))],
        )
    };
    let experiment = Record::build(
        "Experiment",
        [
            ("title", Value::from("")),
            ("instrument", Value::from("")),
            (
                "start_date",
                Value::Timestamp(crate::resolve::Timestamp::Naive(chrono::NaiveDateTime::default())),
            ),
            ("probe", Value::from("neutron")),
        ],
    )?;
    let sample = Record::build("Sample", [("name", Value::from(""))])?;
    let angle = Record::build("Value", [("magnitude", Value::Float(0.0))])?;
    let settings = Record::build(
        "InstrumentSettings",
        [
            ("incident_angle", Value::from(angle.clone())),
            ("wavelength", Value::from(angle)),
        ],
    )?;
    let measurement = Record::build(
        "Measurement",
        [
            ("instrument_settings", Value::from(settings)),
            ("data_files", Value::List(Vec::new())),
        ],
    )?;
    let data_source = Record::build(
        "DataSource",
        [
            ("owner", Value::from(person()?)),
            ("experiment", Value::from(experiment)),
            ("sample", Value::from(sample)),
            ("measurement", Value::from(measurement)),
        ],
    )?;
    let software = Record::build("Software", [("name", Value::from(""))])?;
    let reduction = Record::build("Reduction", [("software", Value::from(software))])?;

    let columns = columns
        .iter()
        .map(|c| c.to_record().map(Value::from))
        .collect::<Result<Vec<_>, _>>()?;

    Record::build(
        "Orso",
        [
            ("data_source", Value::from(data_source)),
            ("reduction", Value::from(reduction)),
            ("columns", Value::List(columns)),
        ],
    )
}
