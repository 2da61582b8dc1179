//! # ORSO Header Catalogue
//!
//! Record types of the ORSO reflectivity header and typed views over the
//! parts the codecs need: column descriptors, their error models and the
//! dataset identifier.
//!
//! ## Record Hierarchy
//!
//! ```text
//! Orso
//! ├── data_source: DataSource
//! │   ├── owner: Person
//! │   ├── experiment: Experiment
//! │   ├── sample: Sample (size: ValueVector, sample_parameters: {str: Value | ValueRange | ...})
//! │   └── measurement: Measurement
//! │       ├── instrument_settings: InstrumentSettings
//! │       └── data_files: [File | str]
//! ├── reduction: Reduction
//! │   ├── software: Software
//! │   └── creator: Person
//! ├── columns: [Column | ErrorColumn]
//! └── data_set: int | str
//! ```

mod columns;
mod descriptors;

#[cfg(test)]
mod tests;

pub use columns::{
    column_count, columns, data_set, empty_header, ColumnSpec, DataSetId, ErrorModel, SigmaError,
};
pub use descriptors::{
    orso_schemas, DISTRIBUTIONS, ERROR_TYPES, POLARIZATIONS, PROBES, SCHEMES, VALUE_IS,
};
