//! # orso - ORSO Reflectivity Files
//!
//! `orso` reads and writes reflectivity data in the ORSO format, in both of
//! its encodings:
//!
//! - **Text (`.ort`)**: a magic line, commented YAML headers and
//!   whitespace-separated numeric rows. Later datasets only store how their
//!   header differs from the first one.
//! - **Hierarchical (`.orb`)**: a ZIP container holding a NeXus-style tree
//!   of groups and leaves, with class tags so a reader can rebuild typed
//!   headers without the YAML layer.
//!
//! Headers are not trusted on input. Every raw value goes through a typed
//! resolver that coerces what it can, and reports the rest as warnings
//! while keeping the original value, so unknown or damaged fields survive a
//! round trip.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orso::prelude::*;
//!
//! let header = empty_header(&[
//!     ColumnSpec::with_unit("Qz", "1/angstrom"),
//!     ColumnSpec::new("R"),
//! ])?;
//! let data = DataTable::from_columns(vec![vec![0.01, 0.02], vec![1.0, 0.8]])?;
//! let dataset = OrsoDataset::new(header, data)?;
//!
//! save_orso(&[dataset.clone()], "scan.ort", &OrtWriterConfig::default())?;
//! let warnings = save_nexus(&[dataset], "scan.orb", &NexusWriterConfig::default())?;
//! assert!(warnings.is_empty());
//!
//! let back = load_nexus("scan.orb")?;
//! println!("{} datasets", back.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: type expressions, record descriptors and the registry
//! - [`resolve`]: raw-to-typed resolution with warnings
//! - [`header`]: the ORSO record catalogue and column views
//! - [`dataset`]: a header paired with its numeric table
//! - [`diff`]: header differences and merging for the text encoding
//! - [`ort`]: the text codec
//! - [`nexus`]: the hierarchical codec and its ZIP container
//! - [`validator`]: integrity reports over files in either encoding
//! - [`config`]: TOML-backed writer settings

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dataset;
pub mod diff;
pub mod header;
pub mod nexus;
pub mod ort;
pub mod resolve;
pub mod schema;
pub mod validator;

mod output;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{CodecConfig, ConfigError};
    pub use crate::dataset::{DataTable, DatasetError, OrsoDataset};
    pub use crate::header::{empty_header, ColumnSpec, DataSetId, ErrorModel};
    pub use crate::nexus::{
        load_nexus, load_nexus_file, save_nexus, NexusError, NexusFile, NexusWriterConfig,
    };
    pub use crate::ort::{load_orso, load_orso_file, save_orso, OrtError, OrtFile, OrtWriterConfig};
    pub use crate::resolve::{Record, ResolutionError, ResolutionWarning, Value, WarningKind};
    pub use crate::schema::{registry, SchemaRegistry, TypeExpr, ORSO_FORMAT_VERSION};
    pub use crate::validator::{validate_orso_file, ValidationReport};
}
