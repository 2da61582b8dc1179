//! # Text Format (`.ort`)
//!
//! Human-readable ORSO files: a magic line, YAML headers prefixed with `# `,
//! and whitespace-separated numeric rows.
//!
//! ```text
//! # ORSO reflectivity data file | 1.0 standard | YAML encoding | https://www.reflectometry.org/
//! # # optional comment
//! # data_source:
//! #   ...
//! # columns:
//! # - {name: Qz, unit: 1/angstrom}
//! # - {name: R}
//! # # Qz (1/angstrom)      R
//! 1.0000000000000001e-01 1.0000000000000000e+00
//! # ---
//! # data_set: 1
//! # data_source:
//! #   sample:
//! #     name: changed
//! # # Qz (1/angstrom)      R
//! ...
//! ```
//!
//! Only the first header is complete. Every later header holds the
//! differences to the first one plus its `data_set` identifier; the reader
//! merges each one onto a copy of the first before resolving it.

mod config;
mod error;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use config::OrtWriterConfig;
pub use error::OrtError;
pub use reader::{
    decode_ort, load_orso, load_orso_file, parse_magic_line, read_ort, read_ort_validated, OrtFile,
};
pub use writer::{encode_ort, format_float, save_orso, write_ort};
