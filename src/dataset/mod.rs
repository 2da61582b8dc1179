//! # ORSO Dataset
//!
//! A dataset pairs one resolved `Orso` header with the numeric table it
//! describes. Construction enforces the table shape against the header's
//! column descriptors; batches enforce unique dataset identifiers.
//!
//! ```rust
//! use orso::dataset::{DataTable, OrsoDataset};
//! use orso::header::{empty_header, ColumnSpec};
//!
//! let header = empty_header(&[ColumnSpec::with_unit("Qz", "1/angstrom"), ColumnSpec::new("R")])?;
//! let data = DataTable::from_columns(vec![vec![0.1, 0.2], vec![1.0, 0.5]])?;
//! let dataset = OrsoDataset::new(header, data)?;
//!
//! assert_eq!(dataset.data().num_rows(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod table;


use std::collections::HashSet;

pub use error::DatasetError;
pub use table::DataTable;

use crate::header::{self, ColumnSpec, DataSetId};
use crate::resolve::Record;
use crate::schema::ROOT_SCHEMA;

/// One header plus its data table
#[derive(Debug, Clone)]
pub struct OrsoDataset {
    info: Record,
    data: DataTable,
}

impl OrsoDataset {
    /// Pair `info` with `data`.
    ///
    /// Fails if `info` is not an `Orso` record or if the table does not
    /// have exactly one column per column descriptor.
    pub fn new(info: Record, data: DataTable) -> Result<Self, DatasetError> {
        if info.schema_name() != ROOT_SCHEMA {
            return Err(DatasetError::NotOrsoHeader(info.schema_name().to_string()));
        }
        let expected = header::column_count(&info);
        if data.num_columns() != expected {
            return Err(DatasetError::ColumnCountMismatch {
                header: expected,
                data: data.num_columns(),
            });
        }
        Ok(Self { info, data })
    }

    /// Header record
    pub fn info(&self) -> &Record {
        &self.info
    }

    /// Numeric table
    pub fn data(&self) -> &DataTable {
        &self.data
    }

    /// Typed column descriptors of the header
    pub fn columns(&self) -> Vec<ColumnSpec> {
        header::columns(&self.info)
    }

    /// Explicit dataset identifier, if set
    pub fn data_set(&self) -> Option<DataSetId> {
        header::data_set(&self.info)
    }

    /// Split into header and table
    pub fn into_parts(self) -> (Record, DataTable) {
        (self.info, self.data)
    }
}

impl PartialEq for OrsoDataset {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info && self.data.same_values(&other.data)
    }
}

/// Dataset identifiers of a batch, with unset identifiers defaulted to the
/// position in the batch.
///
/// Fails if two datasets end up with the same identifier.
pub fn batch_ids(datasets: &[OrsoDataset]) -> Result<Vec<DataSetId>, DatasetError> {
    let ids: Vec<DataSetId> = datasets
        .iter()
        .enumerate()
        .map(|(i, d)| d.data_set().unwrap_or(DataSetId::Index(i as i64)))
        .collect();
    check_unique_ids(&ids)?;
    Ok(ids)
}

/// Fail on the first identifier that occurs twice
pub fn check_unique_ids(ids: &[DataSetId]) -> Result<(), DatasetError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(DatasetError::DuplicateDataSet(id.to_string()));
        }
    }
    Ok(())
}
