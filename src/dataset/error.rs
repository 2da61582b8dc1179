use crate::resolve::ResolutionError;

/// Errors that can occur when building datasets or batches
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// The table does not have one column per column descriptor
    #[error("Data has {data} columns but the header describes {header}")]
    ColumnCountMismatch {
        /// Number of column descriptors in the header
        header: usize,
        /// Number of columns in the table
        data: usize,
    },

    /// Table columns have different lengths
    #[error("Column {column} has {found} rows, expected {expected}")]
    RaggedColumns {
        /// Index of the offending column
        column: usize,
        /// Length of the first column
        expected: usize,
        /// Length of the offending column
        found: usize,
    },

    /// Table rows have different lengths
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRows {
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// Two datasets of a batch share an identifier
    #[error("Duplicate data_set identifier: {0}")]
    DuplicateDataSet(String),

    /// The header is not an `Orso` record
    #[error("Dataset header must be an Orso record, got {0}")]
    NotOrsoHeader(String),

    /// Error building a header record
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}
