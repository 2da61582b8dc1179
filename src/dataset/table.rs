use super::DatasetError;

/// Column-major numeric table of one dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<Vec<f64>>,
}

impl DataTable {
    /// Table from columns of equal length
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for (column, values) in columns.iter().enumerate() {
                if values.len() != expected {
                    return Err(DatasetError::RaggedColumns {
                        column,
                        expected,
                        found: values.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    /// Table from rows of equal length
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, DatasetError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(DatasetError::RaggedRows {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(*value);
            }
        }
        Ok(Self { columns })
    }

    /// Table with `num_columns` empty columns
    pub fn empty(num_columns: usize) -> Self {
        Self {
            columns: vec![Vec::new(); num_columns],
        }
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// Column by index
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// All columns
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Iterate rows as freshly collected vectors
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.num_rows()).map(move |i| self.columns.iter().map(|c| c[i]).collect())
    }

    /// Element-wise equality that treats NaN as equal to NaN
    pub fn same_values(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
            })
    }
}
