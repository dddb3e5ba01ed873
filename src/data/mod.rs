//! Scored response tables with named columns.
//!
//! Provides a minimal `ScoredTable` implementation for DIF workflows: rows are
//! examinees, columns are items plus raw-score and group columns, and every
//! cell is either a numeric code or the table's missing-value sentinel.
//! Loading score files is left to the caller; anything that can answer
//! [`ScoreSource`] queries can feed the DIF engine.

use crate::error::{DifError, Result};

/// Missing-value sentinel used when the caller doesn't declare one.
pub const DEFAULT_MISSING: f64 = -999_999.0;

/// Read-only access to a scored table, the only thing the DIF engine needs.
pub trait ScoreSource {
    /// Returns the values of a column by label.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::ColumnNotFound`] if the label doesn't exist.
    fn column(&self, label: &str) -> Result<&[f64]>;

    /// Returns the sentinel marking missing cells.
    fn missing_value(&self) -> f64;

    /// Returns the number of rows (examinees).
    fn n_rows(&self) -> usize;

    /// Returns a sub-table holding the rows whose `label` value is in `keep`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    fn extract_rows(&self, label: &str, keep: &[f64]) -> Result<Self>
    where
        Self: Sized;

    /// True if `value` is the missing sentinel (NaN is treated as missing too).
    fn is_missing(&self, value: f64) -> bool {
        value.is_nan() || value == self.missing_value()
    }
}

/// A scored table with named columns and optional row labels.
///
/// # Examples
///
/// ```
/// use difstat::data::{ScoreSource, ScoredTable};
///
/// let table = ScoredTable::new(
///     vec![
///         ("item1".to_string(), vec![1.0, 0.0, -9.0]),
///         ("raw".to_string(), vec![10.0, 4.0, 7.0]),
///     ],
///     -9.0,
/// )
/// .expect("valid columns");
///
/// assert_eq!(table.shape(), (3, 2));
/// assert!(table.is_missing(table.column("item1").expect("exists")[2]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    columns: Vec<(String, Vec<f64>)>,
    row_labels: Vec<String>,
    n_rows: usize,
    missing: f64,
}

impl ScoredTable {
    /// Creates a table from named columns; rows are labelled by position.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, if columns have different
    /// lengths, or if names are empty or duplicated.
    pub fn new(columns: Vec<(String, Vec<f64>)>, missing: f64) -> Result<Self> {
        if columns.is_empty() {
            return Err(DifError::empty_input("table must have at least one column"));
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(DifError::DimensionMismatch {
                    expected: format!("{n_rows} rows"),
                    actual: format!("{} rows in column {name}", col.len()),
                });
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("Duplicate column name: {}", pair[0]).into());
        }

        let row_labels = (0..n_rows).map(|i| i.to_string()).collect();

        Ok(Self {
            columns,
            row_labels,
            n_rows,
            missing,
        })
    }

    /// Replaces the positional row labels (e.g. with examinee ids).
    ///
    /// # Errors
    ///
    /// Returns an error if the label count doesn't match or labels repeat.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.n_rows {
            return Err(DifError::dimension_mismatch(
                "row labels",
                self.n_rows,
                labels.len(),
            ));
        }
        let mut sorted: Vec<&str> = labels.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("Duplicate row label: {}", pair[0]).into());
        }
        self.row_labels = labels;
        Ok(self)
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns the row labels.
    #[must_use]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Returns a single cell by row and column label.
    ///
    /// # Errors
    ///
    /// Returns an error if either label doesn't exist.
    pub fn cell(&self, row: &str, column: &str) -> Result<f64> {
        let idx = self
            .row_labels
            .iter()
            .position(|r| r == row)
            .ok_or_else(|| DifError::Other(format!("Row not found: {row}")))?;
        Ok(self.column(column)?[idx])
    }

    /// Selects multiple columns by name, returning a new table.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err("Must select at least one column".into());
        }

        let mut selected = Vec::with_capacity(names.len());
        for &name in names {
            selected.push((name.to_string(), self.column(name)?.to_vec()));
        }

        Ok(Self {
            columns: selected,
            row_labels: self.row_labels.clone(),
            n_rows: self.n_rows,
            missing: self.missing,
        })
    }

    /// Returns a table holding the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.n_rows).filter(|&i| keep(i)).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), rows.iter().map(|&i| col[i]).collect()))
            .collect();
        let row_labels = rows.iter().map(|&i| self.row_labels[i].clone()).collect();

        Self {
            columns,
            row_labels,
            n_rows: rows.len(),
            missing: self.missing,
        }
    }

    /// Adds a new column to the table.
    ///
    /// # Errors
    ///
    /// Returns an error if column length doesn't match or name already exists.
    pub fn add_column(&mut self, name: String, data: Vec<f64>) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(DifError::dimension_mismatch(&name, self.n_rows, data.len()));
        }
        if name.is_empty() {
            return Err("Column name cannot be empty".into());
        }
        if self.columns.iter().any(|(n, _)| n == &name) {
            return Err(format!("Column name already exists: {name}").into());
        }

        self.columns.push((name, data));
        Ok(())
    }

    /// Number of non-missing cells in a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn valid_count(&self, label: &str) -> Result<usize> {
        let col = self.column(label)?;
        Ok(col.iter().filter(|&&v| !self.is_missing(v)).count())
    }

    /// Distinct non-missing values in a column, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn unique_values(&self, label: &str) -> Result<Vec<f64>> {
        let mut values: Vec<f64> = self
            .column(label)?
            .iter()
            .copied()
            .filter(|&v| !self.is_missing(v))
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(values)
    }
}

impl ScoreSource for ScoredTable {
    fn column(&self, label: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == label)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| DifError::ColumnNotFound {
                label: label.to_string(),
            })
    }

    fn missing_value(&self) -> f64 {
        self.missing
    }

    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn extract_rows(&self, label: &str, keep: &[f64]) -> Result<Self> {
        let col = self.column(label)?;
        Ok(self.filter_rows(|i| keep.contains(&col[i])))
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
