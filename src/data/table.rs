//! data::table — in-memory column table.
//!
//! Purpose
//! -------
//! Hold a fully loaded dataset as named columns of [`Cell`]s. Every
//! transformation returns a new [`Table`]; a table handed to a later stage
//! is never modified.
//!
//! Key behaviors
//! -------------
//! - Column access by name with typed views ([`Table::numeric_column`],
//!   [`Table::level_column`]) and presence checks
//!   ([`Table::require_columns`]).
//! - Projection ([`Table::select`]) and row filtering ([`Table::filter_rows`],
//!   [`Table::filter_by`]).
//! - Missing-value handling ([`Table::drop_missing`]) that reports how many
//!   rows were removed.
//!
//! Invariants & assumptions
//! ------------------------
//! - Column names are unique and all columns have `n_rows` cells.
//! - Row order is preserved by every operation.
use crate::data::errors::{DataError, DataResult};

/// One scalar value of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view: numbers as-is, booleans as `1.0` / `0.0`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    /// Categorical label of the cell; `None` when missing.
    ///
    /// Integral numbers print without a fractional part so that a level
    /// written as `2` in the file matches the label `"2"`.
    pub fn level(&self) -> Option<String> {
        match self {
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some(format!("{}", *v as i64)),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Missing => None,
        }
    }
}

/// Column-major table with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
    n_rows: usize,
}

impl Table {
    /// Build a table from `(name, cells)` pairs.
    ///
    /// # Errors
    /// [`DataError::DuplicateColumn`] or [`DataError::LengthMismatch`].
    pub fn new(columns: Vec<(String, Vec<Cell>)>) -> DataResult<Self> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        for (name, cells) in columns {
            if names.contains(&name) {
                return Err(DataError::DuplicateColumn { column: name });
            }
            if cells.len() != n_rows {
                return Err(DataError::LengthMismatch {
                    column: name,
                    expected: n_rows,
                    found: cells.len(),
                });
            }
            names.push(name);
            cols.push(cells);
        }
        Ok(Self { names, columns: cols, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Confirm every name in `names` is a column, without copying any data.
    ///
    /// # Errors
    /// [`DataError::MissingColumn`] naming the first absent column.
    pub fn require_columns(&self, names: &[&str]) -> DataResult<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(name) => Err(DataError::MissingColumn { column: name.to_string() }),
            None => Ok(()),
        }
    }

    /// Raw cells of a column.
    pub fn column(&self, name: &str) -> DataResult<&[Cell]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| DataError::MissingColumn { column: name.to_string() })
    }

    /// Numeric view of a column; `None` marks a missing cell.
    ///
    /// # Errors
    /// [`DataError::TypeCast`] for a text cell.
    pub fn numeric_column(&self, name: &str) -> DataResult<Vec<Option<f64>>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Cell::Missing => Ok(None),
                Cell::Text(s) => {
                    Err(DataError::TypeCast { column: name.to_string(), row, value: s.clone() })
                }
                other => Ok(other.as_f64()),
            })
            .collect()
    }

    /// Numeric column with no missing cells allowed.
    ///
    /// # Errors
    /// [`DataError::TypeCast`] for a text or missing cell.
    pub fn required_numeric(&self, name: &str) -> DataResult<Vec<f64>> {
        self.numeric_column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| DataError::TypeCast {
                    column: name.to_string(),
                    row,
                    value: "<missing>".to_string(),
                })
            })
            .collect()
    }

    /// Categorical labels of a column; see [`Cell::level`].
    pub fn level_column(&self, name: &str) -> DataResult<Vec<Option<String>>> {
        Ok(self.column(name)?.iter().map(Cell::level).collect())
    }

    /// Sorted distinct non-missing levels of a column.
    pub fn levels(&self, name: &str) -> DataResult<Vec<String>> {
        let mut levels: Vec<String> = self.level_column(name)?.into_iter().flatten().collect();
        levels.sort();
        levels.dedup();
        Ok(levels)
    }

    /// Project onto `names`, in the given order.
    pub fn select(&self, names: &[&str]) -> DataResult<Table> {
        let columns = names
            .iter()
            .map(|&n| Ok((n.to_string(), self.column(n)?.to_vec())))
            .collect::<DataResult<Vec<_>>>()?;
        Table::new(columns)
    }

    /// Keep rows where `mask[i]` is true. `mask` must have `n_rows` entries.
    pub fn filter_rows(&self, mask: &[bool]) -> DataResult<Table> {
        if mask.len() != self.n_rows {
            return Err(DataError::LengthMismatch {
                column: "<row mask>".to_string(),
                expected: self.n_rows,
                found: mask.len(),
            });
        }
        let columns = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, cells)| {
                let kept = cells
                    .iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(c, _)| c.clone())
                    .collect();
                (name.clone(), kept)
            })
            .collect();
        Table::new(columns)
    }

    /// Keep rows whose cell in `column` satisfies `pred`.
    pub fn filter_by<P: Fn(&Cell) -> bool>(&self, column: &str, pred: P) -> DataResult<Table> {
        let mask: Vec<bool> = self.column(column)?.iter().map(pred).collect();
        self.filter_rows(&mask)
    }

    /// Drop rows with a missing cell in any of `required`.
    ///
    /// Returns the filtered table and the number of rows removed.
    pub fn drop_missing(&self, required: &[&str]) -> DataResult<(Table, usize)> {
        let mut mask = vec![true; self.n_rows];
        for &name in required {
            for (keep, cell) in mask.iter_mut().zip(self.column(name)?) {
                if cell.is_missing() {
                    *keep = false;
                }
            }
        }
        let dropped = mask.iter().filter(|k| !**k).count();
        Ok((self.filter_rows(&mask)?, dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover construction checks, typed column views, filtering,
    // and missing-value dropping. CSV parsing lives in `loader`.
    // -------------------------------------------------------------------------

    fn sample_table() -> Table {
        Table::new(vec![
            (
                "gave".to_string(),
                vec![Cell::Number(1.0), Cell::Number(0.0), Cell::Number(1.0), Cell::Missing],
            ),
            (
                "amount".to_string(),
                vec![Cell::Number(50.0), Cell::Number(0.0), Cell::Number(25.0), Cell::Number(0.0)],
            ),
            (
                "ratio".to_string(),
                vec![
                    Cell::Text("Control".into()),
                    Cell::Number(2.0),
                    Cell::Number(3.0),
                    Cell::Number(2.0),
                ],
            ),
        ])
        .expect("valid table")
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects ragged and duplicate columns.
    fn new_rejects_ragged_and_duplicate_columns() {
        let ragged = Table::new(vec![
            ("a".into(), vec![Cell::Number(1.0)]),
            ("b".into(), vec![Cell::Number(1.0), Cell::Number(2.0)]),
        ]);
        assert!(matches!(ragged, Err(DataError::LengthMismatch { .. })));

        let dup = Table::new(vec![("a".into(), vec![]), ("a".into(), vec![])]);
        assert_eq!(dup, Err(DataError::DuplicateColumn { column: "a".into() }));
    }

    #[test]
    // Purpose
    // -------
    // Filtering returns a new table and leaves the source untouched.
    //
    // Given
    // -----
    // - Four rows, two of which have `gave == 1`.
    //
    // Expect
    // ------
    // - Filtered table has 2 rows with amounts [50, 25]; source still 4.
    fn filter_by_returns_new_table() {
        // Arrange
        let table = sample_table();

        // Act
        let donors = table.filter_by("gave", |c| c.as_f64() == Some(1.0)).expect("column exists");

        // Assert
        assert_eq!(donors.n_rows(), 2);
        assert_eq!(donors.required_numeric("amount").expect("numeric"), vec![50.0, 25.0]);
        assert_eq!(table.n_rows(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Levels normalize integral numbers and mix with text labels.
    //
    // Expect
    // ------
    // - Sorted levels ["2", "3", "Control"]; numeric view of `ratio` fails.
    fn levels_and_type_casts() {
        // Arrange
        let table = sample_table();

        // Act
        let levels = table.levels("ratio").expect("column exists");
        let cast = table.numeric_column("ratio");

        // Assert
        assert_eq!(levels, vec!["2".to_string(), "3".to_string(), "Control".to_string()]);
        assert!(matches!(cast, Err(DataError::TypeCast { row: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Dropping missing values reports the count.
    //
    // Expect
    // ------
    // - One row dropped because `gave` is missing in row 3.
    fn drop_missing_counts_removed_rows() {
        // Act
        let (kept, dropped) = sample_table().drop_missing(&["gave", "amount"]).expect("columns exist");

        // Assert
        assert_eq!(dropped, 1);
        assert_eq!(kept.n_rows(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Selecting an absent column reports its name.
    fn select_missing_column_errors() {
        assert_eq!(
            sample_table().select(&["gave", "female"]),
            Err(DataError::MissingColumn { column: "female".into() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Presence checks name the first absent column and accept a full set.
    fn require_columns_reports_first_absent_column() {
        // Arrange
        let table = sample_table();

        // Act & Assert
        assert_eq!(table.require_columns(&["gave", "amount"]), Ok(()));
        assert_eq!(
            table.require_columns(&["gave", "female", "region"]),
            Err(DataError::MissingColumn { column: "female".into() })
        );
    }
}
