//! data::features — derived columns and design-matrix assembly.
//!
//! Purpose
//! -------
//! Turn a loaded [`Table`] into the numeric inputs of a model: an outcome
//! vector and a named [`DesignMatrix`] whose first column is the constant.
//!
//! Key behaviors
//! -------------
//! - Terms describe each design column: plain numeric columns, squares,
//!   single-level indicators, and one-hot encodings with a dropped baseline
//!   level ([`Term`]).
//! - Rows with a missing value in the outcome or any referenced column are
//!   dropped before assembly; the count is logged at `info` level and
//!   returned in [`ModelFrame::rows_dropped`].
//!
//! Conventions
//! -----------
//! - Column order is: `const` (when requested), then terms in the order
//!   given; a one-hot term expands to its non-baseline levels in sorted
//!   order.
//! - Derived names: `{col}_sq` for squares, `{col}_{level}` for one-hot
//!   levels; indicators carry an explicit name.
use log::info;
use ndarray::{Array1, Array2};

use crate::{
    data::{
        errors::{DataError, DataResult},
        table::Table,
    },
    models::design::{DesignMatrix, INTERCEPT},
};

/// One design-matrix term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Column used as-is (numbers, or booleans as 0/1).
    Numeric(String),
    /// Square of a numeric column.
    Square(String),
    /// `1` where the column's level equals `level`, else `0`.
    Indicator { column: String, level: String, name: String },
    /// One indicator per level except `baseline` (default: first sorted level).
    OneHot { column: String, baseline: Option<String> },
}

impl Term {
    pub fn numeric(column: &str) -> Self {
        Term::Numeric(column.to_string())
    }

    pub fn square(column: &str) -> Self {
        Term::Square(column.to_string())
    }

    pub fn indicator(column: &str, level: &str, name: &str) -> Self {
        Term::Indicator { column: column.into(), level: level.into(), name: name.into() }
    }

    pub fn one_hot(column: &str, baseline: Option<&str>) -> Self {
        Term::OneHot { column: column.into(), baseline: baseline.map(str::to_string) }
    }

    fn source_column(&self) -> &str {
        match self {
            Term::Numeric(c) | Term::Square(c) => c,
            Term::Indicator { column, .. } | Term::OneHot { column, .. } => column,
        }
    }
}

/// Ordered list of terms plus the intercept flag.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpec {
    pub intercept: bool,
    pub terms: Vec<Term>,
}

impl DesignSpec {
    /// Spec with a leading constant column.
    pub fn with_intercept(terms: Vec<Term>) -> Self {
        Self { intercept: true, terms }
    }
}

/// Outcome and design after missing-value handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFrame {
    pub design: DesignMatrix,
    pub y: Array1<f64>,
    pub rows_dropped: usize,
}

/// Assemble the outcome `outcome` and the design described by `spec`.
///
/// # Errors
/// - [`DataError::MissingColumn`] for an absent column.
/// - [`DataError::TypeCast`] for text in a numeric term or the outcome.
/// - [`DataError::UnknownLevel`] for an indicator or baseline level that
///   does not occur.
/// - [`DataError::EmptyTable`] if no complete rows remain.
pub fn build_model_frame(table: &Table, outcome: &str, spec: &DesignSpec) -> DataResult<ModelFrame> {
    let mut required: Vec<&str> = vec![outcome];
    required.extend(spec.terms.iter().map(Term::source_column));
    let (complete, rows_dropped) = table.drop_missing(&required)?;
    info!(
        "{outcome}: dropped {rows_dropped} of {} rows with missing values",
        table.n_rows()
    );
    if complete.n_rows() == 0 {
        return Err(DataError::EmptyTable { rows_dropped });
    }

    let y = Array1::from(complete.required_numeric(outcome)?);
    let mut names = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    if spec.intercept {
        names.push(INTERCEPT.to_string());
        columns.push(vec![1.0; complete.n_rows()]);
    }
    for term in &spec.terms {
        for (name, col) in expand_term(&complete, term)? {
            names.push(name);
            columns.push(col);
        }
    }

    let n = complete.n_rows();
    let x = Array2::from_shape_fn((n, columns.len()), |(i, j)| columns[j][i]);
    let design =
        DesignMatrix::new(names, x).map_err(|e| DataError::Design { message: e.to_string() })?;
    Ok(ModelFrame { design, y, rows_dropped })
}

// ---- Helper methods ----

fn expand_term(table: &Table, term: &Term) -> DataResult<Vec<(String, Vec<f64>)>> {
    match term {
        Term::Numeric(c) => Ok(vec![(c.clone(), table.required_numeric(c)?)]),
        Term::Square(c) => {
            let col = table.required_numeric(c)?.into_iter().map(|v| v * v).collect();
            Ok(vec![(format!("{c}_sq"), col)])
        }
        Term::Indicator { column, level, name } => {
            let levels = table.levels(column)?;
            if !levels.contains(level) {
                return Err(DataError::UnknownLevel { column: column.clone(), level: level.clone() });
            }
            Ok(vec![(name.clone(), indicator_values(table, column, level)?)])
        }
        Term::OneHot { column, baseline } => {
            let levels = table.levels(column)?;
            let base = match baseline {
                Some(b) if levels.contains(b) => b.clone(),
                Some(b) => {
                    return Err(DataError::UnknownLevel { column: column.clone(), level: b.clone() });
                }
                None => levels.first().cloned().unwrap_or_default(),
            };
            levels
                .iter()
                .filter(|l| **l != base)
                .map(|l| Ok((format!("{column}_{l}"), indicator_values(table, column, l)?)))
                .collect()
        }
    }
}

fn indicator_values(table: &Table, column: &str, level: &str) -> DataResult<Vec<f64>> {
    Ok(table
        .level_column(column)?
        .into_iter()
        .map(|l| if l.as_deref() == Some(level) { 1.0 } else { 0.0 })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover term expansion, column ordering, baseline handling,
    // and missing-row accounting.
    // -------------------------------------------------------------------------

    fn patents_table() -> Table {
        let csv = "patents,age,region,iscustomer\n\
                   2,30,Midwest,0\n\
                   4,20,Northeast,1\n\
                   1,,South,0\n\
                   3,40,South,1\n";
        read_csv(csv.as_bytes()).expect("valid csv")
    }

    #[test]
    // Purpose
    // -------
    // Assemble [const, age, age_sq, region dummies, iscustomer].
    //
    // Given
    // -----
    // - Four rows, one missing `age`; regions Midwest, Northeast, South.
    //
    // Expect
    // ------
    // - One row dropped; columns in term order with Midwest as baseline.
    fn build_model_frame_orders_columns_and_drops_missing() {
        // Arrange
        let spec = DesignSpec::with_intercept(vec![
            Term::numeric("age"),
            Term::square("age"),
            Term::one_hot("region", None),
            Term::numeric("iscustomer"),
        ]);

        // Act
        let frame = build_model_frame(&patents_table(), "patents", &spec).expect("frame builds");

        // Assert
        assert_eq!(frame.rows_dropped, 1);
        assert_eq!(
            frame.design.names(),
            &["const", "age", "age_sq", "region_Northeast", "region_South", "iscustomer"]
        );
        assert_eq!(frame.y.to_vec(), vec![2.0, 4.0, 3.0]);
        let x = frame.design.x();
        assert_eq!(x.row(0).to_vec(), vec![1.0, 30.0, 900.0, 0.0, 0.0, 0.0]);
        assert_eq!(x.row(2).to_vec(), vec![1.0, 40.0, 1600.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Explicit baselines and indicator levels must exist.
    fn unknown_levels_are_reported() {
        let table = patents_table();
        let bad_base = DesignSpec::with_intercept(vec![Term::one_hot("region", Some("West"))]);
        assert!(matches!(
            build_model_frame(&table, "patents", &bad_base),
            Err(DataError::UnknownLevel { .. })
        ));

        let bad_level =
            DesignSpec::with_intercept(vec![Term::indicator("region", "West", "west")]);
        assert!(matches!(
            build_model_frame(&table, "patents", &bad_level),
            Err(DataError::UnknownLevel { .. })
        ));
    }
}
