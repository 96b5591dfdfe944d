//! models::design — named design matrices and validated outcomes.
//!
//! A [`DesignMatrix`] pairs `X` with its column names; coefficient vectors,
//! covariance matrices and reports all follow this column order. The
//! leading column is the constant `const` when the builder adds one.
use ndarray::{Array1, Array2, Axis};

use crate::models::errors::{ModelError, ModelResult};

/// Name of the intercept column.
pub const INTERCEPT: &str = "const";

#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    names: Vec<String>,
    x: Array2<f64>,
}

impl DesignMatrix {
    /// Pair `x` with `names`.
    ///
    /// # Errors
    /// - [`ModelError::EmptyDesign`] for zero rows or columns.
    /// - [`ModelError::NameCountMismatch`] when `names.len() != x.ncols()`.
    /// - [`ModelError::NonFiniteDesign`] at the first non-finite entry.
    pub fn new(names: Vec<String>, x: Array2<f64>) -> ModelResult<Self> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ModelError::EmptyDesign);
        }
        if names.len() != x.ncols() {
            return Err(ModelError::NameCountMismatch { names: names.len(), columns: x.ncols() });
        }
        if let Some(((row, col), &value)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteDesign { row, col, value });
        }
        Ok(Self { names, x })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Position of `name` among the columns.
    pub fn column_index(&self, name: &str) -> ModelResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ModelError::UnknownColumn { column: name.to_string() })
    }

    /// Copy of the design with every entry of `name` set to `value`.
    pub fn with_column_value(&self, name: &str, value: f64) -> ModelResult<DesignMatrix> {
        let idx = self.column_index(name)?;
        let mut x = self.x.clone();
        x.column_mut(idx).fill(value);
        DesignMatrix::new(self.names.clone(), x)
    }

    /// Column means `x̄`.
    pub fn column_means(&self) -> Array1<f64> {
        self.x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(self.n_params()))
    }

    /// Reorder rows by `order` (a permutation of `0..n_obs`).
    pub fn select_rows(&self, order: &[usize]) -> ModelResult<DesignMatrix> {
        if order.iter().any(|&i| i >= self.n_obs()) {
            return Err(ModelError::LengthMismatch { expected: self.n_obs(), found: order.len() });
        }
        DesignMatrix::new(self.names.clone(), self.x.select(Axis(0), order))
    }
}

/// Check an outcome vector against the design length and finiteness.
pub fn validate_outcome(y: &Array1<f64>, design: &DesignMatrix) -> ModelResult<()> {
    if y.len() != design.n_obs() {
        return Err(ModelError::LengthMismatch { expected: design.n_obs(), found: y.len() });
    }
    if let Some((index, &value)) = y.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::InvalidOutcome { index, value, reason: "Outcome must be finite." });
    }
    Ok(())
}

/// Counts must be non-negative integers.
pub fn validate_counts(y: &Array1<f64>, design: &DesignMatrix) -> ModelResult<()> {
    validate_outcome(y, design)?;
    if let Some((index, &value)) =
        y.iter().enumerate().find(|(_, v)| **v < 0.0 || v.fract() != 0.0)
    {
        return Err(ModelError::InvalidOutcome {
            index,
            value,
            reason: "Count outcomes must be non-negative integers.",
        });
    }
    Ok(())
}

/// Binary outcomes must be exactly 0 or 1.
pub fn validate_binary(y: &Array1<f64>, design: &DesignMatrix) -> ModelResult<()> {
    validate_outcome(y, design)?;
    if let Some((index, &value)) = y.iter().enumerate().find(|(_, v)| **v != 0.0 && **v != 1.0) {
        return Err(ModelError::InvalidOutcome {
            index,
            value,
            reason: "Binary outcomes must be 0 or 1.",
        });
    }
    Ok(())
}
