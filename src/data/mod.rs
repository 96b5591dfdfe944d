//! data — loading tables and building model inputs.
//!
//! Purpose
//! -------
//! Read a CSV file fully into memory ([`loader`]), hold it as a typed
//! column table ([`table`]), and derive the outcome vector and named design
//! matrix a model consumes ([`features`]).
//!
//! Key behaviors
//! -------------
//! - Missing-value tokens (`""`, `NA`, `nan`, `NaN`, `.`) become
//!   [`Cell::Missing`]; rows missing a required value are dropped when a
//!   model frame is built, and the count is logged and returned.
//! - Every transformation returns a new [`Table`]; filtered subsets are
//!   passed explicitly to later stages.
//!
//! Conventions
//! -----------
//! - Errors are [`DataError`] / [`DataResult`]; no panics on malformed
//!   input.
//! - Logging uses the `log` facade at stage boundaries only.

pub mod errors;
pub mod features;
pub mod loader;
pub mod table;

pub use self::errors::{DataError, DataResult};
pub use self::features::{DesignSpec, ModelFrame, Term, build_model_frame};
pub use self::loader::{load_csv, load_csv_with_columns, read_csv};
pub use self::table::{Cell, Table};
