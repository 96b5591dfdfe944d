//! report — text rendering and CSV export of analysis results.
//!
//! - [`format`]: coefficient tables (design-column order), t-test lines,
//!   marginal effects, and simulation series summaries.
//! - [`export`]: CSV files for simulation series and coefficient tables.

pub mod export;
pub mod format;

pub use self::export::{
    CoefficientTable, export_coefficients, export_series, write_clt_panels, write_coefficients,
    write_series,
};
pub use self::format::{
    format_clt_panels, format_coefficient_table, format_counterfactual, format_failure,
    format_fitted_model, format_marginal_effects, format_ols, format_rate_fit,
    format_series_summary, format_ttest, heading,
};
