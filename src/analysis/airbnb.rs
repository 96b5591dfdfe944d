//! analysis::airbnb — review counts of Airbnb listings.
//!
//! The number of reviews stands in for bookings. Listings are modeled as
//! Poisson counts on room type, size, price, review scores and instant
//! bookability; the instant-booking coefficient is also expressed as a
//! predicted-count difference.
use log::info;

use crate::{
    analysis::{
        AnalysisOptions, AnalysisReport,
        errors::{AnalysisError, AnalysisResult},
        patents::{CountModelFits, fit_count_models, format_count_models},
    },
    data::{
        errors::{DataError, DataResult},
        features::{DesignSpec, Term},
        table::Table,
    },
    models::counterfactual::{CounterfactualEffect, indicator_effect},
    report::format::format_counterfactual,
};

pub const OUTCOME: &str = "number_of_reviews";
pub const REQUIRED_COLUMNS: [&str; 9] = [
    OUTCOME,
    "room_type",
    "bathrooms",
    "bedrooms",
    "price",
    "review_scores_cleanliness",
    "review_scores_location",
    "review_scores_value",
    "instant_bookable",
];
/// Name of the derived instant-booking indicator.
pub const INSTANT: &str = "instant";

/// Design with room-type dummies (first sorted level as baseline), numeric
/// listing features, and the instant-booking indicator.
///
/// `instant_bookable` may be stored as `t`/`f` or as booleans; the positive
/// level is detected from the data.
///
/// # Errors
/// [`DataError::UnknownLevel`] when neither `t` nor `true` occurs.
pub fn design_spec(table: &Table) -> DataResult<DesignSpec> {
    let levels = table.levels("instant_bookable")?;
    let positive = ["t", "true", "1"]
        .into_iter()
        .find(|l| levels.iter().any(|v| v.as_str() == *l))
        .ok_or_else(|| DataError::UnknownLevel {
            column: "instant_bookable".into(),
            level: "t".into(),
        })?;
    Ok(DesignSpec::with_intercept(vec![
        Term::one_hot("room_type", None),
        Term::numeric("bathrooms"),
        Term::numeric("bedrooms"),
        Term::numeric("price"),
        Term::numeric("review_scores_cleanliness"),
        Term::numeric("review_scores_location"),
        Term::numeric("review_scores_value"),
        Term::indicator("instant_bookable", positive, INSTANT),
    ]))
}

/// Poisson MLE and GLM of review counts.
pub fn count_models(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<CountModelFits> {
    let spec = design_spec(table)?;
    fit_count_models(table, OUTCOME, &spec, opts)
}

/// Predicted-review difference from making every listing instantly bookable.
pub fn instant_booking_effect(fits: &CountModelFits) -> AnalysisResult<CounterfactualEffect> {
    indicator_effect(&fits.mle, &fits.frame.design, INSTANT)
        .map_err(|e| AnalysisError::model_fit("instant-booking counterfactual", e))
}

/// Full Airbnb report.
///
/// # Errors
/// [`AnalysisError::Data`] when a required column is missing.
pub fn run_airbnb(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<AnalysisReport> {
    table.require_columns(&REQUIRED_COLUMNS)?;
    info!("airbnb: {} listings", table.n_rows());
    let mut report = AnalysisReport::new("Airbnb listings and review counts");

    let fits = count_models(table, opts);
    if let Ok(f) = &fits {
        report.coefficients.extend(f.coefficient_tables());
    }
    let effect = fits.as_ref().map_err(Clone::clone).and_then(instant_booking_effect);
    report.push("Poisson regression", fits.map(|f| format_count_models(&f)));
    report.push(
        "Instant-booking counterfactual",
        effect.map(|e| format_counterfactual("instant 0 -> 1", &e)),
    );
    Ok(report)
}
