//! Scored output: per-indicator results and per-parcel summaries.
//!
//! Every number stored here has passed through [`sanitise`], so consumers can
//! rely on finite values in `0.0..=1.0`.

use serde::Serialize;

use crate::{Category, Indicator, ParcelId};

/// Clamp and validate a raw score.
///
/// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
///
/// # Examples
/// ```
/// use sitescore_core::sanitise;
///
/// assert_eq!(sanitise(1.7), 1.0);
/// assert_eq!(sanitise(-0.2), 0.0);
/// assert_eq!(sanitise(f64::NAN), 0.0);
/// assert_eq!(sanitise(0.25), 0.25);
/// ```
#[must_use]
pub const fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Outcome of scoring one indicator for one parcel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    indicator: Indicator,
    raw_score: f64,
    category_weight: f64,
    global_weight: f64,
    category_weighted_score: f64,
    global_weighted_score: f64,
}

impl ScoreResult {
    /// Build a result from a raw score and the percentage weights applied.
    ///
    /// Weights are percentages (`0..=100`); the weighted scores are
    /// `raw * weight / 100`, sanitised.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::{Indicator, ScoreResult};
    ///
    /// let result = ScoreResult::new(Indicator::LandArea, 0.8, 50.0, 25.0);
    /// assert!((result.category_weighted_score() - 0.4).abs() < 1e-12);
    /// assert!((result.global_weighted_score() - 0.2).abs() < 1e-12);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted contributions scale raw scores by percentages"
    )]
    pub fn new(
        indicator: Indicator,
        raw_score: f64,
        category_weight: f64,
        global_weight: f64,
    ) -> Self {
        let raw = sanitise(raw_score);
        Self {
            indicator,
            raw_score: raw,
            category_weight,
            global_weight,
            category_weighted_score: sanitise(raw * category_weight / 100.0),
            global_weighted_score: sanitise(raw * global_weight / 100.0),
        }
    }

    /// Indicator that was scored.
    #[must_use]
    pub const fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Unweighted score in `0.0..=1.0`.
    #[must_use]
    pub const fn raw_score(&self) -> f64 {
        self.raw_score
    }

    /// Category-normalised weight applied, as a percentage.
    #[must_use]
    pub const fn category_weight(&self) -> f64 {
        self.category_weight
    }

    /// Global weight applied, as a percentage.
    #[must_use]
    pub const fn global_weight(&self) -> f64 {
        self.global_weight
    }

    /// Contribution to the category sub-score on the category scale.
    #[must_use]
    pub const fn category_weighted_score(&self) -> f64 {
        self.category_weighted_score
    }

    /// Contribution to the overall score.
    #[must_use]
    pub const fn global_weighted_score(&self) -> f64 {
        self.global_weighted_score
    }
}

/// Scores of one category for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    category: Category,
    total: f64,
    results: Vec<ScoreResult>,
}

impl CategorySummary {
    /// Build a summary; the total is sanitised.
    #[must_use]
    pub fn new(category: Category, total: f64, results: Vec<ScoreResult>) -> Self {
        Self {
            category,
            total: sanitise(total),
            results,
        }
    }

    /// Category summarised.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Category sub-score.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Per-indicator results in catalogue order.
    #[must_use]
    pub fn results(&self) -> &[ScoreResult] {
        &self.results
    }
}

/// Scores of one parcel across every scored category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelScoreSummary {
    parcel_id: ParcelId,
    overall: f64,
    categories: Vec<CategorySummary>,
}

impl ParcelScoreSummary {
    /// Build a summary; the overall score is sanitised.
    #[must_use]
    pub fn new(parcel_id: ParcelId, overall: f64, categories: Vec<CategorySummary>) -> Self {
        Self {
            parcel_id,
            overall: sanitise(overall),
            categories,
        }
    }

    /// Parcel summarised.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Overall score in `0.0..=1.0`.
    #[must_use]
    pub const fn overall(&self) -> f64 {
        self.overall
    }

    /// Category summaries in category order.
    #[must_use]
    pub fn categories(&self) -> &[CategorySummary] {
        &self.categories
    }

    /// Summary for one category, if any of its indicators were scored.
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategorySummary> {
        self.categories
            .iter()
            .find(|summary| summary.category == category)
    }

    /// Result for one indicator, if it was scored.
    #[must_use]
    pub fn result(&self, indicator: Indicator) -> Option<&ScoreResult> {
        self.category(indicator.category())?
            .results
            .iter()
            .find(|result| result.indicator == indicator)
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point scores"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    #[case(f64::NEG_INFINITY, 0.0)]
    #[case(-0.1, 0.0)]
    #[case(1.2, 1.0)]
    #[case(0.4, 0.4)]
    fn sanitise_clamps_and_filters(#[case] input: f64, #[case] expected: f64) {
        let result = sanitise(input);
        assert!((0.0..=1.0).contains(&result));
        assert!((result - expected).abs() <= f64::EPSILON);
    }

    #[rstest]
    fn results_clamp_out_of_range_raw_scores() {
        let result = ScoreResult::new(Indicator::LandArea, 4.0, 100.0, 100.0);
        assert_eq!(result.raw_score(), 1.0);
        assert_eq!(result.global_weighted_score(), 1.0);
    }

    #[rstest]
    fn summary_looks_up_indicator_results() {
        let result = ScoreResult::new(Indicator::DisasterCount, 0.5, 100.0, 40.0);
        let summary = ParcelScoreSummary::new(
            ParcelId::from("p"),
            0.2,
            vec![CategorySummary::new(Category::Safety, 0.2, vec![result])],
        );
        assert_eq!(summary.result(Indicator::DisasterCount), Some(&result));
        assert!(summary.result(Indicator::LandArea).is_none());
        assert!(summary.category(Category::Infrastructure).is_none());
    }
}
