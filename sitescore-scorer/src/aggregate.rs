//! Per-parcel aggregation of indicator scores.
//!
//! [`ScoreAggregator::prepare`] does all request-scoped work once: range
//! resolution, exclusion of unscorable indicators and weight
//! redistribution. The prepared aggregator is immutable, so
//! [`ScoreAggregator::score`] can run for many parcels concurrently.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use sitescore_core::{
    AnalysisRequest, Breakdown, Category, CategorySummary, DeviationTarget, Indicator,
    IndicatorRange, ParcelFacts, ParcelScoreSummary, RangeStatistics, ScoreResult,
};

use crate::{
    PrepareError, RedistributedWeights, ScoringContext, ScoringOptions, ScoringStrategy,
    WeightRedistributor,
};

/// Request-scoped scorer for individual parcels.
///
/// # Examples
/// ```
/// use sitescore_core::{AnalysisRequest, Indicator, IndicatorSetting, NoRangeStatistics};
/// use sitescore_core::{ParcelFacts, ParcelId};
/// use sitescore_scorer::{ScoreAggregator, ScoringOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = AnalysisRequest::new()
///     .with_indicator(Indicator::LandArea, IndicatorSetting::new(Some(100), Some(1000), Some(50))?)
///     .with_indicator(Indicator::OfficialLandPrice, IndicatorSetting::new(Some(1000), Some(10000), Some(50))?);
/// let aggregator = ScoreAggregator::prepare(&request, &NoRangeStatistics, ScoringOptions::default())?;
///
/// let mut parcel = ParcelFacts::new(ParcelId::from("p"), "11110");
/// parcel.land_area = Some(550.0);
/// parcel.official_land_price = Some(5500.0);
///
/// let summary = aggregator.score(&parcel);
/// assert!((summary.overall() - 0.75).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    region: Option<String>,
    ranges: BTreeMap<Indicator, IndicatorRange>,
    weights: RedistributedWeights,
    population_target: DeviationTarget,
    target_zoning: BTreeSet<String>,
    breakdown: Breakdown,
    options: ScoringOptions,
}

impl ScoreAggregator {
    /// Resolve ranges and weights for `request`.
    ///
    /// Indicators whose bounds cannot be resolved from the request or
    /// `statistics` are excluded, as is [`Indicator::ZoningMatch`] when the
    /// request names no target zoning codes.
    ///
    /// # Errors
    /// Returns [`PrepareError`] when the request or options are invalid, or
    /// when request bounds combined with statistics invert a range.
    pub fn prepare(
        request: &AnalysisRequest,
        statistics: &dyn RangeStatistics,
        options: ScoringOptions,
    ) -> Result<Self, PrepareError> {
        request.validate()?;
        options.validate()?;

        let mut ranges = BTreeMap::new();
        for (indicator, setting) in &request.indicators {
            if *indicator == Indicator::ZoningMatch && request.target_zoning.is_empty() {
                debug!("excluding {indicator}: no target zoning codes supplied");
                continue;
            }
            let resolved = if indicator.requires_bounds() {
                setting.resolve(statistics.bounds(*indicator))
            } else {
                IndicatorRange::unbounded(setting.weight()).map(Some)
            }
            .map_err(|source| PrepareError::Range {
                indicator: *indicator,
                source,
            })?;
            let Some(range) = resolved else {
                debug!("excluding {indicator}: bounds unknown to request and statistics");
                continue;
            };
            debug!(
                "scoring {indicator} over [{}, {}] with weight {}",
                range.min(),
                range.max(),
                range.weight()
            );
            ranges.insert(*indicator, range);
        }

        let weights = WeightRedistributor::redistribute(
            ranges
                .iter()
                .map(|(indicator, range)| (*indicator, range.weight())),
        );

        Ok(Self {
            region: request.region.clone(),
            ranges,
            weights,
            population_target: request.effective_population_target(),
            target_zoning: request.target_zoning.clone(),
            breakdown: request.breakdown,
            options,
        })
    }

    /// Score one parcel.
    ///
    /// Categories without a scored indicator are omitted from the summary.
    #[must_use]
    pub fn score(&self, parcel: &ParcelFacts) -> ParcelScoreSummary {
        let context = ScoringContext {
            base_score: self.options.base_score,
            population_target: self.population_target,
            target_zoning: &self.target_zoning,
            defaults: &self.options.defaults,
        };

        let mut categories = Vec::new();
        for category in Category::ALL {
            let results: Vec<ScoreResult> = self
                .ranges
                .iter()
                .filter(|(indicator, _)| indicator.category() == category)
                .map(|(indicator, range)| self.score_indicator(*indicator, range, parcel, &context))
                .collect();
            if results.is_empty() {
                continue;
            }
            let total: f64 = match self.breakdown {
                Breakdown::Global => results.iter().map(ScoreResult::global_weighted_score).sum(),
                Breakdown::WithinCategory => results
                    .iter()
                    .map(ScoreResult::category_weighted_score)
                    .sum(),
            };
            categories.push(CategorySummary::new(category, total, results));
        }

        let overall: f64 = categories
            .iter()
            .flat_map(CategorySummary::results)
            .map(ScoreResult::global_weighted_score)
            .sum();
        ParcelScoreSummary::new(parcel.id.clone(), overall, categories)
    }

    fn score_indicator(
        &self,
        indicator: Indicator,
        range: &IndicatorRange,
        parcel: &ParcelFacts,
        context: &ScoringContext<'_>,
    ) -> ScoreResult {
        if indicator != Indicator::ZoningMatch && !parcel.has_value(indicator) {
            debug!("parcel {} has no {indicator}; using the default", parcel.id);
        }
        let raw = ScoringStrategy::for_indicator(indicator).score(indicator, parcel, range, context);
        ScoreResult::new(
            indicator,
            raw,
            self.weights.category_weight(indicator),
            self.weights.global_weight(indicator),
        )
    }

    /// Region prefix restricting the candidates.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Redistributed weights of the scored indicators.
    #[must_use]
    pub const fn weights(&self) -> &RedistributedWeights {
        &self.weights
    }

    /// Resolved range of an indicator, if it is scored.
    #[must_use]
    pub fn range(&self, indicator: Indicator) -> Option<&IndicatorRange> {
        self.ranges.get(&indicator)
    }

    /// Iterate over the scored indicators and their ranges.
    pub fn ranges(&self) -> impl Iterator<Item = (Indicator, &IndicatorRange)> {
        self.ranges.iter().map(|(indicator, range)| (*indicator, range))
    }

    /// Options the aggregator was prepared with.
    #[must_use]
    pub const fn options(&self) -> &ScoringOptions {
        &self.options
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests fail fast when fixtures break")]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point scores"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sitescore_core::test_support::ParcelBuilder;
    use sitescore_core::{
        Bounds, IndicatorRangeError, IndicatorSetting, NoRangeStatistics, StaticRangeStatistics,
    };

    const EPSILON: f64 = 1e-9;

    fn setting(min: i64, max: i64, weight: u8) -> IndicatorSetting {
        IndicatorSetting::new(Some(min), Some(max), Some(weight)).expect("valid setting")
    }

    fn prepare(request: &AnalysisRequest) -> ScoreAggregator {
        ScoreAggregator::prepare(request, &NoRangeStatistics, ScoringOptions::default())
            .expect("request prepares")
    }

    #[fixture]
    fn two_category_request() -> AnalysisRequest {
        AnalysisRequest::new()
            .with_indicator(Indicator::SubstationCount, setting(0, 10, 30))
            .with_indicator(Indicator::DisasterCount, setting(0, 10, 70))
    }

    #[rstest]
    fn unconfigured_indicators_are_omitted() {
        let aggregator = prepare(
            &AnalysisRequest::new().with_indicator(Indicator::LandArea, setting(0, 100, 50)),
        );
        let summary = aggregator.score(&ParcelBuilder::new("p").land_area(100.0).build());

        assert_eq!(summary.categories().len(), 1);
        assert!(summary.result(Indicator::DisasterCount).is_none());
        assert!((summary.overall() - 1.0).abs() <= EPSILON);
    }

    #[rstest]
    fn overall_is_the_sum_of_global_contributions(two_category_request: AnalysisRequest) {
        let aggregator = prepare(&two_category_request);
        let parcel = ParcelBuilder::new("p").substations(10).disasters(&[5]).build();

        let summary = aggregator.score(&parcel);

        // substations: 1.0 * 30%, disasters: 0.5 * 70%
        assert!((summary.overall() - 0.65).abs() <= EPSILON);
        let safety = summary.category(Category::Safety).expect("safety scored");
        assert!((safety.total() - 0.35).abs() <= EPSILON);
    }

    #[rstest]
    fn within_category_breakdown_uses_category_weights(two_category_request: AnalysisRequest) {
        let aggregator = prepare(&two_category_request.with_breakdown(Breakdown::WithinCategory));
        let parcel = ParcelBuilder::new("p").substations(10).disasters(&[5]).build();

        let summary = aggregator.score(&parcel);

        let safety = summary.category(Category::Safety).expect("safety scored");
        assert!((safety.total() - 0.5).abs() <= EPSILON);
        assert!((summary.overall() - 0.65).abs() <= EPSILON);
    }

    #[rstest]
    fn missing_bounds_fall_back_to_statistics() {
        let request = AnalysisRequest::new().with_indicator(
            Indicator::LandArea,
            IndicatorSetting::weighted(50).expect("valid weight"),
        );
        let stats = StaticRangeStatistics::new()
            .with_bounds(Indicator::LandArea, Bounds::new(0, 200).expect("bounds"));
        let aggregator = ScoreAggregator::prepare(&request, &stats, ScoringOptions::default())
            .expect("request prepares");

        assert_eq!(
            aggregator.range(Indicator::LandArea).map(|range| (range.min(), range.max())),
            Some((0, 200))
        );
    }

    #[rstest]
    fn unresolvable_bounds_exclude_the_indicator() {
        let request = AnalysisRequest::new()
            .with_indicator(
                Indicator::LandArea,
                IndicatorSetting::weighted(50).expect("valid weight"),
            )
            .with_indicator(Indicator::DisasterCount, setting(0, 4, 50));
        let aggregator = prepare(&request);

        assert!(aggregator.range(Indicator::LandArea).is_none());
        assert!((aggregator.weights().global_weight(Indicator::DisasterCount) - 100.0).abs() <= EPSILON);
    }

    #[rstest]
    fn zoning_without_targets_is_excluded() {
        let request = AnalysisRequest::new().with_indicator(
            Indicator::ZoningMatch,
            IndicatorSetting::weighted(80).expect("valid weight"),
        );
        let aggregator = prepare(&request);
        assert!(aggregator.weights().is_empty());

        let with_targets = prepare(&request.with_target_zoning(["UQA122"]));
        let summary = with_targets.score(&ParcelBuilder::new("p").zoning(&["UQA122"]).build());
        assert!((summary.overall() - 1.0).abs() <= EPSILON);
    }

    #[rstest]
    fn inverted_mixed_bounds_fail_preparation() {
        let request = AnalysisRequest::new().with_indicator(
            Indicator::LandArea,
            IndicatorSetting::new(Some(500), None, None).expect("valid setting"),
        );
        let stats = StaticRangeStatistics::new()
            .with_bounds(Indicator::LandArea, Bounds::new(0, 100).expect("bounds"));

        let err = ScoreAggregator::prepare(&request, &stats, ScoringOptions::default())
            .expect_err("range inverts");

        assert_eq!(
            err,
            PrepareError::Range {
                indicator: Indicator::LandArea,
                source: IndicatorRangeError::InvertedBounds { min: 500, max: 100 },
            }
        );
    }

    #[rstest]
    fn invalid_options_are_rejected(two_category_request: AnalysisRequest) {
        let err = ScoreAggregator::prepare(
            &two_category_request,
            &NoRangeStatistics,
            ScoringOptions::default().with_base_score(2.0),
        )
        .expect_err("base score out of range");
        assert!(matches!(err, PrepareError::Options(_)));
    }

    #[rstest]
    fn degenerate_range_scores_the_configured_base() {
        let request =
            AnalysisRequest::new().with_indicator(Indicator::SubstationCount, setting(3, 3, 50));
        let aggregator = ScoreAggregator::prepare(
            &request,
            &NoRangeStatistics,
            ScoringOptions::default().with_base_score(0.2),
        )
        .expect("request prepares");

        let summary = aggregator.score(&ParcelBuilder::new("p").substations(9).build());

        assert!((summary.overall() - 0.2).abs() <= EPSILON);
    }
}
