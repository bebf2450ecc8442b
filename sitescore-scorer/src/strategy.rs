//! Per-indicator scoring strategies.
//!
//! Each strategy is a pure function from a parcel's raw value and the
//! request's range to a raw score in `0.0..=1.0`. Dispatch is a table keyed
//! by indicator ([`ScoringStrategy::for_indicator`]), so swapping the
//! strategy of an indicator is a one-line change.

use std::collections::BTreeSet;

use sitescore_core::{
    DeviationTarget, FactDefaults, Indicator, IndicatorRange, ParcelFacts, sanitise,
};

/// Score returned for a degenerate (`min == max`) range.
pub const DEFAULT_BASE_SCORE: f64 = 0.5;

/// Request-scoped inputs shared by every strategy invocation.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Neutral score for degenerate ranges.
    pub base_score: f64,
    /// Target used by deviation scoring.
    pub population_target: DeviationTarget,
    /// Zoning codes counted as a match.
    pub target_zoning: &'a BTreeSet<String>,
    /// Values substituted for missing attributes.
    pub defaults: &'a FactDefaults,
}

/// The scoring semantics of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringStrategy {
    /// More is better, anchored at the base score for `min`.
    LinearAscending,
    /// Less is better.
    LinearDescending,
    /// Closer to a target value is better.
    TargetDeviation,
    /// All-or-nothing zoning code match.
    ZoningMatch,
}

impl ScoringStrategy {
    /// Strategy table keyed by indicator.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::Indicator;
    /// use sitescore_scorer::ScoringStrategy;
    ///
    /// assert_eq!(
    ///     ScoringStrategy::for_indicator(Indicator::DisasterCount),
    ///     ScoringStrategy::LinearDescending
    /// );
    /// ```
    #[must_use]
    pub const fn for_indicator(indicator: Indicator) -> Self {
        match indicator {
            Indicator::LandArea
            | Indicator::OfficialLandPrice
            | Indicator::SubstationCount
            | Indicator::TransmissionTowerCount
            | Indicator::TransmissionLineCount => Self::LinearAscending,
            Indicator::ElectricityCost | Indicator::DisasterCount => Self::LinearDescending,
            Indicator::PopulationDensity => Self::TargetDeviation,
            Indicator::ZoningMatch => Self::ZoningMatch,
        }
    }

    /// Score `indicator` for `parcel`.
    #[must_use]
    pub fn score(
        self,
        indicator: Indicator,
        parcel: &ParcelFacts,
        range: &IndicatorRange,
        context: &ScoringContext<'_>,
    ) -> f64 {
        let value = parcel.numeric_value(indicator, context.defaults);
        match self {
            Self::LinearAscending => {
                value.map_or(0.0, |raw| linear_ascending(raw, range, context.base_score))
            }
            Self::LinearDescending => {
                value.map_or(0.0, |raw| linear_descending(raw, range, context.base_score))
            }
            Self::TargetDeviation => {
                value.map_or(0.0, |raw| target_deviation(raw, context.population_target))
            }
            Self::ZoningMatch => zoning_match(&parcel.zoning_codes, context.target_zoning),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "range bounds are far below 2^52 in practice"
)]
const fn bounds_f64(range: &IndicatorRange) -> (f64, f64) {
    (range.min() as f64, range.max() as f64)
}

/// "More is better" scoring.
///
/// `base + (value - min) / (max - min) * (1 - base)`, clamped; `base` for a
/// degenerate range.
///
/// # Examples
/// ```
/// use sitescore_core::IndicatorRange;
/// use sitescore_scorer::strategy::linear_ascending;
///
/// let range = IndicatorRange::new(100, 1000, 50).expect("valid range");
/// assert!((linear_ascending(550.0, &range, 0.5) - 0.75).abs() < 1e-12);
/// assert_eq!(linear_ascending(5_000.0, &range, 0.5), 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "linear interpolation across the configured range"
)]
pub const fn linear_ascending(value: f64, range: &IndicatorRange, base: f64) -> f64 {
    if range.is_degenerate() {
        return sanitise(base);
    }
    let (min, max) = bounds_f64(range);
    sanitise(base + (value - min) / (max - min) * (1.0 - base))
}

/// "Less is better" scoring.
///
/// `(max - value) / (max - min)`, clamped; `base` for a degenerate range.
///
/// # Examples
/// ```
/// use sitescore_core::IndicatorRange;
/// use sitescore_scorer::strategy::linear_descending;
///
/// let range = IndicatorRange::new(0, 10, 50).expect("valid range");
/// assert_eq!(linear_descending(0.0, &range, 0.5), 1.0);
/// assert_eq!(linear_descending(10.0, &range, 0.5), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "linear interpolation across the configured range"
)]
pub const fn linear_descending(value: f64, range: &IndicatorRange, base: f64) -> f64 {
    if range.is_degenerate() {
        return sanitise(base);
    }
    let (min, max) = bounds_f64(range);
    sanitise((max - value) / (max - min))
}

/// Deviation-from-target scoring.
///
/// `max(0, 1 - |value - standard| / allowed)`. A zero allowance only rewards
/// an exact hit.
///
/// # Examples
/// ```
/// use sitescore_core::DeviationTarget;
/// use sitescore_scorer::strategy::target_deviation;
///
/// let target = DeviationTarget::new(3000.0, 700.0);
/// assert_eq!(target_deviation(3000.0, target), 1.0);
/// assert!((target_deviation(3350.0, target) - 0.5).abs() < 1e-12);
/// assert_eq!(target_deviation(5000.0, target), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "distance from the target is scaled by the allowance"
)]
pub const fn target_deviation(value: f64, target: DeviationTarget) -> f64 {
    if target.allowed_deviation <= 0.0 {
        return if value.to_bits() == target.standard_value.to_bits() {
            1.0
        } else {
            0.0
        };
    }
    sanitise(1.0 - (value - target.standard_value).abs() / target.allowed_deviation)
}

/// Categorical zoning match: `1.0` when any code is a target, else `0.0`.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use sitescore_scorer::strategy::zoning_match;
///
/// let targets = BTreeSet::from(["UQA122".to_owned()]);
/// let parcel = BTreeSet::from(["UQA122".to_owned(), "UQB100".to_owned()]);
/// assert_eq!(zoning_match(&parcel, &targets), 1.0);
/// assert_eq!(zoning_match(&BTreeSet::new(), &targets), 0.0);
/// ```
#[must_use]
pub fn zoning_match(codes: &BTreeSet<String>, targets: &BTreeSet<String>) -> f64 {
    if codes.iter().any(|code| targets.contains(code)) {
        1.0
    } else {
        0.0
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

    const TOLERANCE: f64 = 1e-12;

    fn range(min: i64, max: i64) -> IndicatorRange {
        IndicatorRange::new(min, max, 50).expect("valid range")
    }

    #[fixture]
    fn targets() -> BTreeSet<String> {
        BTreeSet::from(["UQA122".to_owned()])
    }

    #[fixture]
    fn defaults() -> FactDefaults {
        FactDefaults::default()
    }

    #[rstest]
    #[case(100.0, 0.5)]
    #[case(550.0, 0.75)]
    #[case(1000.0, 1.0)]
    #[case(-1e9, 0.0)]
    #[case(1e12, 1.0)]
    fn ascending_interpolates_from_base(#[case] value: f64, #[case] expected: f64) {
        let score = linear_ascending(value, &range(100, 1000), DEFAULT_BASE_SCORE);
        assert!((score - expected).abs() <= TOLERANCE, "got {score}");
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(5.0, 0.5)]
    #[case(10.0, 0.0)]
    #[case(-40.0, 1.0)]
    #[case(400.0, 0.0)]
    fn descending_inverts_the_range(#[case] value: f64, #[case] expected: f64) {
        let score = linear_descending(value, &range(0, 10), DEFAULT_BASE_SCORE);
        assert!((score - expected).abs() <= TOLERANCE, "got {score}");
    }

    #[rstest]
    #[case(0.5)]
    #[case(0.2)]
    #[case(1.0)]
    fn degenerate_range_returns_base(#[case] base: f64) {
        let flat = range(42, 42);
        assert_eq!(linear_ascending(1e6, &flat, base), base);
        assert_eq!(linear_descending(-1e6, &flat, base), base);
    }

    #[rstest]
    fn zero_allowance_requires_exact_hit() {
        let target = DeviationTarget::new(3000.0, 0.0);
        assert_eq!(target_deviation(3000.0, target), 1.0);
        assert_eq!(target_deviation(3000.5, target), 0.0);
    }

    #[rstest]
    fn table_scores_electricity_cost_as_less_is_better(
        targets: BTreeSet<String>,
        defaults: FactDefaults,
    ) {
        let context = ScoringContext {
            base_score: DEFAULT_BASE_SCORE,
            population_target: DeviationTarget::new(3000.0, 700.0),
            target_zoning: &targets,
            defaults: &defaults,
        };
        let cheap = ParcelBuilder::new("cheap").electricity_cost(100.0).build();
        let dear = ParcelBuilder::new("dear").electricity_cost(200.0).build();
        let span = range(100, 200);
        let strategy = ScoringStrategy::for_indicator(Indicator::ElectricityCost);

        let cheap_score = strategy.score(Indicator::ElectricityCost, &cheap, &span, &context);
        let dear_score = strategy.score(Indicator::ElectricityCost, &dear, &span, &context);

        assert_eq!(cheap_score, 1.0);
        assert_eq!(dear_score, 0.0);
    }

    #[rstest]
    fn table_dispatches_zoning_and_population(targets: BTreeSet<String>, defaults: FactDefaults) {
        let context = ScoringContext {
            base_score: DEFAULT_BASE_SCORE,
            population_target: DeviationTarget::new(3000.0, 700.0),
            target_zoning: &targets,
            defaults: &defaults,
        };
        let parcel = ParcelBuilder::new("p")
            .zoning(&["UQA122"])
            .population(&[1500, 1500])
            .build();
        let unbounded = IndicatorRange::unbounded(50).expect("valid range");

        let zoning = ScoringStrategy::for_indicator(Indicator::ZoningMatch).score(
            Indicator::ZoningMatch,
            &parcel,
            &unbounded,
            &context,
        );
        let population = ScoringStrategy::for_indicator(Indicator::PopulationDensity).score(
            Indicator::PopulationDensity,
            &parcel,
            &unbounded,
            &context,
        );

        assert_eq!(zoning, 1.0);
        assert_eq!(population, 1.0);
    }

    #[rstest]
    fn missing_electricity_cost_scores_the_default(
        targets: BTreeSet<String>,
        defaults: FactDefaults,
    ) {
        let context = ScoringContext {
            base_score: DEFAULT_BASE_SCORE,
            population_target: DeviationTarget::new(3000.0, 700.0),
            target_zoning: &targets,
            defaults: &defaults,
        };
        let parcel = ParcelBuilder::new("p").build();
        let score = ScoringStrategy::LinearDescending.score(
            Indicator::ElectricityCost,
            &parcel,
            &range(120, 220),
            &context,
        );
        assert!((score - 0.5).abs() <= TOLERANCE, "170 sits mid-range, got {score}");
    }
}
