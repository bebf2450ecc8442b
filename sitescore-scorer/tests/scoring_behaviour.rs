#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for weighted parcel scoring.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::ParcelBuilder;
use sitescore_core::{
    AnalysisRequest, Indicator, IndicatorSetting, NoRangeStatistics, ParcelFacts,
    ParcelScoreSummary,
};
use sitescore_scorer::{DEFAULT_BASE_SCORE, ScoreAggregator, ScoringOptions};

/// Scenario state shared between steps.
pub struct TestContext {
    request: RefCell<AnalysisRequest>,
    parcel: RefCell<Option<ParcelFacts>>,
    aggregator: RefCell<Option<ScoreAggregator>>,
    summary: RefCell<Option<ParcelScoreSummary>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        request: RefCell::new(AnalysisRequest::new()),
        parcel: RefCell::new(None),
        aggregator: RefCell::new(None),
        summary: RefCell::new(None),
    }
}

fn setting(min: i64, max: i64, weight: u8) -> IndicatorSetting {
    IndicatorSetting::new(Some(min), Some(max), Some(weight)).expect("valid setting")
}

fn configure(context: &TestContext, indicators: &[(Indicator, IndicatorSetting)]) {
    let mut request = AnalysisRequest::new();
    for (indicator, value) in indicators {
        request = request.with_indicator(*indicator, *value);
    }
    *context.request.borrow_mut() = request;
}

#[given("a request weighting land area and land price equally")]
fn equal_location_weights(context: &TestContext) {
    configure(
        context,
        &[
            (Indicator::LandArea, setting(100, 1000, 50)),
            (Indicator::OfficialLandPrice, setting(1000, 10_000, 50)),
        ],
    );
}

#[given("a request weighting land area at zero and land price fully")]
fn zero_and_full_weights(context: &TestContext) {
    configure(
        context,
        &[
            (Indicator::LandArea, setting(100, 1000, 0)),
            (Indicator::OfficialLandPrice, setting(1000, 10_000, 100)),
        ],
    );
}

#[given("a request weighting substations at 30 and disasters at 70")]
fn split_category_weights(context: &TestContext) {
    configure(
        context,
        &[
            (Indicator::SubstationCount, setting(0, 10, 30)),
            (Indicator::DisasterCount, setting(0, 10, 70)),
        ],
    );
}

#[given("a request with a single-value substation range")]
fn degenerate_substation_range(context: &TestContext) {
    configure(context, &[(Indicator::SubstationCount, setting(4, 4, 60))]);
}

#[given("a request weighting land area and zoning match without target zoning codes")]
fn zoning_without_targets(context: &TestContext) {
    configure(
        context,
        &[
            (Indicator::LandArea, setting(100, 1000, 50)),
            (
                Indicator::ZoningMatch,
                IndicatorSetting::weighted(50).expect("valid setting"),
            ),
        ],
    );
}

#[given("a parcel halfway through both ranges")]
fn midpoint_parcel(context: &TestContext) {
    let parcel = ParcelBuilder::new("midpoint")
        .land_area(550.0)
        .land_price(5500.0)
        .build();
    *context.parcel.borrow_mut() = Some(parcel);
}

#[given("a parcel with the best substation and disaster values")]
fn best_infrastructure_parcel(context: &TestContext) {
    let parcel = ParcelBuilder::new("best")
        .substations(10)
        .disasters(&[0, 0])
        .build();
    *context.parcel.borrow_mut() = Some(parcel);
}

#[given("a parcel at the top of the land area range")]
fn largest_parcel(context: &TestContext) {
    let parcel = ParcelBuilder::new("largest")
        .land_area(1000.0)
        .zoning(&["UQA122"])
        .build();
    *context.parcel.borrow_mut() = Some(parcel);
}

#[when("I score the parcel")]
fn score_parcel(context: &TestContext) {
    let aggregator = ScoreAggregator::prepare(
        &context.request.borrow(),
        &NoRangeStatistics,
        ScoringOptions::default(),
    )
    .expect("request prepares");
    let summary = {
        let parcel = context.parcel.borrow();
        aggregator.score(parcel.as_ref().expect("parcel must be configured"))
    };
    *context.aggregator.borrow_mut() = Some(aggregator);
    *context.summary.borrow_mut() = Some(summary);
}

#[then("both indicators carry half of the global weight")]
fn half_global_weights(context: &TestContext) {
    assert_global_weight(context, Indicator::LandArea, 50.0);
    assert_global_weight(context, Indicator::OfficialLandPrice, 50.0);
}

#[then("the overall score is 0.75")]
fn overall_three_quarters(context: &TestContext) {
    assert_near(overall(context), 0.75, "expected the midpoint blend");
}

#[then("land area carries no weight")]
fn land_area_unweighted(context: &TestContext) {
    assert_global_weight(context, Indicator::LandArea, 0.0);
    let summary = context.summary.borrow();
    let result = summary
        .as_ref()
        .and_then(|scored| scored.result(Indicator::LandArea))
        .expect("land area scored");
    assert_near(result.global_weighted_score(), 0.0, "zero weight contributes nothing");
}

#[then("the overall score equals the land price score")]
fn overall_is_price_score(context: &TestContext) {
    let price = context
        .summary
        .borrow()
        .as_ref()
        .and_then(|scored| scored.result(Indicator::OfficialLandPrice).copied())
        .expect("land price scored");
    assert_near(overall(context), price.raw_score(), "price alone drives the total");
}

#[then("substations carry 30 percent of the global weight")]
fn substations_thirty(context: &TestContext) {
    assert_global_weight(context, Indicator::SubstationCount, 30.0);
}

#[then("disasters carry 70 percent of the global weight")]
fn disasters_seventy(context: &TestContext) {
    assert_global_weight(context, Indicator::DisasterCount, 70.0);
    assert_near(overall(context), 1.0, "best values score fully");
}

#[then("the overall score is the base score")]
fn overall_is_base(context: &TestContext) {
    assert_near(overall(context), DEFAULT_BASE_SCORE, "degenerate range is neutral");
}

#[then("zoning match is not scored")]
fn zoning_not_scored(context: &TestContext) {
    assert_global_weight(context, Indicator::ZoningMatch, 0.0);
    let summary = context.summary.borrow();
    let scored = summary.as_ref().expect("score should be recorded");
    assert!(scored.result(Indicator::ZoningMatch).is_none());
}

#[then("land area carries the full global weight")]
fn land_area_full_weight(context: &TestContext) {
    assert_global_weight(context, Indicator::LandArea, 100.0);
    assert_near(overall(context), 1.0, "land area alone drives the total");
}

fn overall(context: &TestContext) -> f64 {
    context
        .summary
        .borrow()
        .as_ref()
        .map(ParcelScoreSummary::overall)
        .expect("score should be recorded")
}

fn assert_global_weight(context: &TestContext, indicator: Indicator, expected: f64) {
    let weight = context
        .aggregator
        .borrow()
        .as_ref()
        .map(|aggregator| aggregator.weights().global_weight(indicator))
        .expect("aggregator should be prepared");
    assert_near(weight, expected, "unexpected global weight");
}

#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point values"
)]
fn assert_near(actual: f64, expected: f64, message: &str) {
    assert!((actual - expected).abs() < 1e-9, "{message}: got {actual}");
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn equal_weights_within_one_category(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn zero_weight_never_moves_totals(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn weights_shared_across_categories(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/scoring.feature", index = 3)]
fn degenerate_range_scores_neutrally(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/scoring.feature", index = 4)]
fn zoning_ignored_without_targets(context: TestContext) {
    let _ = context;
}
