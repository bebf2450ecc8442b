#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for ranking candidate parcels.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::{FlakyFactsSource, ParcelBuilder};
use sitescore_core::{
    AnalysisRequest, FactsError, Indicator, IndicatorSetting, NoRangeStatistics, ParcelId,
};
use sitescore_scorer::{Ranker, RankingOutcome, ScoreAggregator, ScoringOptions};

/// Scenario state shared between steps.
pub struct TestContext {
    source: RefCell<FlakyFactsSource>,
    outcome: RefCell<Option<RankingOutcome>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        source: RefCell::new(FlakyFactsSource::default()),
        outcome: RefCell::new(None),
    }
}

#[given("three candidate parcels of different sizes")]
fn three_parcels(context: &TestContext) {
    *context.source.borrow_mut() = FlakyFactsSource::with_parcels([
        ParcelBuilder::new("small").land_area(200.0).build(),
        ParcelBuilder::new("large").land_area(900.0).build(),
        ParcelBuilder::new("medium").land_area(500.0).build(),
    ]);
}

#[given("the regional electricity cost of one parcel is missing")]
fn one_parcel_fails(context: &TestContext) {
    let source = context.source.replace(FlakyFactsSource::default());
    *context.source.borrow_mut() = source.failing(
        "orphan",
        FactsError::RegionCostMissing {
            id: ParcelId::from("orphan"),
            region: "11110".to_owned(),
        },
    );
}

#[given("two candidate parcels with identical facts")]
fn identical_parcels(context: &TestContext) {
    *context.source.borrow_mut() = FlakyFactsSource::with_parcels([
        ParcelBuilder::new("parcel-b").land_area(400.0).build(),
        ParcelBuilder::new("parcel-a").land_area(400.0).build(),
    ]);
}

#[when("I rank the candidates")]
fn rank_candidates(context: &TestContext) {
    let request = AnalysisRequest::new().with_indicator(
        Indicator::LandArea,
        IndicatorSetting::new(Some(0), Some(1000), None).expect("valid setting"),
    );
    let aggregator =
        ScoreAggregator::prepare(&request, &NoRangeStatistics, ScoringOptions::default())
            .expect("request prepares");
    let outcome = Ranker::new()
        .rank(&aggregator, &*context.source.borrow())
        .expect("candidates resolve");
    *context.outcome.borrow_mut() = Some(outcome);
}

#[then("the remaining parcels are ranked largest first")]
fn ranked_largest_first(context: &TestContext) {
    assert_eq!(ranked_ids(context), vec!["large", "medium", "small"]);
}

#[then("the missing parcel is reported as a failure")]
fn failure_reported(context: &TestContext) {
    let outcome = context.outcome.borrow();
    let failures = &outcome.as_ref().expect("ranking should be recorded").failures;
    assert_eq!(failures.len(), 1);
    let failure = failures.first().expect("one failure");
    assert_eq!(failure.parcel_id, ParcelId::from("orphan"));
    assert!(failure.reason.contains("electricity cost"));
}

#[then("the parcels are ordered by identifier")]
fn ordered_by_identifier(context: &TestContext) {
    assert_eq!(ranked_ids(context), vec!["parcel-a", "parcel-b"]);
}

fn ranked_ids(context: &TestContext) -> Vec<String> {
    context
        .outcome
        .borrow()
        .as_ref()
        .expect("ranking should be recorded")
        .ranked
        .iter()
        .map(|summary| summary.parcel_id().to_string())
        .collect()
}

#[scenario(path = "tests/features/ranking.feature", index = 0)]
fn failed_parcel_does_not_disturb_ranking(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/ranking.feature", index = 1)]
fn ties_broken_by_identifier(context: TestContext) {
    let _ = context;
}
