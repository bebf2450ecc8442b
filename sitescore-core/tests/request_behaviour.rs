#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for request resolution and lenient parcel facts.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::{
    AnalysisRequest, FactDefaults, Indicator, IndicatorRange, IndicatorSetting,
    NoRangeStatistics, ParcelFacts, RangeStatistics, StaticRangeStatistics,
};

/// Scenario state shared between steps.
pub struct TestContext {
    statistics: RefCell<Option<StaticRangeStatistics>>,
    request: RefCell<AnalysisRequest>,
    resolved: RefCell<Option<Option<IndicatorRange>>>,
    parcel: RefCell<Option<ParcelFacts>>,
    electricity_cost: RefCell<Option<f64>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        statistics: RefCell::new(None),
        request: RefCell::new(AnalysisRequest::new()),
        resolved: RefCell::new(None),
        parcel: RefCell::new(None),
        electricity_cost: RefCell::new(None),
    }
}

#[given("population statistics derived from two parcels")]
fn statistics_from_parcels(context: &TestContext) {
    let parcels: Vec<ParcelFacts> = serde_json::from_str(
        r#"[
            {"id": "a", "region_code": "11110", "land_area": 120.5},
            {"id": "b", "region_code": "11110", "land_area": "2,400"}
        ]"#,
    )
    .expect("parse parcels");
    let statistics = StaticRangeStatistics::from_facts(&parcels, &FactDefaults::default());
    *context.statistics.borrow_mut() = Some(statistics);
}

#[given("no population statistics")]
fn no_statistics(context: &TestContext) {
    *context.statistics.borrow_mut() = None;
}

#[given("a request that sets only the land area minimum")]
fn request_with_minimum(context: &TestContext) {
    let setting = IndicatorSetting::new(Some(500), None, Some(40)).expect("valid setting");
    *context.request.borrow_mut() =
        AnalysisRequest::new().with_indicator(Indicator::LandArea, setting);
}

#[when("I resolve the land area range")]
fn resolve_land_area(context: &TestContext) {
    let request = context.request.borrow();
    let setting = request
        .setting(Indicator::LandArea)
        .expect("land area configured");
    let bounds = context.statistics.borrow().as_ref().map_or_else(
        || NoRangeStatistics.bounds(Indicator::LandArea),
        |statistics| statistics.bounds(Indicator::LandArea),
    );
    let resolved = setting.resolve(bounds).expect("bounds resolve");
    *context.resolved.borrow_mut() = Some(resolved);
}

#[then("the range uses the request minimum and the statistics maximum")]
fn mixed_range(context: &TestContext) {
    let range = context
        .resolved
        .borrow()
        .flatten()
        .expect("range resolved");
    assert_eq!((range.min(), range.max(), range.weight()), (500, 2400, 40));
}

#[then("the land area range is unresolved")]
fn unresolved_range(context: &TestContext) {
    let resolved = context.resolved.borrow().expect("resolution attempted");
    assert!(resolved.is_none());
}

#[given("a parcel record with a non-numeric electricity cost")]
fn patchy_parcel(context: &TestContext) {
    let parcel: ParcelFacts = serde_json::from_str(
        r#"{"id": "p", "region_code": "26110", "electricity_unit_cost": "unknown"}"#,
    )
    .expect("lenient parse");
    *context.parcel.borrow_mut() = Some(parcel);
}

#[when("I read the parcel electricity cost")]
fn read_electricity_cost(context: &TestContext) {
    let cost = context
        .parcel
        .borrow()
        .as_ref()
        .and_then(|parcel| {
            parcel.numeric_value(Indicator::ElectricityCost, &FactDefaults::default())
        });
    *context.electricity_cost.borrow_mut() = cost;
}

#[then("the default electricity cost of 170 is used")]
fn default_cost_used(context: &TestContext) {
    let cost = context
        .electricity_cost
        .borrow()
        .expect("cost should be recorded");
    assert!(cost.total_cmp(&170.0).is_eq(), "got {cost}");
}

#[scenario(path = "tests/features/request_resolution.feature", index = 0)]
fn request_bounds_override_statistics(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/request_resolution.feature", index = 1)]
fn unknown_bounds_stay_unresolved(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/request_resolution.feature", index = 2)]
fn patchy_attributes_fall_back(context: TestContext) {
    let _ = context;
}
