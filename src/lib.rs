//! Facade crate for the site suitability engine.
//!
//! This crate re-exports the core domain types alongside the scorer so
//! callers can prepare a request and rank parcels through a single
//! dependency. Test builders are available behind the `test-support` feature.

#![forbid(unsafe_code)]

pub use sitescore_core::{
    AnalysisRequest, Bounds, Breakdown, Category, CategorySummary, DeviationTarget, FactDefaults,
    FactsError, InMemoryFactsSource, Indicator, IndicatorRange, IndicatorSetting, IndustryProfile,
    NoRangeStatistics, ParcelFacts, ParcelFactsSource, ParcelId, ParcelScoreSummary,
    RangeStatistics, RequestError, ScoreResult, StaticRangeStatistics,
};

pub use sitescore_scorer::{
    DEFAULT_BASE_SCORE, ParcelFailure, PrepareError, Ranker, RankingError, RankingOutcome,
    ScoreAggregator, ScoringOptions, ScoringStrategy,
};

#[cfg(feature = "test-support")]
pub use sitescore_core::test_support;
