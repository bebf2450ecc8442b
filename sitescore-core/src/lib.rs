//! Core domain types for the site suitability engine.
//!
//! The crate defines the fixed indicator catalogue, the per-request
//! settings callers supply, the parcel facts scoring consumes and the scored
//! output. It also declares the two collaborators the engine depends on but
//! never implements against real storage: [`ParcelFactsSource`] and
//! [`RangeStatistics`]. Constructors validate their input and return
//! `Result` to surface bad configuration early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod facts;
pub mod indicator;
pub mod range;
pub mod request;
pub mod score;
pub mod statistics;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use facts::{
    DEFAULT_ELECTRICITY_UNIT_COST, FactDefaults, FactsError, InMemoryFactsSource, ParcelFacts,
    ParcelFactsSource, ParcelId,
};
pub use indicator::{Category, Indicator, ParseIndicatorError};
pub use range::{DEFAULT_WEIGHT, IndicatorRange, IndicatorRangeError, IndicatorSetting, MAX_WEIGHT};
pub use request::{AnalysisRequest, Breakdown, DeviationTarget, IndustryProfile, RequestError};
pub use score::{CategorySummary, ParcelScoreSummary, ScoreResult, sanitise};
pub use statistics::{Bounds, NoRangeStatistics, RangeStatistics, StaticRangeStatistics};
