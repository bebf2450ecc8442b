//! Multi-criteria scoring and ranking of land parcels.
//!
//! The crate turns an [`AnalysisRequest`](sitescore_core::AnalysisRequest)
//! into a ranking in three steps:
//! - **Preparation** resolves each opted-in indicator's `(min, max, weight)`
//!   against population statistics and redistributes the weights in two
//!   tiers, once per request ([`ScoreAggregator::prepare`]).
//! - **Scoring** applies one pure strategy per indicator
//!   ([`ScoringStrategy`]) and sums the weighted contributions into category
//!   and overall scores ([`ScoreAggregator::score`]).
//! - **Ranking** fetches candidate parcels in bulk, scores them in parallel
//!   and orders them best first ([`Ranker`]).
//!
//! Every score leaving the crate lies in `0.0..=1.0`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod error;
mod options;
mod ranker;
pub mod strategy;
mod weights;

pub use aggregate::ScoreAggregator;
pub use error::{PrepareError, RankingError, ScoringOptionsError};
pub use options::ScoringOptions;
pub use ranker::{ParcelFailure, Ranker, RankingOutcome};
pub use strategy::{DEFAULT_BASE_SCORE, ScoringContext, ScoringStrategy};
pub use weights::{RedistributedWeights, WeightRedistributor, WeightShare};
