//! Error types raised while preparing a request and ranking parcels.

use sitescore_core::{FactsError, Indicator, IndicatorRangeError, RequestError};
use thiserror::Error;

/// Errors raised by [`ScoringOptions::validate`](crate::ScoringOptions::validate).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoringOptionsError {
    /// The base score was non-finite or outside `0.0..=1.0`.
    #[error("base score {value} must be a finite value in 0.0..=1.0")]
    BaseScoreOutOfRange {
        /// Rejected base score.
        value: f64,
    },
}

/// Errors raised while preparing a request for scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// The request itself was malformed.
    #[error("invalid analysis request")]
    Request(#[from] RequestError),
    /// The scoring options were invalid.
    #[error("invalid scoring options")]
    Options(#[from] ScoringOptionsError),
    /// Combining request and statistics bounds produced an invalid range.
    #[error("cannot resolve the range of {indicator}")]
    Range {
        /// Indicator whose range failed.
        indicator: Indicator,
        /// Underlying validation failure.
        #[source]
        source: IndicatorRangeError,
    },
}

/// Errors that abort a whole ranking.
///
/// Failures confined to one parcel are reported through
/// [`RankingOutcome::failures`](crate::RankingOutcome::failures) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// Resolving the candidate parcels failed.
    #[error("failed to resolve candidate parcels")]
    Candidates(#[source] FactsError),
}
