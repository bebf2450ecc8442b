//! Ranking of candidate parcels.
//!
//! Facts are fetched in bulk, then every parcel is scored in parallel with
//! `rayon`. Scoring only reads the prepared [`ScoreAggregator`], so no
//! locking is involved. A parcel whose facts cannot be fetched is reported
//! as a failure and never affects the others.

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use sitescore_core::{FactsError, ParcelFacts, ParcelFactsSource, ParcelId, ParcelScoreSummary};

use crate::{RankingError, ScoreAggregator};

/// A parcel that could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParcelFailure {
    /// Parcel that failed.
    pub parcel_id: ParcelId,
    /// Human-readable reason.
    pub reason: String,
    #[serde(skip)]
    error: FactsError,
}

impl ParcelFailure {
    fn new(parcel_id: ParcelId, error: FactsError) -> Self {
        Self {
            parcel_id,
            reason: error.to_string(),
            error,
        }
    }

    /// Error reported by the facts source.
    #[must_use]
    pub const fn error(&self) -> &FactsError {
        &self.error
    }
}

/// Ranked summaries plus any per-parcel failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingOutcome {
    /// Scored parcels, best first.
    pub ranked: Vec<ParcelScoreSummary>,
    /// Parcels whose facts could not be fetched, by identifier.
    pub failures: Vec<ParcelFailure>,
    /// Whether the ranking stopped early; `ranked` is then partial.
    pub cancelled: bool,
}

impl RankingOutcome {
    /// Keep only the best `limit` parcels.
    #[must_use]
    pub fn top(mut self, limit: usize) -> Self {
        self.ranked.truncate(limit);
        self
    }

    /// Summary of the best parcel, if any was scored.
    #[must_use]
    pub fn best(&self) -> Option<&ParcelScoreSummary> {
        self.ranked.first()
    }
}

/// Orders parcels by overall score.
///
/// # Examples
/// ```
/// use sitescore_core::{AnalysisRequest, Indicator, IndicatorSetting};
/// use sitescore_core::{InMemoryFactsSource, NoRangeStatistics, ParcelFacts, ParcelId};
/// use sitescore_scorer::{Ranker, ScoreAggregator, ScoringOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = AnalysisRequest::new()
///     .with_indicator(Indicator::LandArea, IndicatorSetting::new(Some(0), Some(1000), None)?);
/// let aggregator = ScoreAggregator::prepare(&request, &NoRangeStatistics, ScoringOptions::default())?;
///
/// let mut small = ParcelFacts::new(ParcelId::from("small"), "11110");
/// small.land_area = Some(100.0);
/// let mut large = ParcelFacts::new(ParcelId::from("large"), "11110");
/// large.land_area = Some(900.0);
/// let source = InMemoryFactsSource::with_parcels([small, large]);
///
/// let outcome = Ranker::new().rank(&aggregator, &source)?;
/// assert_eq!(outcome.best().map(|s| s.parcel_id().as_str()), Some("large"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    cancel: Option<Arc<AtomicBool>>,
}

impl Ranker {
    /// Construct a ranker without cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop scoring further parcels once `flag` is raised.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }

    /// Resolve, fetch, score and order the candidate parcels.
    ///
    /// # Errors
    /// Returns [`RankingError::Candidates`] when the candidate search fails.
    pub fn rank(
        &self,
        aggregator: &ScoreAggregator,
        source: &dyn ParcelFactsSource,
    ) -> Result<RankingOutcome, RankingError> {
        let candidates = source
            .candidates(aggregator.region())
            .map_err(RankingError::Candidates)?;
        info!("ranking {} candidate parcels", candidates.len());

        let mut parcels = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();
        for (parcel_id, fetched) in source.fetch_many(&candidates) {
            match fetched {
                Ok(facts) => parcels.push(facts),
                Err(error) => {
                    warn!("skipping parcel {parcel_id}: {error}");
                    failures.push(ParcelFailure::new(parcel_id, error));
                }
            }
        }
        failures.sort_by(|left, right| left.parcel_id.cmp(&right.parcel_id));

        let mut outcome = self.rank_parcels(aggregator, &parcels);
        outcome.failures = failures;
        info!(
            "ranked {} parcels, {} failed",
            outcome.ranked.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Score and order parcels whose facts are already known.
    ///
    /// Parcels outside the request region are ignored. The outcome is marked
    /// cancelled only when a raised flag made it skip a parcel.
    #[must_use]
    pub fn rank_parcels(
        &self,
        aggregator: &ScoreAggregator,
        parcels: &[ParcelFacts],
    ) -> RankingOutcome {
        let region = aggregator.region();
        let skipped = AtomicBool::new(false);
        let scored: Vec<ParcelScoreSummary> = parcels
            .par_iter()
            .filter(|parcel| parcel.in_region(region))
            .filter_map(|parcel| {
                if self.is_cancelled() {
                    skipped.store(true, AtomicOrdering::Relaxed);
                    None
                } else {
                    Some(aggregator.score(parcel))
                }
            })
            .collect();
        let cancelled = skipped.into_inner();
        if cancelled {
            warn!("ranking cancelled after scoring {} parcels", scored.len());
        }
        RankingOutcome {
            ranked: Self::order(scored),
            failures: Vec::new(),
            cancelled,
        }
    }

    /// Sort summaries by overall score descending, ties by parcel id.
    #[must_use]
    pub fn order(mut summaries: Vec<ParcelScoreSummary>) -> Vec<ParcelScoreSummary> {
        summaries.sort_by(compare_summaries);
        summaries
    }
}

fn compare_summaries(left: &ParcelScoreSummary, right: &ParcelScoreSummary) -> Ordering {
    right
        .overall()
        .total_cmp(&left.overall())
        .then_with(|| left.parcel_id().cmp(right.parcel_id()))
}
