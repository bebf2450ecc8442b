//! Engine-wide scoring knobs.

use serde::{Deserialize, Serialize};
use sitescore_core::FactDefaults;

use crate::{DEFAULT_BASE_SCORE, ScoringOptionsError};

/// Options shared by every request scored with an aggregator.
///
/// # Examples
/// ```
/// use sitescore_scorer::ScoringOptions;
///
/// let options = ScoringOptions::default().with_base_score(0.4);
/// assert!(options.validate().is_ok());
/// assert!(ScoringOptions::default().with_base_score(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOptions {
    /// Score returned for degenerate ranges.
    pub base_score: f64,
    /// Values substituted for missing parcel attributes.
    pub defaults: FactDefaults,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            base_score: DEFAULT_BASE_SCORE,
            defaults: FactDefaults::default(),
        }
    }
}

impl ScoringOptions {
    /// Replace the base score.
    #[must_use]
    pub const fn with_base_score(mut self, base_score: f64) -> Self {
        self.base_score = base_score;
        self
    }

    /// Replace the attribute defaults.
    #[must_use]
    pub const fn with_defaults(mut self, defaults: FactDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validate the options.
    ///
    /// # Errors
    /// Returns [`ScoringOptionsError::BaseScoreOutOfRange`] when the base
    /// score is non-finite or outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ScoringOptionsError> {
        if !(self.base_score.is_finite() && (0.0..=1.0).contains(&self.base_score)) {
            return Err(ScoringOptionsError::BaseScoreOutOfRange {
                value: self.base_score,
            });
        }
        Ok(())
    }
}
