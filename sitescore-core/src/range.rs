//! Per-request indicator settings and the resolved normalisation ranges.
//!
//! An [`IndicatorSetting`] is what a caller supplies: optional bounds and an
//! optional importance weight. Resolution against population-wide
//! [`Bounds`](crate::Bounds) turns it into an [`IndicatorRange`], the value
//! object the scoring strategies consume.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statistics::Bounds;

/// Weight assumed when a setting omits one.
pub const DEFAULT_WEIGHT: u8 = 50;

/// Largest accepted importance weight.
pub const MAX_WEIGHT: u8 = 100;

/// Errors raised while validating indicator settings and ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndicatorRangeError {
    /// The importance weight exceeded [`MAX_WEIGHT`].
    #[error("weight {weight} exceeds the maximum of 100")]
    WeightOutOfRange {
        /// Rejected weight.
        weight: u8,
    },
    /// The lower bound was above the upper bound.
    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedBounds {
        /// Requested minimum.
        min: i64,
        /// Requested maximum.
        max: i64,
    },
}

const fn check_weight(weight: u8) -> Result<u8, IndicatorRangeError> {
    if weight > MAX_WEIGHT {
        return Err(IndicatorRangeError::WeightOutOfRange { weight });
    }
    Ok(weight)
}

const fn check_bounds(min: i64, max: i64) -> Result<(), IndicatorRangeError> {
    if min > max {
        return Err(IndicatorRangeError::InvertedBounds { min, max });
    }
    Ok(())
}

/// Caller-supplied configuration for one indicator.
///
/// The presence of a setting opts the indicator into scoring. Missing bounds
/// are filled from population statistics during resolution.
///
/// # Examples
/// ```
/// use sitescore_core::IndicatorSetting;
///
/// # fn main() -> Result<(), sitescore_core::IndicatorRangeError> {
/// let setting = IndicatorSetting::new(Some(100), Some(1000), None)?;
/// assert_eq!(setting.weight(), 50);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawIndicatorSetting")]
pub struct IndicatorSetting {
    min: Option<i64>,
    max: Option<i64>,
    weight: Option<u8>,
}

#[derive(Deserialize)]
struct RawIndicatorSetting {
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
    #[serde(default)]
    weight: Option<u8>,
}

impl TryFrom<RawIndicatorSetting> for IndicatorSetting {
    type Error = IndicatorRangeError;

    fn try_from(raw: RawIndicatorSetting) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max, raw.weight)
    }
}

impl IndicatorSetting {
    /// Validate and construct a setting.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError::WeightOutOfRange`] for weights above
    /// 100 and [`IndicatorRangeError::InvertedBounds`] when both bounds are
    /// present and `min > max`.
    pub fn new(
        min: Option<i64>,
        max: Option<i64>,
        weight: Option<u8>,
    ) -> Result<Self, IndicatorRangeError> {
        if let Some(value) = weight {
            check_weight(value)?;
        }
        if let (Some(low), Some(high)) = (min, max) {
            check_bounds(low, high)?;
        }
        Ok(Self { min, max, weight })
    }

    /// A setting carrying only a weight; bounds come from statistics.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError::WeightOutOfRange`] for weights above 100.
    pub fn weighted(weight: u8) -> Result<Self, IndicatorRangeError> {
        Self::new(None, None, Some(weight))
    }

    /// Requested lower bound, if any.
    #[must_use]
    pub const fn min(&self) -> Option<i64> {
        self.min
    }

    /// Requested upper bound, if any.
    #[must_use]
    pub const fn max(&self) -> Option<i64> {
        self.max
    }

    /// Importance weight, defaulting to [`DEFAULT_WEIGHT`].
    #[must_use]
    pub fn weight(&self) -> u8 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Resolve the setting against population-wide bounds.
    ///
    /// Request bounds override the fallback per bound. Returns `Ok(None)`
    /// when either bound is still unknown.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError::InvertedBounds`] when mixing request
    /// and fallback bounds yields `min > max`.
    pub fn resolve(
        &self,
        fallback: Option<Bounds>,
    ) -> Result<Option<IndicatorRange>, IndicatorRangeError> {
        let min = self.min.or_else(|| fallback.map(|bounds| bounds.min));
        let max = self.max.or_else(|| fallback.map(|bounds| bounds.max));
        match (min, max) {
            (Some(low), Some(high)) => IndicatorRange::new(low, high, self.weight()).map(Some),
            _ => Ok(None),
        }
    }
}

/// Resolved `(min, max, weight)` for one indicator within one request.
///
/// # Examples
/// ```
/// use sitescore_core::IndicatorRange;
///
/// # fn main() -> Result<(), sitescore_core::IndicatorRangeError> {
/// let range = IndicatorRange::new(100, 1000, 50)?;
/// assert!(!range.is_degenerate());
/// assert!(IndicatorRange::new(10, 1, 50).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorRange {
    min: i64,
    max: i64,
    weight: u8,
}

impl IndicatorRange {
    /// Validate and construct a range.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError`] when `min > max` or the weight exceeds
    /// 100.
    pub fn new(min: i64, max: i64, weight: u8) -> Result<Self, IndicatorRangeError> {
        check_bounds(min, max)?;
        check_weight(weight)?;
        Ok(Self { min, max, weight })
    }

    /// A placeholder range for indicators that ignore bounds.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError::WeightOutOfRange`] for weights above 100.
    pub fn unbounded(weight: u8) -> Result<Self, IndicatorRangeError> {
        Self::new(0, 0, weight)
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Importance weight in `0..=100`.
    #[must_use]
    pub const fn weight(&self) -> u8 {
        self.weight
    }

    /// Report whether `min == max`.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}
