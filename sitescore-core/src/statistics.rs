//! Population-wide range statistics used to fill missing request bounds.
//!
//! The engine never computes these during scoring; a collaborator supplies
//! them through [`RangeStatistics`]. [`StaticRangeStatistics`] covers the
//! common cases of an explicit table or a table derived from a known parcel
//! population.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FactDefaults, Indicator, IndicatorRangeError, ParcelFacts};

/// Inclusive `(min, max)` observed for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    /// Smallest observed value.
    pub min: i64,
    /// Largest observed value.
    pub max: i64,
}

#[derive(Deserialize)]
struct RawBounds {
    min: i64,
    max: i64,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = IndicatorRangeError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl Bounds {
    /// Validate and construct bounds.
    ///
    /// # Errors
    /// Returns [`IndicatorRangeError::InvertedBounds`] when `min > max`.
    pub const fn new(min: i64, max: i64) -> Result<Self, IndicatorRangeError> {
        if min > max {
            return Err(IndicatorRangeError::InvertedBounds { min, max });
        }
        Ok(Self { min, max })
    }
}

/// Source of population-wide minimum and maximum values.
///
/// Implementations must be `Send + Sync` so a single provider can serve
/// concurrent requests.
pub trait RangeStatistics: Send + Sync {
    /// Return the bounds for `indicator`, if known.
    fn bounds(&self, indicator: Indicator) -> Option<Bounds>;
}

/// Provider that knows nothing; every bound must come from the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRangeStatistics;

impl RangeStatistics for NoRangeStatistics {
    fn bounds(&self, _indicator: Indicator) -> Option<Bounds> {
        None
    }
}

/// Fixed table of bounds keyed by indicator.
///
/// # Examples
/// ```
/// use sitescore_core::{Bounds, Indicator, RangeStatistics, StaticRangeStatistics};
///
/// # fn main() -> Result<(), sitescore_core::IndicatorRangeError> {
/// let stats = StaticRangeStatistics::new()
///     .with_bounds(Indicator::LandArea, Bounds::new(100, 1000)?);
/// assert_eq!(stats.bounds(Indicator::LandArea), Some(Bounds::new(100, 1000)?));
/// assert!(stats.bounds(Indicator::DisasterCount).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticRangeStatistics {
    bounds: BTreeMap<Indicator, Bounds>,
}

impl StaticRangeStatistics {
    /// Construct an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the bounds for an indicator.
    pub fn insert(&mut self, indicator: Indicator, bounds: Bounds) {
        self.bounds.insert(indicator, bounds);
    }

    /// Add bounds while returning `self` for chaining.
    #[must_use]
    pub fn with_bounds(mut self, indicator: Indicator, bounds: Bounds) -> Self {
        self.insert(indicator, bounds);
        self
    }

    /// Number of indicators with known bounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Derive bounds from a parcel population.
    ///
    /// Only indicators that need bounds are tracked. Fractional extremes are
    /// widened outwards (`floor` for the minimum, `ceil` for the maximum) so
    /// every observed value stays inside its range.
    #[must_use]
    pub fn from_facts<'a, I>(facts: I, defaults: &FactDefaults) -> Self
    where
        I: IntoIterator<Item = &'a ParcelFacts>,
    {
        let mut extremes: BTreeMap<Indicator, (f64, f64)> = BTreeMap::new();
        for parcel in facts {
            for indicator in Indicator::ALL
                .into_iter()
                .filter(|indicator| indicator.requires_bounds())
            {
                let Some(value) = parcel.numeric_value(indicator, defaults) else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                extremes
                    .entry(indicator)
                    .and_modify(|(low, high)| {
                        *low = low.min(value);
                        *high = high.max(value);
                    })
                    .or_insert((value, value));
            }
        }
        let bounds = extremes
            .into_iter()
            .map(|(indicator, (low, high))| {
                (
                    indicator,
                    Bounds {
                        min: to_bound(low.floor()),
                        max: to_bound(high.ceil()),
                    },
                )
            })
            .collect();
        Self { bounds }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "values are integral after floor/ceil and saturate at the i64 limits"
)]
const fn to_bound(value: f64) -> i64 {
    value as i64
}

impl RangeStatistics for StaticRangeStatistics {
    fn bounds(&self, indicator: Indicator) -> Option<Bounds> {
        self.bounds.get(&indicator).copied()
    }
}
