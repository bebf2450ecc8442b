//! Two-tier weight redistribution.
//!
//! Raw importance weights (`0..=100`) are turned into two percentage views:
//! the share of an indicator within its category and its share of the whole
//! request. Both views sum to 100 over any scope with a nonzero weight total
//! and degrade to all-zero otherwise.

use std::collections::BTreeMap;

use serde::Serialize;
use sitescore_core::{Category, Indicator};

/// Redistributed weights of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightShare {
    /// Weight supplied by the request.
    pub raw_weight: u8,
    /// Share of the category total, as a percentage.
    pub category_weight: f64,
    /// Share of the request total, as a percentage.
    pub global_weight: f64,
}

/// Immutable weight maps computed once per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedistributedWeights {
    shares: BTreeMap<Indicator, WeightShare>,
    category_totals: BTreeMap<Category, u32>,
    grand_total: u32,
}

impl RedistributedWeights {
    /// Weights of an indicator, if it was part of the request.
    #[must_use]
    pub fn share(&self, indicator: Indicator) -> Option<&WeightShare> {
        self.shares.get(&indicator)
    }

    /// Iterate over indicators and their weights in catalogue order.
    pub fn shares(&self) -> impl Iterator<Item = (Indicator, &WeightShare)> {
        self.shares.iter().map(|(indicator, share)| (*indicator, share))
    }

    /// Category-normalised weight of an indicator; `0.0` when absent.
    #[must_use]
    pub fn category_weight(&self, indicator: Indicator) -> f64 {
        self.share(indicator).map_or(0.0, |share| share.category_weight)
    }

    /// Global weight of an indicator; `0.0` when absent.
    #[must_use]
    pub fn global_weight(&self, indicator: Indicator) -> f64 {
        self.share(indicator).map_or(0.0, |share| share.global_weight)
    }

    /// Sum of raw weights in a category.
    #[must_use]
    pub fn category_total(&self, category: Category) -> u32 {
        self.category_totals.get(&category).copied().unwrap_or(0)
    }

    /// Sum of raw weights across the request.
    #[must_use]
    pub const fn grand_total(&self) -> u32 {
        self.grand_total
    }

    /// Fraction (`0.0..=1.0`) of the request total held by a category.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "category share is a ratio of weight totals"
    )]
    pub fn global_category_share(&self, category: Category) -> f64 {
        if self.grand_total == 0 {
            return 0.0;
        }
        f64::from(self.category_total(category)) / f64::from(self.grand_total)
    }

    /// Number of weighted indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Report whether no indicator was weighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Computes [`RedistributedWeights`] from raw request weights.
///
/// # Examples
/// ```
/// use sitescore_core::Indicator;
/// use sitescore_scorer::WeightRedistributor;
///
/// let weights = WeightRedistributor::redistribute([
///     (Indicator::LandArea, 30),
///     (Indicator::DisasterCount, 70),
/// ]);
/// assert!((weights.category_weight(Indicator::LandArea) - 100.0).abs() < 1e-9);
/// assert!((weights.global_weight(Indicator::LandArea) - 30.0).abs() < 1e-9);
/// assert!((weights.global_weight(Indicator::DisasterCount) - 70.0).abs() < 1e-9);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightRedistributor;

impl WeightRedistributor {
    /// Redistribute `(indicator, weight)` pairs.
    ///
    /// Repeated indicators keep their last weight.
    #[must_use]
    pub fn redistribute<I>(weights: I) -> RedistributedWeights
    where
        I: IntoIterator<Item = (Indicator, u8)>,
    {
        let raw: BTreeMap<Indicator, u8> = weights.into_iter().collect();

        let mut category_totals: BTreeMap<Category, u32> = BTreeMap::new();
        for (indicator, weight) in &raw {
            *category_totals.entry(indicator.category()).or_insert(0) += u32::from(*weight);
        }
        let grand_total: u32 = category_totals.values().sum();

        let shares = raw
            .iter()
            .map(|(indicator, weight)| {
                let category_total = category_totals
                    .get(&indicator.category())
                    .copied()
                    .unwrap_or(0);
                (
                    *indicator,
                    share_of(*weight, category_total, grand_total),
                )
            })
            .collect();

        RedistributedWeights {
            shares,
            category_totals,
            grand_total,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "weights are converted to percentages of their totals"
)]
fn share_of(weight: u8, category_total: u32, grand_total: u32) -> WeightShare {
    if category_total == 0 {
        return WeightShare {
            raw_weight: weight,
            category_weight: 0.0,
            global_weight: 0.0,
        };
    }
    let within = f64::from(weight) / f64::from(category_total);
    let category_share = if grand_total == 0 {
        0.0
    } else {
        f64::from(category_total) / f64::from(grand_total)
    };
    WeightShare {
        raw_weight: weight,
        category_weight: within * 100.0,
        global_weight: category_share * within * 100.0,
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point scores"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= EPSILON
    }

    #[rstest]
    fn equal_weights_in_one_category_split_evenly() {
        let weights = WeightRedistributor::redistribute([
            (Indicator::LandArea, 50),
            (Indicator::OfficialLandPrice, 50),
        ]);
        for indicator in [Indicator::LandArea, Indicator::OfficialLandPrice] {
            assert!(close(weights.category_weight(indicator), 50.0));
            assert!(close(weights.global_weight(indicator), 50.0));
        }
        assert_eq!(weights.grand_total(), 100);
    }

    #[rstest]
    fn zero_weight_gets_no_share() {
        let weights = WeightRedistributor::redistribute([
            (Indicator::LandArea, 0),
            (Indicator::OfficialLandPrice, 100),
        ]);
        assert_eq!(weights.category_weight(Indicator::LandArea), 0.0);
        assert!(close(weights.category_weight(Indicator::OfficialLandPrice), 100.0));
    }

    #[rstest]
    fn category_shares_follow_category_totals() {
        let weights = WeightRedistributor::redistribute([
            (Indicator::SubstationCount, 30),
            (Indicator::DisasterCount, 70),
        ]);
        assert!(close(weights.global_category_share(Category::Infrastructure), 0.3));
        assert!(close(weights.global_category_share(Category::Safety), 0.7));
        assert!(close(weights.global_weight(Indicator::SubstationCount), 30.0));
        assert!(close(weights.global_weight(Indicator::DisasterCount), 70.0));
        assert_eq!(weights.global_category_share(Category::LocationCondition), 0.0);
    }

    #[rstest]
    fn mixed_categories_sum_to_one_hundred() {
        let weights = WeightRedistributor::redistribute([
            (Indicator::LandArea, 20),
            (Indicator::ElectricityCost, 45),
            (Indicator::SubstationCount, 10),
            (Indicator::TransmissionLineCount, 35),
            (Indicator::DisasterCount, 90),
        ]);
        let global: f64 = weights.shares().map(|(_, share)| share.global_weight).sum();
        assert!(close(global, 100.0));
        for category in Category::ALL {
            let within: f64 = weights
                .shares()
                .filter(|(indicator, _)| indicator.category() == category)
                .map(|(_, share)| share.category_weight)
                .sum();
            assert!(close(within, 100.0), "{category} sums to {within}");
        }
    }

    #[rstest]
    fn all_zero_weights_degrade_to_zero() {
        let weights = WeightRedistributor::redistribute([
            (Indicator::LandArea, 0),
            (Indicator::DisasterCount, 0),
        ]);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights.grand_total(), 0);
        assert!(
            weights
                .shares()
                .all(|(_, share)| share.category_weight == 0.0 && share.global_weight == 0.0)
        );
    }

    #[rstest]
    fn empty_request_has_no_weights() {
        let weights = WeightRedistributor::redistribute(std::iter::empty());
        assert!(weights.is_empty());
        assert_eq!(weights.global_weight(Indicator::LandArea), 0.0);
    }
}
