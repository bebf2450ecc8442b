//! Test-only collaborators and parcel builders used by unit and behaviour
//! tests across the workspace.

use std::collections::BTreeMap;

use crate::{FactsError, InMemoryFactsSource, ParcelFacts, ParcelFactsSource, ParcelId};

/// Builder for [`ParcelFacts`] fixtures.
///
/// # Examples
/// ```
/// use sitescore_core::test_support::ParcelBuilder;
///
/// let parcel = ParcelBuilder::new("p1").land_area(550.0).build();
/// assert_eq!(parcel.land_area, Some(550.0));
/// ```
#[derive(Debug, Clone)]
pub struct ParcelBuilder {
    facts: ParcelFacts,
}

impl ParcelBuilder {
    /// Start a parcel in region `11110`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            facts: ParcelFacts::new(ParcelId::from(id), "11110"),
        }
    }

    /// Set the region code.
    #[must_use]
    pub fn region(mut self, code: &str) -> Self {
        code.clone_into(&mut self.facts.region_code);
        self
    }

    /// Set the land area.
    #[must_use]
    pub const fn land_area(mut self, value: f64) -> Self {
        self.facts.land_area = Some(value);
        self
    }

    /// Set the official land price.
    #[must_use]
    pub const fn land_price(mut self, value: f64) -> Self {
        self.facts.official_land_price = Some(value);
        self
    }

    /// Set the electricity unit cost.
    #[must_use]
    pub const fn electricity_cost(mut self, value: f64) -> Self {
        self.facts.electricity_unit_cost = Some(value);
        self
    }

    /// Set the nearby substation count.
    #[must_use]
    pub const fn substations(mut self, count: u32) -> Self {
        self.facts.substation_count = Some(count);
        self
    }

    /// Set the population sub-totals.
    #[must_use]
    pub fn population(mut self, subtotals: &[u64]) -> Self {
        self.facts.population_subtotals = subtotals.to_vec();
        self
    }

    /// Set the per-hazard disaster counts.
    #[must_use]
    pub fn disasters(mut self, counts: &[u32]) -> Self {
        self.facts.disaster_counts = counts.to_vec();
        self
    }

    /// Set the zoning codes.
    #[must_use]
    pub fn zoning(mut self, codes: &[&str]) -> Self {
        self.facts.zoning_codes = codes.iter().map(|code| (*code).to_owned()).collect();
        self
    }

    /// Finish the parcel.
    #[must_use]
    pub fn build(self) -> ParcelFacts {
        self.facts
    }
}

/// Source that fails chosen parcels and serves the rest from memory.
#[derive(Debug, Clone, Default)]
pub struct FlakyFactsSource {
    inner: InMemoryFactsSource,
    failures: BTreeMap<ParcelId, FactsError>,
    unavailable: bool,
}

impl FlakyFactsSource {
    /// Wrap a set of parcels.
    #[must_use]
    pub fn with_parcels<I>(parcels: I) -> Self
    where
        I: IntoIterator<Item = ParcelFacts>,
    {
        Self {
            inner: InMemoryFactsSource::with_parcels(parcels),
            ..Self::default()
        }
    }

    /// Fail fetches of `id` with `error`; the parcel stays a candidate.
    #[must_use]
    pub fn failing(mut self, id: &str, error: FactsError) -> Self {
        self.failures.insert(ParcelId::from(id), error);
        self
    }

    /// Fail the candidate search.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

impl ParcelFactsSource for FlakyFactsSource {
    fn candidates(&self, region: Option<&str>) -> Result<Vec<ParcelId>, FactsError> {
        if self.unavailable {
            return Err(FactsError::Unavailable {
                message: "candidate search offline".to_owned(),
            });
        }
        let mut ids = self.inner.candidates(region)?;
        let failing: Vec<ParcelId> = self
            .failures
            .keys()
            .filter(|id| !ids.contains(id))
            .cloned()
            .collect();
        ids.extend(failing);
        Ok(ids)
    }

    fn fetch(&self, id: &ParcelId) -> Result<ParcelFacts, FactsError> {
        if let Some(error) = self.failures.get(id) {
            return Err(error.clone());
        }
        self.inner.fetch(id)
    }
}
