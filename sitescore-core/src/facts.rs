//! Raw parcel attributes and the collaborator that supplies them.
//!
//! [`ParcelFacts`] is a read-only snapshot assembled before scoring. Numeric
//! attributes are optional: upstream data is patchy, and a missing or
//! non-numeric value falls back to the configured [`FactDefaults`] instead of
//! failing the parcel.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::Indicator;

/// Default electricity unit cost applied when a parcel has none.
pub const DEFAULT_ELECTRICITY_UNIT_COST: f64 = 170.0;

/// Identifier of a land parcel.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(String);

impl ParcelId {
    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParcelId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ParcelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values substituted for missing parcel attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactDefaults {
    /// Land area in square metres.
    pub land_area: f64,
    /// Official land price.
    pub official_land_price: f64,
    /// Electricity unit cost.
    pub electricity_unit_cost: f64,
    /// Any infrastructure count.
    pub infrastructure_count: f64,
    /// Surrounding population when no sub-totals are known.
    pub population: f64,
}

impl Default for FactDefaults {
    fn default() -> Self {
        Self {
            land_area: 0.0,
            official_land_price: 0.0,
            electricity_unit_cost: DEFAULT_ELECTRICITY_UNIT_COST,
            infrastructure_count: 0.0,
            population: 0.0,
        }
    }
}

/// Raw attributes of one parcel.
///
/// # Examples
/// ```
/// use sitescore_core::{FactDefaults, Indicator, ParcelFacts, ParcelId};
///
/// let mut parcel = ParcelFacts::new(ParcelId::from("1111010100100010000"), "11110");
/// parcel.land_area = Some(550.0);
/// parcel.population_subtotals = vec![1200, 1300];
///
/// let defaults = FactDefaults::default();
/// assert_eq!(parcel.numeric_value(Indicator::LandArea, &defaults), Some(550.0));
/// assert_eq!(parcel.numeric_value(Indicator::PopulationDensity, &defaults), Some(2500.0));
/// assert_eq!(parcel.numeric_value(Indicator::ElectricityCost, &defaults), Some(170.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelFacts {
    /// Parcel identifier.
    pub id: ParcelId,
    /// Hierarchical administrative region code.
    #[serde(default)]
    pub region_code: String,
    /// Area in square metres.
    #[serde(default, deserialize_with = "lenient_number")]
    pub land_area: Option<f64>,
    /// Official land price.
    #[serde(default, deserialize_with = "lenient_number")]
    pub official_land_price: Option<f64>,
    /// Electricity unit cost for the parcel's region.
    #[serde(default, deserialize_with = "lenient_number")]
    pub electricity_unit_cost: Option<f64>,
    /// Nearby substations.
    #[serde(default, deserialize_with = "lenient_count")]
    pub substation_count: Option<u32>,
    /// Nearby transmission towers.
    #[serde(default, deserialize_with = "lenient_count")]
    pub transmission_tower_count: Option<u32>,
    /// Nearby transmission lines.
    #[serde(default, deserialize_with = "lenient_count")]
    pub transmission_line_count: Option<u32>,
    /// Population sub-totals of the surrounding area.
    #[serde(default)]
    pub population_subtotals: Vec<u64>,
    /// Recorded disasters, one entry per hazard type.
    #[serde(default)]
    pub disaster_counts: Vec<u32>,
    /// Zoning (use-district) codes covering the parcel.
    #[serde(default)]
    pub zoning_codes: BTreeSet<String>,
}

impl ParcelFacts {
    /// Construct a parcel with no attributes beyond its identity.
    #[must_use]
    pub fn new(id: ParcelId, region_code: impl Into<String>) -> Self {
        Self {
            id,
            region_code: region_code.into(),
            ..Self::default()
        }
    }

    /// Report whether the parcel lies in the region identified by `prefix`.
    ///
    /// Region codes are hierarchical, so a parcel belongs to every region
    /// whose code prefixes its own. `None` matches every parcel.
    #[must_use]
    pub fn in_region(&self, prefix: Option<&str>) -> bool {
        prefix.is_none_or(|code| self.region_code.starts_with(code))
    }

    /// Report whether the attribute behind `indicator` is present.
    #[must_use]
    pub fn has_value(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::LandArea => self.land_area.is_some(),
            Indicator::OfficialLandPrice => self.official_land_price.is_some(),
            Indicator::ElectricityCost => self.electricity_unit_cost.is_some(),
            Indicator::PopulationDensity => !self.population_subtotals.is_empty(),
            Indicator::ZoningMatch => !self.zoning_codes.is_empty(),
            Indicator::SubstationCount => self.substation_count.is_some(),
            Indicator::TransmissionTowerCount => self.transmission_tower_count.is_some(),
            Indicator::TransmissionLineCount => self.transmission_line_count.is_some(),
            Indicator::DisasterCount => true,
        }
    }

    /// Scalar value consumed by numeric strategies.
    ///
    /// Missing attributes take their value from `defaults`. Returns `None`
    /// for [`Indicator::ZoningMatch`], which is categorical.
    #[must_use]
    pub fn numeric_value(&self, indicator: Indicator, defaults: &FactDefaults) -> Option<f64> {
        let count = |value: Option<u32>| value.map_or(defaults.infrastructure_count, f64::from);
        match indicator {
            Indicator::LandArea => Some(self.land_area.unwrap_or(defaults.land_area)),
            Indicator::OfficialLandPrice => Some(
                self.official_land_price
                    .unwrap_or(defaults.official_land_price),
            ),
            Indicator::ElectricityCost => Some(
                self.electricity_unit_cost
                    .unwrap_or(defaults.electricity_unit_cost),
            ),
            Indicator::PopulationDensity => Some(self.population_total(defaults)),
            Indicator::ZoningMatch => None,
            Indicator::SubstationCount => Some(count(self.substation_count)),
            Indicator::TransmissionTowerCount => Some(count(self.transmission_tower_count)),
            Indicator::TransmissionLineCount => Some(count(self.transmission_line_count)),
            Indicator::DisasterCount => Some(self.disaster_total()),
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "population totals stay far below 2^52"
    )]
    fn population_total(&self, defaults: &FactDefaults) -> f64 {
        if self.population_subtotals.is_empty() {
            return defaults.population;
        }
        self.population_subtotals
            .iter()
            .fold(0_u64, |acc, value| acc.saturating_add(*value)) as f64
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "disaster totals stay far below 2^52"
    )]
    fn disaster_total(&self) -> f64 {
        self.disaster_counts
            .iter()
            .fold(0_u64, |acc, value| acc.saturating_add(u64::from(*value))) as f64
    }
}

fn interpret_number(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let parsed = interpret_number(&raw);
    if parsed.is_none() && !raw.is_null() {
        warn!("treating non-numeric attribute {raw} as missing");
    }
    Ok(parsed)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &raw {
        serde_json::Value::Number(number) => number.as_u64(),
        serde_json::Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
    .and_then(|count| u32::try_from(count).ok());
    if parsed.is_none() && !raw.is_null() {
        warn!("treating non-numeric count {raw} as missing");
    }
    Ok(parsed)
}

/// Errors raised by a [`ParcelFactsSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactsError {
    /// No parcel exists with the identifier.
    #[error("parcel {id} was not found")]
    NotFound {
        /// Requested parcel.
        id: ParcelId,
    },
    /// The regional electricity cost lookup failed for the parcel.
    #[error("no electricity cost is recorded for region {region} of parcel {id}")]
    RegionCostMissing {
        /// Affected parcel.
        id: ParcelId,
        /// Region whose cost is missing.
        region: String,
    },
    /// The backing store could not answer.
    #[error("parcel facts are unavailable: {message}")]
    Unavailable {
        /// Description supplied by the backend.
        message: String,
    },
}

/// Read-only access to parcel facts.
///
/// Implementations must be `Send + Sync`; the ranker fetches and scores
/// parcels from several threads.
pub trait ParcelFactsSource: Send + Sync {
    /// Return the candidate parcels inside the region prefix.
    ///
    /// # Errors
    /// Returns [`FactsError::Unavailable`] when the candidate search fails.
    fn candidates(&self, region: Option<&str>) -> Result<Vec<ParcelId>, FactsError>;

    /// Fetch the facts of one parcel.
    ///
    /// # Errors
    /// Returns [`FactsError`] when the parcel or a mandatory lookup is missing.
    fn fetch(&self, id: &ParcelId) -> Result<ParcelFacts, FactsError>;

    /// Fetch several parcels, reporting a result per identifier.
    fn fetch_many(&self, ids: &[ParcelId]) -> Vec<(ParcelId, Result<ParcelFacts, FactsError>)> {
        ids.iter().map(|id| (id.clone(), self.fetch(id))).collect()
    }
}

/// [`ParcelFactsSource`] backed by an in-memory map.
///
/// # Examples
/// ```
/// use sitescore_core::{InMemoryFactsSource, ParcelFacts, ParcelFactsSource, ParcelId};
///
/// let source = InMemoryFactsSource::with_parcels([
///     ParcelFacts::new(ParcelId::from("a"), "11110"),
///     ParcelFacts::new(ParcelId::from("b"), "26110"),
/// ]);
/// let seoul = source.candidates(Some("11")).expect("candidates");
/// assert_eq!(seoul, vec![ParcelId::from("a")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFactsSource {
    parcels: BTreeMap<ParcelId, ParcelFacts>,
}

impl InMemoryFactsSource {
    /// Build a source from a collection of parcels.
    ///
    /// Later parcels replace earlier ones with the same identifier.
    #[must_use]
    pub fn with_parcels<I>(parcels: I) -> Self
    where
        I: IntoIterator<Item = ParcelFacts>,
    {
        Self {
            parcels: parcels
                .into_iter()
                .map(|parcel| (parcel.id.clone(), parcel))
                .collect(),
        }
    }

    /// Iterate over the stored parcels in identifier order.
    pub fn parcels(&self) -> impl Iterator<Item = &ParcelFacts> {
        self.parcels.values()
    }

    /// Number of stored parcels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    /// Report whether the source holds no parcels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}

impl ParcelFactsSource for InMemoryFactsSource {
    fn candidates(&self, region: Option<&str>) -> Result<Vec<ParcelId>, FactsError> {
        Ok(self
            .parcels
            .values()
            .filter(|parcel| parcel.in_region(region))
            .map(|parcel| parcel.id.clone())
            .collect())
    }

    fn fetch(&self, id: &ParcelId) -> Result<ParcelFacts, FactsError> {
        self.parcels
            .get(id)
            .cloned()
            .ok_or_else(|| FactsError::NotFound { id: id.clone() })
    }
}
