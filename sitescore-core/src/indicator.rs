//! The fixed catalogue of suitability indicators and their categories.
//!
//! Indicators are closed enums so lookups are checked at compile time. The
//! category of every indicator is fixed and never changes at runtime.
//!
//! # Examples
//! ```
//! use sitescore_core::{Category, Indicator};
//!
//! assert_eq!(Indicator::LandArea.as_str(), "LAND_AREA");
//! assert_eq!(Indicator::DisasterCount.category(), Category::Safety);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grouping used for two-tier weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Intrinsic properties of the site and its surroundings.
    LocationCondition,
    /// Proximity of power infrastructure.
    Infrastructure,
    /// Exposure to natural disasters.
    Safety,
}

impl Category {
    /// Every category in reporting order.
    pub const ALL: [Self; 3] = [Self::LocationCondition, Self::Infrastructure, Self::Safety];

    /// Return the category identifier.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::Category;
    ///
    /// assert_eq!(Category::Infrastructure.as_str(), "INFRASTRUCTURE");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocationCondition => "LOCATION_CONDITION",
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::Safety => "SAFETY",
        }
    }

    /// Iterate over the indicators belonging to this category.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::{Category, Indicator};
    ///
    /// let safety: Vec<_> = Category::Safety.indicators().collect();
    /// assert_eq!(safety, vec![Indicator::DisasterCount]);
    /// ```
    pub fn indicators(self) -> impl Iterator<Item = Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(move |indicator| indicator.category() == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single measurable attribute contributing to a parcel's suitability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    /// Parcel area in square metres.
    LandArea,
    /// Officially assessed land price per square metre.
    OfficialLandPrice,
    /// Electricity unit cost for the parcel's region.
    ElectricityCost,
    /// Resident population around the parcel.
    PopulationDensity,
    /// Whether the parcel's zoning fits the requested use districts.
    ZoningMatch,
    /// Substations near the parcel.
    SubstationCount,
    /// Transmission towers near the parcel.
    TransmissionTowerCount,
    /// Transmission lines crossing the parcel's surroundings.
    TransmissionLineCount,
    /// Recorded natural disasters in the parcel's region.
    DisasterCount,
}

impl Indicator {
    /// Every indicator in catalogue order.
    pub const ALL: [Self; 9] = [
        Self::LandArea,
        Self::OfficialLandPrice,
        Self::ElectricityCost,
        Self::PopulationDensity,
        Self::ZoningMatch,
        Self::SubstationCount,
        Self::TransmissionTowerCount,
        Self::TransmissionLineCount,
        Self::DisasterCount,
    ];

    /// Return the category the indicator belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::LandArea
            | Self::OfficialLandPrice
            | Self::ElectricityCost
            | Self::PopulationDensity
            | Self::ZoningMatch => Category::LocationCondition,
            Self::SubstationCount | Self::TransmissionTowerCount | Self::TransmissionLineCount => {
                Category::Infrastructure
            }
            Self::DisasterCount => Category::Safety,
        }
    }

    /// Report whether scoring needs a `(min, max)` normalisation range.
    ///
    /// Deviation and categorical indicators ignore the range, so they may be
    /// opted in with a weight alone.
    #[must_use]
    pub const fn requires_bounds(self) -> bool {
        !matches!(self, Self::PopulationDensity | Self::ZoningMatch)
    }

    /// Return the indicator identifier.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::Indicator;
    ///
    /// assert_eq!(Indicator::SubstationCount.as_str(), "SUBSTATION_COUNT");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LandArea => "LAND_AREA",
            Self::OfficialLandPrice => "OFFICIAL_LAND_PRICE",
            Self::ElectricityCost => "ELECTRICITY_COST",
            Self::PopulationDensity => "POPULATION_DENSITY",
            Self::ZoningMatch => "ZONING_MATCH",
            Self::SubstationCount => "SUBSTATION_COUNT",
            Self::TransmissionTowerCount => "TRANSMISSION_TOWER_COUNT",
            Self::TransmissionLineCount => "TRANSMISSION_LINE_COUNT",
            Self::DisasterCount => "DISASTER_COUNT",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown indicator identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown indicator '{0}'")]
pub struct ParseIndicatorError(pub String);

impl FromStr for Indicator {
    type Err = ParseIndicatorError;

    /// Parse an identifier, ignoring case and accepting `-` for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|indicator| indicator.as_str() == normalised)
            .ok_or_else(|| ParseIndicatorError(s.to_owned()))
    }
}
