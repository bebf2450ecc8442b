//! Analysis requests: which indicators to score and how.
//!
//! A request is resolved by the caller before reaching the engine. It names
//! the indicators to score (anything absent is excluded), the industry whose
//! population target applies and the zoning codes that count as a match.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Indicator, IndicatorSetting};

/// Target population and tolerated deviation for deviation scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationTarget {
    /// Ideal value.
    pub standard_value: f64,
    /// Distance from the ideal at which the score reaches zero.
    pub allowed_deviation: f64,
}

impl DeviationTarget {
    /// Construct a target.
    #[must_use]
    pub const fn new(standard_value: f64, allowed_deviation: f64) -> Self {
        Self {
            standard_value,
            allowed_deviation,
        }
    }
}

/// Industry whose population target drives deviation scoring.
///
/// # Examples
/// ```
/// use sitescore_core::IndustryProfile;
///
/// let target = IndustryProfile::default().population_target();
/// assert_eq!(target.standard_value, 3000.0);
/// assert_eq!("logistics".parse::<IndustryProfile>(), Ok(IndustryProfile::Logistics));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryProfile {
    /// General manufacturing plants.
    #[default]
    Manufacturing,
    /// Warehousing and distribution.
    Logistics,
    /// Data centres and software campuses.
    It,
}

impl IndustryProfile {
    /// Fixed population target for the industry.
    #[must_use]
    pub const fn population_target(self) -> DeviationTarget {
        match self {
            Self::Manufacturing => DeviationTarget::new(3000.0, 700.0),
            Self::Logistics => DeviationTarget::new(5000.0, 900.0),
            Self::It => DeviationTarget::new(2000.0, 500.0),
        }
    }

    /// Return the profile identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing",
            Self::Logistics => "logistics",
            Self::It => "it",
        }
    }
}

impl fmt::Display for IndustryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustryProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manufacturing" => Ok(Self::Manufacturing),
            "logistics" => Ok(Self::Logistics),
            "it" => Ok(Self::It),
            _ => Err(format!("unknown industry profile '{s}'")),
        }
    }
}

/// Which weighted contribution category sub-scores add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakdown {
    /// Sum global-weighted contributions; categories add up to the overall
    /// score.
    #[default]
    Global,
    /// Sum category-weighted contributions; each category is scored on its
    /// own `0..=1` scale.
    WithinCategory,
}

/// Errors returned by [`AnalysisRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// The population target had a non-finite or negative component.
    #[error("population target must be finite with a non-negative deviation")]
    InvalidPopulationTarget,
    /// A target zoning code was blank.
    #[error("target zoning codes must not be blank")]
    BlankZoningCode,
    /// The region filter was blank.
    #[error("region filter must not be blank")]
    BlankRegion,
}

/// A resolved request to rank parcels.
///
/// # Examples
/// ```
/// use sitescore_core::{AnalysisRequest, Indicator, IndicatorSetting};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = AnalysisRequest::new()
///     .with_indicator(Indicator::LandArea, IndicatorSetting::new(Some(100), Some(1000), Some(50))?)
///     .with_target_zoning(["industrial"]);
/// request.validate()?;
/// assert!(request.setting(Indicator::LandArea).is_some());
/// assert!(request.setting(Indicator::DisasterCount).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    /// Region code prefix restricting the candidate parcels.
    pub region: Option<String>,
    /// Opted-in indicators and their settings.
    pub indicators: BTreeMap<Indicator, IndicatorSetting>,
    /// Industry selecting the population target.
    pub industry: IndustryProfile,
    /// Explicit population target overriding the industry default.
    pub population_target: Option<DeviationTarget>,
    /// Zoning codes counted as a match.
    pub target_zoning: BTreeSet<String>,
    /// Category sub-score breakdown.
    pub breakdown: Breakdown,
}

impl AnalysisRequest {
    /// Construct an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt an indicator in while returning `self` for chaining.
    #[must_use]
    pub fn with_indicator(mut self, indicator: Indicator, setting: IndicatorSetting) -> Self {
        self.indicators.insert(indicator, setting);
        self
    }

    /// Replace the target zoning codes.
    #[must_use]
    pub fn with_target_zoning<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_zoning = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Select the industry profile.
    #[must_use]
    pub const fn with_industry(mut self, industry: IndustryProfile) -> Self {
        self.industry = industry;
        self
    }

    /// Select the category breakdown.
    #[must_use]
    pub const fn with_breakdown(mut self, breakdown: Breakdown) -> Self {
        self.breakdown = breakdown;
        self
    }

    /// Restrict candidates to a region code prefix.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Return the setting for an indicator, if opted in.
    #[must_use]
    pub fn setting(&self, indicator: Indicator) -> Option<&IndicatorSetting> {
        self.indicators.get(&indicator)
    }

    /// Population target in effect: the explicit override, else the
    /// industry's fixed target.
    #[must_use]
    pub fn effective_population_target(&self) -> DeviationTarget {
        self.population_target
            .unwrap_or_else(|| self.industry.population_target())
    }

    /// Validate the request.
    ///
    /// # Errors
    /// Returns [`RequestError`] for blank zoning codes or regions and for
    /// unusable population targets.
    pub fn validate(&self) -> Result<(), RequestError> {
        if let Some(target) = self.population_target
            && !(target.standard_value.is_finite()
                && target.allowed_deviation.is_finite()
                && target.allowed_deviation >= 0.0)
        {
            return Err(RequestError::InvalidPopulationTarget);
        }
        if self.target_zoning.iter().any(|code| code.trim().is_empty()) {
            return Err(RequestError::BlankZoningCode);
        }
        if self
            .region
            .as_deref()
            .is_some_and(|region| region.trim().is_empty())
        {
            return Err(RequestError::BlankRegion);
        }
        Ok(())
    }
}
