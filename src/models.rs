//! Weather data shapes shared by the engine, the provider client and the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::errors::EngineError;

/// Discrete weather condition as labelled by the provider (`weather[0].main`).
///
/// Labels outside the named set are kept verbatim in `Other` so that a
/// sector's condition table can miss on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
    #[default]
    Unknown,
    Other(String),
}

impl WeatherCondition {
    /// Every named condition; each sector profile must describe all of them.
    pub const NAMED: [WeatherCondition; 9] = [
        WeatherCondition::Clear,
        WeatherCondition::Clouds,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Thunderstorm,
        WeatherCondition::Drizzle,
        WeatherCondition::Mist,
        WeatherCondition::Fog,
        WeatherCondition::Unknown,
    ];

    /// Parse a provider label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "drizzle" => Self::Drizzle,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            "" | "unknown" => Self::Unknown,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Unknown => "Unknown",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for WeatherCondition {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<WeatherCondition> for String {
    fn from(condition: WeatherCondition) -> Self {
        match condition {
            WeatherCondition::Other(label) => label,
            named => named.label().to_string(),
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A point-in-time observation.
///
/// Numeric fields are optional because the provider may omit them; the
/// scoring engine refuses to score a reading with an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherReading {
    /// Air temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: Option<f64>,
    /// Wind speed in metres per second
    pub wind_speed_ms: Option<f64>,
    /// Provider condition label (e.g. "Clear", "Rain")
    #[serde(default)]
    #[schema(value_type = String, example = "Clouds")]
    pub condition: WeatherCondition,
}

/// Historical monthly means for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Baseline {
    /// Mean air temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Mean relative humidity percentage
    pub humidity_pct: Option<f64>,
    /// Mean wind speed in metres per second
    pub wind_speed_ms: Option<f64>,
    /// Mean daily precipitation in mm (climate series only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_mm: Option<f64>,
}

/// WGS84 coordinates resolved from a place name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Industry sectors with a dedicated impact profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Sector {
    Agriculture,
    Energy,
    Transportation,
    Tourism,
    Construction,
    Retail,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::Agriculture,
        Sector::Energy,
        Sector::Transportation,
        Sector::Tourism,
        Sector::Construction,
        Sector::Retail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sector::Agriculture => "Agriculture",
            Sector::Energy => "Energy",
            Sector::Transportation => "Transportation",
            Sector::Tourism => "Tourism",
            Sector::Construction => "Construction",
            Sector::Retail => "Retail",
        }
    }
}

impl FromStr for Sector {
    type Err = EngineError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnsupportedSector(wanted.to_string()))
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Twelve months of statistical means, ordered oldest to newest.
///
/// All vectors have the same length; months without complete data are left
/// out entirely rather than padded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ClimateSeries {
    /// Month labels, e.g. "Mar 2026"
    pub months: Vec<String>,
    /// Mean temperature per month in Celsius
    pub temperature_c: Vec<f64>,
    /// Total precipitation per month in mm
    pub precipitation_mm: Vec<f64>,
    /// Mean relative humidity per month
    pub humidity_pct: Vec<f64>,
    /// Mean wind speed per month in m/s
    pub wind_speed_ms: Vec<f64>,
}

impl ClimateSeries {
    /// Named metric series, for per-metric trend analysis.
    pub fn metrics(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("temperature_c", self.temperature_c.as_slice()),
            ("precipitation_mm", self.precipitation_mm.as_slice()),
            ("humidity_pct", self.humidity_pct.as_slice()),
            ("wind_speed_ms", self.wind_speed_ms.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}
