//! Human-readable advice derived from a scored impact.
//!
//! Deterministic templates only: threshold-triggered recommendations from the
//! sector's advice table, a guidance line keyed on the overall score, and a
//! one-paragraph summary for the dashboard.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::impact::{Deviations, ImpactResult};
use crate::services::profiles::Advice;

/// Temperature deviation (°C) beyond which temperature advice is given.
const TEMP_ADVICE_THRESHOLD: f64 = 2.0;
/// Humidity deviation (percentage points) beyond which humidity advice is given.
const HUMIDITY_ADVICE_THRESHOLD: f64 = 10.0;
/// Wind deviation (m/s) beyond which wind advice is given.
const WIND_ADVICE_THRESHOLD: f64 = 2.0;

pub const NEAR_NORMAL_ADVICE: &str =
    "Weather conditions are near normal - maintain standard operations.";

/// Recommendations for every factor whose deviation crosses its threshold.
pub fn recommendations(advice: &Advice, deviations: &Deviations) -> Vec<String> {
    let checks = [
        (
            deviations.temperature_c,
            TEMP_ADVICE_THRESHOLD,
            &advice.high_temp,
            &advice.low_temp,
        ),
        (
            deviations.humidity_pct,
            HUMIDITY_ADVICE_THRESHOLD,
            &advice.high_humidity,
            &advice.low_humidity,
        ),
        (
            deviations.wind_speed_ms,
            WIND_ADVICE_THRESHOLD,
            &advice.high_wind,
            &advice.low_wind,
        ),
    ];

    let mut out: Vec<String> = checks
        .into_iter()
        .filter_map(|(dev, threshold, high, low)| {
            if dev > threshold {
                Some(high.clone())
            } else if dev < -threshold {
                Some(low.clone())
            } else {
                None
            }
        })
        .collect();

    if out.is_empty() {
        out.push(NEAR_NORMAL_ADVICE.to_string());
    }
    out
}

/// How urgently a sector should react to the current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Guidance {
    Critical,
    Suboptimal,
    Normal,
    Optimal,
}

impl Guidance {
    pub fn for_score(overall: f64) -> Self {
        if overall < -7.0 {
            Guidance::Critical
        } else if overall < -3.0 {
            Guidance::Suboptimal
        } else if overall > 7.0 {
            Guidance::Optimal
        } else {
            Guidance::Normal
        }
    }

    pub fn message(self, sector: &str) -> String {
        match self {
            Guidance::Critical => format!(
                "Critical weather conditions for {} sector. Consider implementing emergency measures.",
                sector
            ),
            Guidance::Suboptimal => {
                "Suboptimal conditions. Follow the recommendations to minimize impact.".to_string()
            }
            Guidance::Normal => format!(
                "Normal operating conditions for {} sector. Maintain standard procedures.",
                sector
            ),
            Guidance::Optimal => format!(
                "Optimal conditions for {} activities. Capitalize on favorable weather.",
                sector
            ),
        }
    }
}

fn compare(dev: f64, unit: &str, more: &str, less: &str) -> String {
    if dev > 0.0 {
        format!("{:.1}{} {} than the monthly average", dev, unit, more)
    } else if dev < 0.0 {
        format!("{:.1}{} {} than the monthly average", -dev, unit, less)
    } else {
        "at the monthly average".to_string()
    }
}

/// One paragraph describing the result for a location.
pub fn summarize(location: &str, result: &ImpactResult) -> String {
    let dev = result.deviations();
    format!(
        "In {location} it is {temp}, humidity is {humidity} and wind is {wind}. \
         Current conditions ({condition}) mean {condition_impact} for the {sector} sector. \
         Overall impact score {score:.1}: {interpretation}.",
        location = location,
        temp = compare(dev.temperature_c, "°C", "warmer", "cooler"),
        humidity = compare(dev.humidity_pct, " points", "higher", "lower"),
        wind = compare(dev.wind_speed_ms, " m/s", "stronger", "weaker"),
        condition = result.current_weather.condition,
        condition_impact = result.condition_impact,
        sector = result.sector,
        score = result.overall_impact.score,
        interpretation = result.overall_impact.interpretation.label(),
    )
}
