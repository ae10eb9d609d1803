//! Weather impact scoring.
//!
//! Pipeline: deviations from the monthly baseline → per-factor sector rules
//! → clamp to [-10, 10] → weighted overall score → interpretation band.
//! Pure and synchronous; the only side effect is a debug trace event.

use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::EngineError;
use crate::helpers::{finite, round_1dp};
use crate::models::{Baseline, WeatherReading};
use crate::services::interpretation::Interpretation;
use crate::services::profiles::{resolve_profile, FactorProfile, SectorProfile, Weights};

/// Factor and overall scores are pinned to ±SCORE_BOUND.
pub const SCORE_BOUND: f64 = 10.0;

/// Clamp a raw impact into [-SCORE_BOUND, SCORE_BOUND] by truncation.
pub fn clamp_score(raw: f64) -> f64 {
    raw.clamp(-SCORE_BOUND, SCORE_BOUND)
}

/// Signed differences between a current reading and its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Deviations {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
}

impl Deviations {
    /// `current - baseline` for each factor.
    ///
    /// Fails on the first absent or non-finite field; nothing is ever
    /// defaulted to zero.
    pub fn between(current: &WeatherReading, baseline: &Baseline) -> Result<Self, EngineError> {
        let temperature = require(current.temperature_c, "current", "temperature")?;
        let humidity = require(current.humidity_pct, "current", "humidity")?;
        let wind = require(current.wind_speed_ms, "current", "wind speed")?;
        let avg_temperature = require(baseline.temperature_c, "baseline", "temperature")?;
        let avg_humidity = require(baseline.humidity_pct, "baseline", "humidity")?;
        let avg_wind = require(baseline.wind_speed_ms, "baseline", "wind speed")?;

        Ok(Self {
            temperature_c: temperature - avg_temperature,
            humidity_pct: humidity - avg_humidity,
            wind_speed_ms: wind - avg_wind,
        })
    }
}

fn require(value: Option<f64>, input: &'static str, field: &'static str) -> Result<f64, EngineError> {
    finite(value).ok_or(EngineError::MissingData { input, field })
}

/// Knobs for one scoring call.
#[derive(Debug, Clone, Default)]
pub struct ScoringOptions {
    pub weights: Weights,
    /// Score unknown sector names with the generic profile instead of
    /// rejecting them.
    pub allow_generic_fallback: bool,
}

/// Score and description for a single factor.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FactorImpact {
    /// Current minus baseline
    pub deviation: f64,
    /// Clamped impact score in [-10, 10], rounded to 1 decimal place
    pub impact_score: f64,
    /// What the deviation means for the sector
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FactorImpacts {
    pub temperature: FactorImpact,
    pub humidity: FactorImpact,
    pub wind: FactorImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverallImpact {
    /// Weighted overall score in [-10, 10], rounded to 1 decimal place
    pub score: f64,
    /// Interpretation band of the unrounded score
    #[schema(value_type = String)]
    pub interpretation: Interpretation,
}

/// Result of one scoring call. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImpactResult {
    /// Sector name the profile was resolved for
    pub sector: String,
    pub current_weather: WeatherReading,
    pub average_weather: Baseline,
    pub impacts: FactorImpacts,
    /// Operational effect of the current weather condition
    pub condition_impact: String,
    pub overall_impact: OverallImpact,
}

impl ImpactResult {
    pub fn deviations(&self) -> Deviations {
        Deviations {
            temperature_c: self.impacts.temperature.deviation,
            humidity_pct: self.impacts.humidity.deviation,
            wind_speed_ms: self.impacts.wind.deviation,
        }
    }
}

/// Score with default weights, rejecting unknown sectors.
pub fn score_impact(
    current: &WeatherReading,
    baseline: &Baseline,
    sector: &str,
) -> Result<ImpactResult, EngineError> {
    score_impact_with(current, baseline, sector, &ScoringOptions::default())
}

/// Score with explicit options.
///
/// The sector is resolved before the readings are checked, so an unknown
/// sector is reported even when data is also missing.
pub fn score_impact_with(
    current: &WeatherReading,
    baseline: &Baseline,
    sector: &str,
    options: &ScoringOptions,
) -> Result<ImpactResult, EngineError> {
    let profile = resolve_profile(sector, options.allow_generic_fallback)?;
    let deviations = Deviations::between(current, baseline)?;
    Ok(score_with_profile(
        &profile,
        current,
        baseline,
        deviations,
        &options.weights,
    ))
}

fn score_with_profile(
    profile: &SectorProfile,
    current: &WeatherReading,
    baseline: &Baseline,
    deviations: Deviations,
    weights: &Weights,
) -> ImpactResult {
    let (temp_score, temperature) = factor_impact(&profile.temperature, deviations.temperature_c);
    let (humidity_score, humidity) = factor_impact(&profile.humidity, deviations.humidity_pct);
    let (wind_score, wind) = factor_impact(&profile.wind, deviations.wind_speed_ms);

    let overall = weights.combine(temp_score, humidity_score, wind_score);
    let interpretation = Interpretation::classify(overall);

    tracing::debug!(
        sector = %profile.name,
        temp_score,
        humidity_score,
        wind_score,
        overall,
        "Scored weather impact"
    );

    ImpactResult {
        sector: profile.name.clone(),
        current_weather: current.clone(),
        average_weather: baseline.clone(),
        impacts: FactorImpacts {
            temperature,
            humidity,
            wind,
        },
        condition_impact: profile.conditions.describe(&current.condition).to_string(),
        overall_impact: OverallImpact {
            score: round_1dp(overall),
            interpretation,
        },
    }
}

/// Clamped (unrounded) score plus the displayed factor impact.
fn factor_impact(factor: &FactorProfile, deviation: f64) -> (f64, FactorImpact) {
    let score = clamp_score(factor.rule.apply(deviation));
    let impact = FactorImpact {
        deviation,
        impact_score: round_1dp(score),
        description: factor.describe(deviation).to_string(),
    };
    (score, impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sector, WeatherCondition};
    use crate::services::profiles::NO_CONDITION_DATA;

    fn reading(temp: f64, humidity: f64, wind: f64, condition: &str) -> WeatherReading {
        WeatherReading {
            temperature_c: Some(temp),
            humidity_pct: Some(humidity),
            wind_speed_ms: Some(wind),
            condition: WeatherCondition::from_label(condition),
        }
    }

    fn baseline(temp: f64, humidity: f64, wind: f64) -> Baseline {
        Baseline {
            temperature_c: Some(temp),
            humidity_pct: Some(humidity),
            wind_speed_ms: Some(wind),
            precipitation_mm: None,
        }
    }

    #[test]
    fn test_deviations_are_current_minus_baseline() {
        let dev = Deviations::between(&reading(18.0, 55.0, 2.5, "Clear"), &baseline(15.0, 60.0, 4.0))
            .unwrap();
        assert_eq!(dev.temperature_c, 3.0);
        assert_eq!(dev.humidity_pct, -5.0);
        assert_eq!(dev.wind_speed_ms, -1.5);
    }

    #[test]
    fn test_missing_current_humidity_is_an_error() {
        let mut current = reading(18.0, 55.0, 2.5, "Clear");
        current.humidity_pct = None;
        let err = score_impact(&current, &baseline(15.0, 60.0, 4.0), "Agriculture").unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingData {
                input: "current",
                field: "humidity"
            }
        );
    }

    #[test]
    fn test_missing_baseline_wind_is_an_error() {
        let mut avg = baseline(15.0, 60.0, 4.0);
        avg.wind_speed_ms = None;
        let err = score_impact(&reading(18.0, 55.0, 2.5, "Clear"), &avg, "Energy").unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingData {
                input: "baseline",
                field: "wind speed"
            }
        );
    }

    #[test]
    fn test_non_finite_value_is_treated_as_missing() {
        let mut current = reading(18.0, 55.0, 2.5, "Clear");
        current.temperature_c = Some(f64::NAN);
        let err = score_impact(&current, &baseline(15.0, 60.0, 4.0), "Retail").unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingData {
                field: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_sector_rejected() {
        let err = score_impact(
            &reading(18.0, 55.0, 2.5, "Clear"),
            &baseline(15.0, 60.0, 4.0),
            "Mining",
        )
        .unwrap_err();
        assert_eq!(err, EngineError::UnsupportedSector("Mining".to_string()));
    }

    #[test]
    fn test_unknown_sector_reported_before_missing_data() {
        let err = score_impact(&WeatherReading::default(), &Baseline::default(), "Mining")
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedSector(_)));
    }

    #[test]
    fn test_generic_fallback_is_opt_in() {
        let options = ScoringOptions {
            allow_generic_fallback: true,
            ..ScoringOptions::default()
        };
        let result = score_impact_with(
            &reading(17.0, 60.0, 3.0, "Rain"),
            &baseline(15.0, 60.0, 3.0),
            "Mining",
            &options,
        )
        .unwrap();
        assert_eq!(result.sector, "Mining");
        // Generic temperature rule is dev * -1.0
        assert_eq!(result.impacts.temperature.impact_score, -2.0);
        assert_eq!(
            result.condition_impact,
            "some operational adjustments needed in Mining"
        );
    }

    #[test]
    fn test_agriculture_heat_worse_than_equal_cold() {
        let avg = baseline(15.0, 60.0, 3.0);
        let hot = score_impact(&reading(20.0, 60.0, 3.0, "Clear"), &avg, "Agriculture").unwrap();
        let cold = score_impact(&reading(10.0, 60.0, 3.0, "Clear"), &avg, "Agriculture").unwrap();

        let hot_score = hot.impacts.temperature.impact_score;
        let cold_score = cold.impacts.temperature.impact_score;
        assert!(hot_score < 0.0, "heat should be penalized: {}", hot_score);
        assert!(cold_score < 0.0, "cold should be penalized: {}", cold_score);
        assert!(hot_score < cold_score);
        // 5 * -2.5 = -12.5 pinned to the bound; -5 * 1.5 = -7.5
        assert_eq!(hot_score, -10.0);
        assert_eq!(cold_score, -7.5);
    }

    #[test]
    fn test_overall_is_weighted_sum_for_agriculture() {
        // temp +2 → -5.0, humidity +5 → -9.0, wind +1 → 0.8
        let result = score_impact(
            &reading(17.0, 65.0, 4.0, "Clouds"),
            &baseline(15.0, 60.0, 3.0),
            "Agriculture",
        )
        .unwrap();

        let t = result.impacts.temperature.impact_score;
        let h = result.impacts.humidity.impact_score;
        let w = result.impacts.wind.impact_score;
        assert_eq!((t, h, w), (-5.0, -9.0, 0.8));

        let expected = round_1dp(0.5 * t + 0.3 * h + 0.2 * w);
        assert!((result.overall_impact.score - expected).abs() < 1e-9);
        assert!((result.overall_impact.score - (-5.0)).abs() < 1e-9);
        assert_eq!(result.overall_impact.interpretation, Interpretation::Negative);
        assert_eq!(
            result.condition_impact,
            "suitable conditions for most agricultural activities"
        );
    }

    #[test]
    fn test_scores_stay_in_bounds_for_extremes() {
        let avg = baseline(15.0, 60.0, 5.0);
        let extremes = [
            reading(60.0, 100.0, 60.0, "Clear"),
            reading(-40.0, 0.0, 0.0, "Snow"),
            reading(15.0, 60.0, 5.0, "Clouds"),
            reading(27.0, 10.0, 25.0, "Fog"),
        ];
        for sector in Sector::ALL {
            for current in &extremes {
                let result = score_impact(current, &avg, sector.name()).unwrap();
                for score in [
                    result.impacts.temperature.impact_score,
                    result.impacts.humidity.impact_score,
                    result.impacts.wind.impact_score,
                    result.overall_impact.score,
                ] {
                    assert!(
                        (-SCORE_BOUND..=SCORE_BOUND).contains(&score),
                        "{} produced {}",
                        sector,
                        score
                    );
                }
            }
        }
    }

    #[test]
    fn test_energy_band_rewards_small_and_penalizes_large_swings() {
        let avg = baseline(15.0, 60.0, 3.0);
        let mild_cold = score_impact(&reading(11.0, 60.0, 3.0, "Clear"), &avg, "Energy").unwrap();
        let deep_cold = score_impact(&reading(-5.0, 60.0, 3.0, "Clear"), &avg, "Energy").unwrap();
        let heatwave = score_impact(&reading(30.0, 60.0, 3.0, "Clear"), &avg, "Energy").unwrap();

        assert_eq!(mild_cold.impacts.temperature.impact_score, 2.0);
        assert_eq!(deep_cold.impacts.temperature.impact_score, -10.0);
        assert_eq!(heatwave.impacts.temperature.impact_score, -10.0);
        assert_eq!(
            heatwave.impacts.temperature.description,
            "Temperature reducing energy efficiency"
        );
    }

    #[test]
    fn test_unlisted_condition_uses_fallback_text() {
        let result = score_impact(
            &reading(15.0, 60.0, 3.0, "Blizzard"),
            &baseline(15.0, 60.0, 3.0),
            "Tourism",
        )
        .unwrap();
        assert_eq!(result.condition_impact, NO_CONDITION_DATA);
        assert_eq!(
            result.current_weather.condition,
            WeatherCondition::Other("Blizzard".to_string())
        );
    }

    #[test]
    fn test_custom_weights_change_overall() {
        let options = ScoringOptions {
            weights: Weights::new(1.0, 0.0, 0.0).unwrap(),
            allow_generic_fallback: false,
        };
        let result = score_impact_with(
            &reading(17.0, 65.0, 4.0, "Clouds"),
            &baseline(15.0, 60.0, 3.0),
            "Agriculture",
            &options,
        )
        .unwrap();
        assert_eq!(result.overall_impact.score, -5.0);
    }

    #[test]
    fn test_result_serializes_with_labels() {
        let result = score_impact(
            &reading(15.0, 60.0, 3.0, "Rain"),
            &baseline(15.0, 60.0, 3.0),
            "Retail",
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sector"], "Retail");
        assert_eq!(json["current_weather"]["condition"], "Rain");
        assert_eq!(json["overall_impact"]["score"], 0.0);
        assert_eq!(
            json["overall_impact"]["interpretation"],
            "neutral to slightly positive impact on operations and efficiency"
        );
    }

    #[test]
    fn test_result_exposes_deviations() {
        let result = score_impact(
            &reading(18.0, 55.0, 2.5, "Clear"),
            &baseline(15.0, 60.0, 4.0),
            "Construction",
        )
        .unwrap();
        let dev = result.deviations();
        assert_eq!(dev.temperature_c, 3.0);
        assert_eq!(dev.humidity_pct, -5.0);
        assert_eq!(dev.wind_speed_ms, -1.5);
    }
}
