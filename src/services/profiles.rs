//! Sector impact profiles.
//!
//! Each sector's reaction to weather is declared as data: one tagged
//! piecewise-linear rule per factor, a condition table and an advice table.
//! Profiles for the known sectors live in an immutable registry built once
//! on first use; a generic profile can be synthesized for any other sector
//! name, but only when the caller opts in.

use std::borrow::Cow;
use std::sync::LazyLock;

use crate::errors::EngineError;
use crate::models::{Sector, WeatherCondition};

/// Condition text returned when a sector's table has no entry for a label.
pub const NO_CONDITION_DATA: &str = "No specific impact data for this weather condition";

/// A deterministic piecewise-linear mapping from a signed deviation to a raw
/// impact magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorRule {
    /// `dev * slope`
    Linear { slope: f64 },
    /// `dev * pos_slope` above zero, `dev * neg_slope` otherwise.
    Asymmetric { pos_slope: f64, neg_slope: f64 },
    /// `dev * above_slope` when `dev > threshold`, `dev * below_slope` otherwise.
    Stepped {
        threshold: f64,
        above_slope: f64,
        below_slope: f64,
    },
    /// Works on `|dev|`: `inside_slope` within the tolerance band,
    /// `outside_slope` beyond it. Treats both signs alike, so a positive
    /// inside slope rewards small deviations either way while a negative
    /// outside slope penalizes large ones either way.
    Band {
        tolerance: f64,
        inside_slope: f64,
        outside_slope: f64,
    },
}

impl FactorRule {
    /// Raw (unclamped) impact for a deviation.
    pub fn apply(&self, dev: f64) -> f64 {
        match *self {
            FactorRule::Linear { slope } => dev * slope,
            FactorRule::Asymmetric {
                pos_slope,
                neg_slope,
            } => {
                if dev > 0.0 {
                    dev * pos_slope
                } else {
                    dev * neg_slope
                }
            }
            FactorRule::Stepped {
                threshold,
                above_slope,
                below_slope,
            } => {
                if dev > threshold {
                    dev * above_slope
                } else {
                    dev * below_slope
                }
            }
            FactorRule::Band {
                tolerance,
                inside_slope,
                outside_slope,
            } => {
                let magnitude = dev.abs();
                if magnitude <= tolerance {
                    magnitude * inside_slope
                } else {
                    magnitude * outside_slope
                }
            }
        }
    }

    /// Whether the deviation lies past the rule's breakpoint. Selects the
    /// factor description.
    pub fn exceeds(&self, dev: f64) -> bool {
        match *self {
            FactorRule::Linear { .. } | FactorRule::Asymmetric { .. } => dev > 0.0,
            FactorRule::Stepped { threshold, .. } => dev > threshold,
            FactorRule::Band { tolerance, .. } => dev.abs() > tolerance,
        }
    }
}

/// Rule plus the two human-readable descriptions for one factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorProfile {
    pub rule: FactorRule,
    /// Used when the deviation is past the rule's breakpoint
    pub exceeded: String,
    /// Used otherwise
    pub within: String,
}

impl FactorProfile {
    fn new(rule: FactorRule, exceeded: impl Into<String>, within: impl Into<String>) -> Self {
        Self {
            rule,
            exceeded: exceeded.into(),
            within: within.into(),
        }
    }

    fn uniform(rule: FactorRule, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            rule,
            exceeded: description.clone(),
            within: description,
        }
    }

    pub fn describe(&self, dev: f64) -> &str {
        if self.rule.exceeds(dev) {
            &self.exceeded
        } else {
            &self.within
        }
    }
}

/// Operational effect of each named weather condition.
///
/// One field per named condition so that a profile cannot be built with a
/// hole in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEffects {
    pub clear: String,
    pub clouds: String,
    pub rain: String,
    pub snow: String,
    pub thunderstorm: String,
    pub drizzle: String,
    pub mist: String,
    pub fog: String,
    pub unknown: String,
}

impl ConditionEffects {
    /// Text for a condition; `None` for labels outside the named set.
    pub fn lookup(&self, condition: &WeatherCondition) -> Option<&str> {
        let text = match condition {
            WeatherCondition::Clear => &self.clear,
            WeatherCondition::Clouds => &self.clouds,
            WeatherCondition::Rain => &self.rain,
            WeatherCondition::Snow => &self.snow,
            WeatherCondition::Thunderstorm => &self.thunderstorm,
            WeatherCondition::Drizzle => &self.drizzle,
            WeatherCondition::Mist => &self.mist,
            WeatherCondition::Fog => &self.fog,
            WeatherCondition::Unknown => &self.unknown,
            WeatherCondition::Other(_) => return None,
        };
        Some(text)
    }

    /// Text for a condition, degrading to [`NO_CONDITION_DATA`].
    pub fn describe(&self, condition: &WeatherCondition) -> &str {
        self.lookup(condition).unwrap_or(NO_CONDITION_DATA)
    }
}

/// Recommendation texts, keyed by which deviation threshold was crossed.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub high_temp: String,
    pub low_temp: String,
    pub high_humidity: String,
    pub low_humidity: String,
    pub high_wind: String,
    pub low_wind: String,
}

/// Everything needed to score one sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorProfile {
    pub name: String,
    pub temperature: FactorProfile,
    pub humidity: FactorProfile,
    pub wind: FactorProfile,
    pub conditions: ConditionEffects,
    pub advice: Advice,
}

/// Weights for combining the three clamped factor scores.
///
/// Non-negative and summing to one, so the overall score is a convex
/// combination and stays within the clamp bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    temperature: f64,
    humidity: f64,
    wind: f64,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

impl Weights {
    pub const DEFAULT: Weights = Weights {
        temperature: 0.5,
        humidity: 0.3,
        wind: 0.2,
    };

    pub fn new(temperature: f64, humidity: f64, wind: f64) -> Result<Self, EngineError> {
        let all = [temperature, humidity, wind];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {}/{}/{}",
                temperature, humidity, wind
            )));
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights(format!(
                "weights must sum to 1, got {}",
                sum
            )));
        }
        Ok(Self {
            temperature,
            humidity,
            wind,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn wind(&self) -> f64 {
        self.wind
    }

    pub fn combine(&self, temperature: f64, humidity: f64, wind: f64) -> f64 {
        self.temperature * temperature + self.humidity * humidity + self.wind * wind
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Profiles for every known sector, in `Sector::ALL` order.
static PROFILES: LazyLock<Vec<SectorProfile>> =
    LazyLock::new(|| Sector::ALL.into_iter().map(build_profile).collect());

/// The registered profile for a known sector.
pub fn profile_for(sector: Sector) -> &'static SectorProfile {
    // PROFILES is built from Sector::ALL, whose order matches the enum.
    &PROFILES[sector as usize]
}

/// Resolve a sector name to a profile.
///
/// Unknown names are rejected unless `allow_generic_fallback` is set, in
/// which case a generic profile is synthesized for that name.
pub fn resolve_profile(
    name: &str,
    allow_generic_fallback: bool,
) -> Result<Cow<'static, SectorProfile>, EngineError> {
    match name.parse::<Sector>() {
        Ok(sector) => Ok(Cow::Borrowed(profile_for(sector))),
        Err(_) if allow_generic_fallback && !name.trim().is_empty() => {
            tracing::debug!("Using generic impact profile for sector '{}'", name.trim());
            Ok(Cow::Owned(generic_profile(name.trim())))
        }
        Err(err) => Err(err),
    }
}

fn build_profile(sector: Sector) -> SectorProfile {
    match sector {
        Sector::Agriculture => agriculture(),
        Sector::Energy => energy(),
        Sector::Transportation => transportation(),
        Sector::Tourism => tourism(),
        Sector::Construction => construction(),
        Sector::Retail => retail(),
    }
}

fn agriculture() -> SectorProfile {
    SectorProfile {
        name: Sector::Agriculture.name().to_string(),
        // Heat and cold both hurt, heat more steeply.
        temperature: FactorProfile::new(
            FactorRule::Asymmetric {
                pos_slope: -2.5,
                neg_slope: 1.5,
            },
            "High temperature affecting crop growth and irrigation needs",
            "Low temperature affecting crop growth and irrigation needs",
        ),
        humidity: FactorProfile::new(
            FactorRule::Asymmetric {
                pos_slope: -1.8,
                neg_slope: -1.2,
            },
            "High humidity affecting plant diseases and irrigation",
            "Low humidity affecting plant diseases and irrigation",
        ),
        wind: FactorProfile::new(
            FactorRule::Stepped {
                threshold: 5.0,
                above_slope: -1.5,
                below_slope: 0.8,
            },
            "Strong wind affecting pollination and evaporation",
            "Light wind affecting pollination and evaporation",
        ),
        conditions: ConditionEffects {
            clear: "optimal conditions for field operations".into(),
            clouds: "suitable conditions for most agricultural activities".into(),
            rain: "beneficial for crop growth but may limit field operations".into(),
            snow: "risk of frost damage to crops".into(),
            thunderstorm: "risk of crop damage and unsafe for field operations".into(),
            drizzle: "light moisture for crops with little disruption to field work".into(),
            mist: "increased disease risk for sensitive crops".into(),
            fog: "limited visibility for agricultural operations".into(),
            unknown: "no condition report available for field planning".into(),
        },
        advice: Advice {
            high_temp: "Increase irrigation and monitor crop water stress".into(),
            low_temp: "Protect sensitive crops from frost damage".into(),
            high_humidity: "Increase monitoring for fungal diseases".into(),
            low_humidity: "Implement supplementary irrigation".into(),
            high_wind: "Protect crops from wind damage".into(),
            low_wind: "Optimal conditions for spraying and pollination".into(),
        },
    }
}

fn energy() -> SectorProfile {
    SectorProfile {
        name: Sector::Energy.name().to_string(),
        // Modest swings either way are easy to serve; large ones strain supply.
        temperature: FactorProfile::new(
            FactorRule::Band {
                tolerance: 10.0,
                inside_slope: 0.5,
                outside_slope: -1.0,
            },
            "Temperature reducing energy efficiency",
            "Temperature optimizing energy efficiency",
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.5 },
            "Humidity affecting cooling efficiency",
        ),
        wind: FactorProfile::new(
            FactorRule::Asymmetric {
                pos_slope: 1.5,
                neg_slope: -0.5,
            },
            "Increased wind energy production",
            "Reduced wind energy production",
        ),
        conditions: ConditionEffects {
            clear: "optimal for solar energy production".into(),
            clouds: "reduced solar energy generation".into(),
            rain: "reduced solar efficiency, normal wind operations".into(),
            snow: "potential system stress, reduced efficiency".into(),
            thunderstorm: "risk to infrastructure, emergency protocols needed".into(),
            drizzle: "slightly reduced solar generation".into(),
            mist: "reduced solar generation efficiency".into(),
            fog: "significant reduction in solar energy production".into(),
            unknown: "no condition report available for generation planning".into(),
        },
        advice: Advice {
            high_temp: "Optimize cooling systems for power generation".into(),
            low_temp: "Protect water-based systems from freezing".into(),
            high_humidity: "Monitor insulation and corrosion".into(),
            low_humidity: "Optimal solar energy generation conditions".into(),
            high_wind: "Maximize wind energy production".into(),
            low_wind: "Switch to alternative energy sources".into(),
        },
    }
}

fn transportation() -> SectorProfile {
    SectorProfile {
        name: Sector::Transportation.name().to_string(),
        // Cold brings ice, which is worse for roads and rails than heat.
        temperature: FactorProfile::new(
            FactorRule::Asymmetric {
                pos_slope: -0.8,
                neg_slope: 1.2,
            },
            "High temperature stressing vehicles, rails and road surfaces",
            "Low temperature raising icing risk on roads and rails",
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.4 },
            "Humidity affecting visibility and braking conditions",
        ),
        wind: FactorProfile::new(
            FactorRule::Linear { slope: -1.5 },
            "Strong wind disrupting high-sided vehicles, ferries and flights",
            "Calm wind supporting normal schedules",
        ),
        conditions: ConditionEffects {
            clear: "optimal conditions for transportation operations".into(),
            clouds: "normal operating conditions for transportation".into(),
            rain: "slippery surfaces and longer braking distances".into(),
            snow: "significant delays and road clearing required".into(),
            thunderstorm: "severe disruption to transportation operations".into(),
            drizzle: "wet surfaces with minor speed reductions".into(),
            mist: "minor impacts on transportation visibility".into(),
            fog: "reduced visibility causing delays and speed restrictions".into(),
            unknown: "no condition report available for route planning".into(),
        },
        advice: Advice {
            high_temp: "Inspect rails and tyres for heat stress".into(),
            low_temp: "Schedule gritting and de-icing ahead of peak hours".into(),
            high_humidity: "Check vehicle ventilation and windscreen demisting".into(),
            low_humidity: "Standard operations; monitor dust on unpaved routes".into(),
            high_wind: "Restrict high-sided vehicles and review ferry schedules".into(),
            low_wind: "Optimal conditions for transportation schedules".into(),
        },
    }
}

fn tourism() -> SectorProfile {
    SectorProfile {
        name: Sector::Tourism.name().to_string(),
        // Warmer than usual attracts visitors until it becomes a heatwave.
        temperature: FactorProfile::new(
            FactorRule::Stepped {
                threshold: 8.0,
                above_slope: -1.0,
                below_slope: 0.8,
            },
            "Excessive heat discouraging outdoor visits",
            "Temperature shaping demand for outdoor activities",
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.6 },
            "Humidity affecting visitor comfort",
        ),
        wind: FactorProfile::new(
            FactorRule::Linear { slope: -0.8 },
            "Strong wind limiting outdoor attractions and boat tours",
            "Light wind favourable for outdoor attractions",
        ),
        conditions: ConditionEffects {
            clear: "ideal conditions for sightseeing and outdoor attractions".into(),
            clouds: "comfortable conditions for most tourist activities".into(),
            rain: "visitors shifting to indoor attractions".into(),
            snow: "opportunities for winter tourism, disruption elsewhere".into(),
            thunderstorm: "outdoor events and tours cancelled".into(),
            drizzle: "reduced footfall at outdoor sites".into(),
            mist: "reduced scenic visibility".into(),
            fog: "poor visibility at viewpoints and on excursions".into(),
            unknown: "no condition report available for visitor planning".into(),
        },
        advice: Advice {
            high_temp: "Provide shade and water at outdoor attractions".into(),
            low_temp: "Promote indoor and seasonal experiences".into(),
            high_humidity: "Adjust climate control in venues and transport".into(),
            low_humidity: "Favourable conditions for outdoor tours".into(),
            high_wind: "Review safety of boat tours and elevated attractions".into(),
            low_wind: "Optimal conditions for outdoor tourism activities".into(),
        },
    }
}

fn construction() -> SectorProfile {
    SectorProfile {
        name: Sector::Construction.name().to_string(),
        // Concrete and crews tolerate modest swings; large ones halt work.
        temperature: FactorProfile::new(
            FactorRule::Band {
                tolerance: 5.0,
                inside_slope: 0.4,
                outside_slope: -1.2,
            },
            "Temperature outside safe limits for curing and crew safety",
            "Temperature within workable limits for site activity",
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.5 },
            "Humidity affecting material curing and drying times",
        ),
        wind: FactorProfile::new(
            FactorRule::Asymmetric {
                pos_slope: -1.8,
                neg_slope: -0.3,
            },
            "Strong wind restricting crane and scaffold work",
            "Calm wind supporting lifting operations",
        ),
        conditions: ConditionEffects {
            clear: "optimal conditions for construction operations".into(),
            clouds: "normal operating conditions for construction".into(),
            rain: "earthworks and finishing trades delayed".into(),
            snow: "significant impact on construction operations".into(),
            thunderstorm: "site evacuation and suspension of lifting".into(),
            drizzle: "minor delays for exterior finishing".into(),
            mist: "minor impacts on site visibility".into(),
            fog: "reduced visibility affecting crane operations".into(),
            unknown: "no condition report available for site planning".into(),
        },
        advice: Advice {
            high_temp: "Schedule concrete pours for cooler hours and enforce rest breaks".into(),
            low_temp: "Use cold-weather concreting measures and protect fresh work".into(),
            high_humidity: "Extend drying times for coatings and plaster".into(),
            low_humidity: "Keep fresh concrete moist to prevent cracking".into(),
            high_wind: "Secure materials and suspend crane lifts above limits".into(),
            low_wind: "Optimal conditions for lifting operations".into(),
        },
    }
}

fn retail() -> SectorProfile {
    SectorProfile {
        name: Sector::Retail.name().to_string(),
        // Mild surprises lift footfall; extremes keep shoppers home.
        temperature: FactorProfile::new(
            FactorRule::Band {
                tolerance: 4.0,
                inside_slope: 0.3,
                outside_slope: -0.8,
            },
            "Unusual temperature reducing store footfall",
            "Seasonal temperature supporting store footfall",
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.3 },
            "Humidity affecting shopper comfort",
        ),
        wind: FactorProfile::new(
            FactorRule::Linear { slope: -0.5 },
            "Strong wind discouraging shopping trips",
            "Light wind with little effect on shopping trips",
        ),
        conditions: ConditionEffects {
            clear: "strong footfall for high streets and outdoor markets".into(),
            clouds: "normal operating conditions for retail".into(),
            rain: "footfall shifting from high streets to malls and online".into(),
            snow: "significant drop in store visits, online demand up".into(),
            thunderstorm: "severe drop in store visits".into(),
            drizzle: "slightly reduced high street footfall".into(),
            mist: "minor impacts on retail footfall".into(),
            fog: "delivery delays and reduced footfall".into(),
            unknown: "no condition report available for demand planning".into(),
        },
        advice: Advice {
            high_temp: "Stock seasonal warm-weather lines and check store cooling".into(),
            low_temp: "Promote cold-weather lines and keep entrances clear".into(),
            high_humidity: "Protect humidity-sensitive stock".into(),
            low_humidity: "Standard operations; monitor static-sensitive electronics".into(),
            high_wind: "Secure outdoor displays and signage".into(),
            low_wind: "Optimal conditions for outdoor displays and markets".into(),
        },
    }
}

/// Catch-all profile for an arbitrary sector name.
pub fn generic_profile(sector: &str) -> SectorProfile {
    SectorProfile {
        name: sector.to_string(),
        temperature: FactorProfile::uniform(
            FactorRule::Linear { slope: -1.0 },
            format!("Temperature affecting operational efficiency in {}", sector),
        ),
        humidity: FactorProfile::uniform(
            FactorRule::Linear { slope: -0.5 },
            format!("Humidity affecting working conditions in {}", sector),
        ),
        wind: FactorProfile::uniform(
            FactorRule::Linear { slope: -1.0 },
            format!("Wind conditions affecting {} operations", sector),
        ),
        conditions: ConditionEffects {
            clear: format!("optimal conditions for {} operations", sector),
            clouds: format!("normal operating conditions for {}", sector),
            rain: format!("some operational adjustments needed in {}", sector),
            snow: format!("significant impact on {} operations", sector),
            thunderstorm: format!("severe disruption to {} operations", sector),
            drizzle: format!("minor operational adjustments needed in {}", sector),
            mist: format!("minor impacts on {} visibility", sector),
            fog: format!("reduced visibility affecting {} operations", sector),
            unknown: format!("no condition report available for {} planning", sector),
        },
        advice: Advice {
            high_temp: format!("Adjust cooling systems for {} operations", sector),
            low_temp: format!("Implement cold weather procedures for {}", sector),
            high_humidity: format!(
                "Monitor equipment and materials sensitive to humidity in {}",
                sector
            ),
            low_humidity: format!("Address dry conditions impact on {} operations", sector),
            high_wind: format!(
                "Secure equipment and materials from wind damage in {}",
                sector
            ),
            low_wind: format!("Optimal conditions for {} outdoor operations", sector),
        },
    }
}
