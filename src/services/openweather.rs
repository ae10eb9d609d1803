//! OpenWeather client.
//!
//! Resolves place names to coordinates and fetches current conditions plus
//! monthly statistical aggregates.
//! See: https://openweathermap.org/api
//!
//! Values the provider leaves out stay `None`; deciding whether a reading is
//! complete enough to score is the engine's job, not the client's.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::helpers::finite;
use crate::models::{Baseline, ClimateSeries, Coordinates, WeatherCondition, WeatherReading};

/// Offset between Kelvin (aggregated statistics) and Celsius.
const KELVIN_OFFSET: f64 = 273.15;

/// Number of months covered by a climate series, ending with the current one.
const CLIMATE_SERIES_MONTHS: i32 = 12;

/// Base URLs for the three OpenWeather hosts in use.
#[derive(Debug, Clone)]
pub struct OpenWeatherEndpoints {
    /// Current weather (`/data/2.5/weather`)
    pub api_url: String,
    /// Statistical aggregates (`/data/2.5/aggregated/month`)
    pub history_url: String,
    /// Geocoding (`/geo/1.0/direct`)
    pub geo_url: String,
}

impl OpenWeatherEndpoints {
    /// All three endpoints on one host (used against mock servers).
    pub fn single_host(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            api_url: base.clone(),
            history_url: base.clone(),
            geo_url: base,
        }
    }
}

/// Client for the OpenWeather geocoding, current weather and statistics APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    endpoints: OpenWeatherEndpoints,
}

// --- OpenWeather JSON response types ---

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: Option<CurrentMain>,
    wind: Option<CurrentWind>,
    #[serde(default)]
    weather: Vec<CurrentWeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherEntry {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggregatedResponse {
    result: Option<AggregatedResult>,
}

#[derive(Debug, Deserialize)]
struct AggregatedResult {
    temp: Option<Statistic>,
    humidity: Option<Statistic>,
    wind: Option<Statistic>,
    precipitation: Option<Statistic>,
}

#[derive(Debug, Deserialize)]
struct Statistic {
    mean: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: &str,
        endpoints: OpenWeatherEndpoints,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoints,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            &config.openweather_api_key,
            OpenWeatherEndpoints {
                api_url: config.openweather_api_url.clone(),
                history_url: config.openweather_history_url.clone(),
                geo_url: config.openweather_geo_url.clone(),
            },
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// GET a JSON document, mapping transport and status failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        tracing::debug!("OpenWeather request: {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("OpenWeather request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "OpenWeather returned HTTP {}",
                response.status()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("OpenWeather JSON parse error: {}", e))
        })
    }

    /// Resolve a place name to coordinates (first geocoding match).
    pub async fn geocode(&self, location: &str) -> Result<Coordinates, AppError> {
        let url = format!("{}/geo/1.0/direct", self.endpoints.geo_url);
        let entries: Vec<GeoEntry> = self
            .get_json(
                &url,
                &[("q", location.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        entries
            .first()
            .map(|e| Coordinates {
                latitude: e.lat,
                longitude: e.lon,
            })
            .ok_or_else(|| AppError::NotFound(format!("Location {} not found", location)))
    }

    /// Current conditions in metric units.
    pub async fn current_reading(&self, coords: Coordinates) -> Result<WeatherReading, AppError> {
        let url = format!("{}/data/2.5/weather", self.endpoints.api_url);
        let mut query = coordinate_query(coords);
        query.push(("units", "metric".to_string()));

        let response: CurrentResponse = self.get_json(&url, &query).await?;
        Ok(parse_current(response))
    }

    /// Statistical means for one calendar month (1-12) at a location.
    pub async fn monthly_baseline(
        &self,
        coords: Coordinates,
        month: u32,
    ) -> Result<Baseline, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        let url = format!("{}/data/2.5/aggregated/month", self.endpoints.history_url);
        let mut query = coordinate_query(coords);
        query.push(("month", month.to_string()));

        let response: AggregatedResponse = self.get_json(&url, &query).await?;
        response.result.map(parse_baseline).ok_or_else(|| {
            AppError::ExternalServiceError(
                "Could not retrieve statistical weather data for comparison".to_string(),
            )
        })
    }

    /// Monthly means for the twelve months ending with `today`'s month,
    /// oldest first.
    ///
    /// Months are fetched concurrently. A month that fails or comes back
    /// incomplete is skipped with a warning; an entirely empty series is an
    /// error.
    pub async fn climate_series(
        &self,
        coords: Coordinates,
        today: NaiveDate,
    ) -> Result<ClimateSeries, AppError> {
        let months = trailing_months(today);
        let fetches = months
            .iter()
            .map(|m| self.monthly_baseline(coords, m.month()));
        let results = join_all(fetches).await;

        let mut series = ClimateSeries::default();
        for (month, result) in months.iter().zip(results) {
            let label = month.format("%b %Y").to_string();
            let baseline = match result {
                Ok(baseline) => baseline,
                Err(e) => {
                    tracing::warn!("No statistical data for {}: {}", label, e);
                    continue;
                }
            };

            let values = (
                finite(baseline.temperature_c),
                finite(baseline.precipitation_mm),
                finite(baseline.humidity_pct),
                finite(baseline.wind_speed_ms),
            );
            let (Some(temp), Some(precip), Some(humidity), Some(wind)) = values else {
                tracing::warn!("Incomplete statistical data for {}, skipping", label);
                continue;
            };

            series.months.push(label);
            series.temperature_c.push(temp);
            series
                .precipitation_mm
                .push(precip * f64::from(days_in_month(month.month())));
            series.humidity_pct.push(humidity);
            series.wind_speed_ms.push(wind);
        }

        if series.is_empty() {
            return Err(AppError::ExternalServiceError(
                "Could not retrieve statistical climate data".to_string(),
            ));
        }
        Ok(series)
    }
}

/// Latitude/longitude query pair, 4 decimal places.
fn coordinate_query(coords: Coordinates) -> Vec<(&'static str, String)> {
    vec![
        ("lat", format!("{:.4}", coords.latitude)),
        ("lon", format!("{:.4}", coords.longitude)),
    ]
}

fn parse_current(response: CurrentResponse) -> WeatherReading {
    let condition = response
        .weather
        .first()
        .and_then(|w| w.main.as_deref())
        .map(WeatherCondition::from_label)
        .unwrap_or_default();

    WeatherReading {
        temperature_c: response.main.as_ref().and_then(|m| m.temp),
        humidity_pct: response.main.as_ref().and_then(|m| m.humidity),
        wind_speed_ms: response.wind.and_then(|w| w.speed),
        condition,
    }
}

fn parse_baseline(result: AggregatedResult) -> Baseline {
    let mean = |stat: Option<Statistic>| stat.and_then(|s| s.mean);
    Baseline {
        temperature_c: mean(result.temp).map(kelvin_to_celsius),
        humidity_pct: mean(result.humidity),
        wind_speed_ms: mean(result.wind),
        precipitation_mm: mean(result.precipitation),
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Days per month for precipitation totals. February is always 28.
pub fn days_in_month(month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 => 28,
        _ => 30,
    }
}

/// First day of each of the twelve months ending with `today`'s month,
/// oldest first.
pub fn trailing_months(today: NaiveDate) -> Vec<NaiveDate> {
    let current = today.year() * 12 + today.month0() as i32;
    ((current - CLIMATE_SERIES_MONTHS + 1)..=current)
        .filter_map(|index| {
            NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        })
        .collect()
}
