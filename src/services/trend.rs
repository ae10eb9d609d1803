//! Summary statistics for chronological series.
//!
//! Two boundary policies are kept as-is and should be read with care:
//! - equal first and last samples report `decreasing`;
//! - a zero first sample reports a 0% change, which is a placeholder for an
//!   undefined rate, not an inferred one.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::EngineError;
use crate::helpers::round_2dp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TrendSummary {
    /// Arithmetic mean, rounded to 2 decimal places
    pub average: f64,
    /// `increasing` only when the last sample is strictly above the first
    pub trend: TrendDirection,
    /// `(last - first) / first * 100`, rounded to 2 decimal places; 0 when
    /// the first sample is 0
    pub change_percent: f64,
}

/// Mean, direction and percent change of an ordered series.
pub fn analyze_trend(samples: &[f64]) -> Result<TrendSummary, EngineError> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(EngineError::EmptySeries),
    };

    let average = samples.iter().sum::<f64>() / samples.len() as f64;
    let trend = if last > first {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let change_percent = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };

    Ok(TrendSummary {
        average: round_2dp(average),
        trend,
        change_percent: round_2dp(change_percent),
    })
}

/// Trend summaries for several named series at once, keyed by name.
/// Empty series are skipped.
pub fn analyze_series<'n, 's, I>(series: I) -> BTreeMap<String, TrendSummary>
where
    I: IntoIterator<Item = (&'n str, &'s [f64])>,
{
    series
        .into_iter()
        .filter_map(|(name, samples)| {
            analyze_trend(samples)
                .ok()
                .map(|summary| (name.to_string(), summary))
        })
        .collect()
}
