//! Shared numeric helpers for display rounding.
//!
//! Two precisions exist because scores and trend statistics are reported
//! differently:
//!
//! - `round_1dp`: impact scores and displayed readings (0.1 resolution)
//! - `round_2dp`: trend averages and percent changes (0.01 resolution)
//!
//! Non-finite inputs pass through unchanged; callers validate finiteness
//! before computing anything that gets rounded.

/// Round to a fixed number of decimal places.
fn round_to(v: f64, places: i32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}

/// Round to 1 decimal place (impact scores, readings).
pub fn round_1dp(v: f64) -> f64 {
    round_to(v, 1)
}

/// Round to 2 decimal places (trend statistics).
pub fn round_2dp(v: f64) -> f64 {
    round_to(v, 2)
}

/// A value is usable when it is present and finite.
pub(crate) fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}
