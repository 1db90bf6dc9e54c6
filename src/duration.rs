//! Video duration normalization.
//!
//! Durations arrive either as bare second counts (`"95"`, a JSON number)
//! or as the restricted ISO-8601 form `P(T(nH)?(nM)?(nS)?)?` used by
//! schema.org `VideoObject.duration`. Everything normalizes to whole
//! seconds; values that do not parse or are not strictly positive are
//! discarded rather than reported as errors.

use crate::patterns::ISO8601_DURATION;

/// Normalize a numeric seconds value.
///
/// # Returns
/// * `Some(seconds)` rounded to the nearest integer for finite, strictly
///   positive input; `None` otherwise
#[must_use]
pub fn from_seconds(value: f64) -> Option<u64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let rounded = value.round();
    if rounded <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = rounded as u64;
    Some(seconds)
}

/// Parse a raw duration string into whole seconds.
///
/// Accepts a plain number of seconds or the restricted ISO-8601 form
/// (hours/minutes/seconds only). `"PT1M30S"` parses to 90.
#[must_use]
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = raw.parse::<f64>() {
        return from_seconds(value);
    }

    let caps = ISO8601_DURATION.captures(raw)?;

    let component = |idx: usize| -> f64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let total = component(1) * 3600.0 + component(2) * 60.0 + component(3);
    from_seconds(total)
}
