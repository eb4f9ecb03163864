//! Duration and calorie estimates for activity sessions.
//!
//! Calories follow the MET model: `MET(kind) * weight_kg * hours`, rounded to
//! the nearest whole kilocalorie.

use crate::error::StatsError;
use crate::models::{ActivityKind, ClockTime};

const MINUTES_PER_DAY: i64 = 1440;

/// Metabolic equivalent for an activity kind. Unknown kinds count as resting.
pub fn met(kind: &ActivityKind) -> f64 {
    match kind {
        ActivityKind::Walk => 3.8,
        ActivityKind::Run => 7.0,
        ActivityKind::Play => 4.0,
        ActivityKind::Eat => 1.5,
        ActivityKind::Sleep => 0.9,
        ActivityKind::Other(_) => 1.0,
    }
}

/// Elapsed hours between two clock times. An end earlier than the start is
/// read as crossing midnight once.
pub fn duration_hours(start: ClockTime, end: ClockTime) -> f64 {
    let mut minutes = end.minutes_since_midnight() - start.minutes_since_midnight();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    minutes as f64 / 60.0
}

pub fn duration_minutes(start: ClockTime, end: ClockTime) -> i64 {
    (duration_hours(start, end) * 60.0).round() as i64
}

pub fn estimate_calories(kind: &ActivityKind, weight_kg: f64, start: ClockTime, end: ClockTime) -> i64 {
    (met(kind) * weight_kg * duration_hours(start, end)).round() as i64
}

/// Weights used for calorie maths must be finite and not negative. Zero is
/// allowed and yields zero calories.
pub fn check_weight(weight_kg: f64) -> Result<f64, StatsError> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(StatsError::InvalidWeight(weight_kg));
    }
    Ok(weight_kg)
}

pub fn duration_hours_str(start: &str, end: &str) -> Result<f64, StatsError> {
    Ok(duration_hours(start.parse()?, end.parse()?))
}

pub fn estimate_calories_str(
    kind: &str,
    weight_kg: f64,
    start: &str,
    end: &str,
) -> Result<i64, StatsError> {
    let weight_kg = check_weight(weight_kg)?;
    Ok(estimate_calories(
        &ActivityKind::from(kind),
        weight_kg,
        start.parse()?,
        end.parse()?,
    ))
}
