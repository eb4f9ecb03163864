//! Day-bucketed chart series built from per-day store lookups.
//!
//! Every day in the window is looked up independently. The lookups run
//! concurrently and are joined in window order, so the output is always in
//! ascending calendar order with one bucket per day. The first failed lookup
//! aborts the build and is returned to the caller untouched.

use chrono::NaiveDate;
use clap::ValueEnum;
use futures_util::future::join_all;

use crate::energy::{check_weight, duration_minutes, estimate_calories};
use crate::error::StatsResult;
use crate::models::{ActivitySeries, WeightSeries, Window, FALLBACK_LABEL, NO_DATA_SENTINEL};
use crate::store::MetricStore;
use crate::window::weekday_label;

/// How a day with several weight samples is charted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WeightPolicy {
    /// One entry per sample, so a busy day takes several slots.
    #[default]
    Each,
    /// Only the most recently stored sample of the day.
    Last,
    /// Mean of the day's samples.
    Mean,
}

pub async fn build_weight_series<S>(
    store: &S,
    pet_id: &str,
    window: Window,
    policy: WeightPolicy,
) -> StatsResult<WeightSeries>
where
    S: MetricStore + ?Sized,
{
    let days = window.days();
    let lookups = days.iter().map(|day| store.weight_samples_on(pet_id, *day));
    let results = join_all(lookups).await;

    let mut series = WeightSeries {
        labels: Vec::with_capacity(days.len()),
        data: Vec::with_capacity(days.len()),
    };

    for (day, result) in days.iter().zip(results) {
        let samples = result?;
        tracing::debug!(pet_id, %day, samples = samples.len(), "weight lookup");

        if samples.is_empty() {
            series.labels.push(weekday_label(*day, false));
            series.data.push(0.0);
            continue;
        }

        match policy {
            WeightPolicy::Each => {
                for sample in &samples {
                    series.labels.push(weekday_label(*day, true));
                    series.data.push(sample.weight_kg);
                }
            }
            WeightPolicy::Last => {
                let last = samples.last().map(|s| s.weight_kg).unwrap_or_default();
                series.labels.push(weekday_label(*day, true));
                series.data.push(last);
            }
            WeightPolicy::Mean => {
                let total: f64 = samples.iter().map(|s| s.weight_kg).sum();
                series.labels.push(weekday_label(*day, true));
                series.data.push(total / samples.len() as f64);
            }
        }
    }

    if series.labels.is_empty() {
        tracing::warn!(pet_id, start = %window.start, end = %window.end, "empty window, using placeholder weight series");
        return Ok(WeightSeries::placeholder());
    }

    tracing::info!(
        pet_id,
        start = %window.start,
        end = %window.end,
        entries = series.labels.len(),
        ?policy,
        "weight series built"
    );
    Ok(series)
}

pub async fn build_activity_series<S>(
    store: &S,
    pet_id: &str,
    weight_kg: f64,
    window: Window,
) -> StatsResult<ActivitySeries>
where
    S: MetricStore + ?Sized,
{
    let weight_kg = check_weight(weight_kg)?;

    let days = window.days();
    let lookups = days.iter().map(|day| store.activity_sessions_on(pet_id, *day));
    let results = join_all(lookups).await;

    let mut series = ActivitySeries {
        labels: Vec::with_capacity(days.len()),
        kcal: Vec::with_capacity(days.len()),
        minutes: Vec::with_capacity(days.len()),
    };

    for (day, result) in days.iter().zip(results) {
        let sessions = result?;
        let (kcal, minutes) = sessions.iter().fold((0i64, 0i64), |(kcal, minutes), s| {
            (
                kcal + estimate_calories(&s.kind, weight_kg, s.start, s.end),
                minutes + duration_minutes(s.start, s.end),
            )
        });
        tracing::debug!(pet_id, %day, sessions = sessions.len(), kcal, minutes, "activity lookup");

        series.labels.push(weekday_label(*day, !sessions.is_empty()));
        series.kcal.push(kcal);
        series.minutes.push(minutes);
    }

    if series.labels.is_empty() {
        tracing::warn!(pet_id, start = %window.start, end = %window.end, "empty window, using placeholder activity series");
        return Ok(ActivitySeries::placeholder());
    }

    tracing::info!(
        pet_id,
        start = %window.start,
        end = %window.end,
        kcal_total = series.kcal.iter().sum::<i64>(),
        minutes_total = series.minutes.iter().sum::<i64>(),
        "activity series built"
    );
    Ok(series)
}

/// Number of labels that stand for a day with at least one record.
pub fn days_with_data(labels: &[String]) -> usize {
    labels
        .iter()
        .filter(|label| !label.ends_with(NO_DATA_SENTINEL) && label.as_str() != FALLBACK_LABEL)
        .count()
}

/// Only meaningful for one-entry-per-day series.
pub fn day_for_index(window: Window, index: usize) -> Option<NaiveDate> {
    window.days().get(index).copied()
}
