//! Read-only access to dated pet metrics.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StatsError;
use crate::models::{ActivitySession, WeightSample};

/// Exact-date lookups over the metric collections. Both calls take the same
/// calendar-day type; adapters normalise stored dates on ingestion.
#[async_trait]
pub trait MetricStore: Send + Sync {
    async fn weight_samples_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WeightSample>, StatsError>;

    async fn activity_sessions_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivitySession>, StatsError>;
}

/// In-process store. Records are returned in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    weights: Vec<WeightSample>,
    activities: Vec<ActivitySession>,
    failing_day: Option<NaiveDate>,
    lookups: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, sample: WeightSample) -> Self {
        self.weights.push(sample);
        self
    }

    pub fn with_activity(mut self, session: ActivitySession) -> Self {
        self.activities.push(session);
        self
    }

    /// Any lookup for `day` fails as if the backend were unreachable.
    pub fn failing_on(mut self, day: NaiveDate) -> Self {
        self.failing_day = Some(day);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().map(|count| *count).unwrap_or(0)
    }

    fn record_lookup(&self, date: NaiveDate) -> Result<(), StatsError> {
        if let Ok(mut count) = self.lookups.lock() {
            *count += 1;
        }
        if self.failing_day == Some(date) {
            return Err(StatsError::Unavailable(format!("lookup for {date} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricStore for MemoryStore {
    async fn weight_samples_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WeightSample>, StatsError> {
        self.record_lookup(date)?;
        Ok(self
            .weights
            .iter()
            .filter(|sample| sample.pet_id == pet_id && sample.recorded_on == date)
            .cloned()
            .collect())
    }

    async fn activity_sessions_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivitySession>, StatsError> {
        self.record_lookup(date)?;
        Ok(self
            .activities
            .iter()
            .filter(|session| session.pet_id == pet_id && session.performed_on == date)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, ClockTime};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn filters_by_pet_and_exact_day() {
        let store = MemoryStore::new()
            .with_weight(WeightSample {
                pet_id: "p1".to_string(),
                recorded_on: day(20),
                weight_kg: 12.5,
            })
            .with_weight(WeightSample {
                pet_id: "p2".to_string(),
                recorded_on: day(20),
                weight_kg: 30.0,
            })
            .with_activity(ActivitySession {
                pet_id: "p1".to_string(),
                performed_on: day(21),
                kind: ActivityKind::Walk,
                start: ClockTime::new(8, 0).unwrap(),
                end: ClockTime::new(9, 0).unwrap(),
            });

        let weights = store.weight_samples_on("p1", day(20)).await.unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].weight_kg, 12.5);
        assert!(store.weight_samples_on("p1", day(21)).await.unwrap().is_empty());
        assert_eq!(store.activity_sessions_on("p1", day(21)).await.unwrap().len(), 1);
        assert!(store.activity_sessions_on("p2", day(21)).await.unwrap().is_empty());
        assert_eq!(store.lookup_count(), 4);
    }

    #[tokio::test]
    async fn failing_day_reports_unavailable() {
        let store = MemoryStore::new().failing_on(day(20));
        let err = store.weight_samples_on("p1", day(20)).await.unwrap_err();
        assert!(matches!(err, StatsError::Unavailable(_)));
        assert!(store.weight_samples_on("p1", day(19)).await.is_ok());
    }
}
