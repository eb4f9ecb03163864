use anyhow::Context;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StatsError;
use crate::models::{ActivityKind, ActivitySession, ClockTime, WeightSample};
use crate::store::MetricStore;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Postgres-backed metric store. Dates live in `DATE` columns on both tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricStore for PgStore {
    async fn weight_samples_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WeightSample>, StatsError> {
        let rows = sqlx::query(
            r#"
            SELECT pet_id, recorded_on, weight_kg
            FROM petcare_stats.weight_samples
            WHERE pet_id = $1 AND recorded_on = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(pet_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            samples.push(WeightSample {
                pet_id: row.try_get("pet_id")?,
                recorded_on: row.try_get("recorded_on")?,
                weight_kg: row.try_get("weight_kg")?,
            });
        }

        Ok(samples)
    }

    async fn activity_sessions_on(
        &self,
        pet_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ActivitySession>, StatsError> {
        let rows = sqlx::query(
            r#"
            SELECT pet_id, performed_on, kind, start_time, end_time
            FROM petcare_stats.activity_sessions
            WHERE pet_id = $1 AND performed_on = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(pet_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in rows {
            let kind: String = row.try_get("kind")?;
            let start: String = row.try_get("start_time")?;
            let end: String = row.try_get("end_time")?;
            sessions.push(ActivitySession {
                pet_id: row.try_get("pet_id")?,
                performed_on: row.try_get("performed_on")?,
                kind: ActivityKind::from(kind.as_str()),
                start: start.parse()?,
                end: end.parse()?,
            });
        }

        Ok(sessions)
    }
}

async fn insert_weight(
    pool: &PgPool,
    sample: &WeightSample,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO petcare_stats.weight_samples
        (id, pet_id, recorded_on, weight_kg, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&sample.pet_id)
    .bind(sample.recorded_on)
    .bind(sample.weight_kg)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_activity(
    pool: &PgPool,
    session: &ActivitySession,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO petcare_stats.activity_sessions
        (id, pet_id, performed_on, kind, start_time, end_time, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&session.pet_id)
    .bind(session.performed_on)
    .bind(session.kind.as_str())
    .bind(session.start.to_string())
    .bind(session.end.to_string())
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Demo data for the week containing `today`: "p1" walks on Wednesday and is
/// weighed on Friday, "p2" has a walk and a weigh-in every day.
pub async fn seed(pool: &PgPool, today: NaiveDate) -> anyhow::Result<usize> {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let mut inserted = 0usize;

    let p1_walk = ActivitySession {
        pet_id: "p1".to_string(),
        performed_on: monday + Duration::days(2),
        kind: ActivityKind::Walk,
        start: ClockTime::new(8, 0)?,
        end: ClockTime::new(9, 0)?,
    };
    let p1_weight = WeightSample {
        pet_id: "p1".to_string(),
        recorded_on: monday + Duration::days(4),
        weight_kg: 12.5,
    };
    if insert_activity(pool, &p1_walk, &format!("seed-p1-walk-{}", p1_walk.performed_on)).await? {
        inserted += 1;
    }
    if insert_weight(pool, &p1_weight, &format!("seed-p1-weight-{}", p1_weight.recorded_on)).await? {
        inserted += 1;
    }

    for offset in 0..7u8 {
        let day = monday + Duration::days(i64::from(offset));
        let walk = ActivitySession {
            pet_id: "p2".to_string(),
            performed_on: day,
            kind: if offset % 3 == 0 { ActivityKind::Run } else { ActivityKind::Walk },
            start: ClockTime::new(7, 30)?,
            end: ClockTime::new(8, 15 + offset * 5)?,
        };
        let weight = WeightSample {
            pet_id: "p2".to_string(),
            recorded_on: day,
            weight_kg: 28.0 + f64::from(offset) * 0.1,
        };
        if insert_activity(pool, &walk, &format!("seed-p2-walk-{day}")).await? {
            inserted += 1;
        }
        if insert_weight(pool, &weight, &format!("seed-p2-weight-{day}")).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[derive(serde::Deserialize)]
struct WeightCsvRow {
    pet_id: String,
    recorded_on: NaiveDate,
    weight_kg: f64,
    #[serde(default)]
    source_key: Option<String>,
}

#[derive(serde::Deserialize)]
struct ActivityCsvRow {
    pet_id: String,
    performed_on: NaiveDate,
    kind: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    source_key: Option<String>,
}

/// A validated CSV row and the key used to skip it on re-import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow<T> {
    pub record: T,
    pub source_key: String,
}

fn source_key_or_generated(source_key: Option<String>) -> String {
    source_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()))
}

fn parse_weight_row(row: WeightCsvRow) -> Result<ImportRow<WeightSample>, StatsError> {
    if !row.weight_kg.is_finite() || row.weight_kg <= 0.0 {
        return Err(StatsError::InvalidWeight(row.weight_kg));
    }

    Ok(ImportRow {
        record: WeightSample {
            pet_id: row.pet_id,
            recorded_on: row.recorded_on,
            weight_kg: row.weight_kg,
        },
        source_key: source_key_or_generated(row.source_key),
    })
}

fn parse_activity_row(row: ActivityCsvRow) -> Result<ImportRow<ActivitySession>, StatsError> {
    Ok(ImportRow {
        record: ActivitySession {
            pet_id: row.pet_id,
            performed_on: row.performed_on,
            kind: ActivityKind::from(row.kind.as_str()),
            start: row.start_time.parse()?,
            end: row.end_time.parse()?,
        },
        source_key: source_key_or_generated(row.source_key),
    })
}

/// Reads and validates every weight row. The first bad row fails the whole
/// file, with its line number in the error context.
pub fn read_weight_rows<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> anyhow::Result<Vec<ImportRow<WeightSample>>> {
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<WeightCsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("weight row on line {line}"))?;
        rows.push(parse_weight_row(row).with_context(|| format!("weight row on line {line}"))?);
    }
    Ok(rows)
}

pub fn read_activity_rows<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> anyhow::Result<Vec<ImportRow<ActivitySession>>> {
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<ActivityCsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("activity row on line {line}"))?;
        rows.push(parse_activity_row(row).with_context(|| format!("activity row on line {line}"))?);
    }
    Ok(rows)
}

pub async fn import_weights_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("cannot open {}", csv_path.display()))?;
    let rows = read_weight_rows(reader)?;
    let mut inserted = 0usize;

    for row in &rows {
        if insert_weight(pool, &row.record, &row.source_key).await? {
            inserted += 1;
        }
    }

    tracing::info!(path = %csv_path.display(), rows = rows.len(), inserted, "weight samples imported");
    Ok(inserted)
}

pub async fn import_activities_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("cannot open {}", csv_path.display()))?;
    let rows = read_activity_rows(reader)?;
    let mut inserted = 0usize;

    for row in &rows {
        if insert_activity(pool, &row.record, &row.source_key).await? {
            inserted += 1;
        }
    }

    tracing::info!(path = %csv_path.display(), rows = rows.len(), inserted, "activity sessions imported");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(data.as_bytes())
    }

    #[test]
    fn weight_rows_keep_or_generate_source_keys() {
        let rows = read_weight_rows(reader(
            "pet_id,recorded_on,weight_kg,source_key\n\
             p1,2026-10-23,12.5,scale-1\n\
             p1,2026-10-24,12.6,\n",
        ))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_key, "scale-1");
        assert_eq!(rows[0].record.weight_kg, 12.5);
        assert_eq!(
            rows[0].record.recorded_on,
            NaiveDate::from_ymd_opt(2026, 10, 23).unwrap()
        );
        assert!(rows[1].source_key.starts_with("import-"));
    }

    #[test]
    fn source_key_column_is_optional() {
        let weights = read_weight_rows(reader("pet_id,recorded_on,weight_kg\np1,2026-10-23,9.0\n")).unwrap();
        assert!(weights[0].source_key.starts_with("import-"));

        let activities = read_activity_rows(reader(
            "pet_id,performed_on,kind,start_time,end_time\np1,2026-10-21,walk,8:00,9:0\n",
        ))
        .unwrap();
        assert!(activities[0].source_key.starts_with("import-"));
        assert_eq!(activities[0].record.end, ClockTime::new(9, 0).unwrap());
    }

    #[test]
    fn non_positive_weight_is_rejected_with_line() {
        let err = read_weight_rows(reader(
            "pet_id,recorded_on,weight_kg\np1,2026-10-23,12.0\np1,2026-10-24,0\n",
        ))
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("invalid weight: 0 kg"), "{message}");
    }

    #[test]
    fn bad_date_is_rejected_with_line() {
        let err = read_weight_rows(reader("pet_id,recorded_on,weight_kg\np1,2026-02-30,12.0\n"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn activity_rows_normalise_kind_and_times() {
        let rows = read_activity_rows(reader(
            "pet_id,performed_on,kind,start_time,end_time,source_key\n\
             p1,2026-10-21,Walk,8:00,09:00,walk-1\n\
             p1,2026-10-21,swim,23:00,1:00,swim-1\n",
        ))
        .unwrap();

        assert_eq!(rows[0].record.kind, ActivityKind::Walk);
        assert_eq!(rows[0].record.start.to_string(), "08:00");
        assert_eq!(rows[1].record.kind, ActivityKind::Other("swim".to_string()));
        assert_eq!(rows[1].source_key, "swim-1");
    }

    #[test]
    fn bad_clock_time_is_rejected_with_line() {
        let err = read_activity_rows(reader(
            "pet_id,performed_on,kind,start_time,end_time\n\
             p1,2026-10-21,walk,08:00,09:00\n\
             p1,2026-10-22,walk,8am,09:00\n",
        ))
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("activity row on line 3"), "{message}");
        assert!(message.contains("invalid clock time: 8am"), "{message}");
    }
}
