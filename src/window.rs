use chrono::{Duration, Local, NaiveDate};

use crate::error::StatsError;
use crate::models::{Window, NO_DATA_SENTINEL};

/// Days on each side of the anchor.
pub const WINDOW_RADIUS_DAYS: i64 = 3;

/// Seven-day window centred on `anchor`.
pub fn resolve_window(anchor: NaiveDate) -> Window {
    Window {
        start: anchor - Duration::days(WINDOW_RADIUS_DAYS),
        end: anchor + Duration::days(WINDOW_RADIUS_DAYS),
    }
}

pub fn parse_anchor(raw: &str) -> Result<NaiveDate, StatsError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| StatsError::InvalidDate(raw.to_string()))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn weekday_label(day: NaiveDate, has_data: bool) -> String {
    let name = day.format("%a");

    if has_data {
        name.to_string()
    } else {
        format!("{name}{NO_DATA_SENTINEL}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_spans_three_days_each_side() {
        let anchor = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let window = resolve_window(anchor);
        assert_eq!(window.start_iso(), "2026-10-16");
        assert_eq!(window.end_iso(), "2026-10-22");
        assert_eq!(window.days().len(), 7);
    }

    #[test]
    fn window_crosses_year_boundary() {
        let anchor = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        let window = resolve_window(anchor);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 12, 29).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2027, 1, 4).unwrap());
        assert_eq!(window.days().len(), 7);
    }

    #[test]
    fn window_handles_leap_day() {
        let anchor = NaiveDate::from_ymd_opt(2028, 3, 1).unwrap();
        let window = resolve_window(anchor);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2028, 2, 27).unwrap());
        assert_eq!(window.days()[2], NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[test]
    fn parse_anchor_requires_iso_dates() {
        assert_eq!(
            parse_anchor("2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(parse_anchor("19/10/2026").is_err());
        assert!(parse_anchor("2026-02-30").is_err());
    }

    #[test]
    fn labels_carry_sentinel_only_without_data() {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(weekday_label(monday, true), "Mon");
        assert_eq!(weekday_label(monday, false), "Mon*");
    }

    #[test]
    fn labels_follow_the_calendar_week() {
        let labels: Vec<String> = resolve_window(NaiveDate::from_ymd_opt(2026, 10, 22).unwrap())
            .days()
            .into_iter()
            .map(|day| weekday_label(day, true))
            .collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }
}
