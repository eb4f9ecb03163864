use std::fmt::Write;

use crate::models::{ActivitySeries, WeightSeries, Window, FALLBACK_LABEL, NO_DATA_SENTINEL};
use crate::series::{day_for_index, days_with_data};

pub fn build_report(
    pet_id: &str,
    window: Window,
    weights: &WeightSeries,
    activity: &ActivitySeries,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Weekly Stats for {pet_id}");
    let _ = writeln!(
        output,
        "Window {} to {} ({} marks a day without records)",
        window.start_iso(),
        window.end_iso(),
        NO_DATA_SENTINEL
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Activity");

    let active_days = days_with_data(&activity.labels);
    if active_days == 0 {
        let _ = writeln!(output, "No activity recorded for this window.");
    } else {
        let _ = writeln!(output, "| Day | Date | kcal | Minutes |");
        let _ = writeln!(output, "| --- | --- | ---: | ---: |");
        for (index, label) in activity.labels.iter().enumerate() {
            let date = day_for_index(window, index)
                .map(|day| day.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                label, date, activity.kcal[index], activity.minutes[index]
            );
        }
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "- Total: {} kcal across {} minutes on {} active days",
            activity.kcal.iter().sum::<i64>(),
            activity.minutes.iter().sum::<i64>(),
            active_days
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weight");

    let weighed: Vec<(&String, f64)> = weights
        .labels
        .iter()
        .zip(weights.data.iter().copied())
        .filter(|(label, _)| !label.ends_with(NO_DATA_SENTINEL) && label.as_str() != FALLBACK_LABEL)
        .collect();

    if weighed.is_empty() {
        let _ = writeln!(output, "No weigh-ins recorded for this window.");
    } else {
        for (label, kg) in &weighed {
            let _ = writeln!(output, "- {label}: {kg:.1} kg");
        }
        if let Some((_, latest)) = weighed.last() {
            let _ = writeln!(output);
            let _ = writeln!(output, "Latest weight {latest:.1} kg.");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week() -> Window {
        crate::window::resolve_window(NaiveDate::from_ymd_opt(2026, 10, 22).unwrap())
    }

    #[test]
    fn report_lists_active_days_and_latest_weight() {
        let activity = ActivitySeries {
            labels: ["Mon*", "Tue*", "Wed", "Thu*", "Fri*", "Sat*", "Sun*"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            kcal: vec![0, 0, 38, 0, 0, 0, 0],
            minutes: vec![0, 0, 60, 0, 0, 0, 0],
        };
        let weights = WeightSeries {
            labels: ["Mon*", "Tue*", "Wed*", "Thu*", "Fri", "Sat*", "Sun*"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data: vec![0.0, 0.0, 0.0, 0.0, 12.5, 0.0, 0.0],
        };

        let report = build_report("p1", week(), &weights, &activity);
        assert!(report.starts_with("# Weekly Stats for p1"));
        assert!(report.contains("Window 2026-10-19 to 2026-10-25"));
        assert!(report.contains("| Wed | 2026-10-21 | 38 | 60 |"));
        assert!(report.contains("- Total: 38 kcal across 60 minutes on 1 active days"));
        assert!(report.contains("- Fri: 12.5 kg"));
        assert!(report.contains("Latest weight 12.5 kg."));
    }

    #[test]
    fn placeholder_series_render_empty_sections() {
        let report = build_report(
            "p1",
            week(),
            &WeightSeries::placeholder(),
            &ActivitySeries::placeholder(),
        );
        assert!(report.contains("No activity recorded for this window."));
        assert!(report.contains("No weigh-ins recorded for this window."));
    }
}
