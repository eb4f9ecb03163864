use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StatsError;

/// Appended to a day label when the store had nothing for that day.
pub const NO_DATA_SENTINEL: char = '*';
pub const FALLBACK_LABEL: &str = "N/A";
pub const FALLBACK_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightSample {
    pub pet_id: String,
    pub recorded_on: NaiveDate,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySession {
    pub pet_id: String,
    pub performed_on: NaiveDate,
    pub kind: ActivityKind,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Activity kinds with a known metabolic equivalent. Anything else is kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    Walk,
    Run,
    Play,
    Eat,
    Sleep,
    Other(String),
}

impl ActivityKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityKind::Walk => "walk",
            ActivityKind::Run => "run",
            ActivityKind::Play => "play",
            ActivityKind::Eat => "eat",
            ActivityKind::Sleep => "sleep",
            ActivityKind::Other(raw) => raw,
        }
    }
}

impl From<&str> for ActivityKind {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "walk" => ActivityKind::Walk,
            "run" => ActivityKind::Run,
            "play" => ActivityKind::Play,
            "eat" => ActivityKind::Eat,
            "sleep" => ActivityKind::Sleep,
            _ => ActivityKind::Other(value.trim().to_string()),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 24-hour wall clock time, parsed from "H:MM" or "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, StatsError> {
        if hour > 23 || minute > 59 {
            return Err(StatsError::InvalidClockTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StatsError::InvalidClockTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let is_field = |part: &str| {
            (1..=2).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_field(hour) || !is_field(minute) {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        ClockTime::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Every date from `start` to `end`, ascending. Empty when `end < start`.
    pub fn days(&self) -> Vec<NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(|day| *day <= end).collect()
    }

    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl WeightSeries {
    pub fn placeholder() -> Self {
        Self {
            labels: vec![FALLBACK_LABEL.to_string(); FALLBACK_LEN],
            data: vec![0.0; FALLBACK_LEN],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySeries {
    pub labels: Vec<String>,
    pub kcal: Vec<i64>,
    pub minutes: Vec<i64>,
}

impl ActivitySeries {
    pub fn placeholder() -> Self {
        Self {
            labels: vec![FALLBACK_LABEL.to_string(); FALLBACK_LEN],
            kcal: vec![0; FALLBACK_LEN],
            minutes: vec![0; FALLBACK_LEN],
        }
    }
}
