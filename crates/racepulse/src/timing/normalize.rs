//! Projection of API race results onto the timing table's row shape.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::{Race, RawResult};

/// Status string the API uses for a classified finisher.
pub const STATUS_FINISHED: &str = "Finished";

/// Status string used for a car still circulating.
pub const STATUS_RUNNING: &str = "Running";

/// One row of the live-timing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResultRow {
    /// Classified position, 1-based.
    pub position: u32,
    /// Car number as displayed.
    pub car_number: String,
    /// "given family".
    pub driver_name: String,
    /// Team display name; also the key into the team color table.
    pub team_name: String,
    /// Race time, lap deficit, or the retirement reason.
    pub time: String,
    /// Gap to the leader.
    pub gap: String,
    /// Gap to the car ahead.
    pub interval: String,
    /// Laps completed.
    pub laps: u32,
    /// Upstream status string.
    pub status: String,
}

/// Visual treatment of a row's status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Finished or still running.
    Success,
    /// Any retirement reason or other upstream status.
    NonSuccess,
}

/// Pick the badge treatment for an upstream status string.
#[must_use]
pub fn classify_status(status: &str) -> StatusClass {
    match status {
        STATUS_FINISHED | STATUS_RUNNING => StatusClass::Success,
        _ => StatusClass::NonSuccess,
    }
}

impl RaceResultRow {
    /// Badge treatment for this row.
    #[must_use]
    pub fn status_class(&self) -> StatusClass {
        classify_status(&self.status)
    }
}

/// Map raw results to table rows, one to one and in order.
///
/// A position that does not parse falls back to the row's 1-based index.
#[must_use]
pub fn normalize(results: &[RawResult]) -> Vec<RaceResultRow> {
    results
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let fallback = u32::try_from(index + 1).unwrap_or(u32::MAX);
            normalize_one(raw, fallback)
        })
        .collect()
}

fn normalize_one(raw: &RawResult, fallback_position: u32) -> RaceResultRow {
    let position = raw.position.trim().parse().unwrap_or(fallback_position);
    let finish_time = raw
        .time
        .as_ref()
        .map(|t| t.time.as_str())
        .filter(|t| !t.is_empty());

    let time = match finish_time {
        Some(t) => t.to_string(),
        None if raw.status == STATUS_FINISHED => "+1 Lap".to_string(),
        None => raw.status.clone(),
    };

    let gap = match finish_time {
        Some(_) if position == 1 => "Leader".to_string(),
        Some(t) => t.to_string(),
        None => "-".to_string(),
    };

    let interval = match finish_time {
        _ if position == 1 => "-".to_string(),
        Some(t) => t.to_string(),
        None => "-".to_string(),
    };

    RaceResultRow {
        position,
        car_number: raw.number.clone(),
        driver_name: raw.driver.full_name(),
        team_name: raw.constructor.name.clone(),
        time,
        gap,
        interval,
        laps: raw.laps.trim().parse().unwrap_or(0),
        status: raw.status.clone(),
    }
}

/// Race header data used for display and progress estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceMeta {
    /// Race display name.
    pub race_name: String,
    /// Circuit display name.
    pub circuit_name: String,
    /// Season year.
    pub season: String,
    /// Round within the season.
    pub round: String,
    /// Scheduled start, when the date could be read.
    pub scheduled_start: Option<DateTime<Utc>>,
}

impl RaceMeta {
    /// Extract header data from a race record.
    #[must_use]
    pub fn from_race(race: &Race) -> Self {
        Self {
            race_name: race.race_name.clone(),
            circuit_name: race.circuit.circuit_name.clone(),
            season: race.season.clone(),
            round: race.round.clone(),
            scheduled_start: parse_scheduled_start(&race.date, race.time.as_deref()),
        }
    }
}

/// Combine the API's date and optional `HH:MM:SSZ` time into a UTC instant.
///
/// A missing or unreadable time means midnight UTC; an unreadable date
/// means no start at all.
#[must_use]
pub fn parse_scheduled_start(date: &str, time: Option<&str>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time
        .map(|t| t.trim().trim_end_matches('Z'))
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
        .unwrap_or_default();
    Some(date.and_time(time).and_utc())
}
