//! Plain-text rendering for command output.
//!
//! Every function here is pure: data in, `String` out. Printing is left to
//! the binary.

use std::fmt::Write as _;

use serde_json::json;

use crate::error::Result;
use crate::gateway::{Constructor, ConstructorStanding, Driver, DriverStanding, Race};
use crate::series::Series;
use crate::timing::{
    classify_status, normalize, team_color, BoardStatus, BoardView, FailureKind, RaceMeta,
    RaceResultRow, SortDirection, SortField, SortState, StatusClass,
};

/// Shown before the first refresh completes.
pub const LOADING_TEXT: &str = "Loading live timing data...";

/// Shown when the API has no race to display.
pub const EMPTY_TEXT: &str = "No race data available.";

/// Lay out `rows` under `headers` as left-aligned columns.
fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let mut out = String::new();
        for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            let _ = write!(out, "{cell:<width$}");
        }
        out.trim_end().to_string()
    };

    let mut out = line(headers);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&rule));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

/// Status text prefixed with its badge.
#[must_use]
pub fn status_marker(status: &str) -> String {
    match classify_status(status) {
        StatusClass::Success => format!("[OK] {status}"),
        StatusClass::NonSuccess => format!("[!!] {status}"),
    }
}

fn header(field: SortField, sort: SortState) -> String {
    let name = field.name().to_uppercase();
    match (sort.field, sort.direction) {
        (Some(f), SortDirection::Ascending) if f == field => format!("{name} ^"),
        (Some(f), SortDirection::Descending) if f == field => format!("{name} v"),
        _ => name,
    }
}

/// The timing table for already-ordered rows.
#[must_use]
pub fn render_rows(rows: &[RaceResultRow], sort: SortState) -> String {
    let headers: Vec<String> = SortField::ALL.iter().map(|f| header(*f, sort)).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.position.to_string(),
                row.car_number.clone(),
                row.driver_name.clone(),
                row.team_name.clone(),
                row.time.clone(),
                row.gap.clone(),
                row.interval.clone(),
                row.laps.to_string(),
                status_marker(&row.status),
            ]
        })
        .collect();
    table(&headers, &cells)
}

fn race_heading(meta: &RaceMeta) -> String {
    format!(
        "{} - {} (Round {}, {})",
        meta.race_name, meta.circuit_name, meta.round, meta.season
    )
}

fn failure_hint(kind: FailureKind) -> String {
    match kind {
        FailureKind::Connection => {
            "Check your network connection and run the command again.".to_string()
        }
        FailureKind::Api(status) => {
            format!("The results API returned HTTP {status}. Run the command again later.")
        }
        FailureKind::Payload => "The results API sent an unexpected response.".to_string(),
    }
}

/// The live board: heading, status line and table, or the state message.
#[must_use]
pub fn render_board(view: &BoardView) -> String {
    match &view.status {
        BoardStatus::Loading => LOADING_TEXT.to_string(),
        BoardStatus::Empty => EMPTY_TEXT.to_string(),
        BoardStatus::Error { kind, message } => {
            format!("Error loading live timing: {message}\n{}", failure_hint(*kind))
        }
        BoardStatus::Ready => {
            let mut out = String::new();
            if let Some(meta) = &view.meta {
                out.push_str(&race_heading(meta));
                out.push('\n');
            }
            let progress = view.progress.unwrap_or_default();
            let _ = write!(
                out,
                "Progress: {progress:.0}%  Elapsed: {}",
                view.elapsed
            );
            if let Some(at) = view.fetched_at {
                let _ = write!(out, "  Updated: {}", at.format("%H:%M:%S UTC"));
            }
            out.push_str("\n\n");
            out.push_str(&render_rows(&view.rows, view.sort));
            out
        }
    }
}

/// The live board as pretty JSON, with each row's team color.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn board_json(view: &BoardView) -> Result<String> {
    let rows: Vec<_> = view
        .rows
        .iter()
        .map(|row| {
            json!({
                "row": row,
                "status_class": row.status_class(),
                "team_color": team_color(&row.team_name),
            })
        })
        .collect();
    let value = json!({
        "status": view.status,
        "meta": view.meta,
        "sort": view.sort,
        "progress": view.progress,
        "elapsed": view.elapsed,
        "fetched_at": view.fetched_at,
        "rows": rows,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Full classification of a single race.
#[must_use]
pub fn render_race(race: &Race) -> String {
    let meta = RaceMeta::from_race(race);
    let mut out = race_heading(&meta);
    out.push_str("\n\n");
    let rows = normalize(&race.results);
    if rows.is_empty() {
        out.push_str("No results yet.");
    } else {
        out.push_str(&render_rows(&rows, SortState::default()));
    }
    out
}

/// Drivers' championship table.
#[must_use]
pub fn render_driver_standings(standings: &[DriverStanding]) -> String {
    if standings.is_empty() {
        return "No driver standings available.".to_string();
    }
    let headers = ["POS", "DRIVER", "TEAM", "POINTS", "WINS"].map(String::from);
    let rows: Vec<Vec<String>> = standings
        .iter()
        .map(|s| {
            let team = s
                .constructors
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            vec![
                s.position.clone(),
                s.driver.full_name(),
                team,
                s.points.clone(),
                s.wins.clone(),
            ]
        })
        .collect();
    table(&headers, &rows)
}

/// Constructors' championship table.
#[must_use]
pub fn render_constructor_standings(standings: &[ConstructorStanding]) -> String {
    if standings.is_empty() {
        return "No constructor standings available.".to_string();
    }
    let headers = ["POS", "TEAM", "NATIONALITY", "POINTS", "WINS"].map(String::from);
    let rows: Vec<Vec<String>> = standings
        .iter()
        .map(|s| {
            vec![
                s.position.clone(),
                s.constructor.name.clone(),
                s.constructor.nationality.clone(),
                s.points.clone(),
                s.wins.clone(),
            ]
        })
        .collect();
    table(&headers, &rows)
}

/// Season calendar.
#[must_use]
pub fn render_schedule(races: &[Race]) -> String {
    if races.is_empty() {
        return "No races scheduled.".to_string();
    }
    let headers = ["RND", "DATE", "RACE", "CIRCUIT", "LOCATION"].map(String::from);
    let rows: Vec<Vec<String>> = races
        .iter()
        .map(|race| {
            let location = &race.circuit.location;
            vec![
                race.round.clone(),
                race.date.clone(),
                race.race_name.clone(),
                race.circuit.circuit_name.clone(),
                format!("{}, {}", location.locality, location.country),
            ]
        })
        .collect();
    table(&headers, &rows)
}

/// Driver profile.
#[must_use]
pub fn render_driver(driver: &Driver) -> String {
    let mut out = driver.full_name();
    let _ = write!(out, "\n  ID:          {}", driver.driver_id);
    if let Some(code) = &driver.code {
        let _ = write!(out, "\n  Code:        {code}");
    }
    if let Some(number) = &driver.permanent_number {
        let _ = write!(out, "\n  Number:      {number}");
    }
    let _ = write!(out, "\n  Nationality: {}", driver.nationality);
    let _ = write!(out, "\n  Born:        {}", driver.date_of_birth);
    let _ = write!(out, "\n  URL:         {}", driver.url);
    out
}

/// Constructor profile.
#[must_use]
pub fn render_constructor(constructor: &Constructor) -> String {
    format!(
        "{}\n  ID:          {}\n  Nationality: {}\n  URL:         {}",
        constructor.name, constructor.constructor_id, constructor.nationality, constructor.url
    )
}

/// One line per series.
#[must_use]
pub fn render_series_list(series: &[Series]) -> String {
    let headers = ["SLUG", "SERIES", "CHAMPION", "NEXT RACE"].map(String::from);
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|s| {
            vec![
                s.slug.clone(),
                s.name.clone(),
                s.current_champion.clone(),
                s.next_race.clone(),
            ]
        })
        .collect();
    table(&headers, &rows)
}

/// Series detail with both standings tables.
#[must_use]
pub fn render_series(series: &Series) -> String {
    let mut out = format!("{} ({})\n\n{}\n", series.name, series.full_name, series.description);
    let _ = write!(
        out,
        "\nChampion:       {}\nTeam champion:  {}\nNext race:      {}\nPoints:         {}\n",
        series.current_champion,
        series.constructor_champion,
        series.next_race,
        series.point_system
    );

    let headers = ["POS", "DRIVER", "TEAM", "POINTS"].map(String::from);
    let rows: Vec<Vec<String>> = series
        .standings
        .iter()
        .map(|e| {
            vec![
                e.position.to_string(),
                e.driver.clone(),
                e.team.clone(),
                e.points.to_string(),
            ]
        })
        .collect();
    out.push_str("\nDriver standings\n");
    out.push_str(&table(&headers, &rows));

    let headers = ["POS", "TEAM", "POINTS"].map(String::from);
    let rows: Vec<Vec<String>> = series
        .team_standings
        .iter()
        .map(|e| vec![e.position.to_string(), e.team.clone(), e.points.to_string()])
        .collect();
    out.push_str("\n\nTeam standings\n");
    out.push_str(&table(&headers, &rows));
    out
}

/// Mask a secret, keeping only its last four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Envelope;
    use crate::series::SeriesCatalog;
    use crate::testing::{races_envelope, sample_race};
    use chrono::{TimeZone, Utc};

    fn race() -> Race {
        let envelope: Envelope =
            serde_json::from_value(races_envelope(vec![sample_race("2024", "Spanish Grand Prix")]))
                .unwrap();
        envelope.mr_data.race_table.races.into_iter().next().unwrap()
    }

    fn ready_view() -> BoardView {
        let race = race();
        BoardView {
            status: BoardStatus::Ready,
            meta: Some(RaceMeta::from_race(&race)),
            rows: normalize(&race.results),
            sort: SortState::by(SortField::Laps),
            progress: Some(75.0),
            elapsed: "01:30:00".to_string(),
            fetched_at: Some(Utc.with_ymd_and_hms(2024, 6, 23, 14, 30, 5).unwrap()),
        }
    }

    fn empty_view(status: BoardStatus) -> BoardView {
        BoardView {
            status,
            meta: None,
            rows: Vec::new(),
            sort: SortState::default(),
            progress: None,
            elapsed: "--:--:--".to_string(),
            fetched_at: None,
        }
    }

    #[test]
    fn test_status_marker() {
        assert_eq!(status_marker("Finished"), "[OK] Finished");
        assert_eq!(status_marker("Running"), "[OK] Running");
        assert_eq!(status_marker("Ferrari Engine"), "[!!] Ferrari Engine");
    }

    #[test]
    fn test_table_aligns_columns() {
        let headers = ["A", "LONG"].map(String::from);
        let rows = vec![vec!["wide cell".to_string(), "x".to_string()]];
        let out = table(&headers, &rows);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "A          LONG");
        assert_eq!(lines[1], "---------  ----");
        assert_eq!(lines[2], "wide cell  x");
    }

    #[test]
    fn test_table_counts_chars_not_bytes() {
        let headers = ["NAME", "N"].map(String::from);
        let rows = vec![vec!["Rovanperä".to_string(), "1".to_string()]];
        let out = table(&headers, &rows);
        assert!(out.lines().nth(2).unwrap().starts_with("Rovanperä  1"));
    }

    #[test]
    fn test_render_board_ready() {
        let out = render_board(&ready_view());
        assert!(out.starts_with("Spanish Grand Prix - Circuit de Barcelona-Catalunya (Round 10, 2024)"));
        assert!(out.contains("Progress: 75%  Elapsed: 01:30:00  Updated: 14:30:05 UTC"));
        assert!(out.contains("LAPS ^"));
        assert!(out.contains("[!!] Engine"));
        assert!(out.contains("Leader"));
    }

    #[test]
    fn test_render_board_states() {
        assert_eq!(render_board(&empty_view(BoardStatus::Loading)), LOADING_TEXT);
        assert_eq!(render_board(&empty_view(BoardStatus::Empty)), EMPTY_TEXT);
    }

    fn error_view(kind: FailureKind) -> BoardView {
        empty_view(BoardStatus::Error {
            kind,
            message: "boom".to_string(),
        })
    }

    #[test]
    fn test_render_board_error_hint_follows_kind() {
        let out = render_board(&error_view(FailureKind::Api(500)));
        assert!(out.starts_with("Error loading live timing: boom"));
        assert!(out.contains("returned HTTP 500"));

        let out = render_board(&error_view(FailureKind::Connection));
        assert!(out.contains("network connection"));
        assert!(!out.contains("HTTP"));

        let out = render_board(&error_view(FailureKind::Payload));
        assert!(out.contains("unexpected response"));
    }

    #[test]
    fn test_board_json_error_state() {
        let out = board_json(&error_view(FailureKind::Api(503))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"]["state"], "error");
        assert_eq!(value["status"]["kind"]["api"], 503);
        assert_eq!(value["status"]["message"], "boom");
    }

    #[test]
    fn test_board_json_has_team_colors() {
        let out = board_json(&ready_view()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"]["state"], "ready");
        assert_eq!(value["rows"].as_array().unwrap().len(), 5);
        assert_eq!(value["rows"][0]["team_color"], "#0600EF");
        assert_eq!(value["rows"][4]["status_class"], "non_success");
    }

    #[test]
    fn test_render_race() {
        let out = render_race(&race());
        assert!(out.contains("Spanish Grand Prix"));
        assert!(out.contains("Max Verstappen"));
        assert!(out.contains("+1 Lap"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(render_driver_standings(&[]), "No driver standings available.");
        assert_eq!(render_constructor_standings(&[]), "No constructor standings available.");
        assert_eq!(render_schedule(&[]), "No races scheduled.");
    }

    #[test]
    fn test_render_schedule() {
        let out = render_schedule(&[race()]);
        assert!(out.contains("2024-06-23"));
        assert!(out.contains("Montmeló, Spain"));
    }

    #[test]
    fn test_render_series() {
        let catalog = SeriesCatalog::builtin().unwrap();
        let out = render_series(catalog.get("wrc").unwrap());
        assert!(out.contains("Driver standings"));
        assert!(out.contains("Team standings"));

        let list = render_series_list(catalog.list());
        assert_eq!(list.lines().count(), 2 + 8);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("gsk_abcdef1234"), "**********1234");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
