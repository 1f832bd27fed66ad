//! Live timing board.
//!
//! Owns the single "latest result" slot. Every completed refresh overwrites
//! the slot with whatever it resolved, so when refreshes overlap the one
//! that finishes last wins. Views are immutable snapshots derived from the
//! slot on demand.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::gateway::{ResultsGateway, Transport};

use super::normalize::{normalize, RaceMeta, RaceResultRow};
use super::progress::{estimate_progress, format_elapsed, UNKNOWN_ELAPSED};
use super::sort::{SortField, SortState};

/// What the last refresh produced.
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Race { meta: RaceMeta, rows: Vec<RaceResultRow> },
    NoRace,
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    fetched_at: DateTime<Utc>,
    outcome: Outcome,
}

/// Why a refresh failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request never got a response.
    Connection,
    /// The API answered with this non-success status.
    Api(u16),
    /// Anything else, usually a response that did not parse.
    Payload,
}

impl FailureKind {
    /// Classify a gateway error.
    #[must_use]
    pub fn of(error: &Error) -> Self {
        if error.is_http_status() {
            if let Error::HttpStatus { status, .. } = error {
                return Self::Api(*status);
            }
        }
        if error.is_transport_failure() {
            Self::Connection
        } else {
            Self::Payload
        }
    }
}

/// Display state of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardStatus {
    /// No refresh has completed yet.
    Loading,
    /// Rows are available.
    Ready,
    /// The API answered but had no race.
    Empty,
    /// The last refresh failed; retry by refreshing again.
    Error {
        /// Failure class, for picking a hint.
        kind: FailureKind,
        /// The error's display text.
        message: String,
    },
}

/// Immutable snapshot of the board for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    /// Display state.
    pub status: BoardStatus,
    /// Race header, when a race was loaded.
    pub meta: Option<RaceMeta>,
    /// Rows ordered by the current sort state.
    pub rows: Vec<RaceResultRow>,
    /// Sort state the rows were ordered by.
    pub sort: SortState,
    /// Estimated completion percentage, when a race was loaded.
    pub progress: Option<f64>,
    /// Approximate elapsed race time, or `--:--:--`.
    pub elapsed: String,
    /// When the slot was last written.
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Live timing board backed by a [`ResultsGateway`].
#[derive(Debug)]
pub struct LiveBoard<T> {
    gateway: ResultsGateway<T>,
    staleness: Duration,
    sort: RwLock<SortState>,
    latest: RwLock<Option<Slot>>,
}

impl<T: Transport> LiveBoard<T> {
    /// Create an empty board.
    #[must_use]
    pub fn new(gateway: ResultsGateway<T>, staleness: Duration) -> Self {
        Self {
            gateway,
            staleness,
            sort: RwLock::new(SortState::default()),
            latest: RwLock::new(None),
        }
    }

    /// Fetch the latest race and overwrite the slot.
    ///
    /// A failure is recorded as the board's error state and also returned.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the fetch failed.
    pub async fn refresh(&self) -> Result<()> {
        let result = self.gateway.try_latest_results().await;
        let fetched_at = Utc::now();

        let (outcome, returned) = match result {
            Ok(Some(race)) => {
                let rows = normalize(&race.results);
                debug!(race = %race.race_name, rows = rows.len(), "Loaded latest race");
                (
                    Outcome::Race {
                        meta: RaceMeta::from_race(&race),
                        rows,
                    },
                    Ok(()),
                )
            }
            Ok(None) => (Outcome::NoRace, Ok(())),
            Err(e) => {
                warn!("Live timing refresh failed: {e}");
                let outcome = Outcome::Failed {
                    kind: FailureKind::of(&e),
                    message: e.to_string(),
                };
                (outcome, Err(e))
            }
        };

        *self.latest.write().await = Some(Slot {
            fetched_at,
            outcome,
        });
        returned
    }

    /// Whether the slot is empty or older than the staleness window.
    pub async fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match &*self.latest.read().await {
            None => true,
            Some(slot) => {
                let window = chrono::Duration::from_std(self.staleness)
                    .unwrap_or(chrono::Duration::MAX);
                now.signed_duration_since(slot.fetched_at) >= window
            }
        }
    }

    /// Refresh only when the slot is stale. Returns whether a fetch ran.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if a fetch ran and failed.
    pub async fn refresh_if_stale(&self, now: DateTime<Utc>) -> Result<bool> {
        if !self.is_stale(now).await {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Apply the toggle rule for a column selection.
    pub async fn sort_by(&self, field: SortField) -> SortState {
        let mut sort = self.sort.write().await;
        *sort = sort.toggled(field);
        *sort
    }

    /// Replace the sort state outright.
    pub async fn set_sort(&self, state: SortState) {
        *self.sort.write().await = state;
    }

    /// Current sort state.
    pub async fn sort_state(&self) -> SortState {
        *self.sort.read().await
    }

    /// Snapshot the board for rendering at `now`.
    pub async fn view(&self, now: DateTime<Utc>) -> BoardView {
        let sort = self.sort_state().await;
        let latest = self.latest.read().await;

        let mut view = BoardView {
            status: BoardStatus::Loading,
            meta: None,
            rows: Vec::new(),
            sort,
            progress: None,
            elapsed: UNKNOWN_ELAPSED.to_string(),
            fetched_at: latest.as_ref().map(|slot| slot.fetched_at),
        };

        let Some(slot) = latest.as_ref() else {
            return view;
        };

        match &slot.outcome {
            Outcome::Race { meta, rows } => {
                let progress = estimate_progress(meta.scheduled_start, now);
                view.status = BoardStatus::Ready;
                view.rows = sort.apply(rows);
                view.progress = Some(progress);
                view.elapsed = format_elapsed(progress);
                view.meta = Some(meta.clone());
            }
            Outcome::NoRace => view.status = BoardStatus::Empty,
            Outcome::Failed { kind, message } => {
                view.status = BoardStatus::Error {
                    kind: *kind,
                    message: message.clone(),
                };
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResultsConfig;
    use crate::testing::{races_envelope, sample_race, RecordingTransport};
    use crate::timing::SortDirection;
    use chrono::TimeZone;

    const LATEST: &str = "https://results.test/f1/2025/last/results.json";
    const CURRENT: &str = "https://results.test/f1/current/last/results.json";

    fn board(transport: &RecordingTransport) -> LiveBoard<RecordingTransport> {
        let config = ResultsConfig {
            base_url: "https://results.test/f1".to_string(),
            ..ResultsConfig::default()
        };
        LiveBoard::new(
            ResultsGateway::new(transport.clone(), &config),
            Duration::from_secs(30),
        )
    }

    fn race_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 23, 13, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_initial_view_is_loading() {
        let transport = RecordingTransport::new();
        let view = board(&transport).view(Utc::now()).await;

        assert_eq!(view.status, BoardStatus::Loading);
        assert!(view.rows.is_empty());
        assert_eq!(view.elapsed, UNKNOWN_ELAPSED);
        assert!(view.progress.is_none());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_loads_rows_and_progress() {
        let transport = RecordingTransport::new();
        transport.respond(
            LATEST,
            races_envelope(vec![sample_race("2025", "Spanish Grand Prix")]),
        );
        let board = board(&transport);

        board.refresh().await.unwrap();
        let view = board.view(race_start() + chrono::Duration::minutes(90)).await;

        assert_eq!(view.status, BoardStatus::Ready);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows[0].gap, "Leader");
        assert_eq!(view.meta.unwrap().race_name, "Spanish Grand Prix");
        assert!((view.progress.unwrap() - 75.0).abs() < 1e-9);
        assert_eq!(view.elapsed, "01:30:00");
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_error_state() {
        let transport = RecordingTransport::new();
        transport.fail_with_status(LATEST, 503);
        let board = board(&transport);

        assert!(board.refresh().await.is_err());
        let view = board.view(Utc::now()).await;

        assert!(matches!(
            view.status,
            BoardStatus::Error { kind: FailureKind::Api(503), ref message } if message.contains("503")
        ));
        assert!(view.rows.is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_error_recovers() {
        let transport = RecordingTransport::new();
        transport.fail_with_status(LATEST, 500);
        let board = board(&transport);
        assert!(board.refresh().await.is_err());

        transport.respond(
            LATEST,
            races_envelope(vec![sample_race("2025", "Austrian Grand Prix")]),
        );
        board.refresh().await.unwrap();

        assert_eq!(board.view(Utc::now()).await.status, BoardStatus::Ready);
    }

    #[tokio::test]
    async fn test_malformed_body_is_payload_failure() {
        let transport = RecordingTransport::new();
        transport.respond(LATEST, serde_json::json!({"MRData": "not an object"}));
        let board = board(&transport);

        assert!(board.refresh().await.is_err());
        let view = board.view(Utc::now()).await;

        assert!(matches!(
            view.status,
            BoardStatus::Error { kind: FailureKind::Payload, .. }
        ));
    }

    #[test]
    fn test_failure_kind_classification() {
        let status = Error::HttpStatus {
            url: LATEST.to_string(),
            status: 429,
        };
        assert_eq!(FailureKind::of(&status), FailureKind::Api(429));
        assert_eq!(
            FailureKind::of(&Error::unexpected_payload("no MRData")),
            FailureKind::Payload
        );
    }

    #[tokio::test]
    async fn test_no_race_is_empty_not_error() {
        let transport = RecordingTransport::new();
        transport
            .respond(LATEST, races_envelope(vec![]))
            .respond(CURRENT, races_envelope(vec![]));
        let board = board(&transport);

        board.refresh().await.unwrap();
        let view = board.view(Utc::now()).await;

        assert_eq!(view.status, BoardStatus::Empty);
        assert!(view.rows.is_empty());
        assert_eq!(view.elapsed, UNKNOWN_ELAPSED);
    }

    #[tokio::test]
    async fn test_refresh_if_stale_respects_window() {
        let transport = RecordingTransport::new();
        transport.respond(
            LATEST,
            races_envelope(vec![sample_race("2025", "Spanish Grand Prix")]),
        );
        let board = board(&transport);

        assert!(board.refresh_if_stale(Utc::now()).await.unwrap());
        assert!(!board.refresh_if_stale(Utc::now()).await.unwrap());
        assert_eq!(transport.request_count(), 1);

        let later = Utc::now() + chrono::Duration::seconds(31);
        assert!(board.refresh_if_stale(later).await.unwrap());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_sort_by_toggles_and_orders_view() {
        let transport = RecordingTransport::new();
        transport.respond(
            LATEST,
            races_envelope(vec![sample_race("2025", "Spanish Grand Prix")]),
        );
        let board = board(&transport);
        board.refresh().await.unwrap();

        let state = board.sort_by(SortField::Laps).await;
        assert_eq!(state, SortState::by(SortField::Laps));
        let state = board.sort_by(SortField::Laps).await;
        assert_eq!(state.direction, SortDirection::Descending);

        let view = board.view(Utc::now()).await;
        let laps: Vec<_> = view.rows.iter().map(|r| r.laps).collect();
        assert_eq!(laps, vec![66, 66, 66, 65, 41]);
        assert_eq!(view.sort, state);
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_leave_one_result() {
        let transport = RecordingTransport::new();
        transport.respond(
            LATEST,
            races_envelope(vec![sample_race("2025", "Spanish Grand Prix")]),
        );
        let board = board(&transport);

        let (a, b) = tokio::join!(board.refresh(), board.refresh());
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.request_count(), 2);
        assert_eq!(board.view(Utc::now()).await.status, BoardStatus::Ready);
    }
}
