//! Live timing pipeline.
//!
//! Raw results from the gateway are projected onto fixed table rows
//! ([`normalize`]), ordered on demand ([`sort`]), and paired with a
//! wall-clock progress estimate ([`progress`]). [`LiveBoard`] ties the three
//! together behind a single latest-result slot.

mod board;
pub mod normalize;
pub mod progress;
pub mod sort;
pub mod teams;

pub use board::{BoardStatus, BoardView, FailureKind, LiveBoard};
pub use normalize::{classify_status, normalize, RaceMeta, RaceResultRow, StatusClass};
pub use progress::{estimate_progress, format_elapsed, UNKNOWN_ELAPSED};
pub use sort::{sort, toggle, SortDirection, SortField, SortState};
pub use teams::team_color;
