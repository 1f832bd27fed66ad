//! Column sorting for the timing table.
//!
//! Numbers compare numerically and text compares case-folded; a number
//! against text compares equal. That makes the ordering partial across
//! mixed columns, which is accepted: the sort is stable, so such pairs keep
//! their upstream order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::normalize::RaceResultRow;

/// A sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Classified position.
    Position,
    /// Car number.
    CarNumber,
    /// Driver name.
    Driver,
    /// Team name.
    Team,
    /// Time, lap deficit or status text.
    Time,
    /// Gap to leader.
    Gap,
    /// Gap to car ahead.
    Interval,
    /// Laps completed.
    Laps,
    /// Status string.
    Status,
}

impl SortField {
    /// All columns in table order.
    pub const ALL: [SortField; 9] = [
        Self::Position,
        Self::CarNumber,
        Self::Driver,
        Self::Team,
        Self::Time,
        Self::Gap,
        Self::Interval,
        Self::Laps,
        Self::Status,
    ];

    /// Short column name used on the command line and in headers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "pos",
            Self::CarNumber => "num",
            Self::Driver => "driver",
            Self::Team => "team",
            Self::Time => "time",
            Self::Gap => "gap",
            Self::Interval => "interval",
            Self::Laps => "laps",
            Self::Status => "status",
        }
    }

    fn key(self, row: &RaceResultRow) -> SortKey<'_> {
        match self {
            Self::Position => SortKey::Number(i64::from(row.position)),
            Self::CarNumber => row
                .car_number
                .trim()
                .parse()
                .map_or(SortKey::Text(&row.car_number), SortKey::Number),
            Self::Driver => SortKey::Text(&row.driver_name),
            Self::Team => SortKey::Text(&row.team_name),
            Self::Time => SortKey::Text(&row.time),
            Self::Gap => SortKey::Text(&row.gap),
            Self::Interval => SortKey::Text(&row.interval),
            Self::Laps => SortKey::Number(i64::from(row.laps)),
            Self::Status => SortKey::Text(&row.status),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column name that matches no [`SortField`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort field '{0}'")]
pub struct ParseSortFieldError(String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| ParseSortFieldError(s.to_string()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current column and direction. No column means upstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    /// Column being sorted on.
    pub field: Option<SortField>,
    /// Direction for that column.
    pub direction: SortDirection,
}

impl SortState {
    /// Sort by `field` ascending.
    #[must_use]
    pub fn by(field: SortField) -> Self {
        Self {
            field: Some(field),
            direction: SortDirection::Ascending,
        }
    }

    /// State after the user selects `requested`.
    #[must_use]
    pub fn toggled(self, requested: SortField) -> Self {
        let (field, direction) = toggle(self.field, self.direction, requested);
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Apply this state to `rows`.
    #[must_use]
    pub fn apply(&self, rows: &[RaceResultRow]) -> Vec<RaceResultRow> {
        match self.field {
            Some(field) => sort(rows, field, self.direction),
            None => rows.to_vec(),
        }
    }
}

/// Selecting the current column flips direction; selecting another column
/// switches to it ascending.
#[must_use]
pub fn toggle(
    current_field: Option<SortField>,
    current_direction: SortDirection,
    requested: SortField,
) -> (SortField, SortDirection) {
    if current_field == Some(requested) {
        (requested, current_direction.flipped())
    } else {
        (requested, SortDirection::Ascending)
    }
}

/// Stable sort of `rows` by one column.
#[must_use]
pub fn sort(rows: &[RaceResultRow], field: SortField, direction: SortDirection) -> Vec<RaceResultRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let (a, b) = (field.key(a), field.key(b));
        match direction {
            SortDirection::Ascending => a.compare(&b),
            SortDirection::Descending => b.compare(&a),
        }
    });
    sorted
}

#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Number(i64),
    Text(&'a str),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => compare_text(a, b),
            _ => Ordering::Equal,
        }
    }
}

/// Case-folded comparison with a byte-wise tie-break, standing in for a
/// locale collation.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
