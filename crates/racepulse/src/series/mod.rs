//! Built-in racing series dataset.
//!
//! A fixed snapshot of eight championships compiled into the binary. It is
//! not refreshed from any API.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BUILTIN_SERIES: &str = include_str!("../../data/series.json");

/// A driver's championship position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEntry {
    /// Championship position.
    pub position: u32,
    /// Driver or crew name.
    pub driver: String,
    /// Team name.
    pub team: String,
    /// Points scored.
    pub points: u32,
}

/// A team's championship position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    /// Championship position.
    pub position: u32,
    /// Team name.
    pub team: String,
    /// Points scored.
    pub points: u32,
}

/// One championship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// URL-style identifier, e.g. `formula-1`.
    pub slug: String,
    /// Short name.
    pub name: String,
    /// Official name.
    pub full_name: String,
    /// One-paragraph description.
    pub description: String,
    /// Reigning drivers' champion.
    pub current_champion: String,
    /// Reigning teams' champion.
    pub constructor_champion: String,
    /// Next event.
    pub next_race: String,
    /// How points are awarded.
    pub point_system: String,
    /// Top drivers.
    pub standings: Vec<DriverEntry>,
    /// Top teams.
    pub team_standings: Vec<TeamEntry>,
}

/// Lookup over a list of series.
#[derive(Debug, Clone)]
pub struct SeriesCatalog {
    series: Vec<Series>,
}

impl SeriesCatalog {
    /// Load the compiled-in dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON does not parse.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SERIES)
    }

    /// Parse a catalog from a JSON array of series.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid series array.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            series: serde_json::from_str(json)?,
        })
    }

    /// All series in display order.
    #[must_use]
    pub fn list(&self) -> &[Series] {
        &self.series
    }

    /// Find a series by slug, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSeries`] when no series has that slug.
    pub fn get(&self, slug: &str) -> Result<&Series> {
        let slug = slug.trim();
        self.series
            .iter()
            .find(|series| series.slug.eq_ignore_ascii_case(slug))
            .ok_or_else(|| Error::UnknownSeries(slug.to_string()))
    }
}
