//! Remote results gateway.
//!
//! Wraps the public motor-racing results API: builds endpoint URLs, issues
//! the request through a [`Transport`], and projects the response envelope
//! onto the record the caller asked for.
//!
//! Collection reads try the preferred season first and, if that season has
//! no data yet, ask once more for the `current` alias. Only "no data"
//! triggers the second request; a transport or HTTP failure is never
//! retried.

pub mod models;
mod transport;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ResultsConfig;
use crate::error::Result;

pub use models::{
    Circuit, Constructor, ConstructorStanding, Driver, DriverStanding, Envelope, Location, Race,
    RawResult, ResultTime,
};
pub use transport::{HttpTransport, Transport};

/// Season selector used in endpoint paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// The API's alias for the most recent season with data.
    Current,
    /// A specific championship year.
    Year(u16),
}

/// A season string that is neither `current` nor a four-digit year.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid season '{0}': expected 'current' or a four-digit year")]
pub struct ParseSeasonError(String);

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("current") {
            return Ok(Self::Current);
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = s.parse() {
                return Ok(Self::Year(year));
            }
        }
        Err(ParseSeasonError(s.to_string()))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Client for the results API.
#[derive(Debug, Clone)]
pub struct ResultsGateway<T> {
    transport: T,
    base_url: String,
    format_suffix: String,
    preferred_season: Season,
}

impl<T: Transport> ResultsGateway<T> {
    /// Create a gateway from configuration.
    #[must_use]
    pub fn new(transport: T, config: &ResultsConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            format_suffix: config.format_suffix.clone(),
            preferred_season: config.preferred_season.parse().unwrap_or(Season::Current),
        }
    }

    /// Override the season tried before the `current` fallback.
    #[must_use]
    pub fn with_preferred_season(mut self, season: Season) -> Self {
        self.preferred_season = season;
        self
    }

    /// The season tried first.
    #[must_use]
    pub fn preferred_season(&self) -> Season {
        self.preferred_season
    }

    /// Full URL for a relative endpoint path such as `/2025/last/results`.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, path, self.format_suffix)
    }

    async fn fetch(&self, path: &str) -> Result<Envelope> {
        let url = self.endpoint_url(path);
        debug!("Fetching results data from: {url}");
        let value = self.transport.get_json(&url).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch `path_for(preferred)`; if `has_data` says the answer is empty,
    /// fetch `path_for(current)` once and return that instead.
    async fn fetch_with_fallback(
        &self,
        what: &str,
        path_for: impl Fn(Season) -> String,
        has_data: impl Fn(&Envelope) -> bool,
    ) -> Result<Envelope> {
        let envelope = self.fetch(&path_for(self.preferred_season)).await?;
        if has_data(&envelope) || self.preferred_season == Season::Current {
            return Ok(envelope);
        }

        info!(
            "{} {what} not found, falling back to current season",
            self.preferred_season
        );
        self.fetch(&path_for(Season::Current)).await
    }

    /// Results of the most recent race, with failures surfaced.
    ///
    /// `Ok(None)` means both the preferred and the current season had no
    /// race yet.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails or the body is not JSON.
    pub async fn try_latest_results(&self) -> Result<Option<Race>> {
        let envelope = self
            .fetch_with_fallback(
                "race results",
                |season| format!("/{season}/last/results"),
                |e| !e.mr_data.race_table.races.is_empty(),
            )
            .await?;
        Ok(envelope.mr_data.race_table.races.into_iter().next())
    }

    /// Results of the most recent race, or `None` on any failure.
    pub async fn latest_results(&self) -> Option<Race> {
        self.try_latest_results()
            .await
            .unwrap_or_else(|e| {
                error!("Error getting latest race results: {e}");
                None
            })
    }

    /// Driver championship standings, or empty on any failure.
    pub async fn driver_standings(&self) -> Vec<DriverStanding> {
        let result = self
            .fetch_with_fallback(
                "driver standings",
                |season| format!("/{season}/driverStandings"),
                |e| !e.mr_data.standings_table.standings_lists.is_empty(),
            )
            .await;
        match result {
            Ok(envelope) => envelope
                .mr_data
                .standings_table
                .standings_lists
                .into_iter()
                .next()
                .map(|list| list.driver_standings)
                .unwrap_or_default(),
            Err(e) => {
                error!("Error getting driver standings: {e}");
                Vec::new()
            }
        }
    }

    /// Constructor championship standings, or empty on any failure.
    pub async fn constructor_standings(&self) -> Vec<ConstructorStanding> {
        let result = self
            .fetch_with_fallback(
                "constructor standings",
                |season| format!("/{season}/constructorStandings"),
                |e| !e.mr_data.standings_table.standings_lists.is_empty(),
            )
            .await;
        match result {
            Ok(envelope) => envelope
                .mr_data
                .standings_table
                .standings_lists
                .into_iter()
                .next()
                .map(|list| list.constructor_standings)
                .unwrap_or_default(),
            Err(e) => {
                error!("Error getting constructor standings: {e}");
                Vec::new()
            }
        }
    }

    /// The season calendar, or empty on any failure.
    pub async fn season_schedule(&self) -> Vec<Race> {
        let result = self
            .fetch_with_fallback(
                "season data",
                |season| format!("/{season}"),
                |e| !e.mr_data.race_table.races.is_empty(),
            )
            .await;
        match result {
            Ok(envelope) => envelope.mr_data.race_table.races,
            Err(e) => {
                error!("Error getting current season: {e}");
                Vec::new()
            }
        }
    }

    /// Results of one specific race.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn race_results(&self, season: Season, round: u32) -> Result<Option<Race>> {
        let envelope = self.fetch(&format!("/{season}/{round}/results")).await?;
        Ok(envelope.mr_data.race_table.races.into_iter().next())
    }

    /// Look up a driver by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn driver_info(&self, driver_id: &str) -> Result<Option<Driver>> {
        let envelope = self.fetch(&format!("/drivers/{driver_id}")).await?;
        Ok(envelope.mr_data.driver_table.drivers.into_iter().next())
    }

    /// Look up a constructor by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn constructor_info(&self, constructor_id: &str) -> Result<Option<Constructor>> {
        let envelope = self
            .fetch(&format!("/constructors/{constructor_id}"))
            .await?;
        Ok(envelope.mr_data.constructor_table.constructors.into_iter().next())
    }
}
