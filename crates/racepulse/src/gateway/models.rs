//! Response models for the results API.
//!
//! The API wraps every payload in an `MRData` envelope and encodes most
//! numbers as strings. Every field defaults when absent so that an
//! unexpected shape degrades to empty values instead of failing the parse.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts a string, number or bool and yields it as a string; anything
/// else (null, arrays, objects) becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Top-level response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// The wrapped payload.
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

/// Payload tables. Only the table matching the endpoint is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrData {
    /// Races with optional results.
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
    /// Championship standings.
    #[serde(rename = "StandingsTable")]
    pub standings_table: StandingsTable,
    /// Driver records.
    #[serde(rename = "DriverTable")]
    pub driver_table: DriverTable,
    /// Constructor records.
    #[serde(rename = "ConstructorTable")]
    pub constructor_table: ConstructorTable,
}

/// Races table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceTable {
    /// Races in round order.
    #[serde(rename = "Races")]
    pub races: Vec<Race>,
}

/// A single race, optionally carrying its result list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Race {
    /// Season year.
    #[serde(deserialize_with = "lenient_string")]
    pub season: String,
    /// Round within the season.
    #[serde(deserialize_with = "lenient_string")]
    pub round: String,
    /// Display name, e.g. "Spanish Grand Prix".
    pub race_name: String,
    /// Where the race is held.
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    /// Scheduled date, `YYYY-MM-DD`.
    pub date: String,
    /// Scheduled start time, `HH:MM:SSZ`, when published.
    pub time: Option<String>,
    /// Classified results; empty for schedule entries.
    #[serde(rename = "Results")]
    pub results: Vec<RawResult>,
}

/// Circuit record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Circuit {
    /// Stable identifier.
    pub circuit_id: String,
    /// Display name.
    pub circuit_name: String,
    /// Geographic location.
    #[serde(rename = "Location")]
    pub location: Location,
}

/// Circuit location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Town or city.
    pub locality: String,
    /// Country name.
    pub country: String,
}

/// One classified entrant in a race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawResult {
    /// Car number.
    #[serde(deserialize_with = "lenient_string")]
    pub number: String,
    /// Classified position, 1-based.
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    /// Position as displayed ("R" for retired, etc).
    pub position_text: String,
    /// Points scored.
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    /// Driver record.
    #[serde(rename = "Driver")]
    pub driver: Driver,
    /// Constructor record.
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    /// Starting grid slot.
    #[serde(deserialize_with = "lenient_string")]
    pub grid: String,
    /// Laps completed.
    #[serde(deserialize_with = "lenient_string")]
    pub laps: String,
    /// Finishing status, "Finished" or a retirement reason.
    pub status: String,
    /// Race time or gap to the winner; absent for lapped and retired cars.
    #[serde(rename = "Time")]
    pub time: Option<ResultTime>,
}

/// Finishing time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultTime {
    /// Total race time in milliseconds, as a string.
    #[serde(deserialize_with = "lenient_string")]
    pub millis: String,
    /// Display time: full race time for the winner, "+N.NNN" for the rest.
    pub time: String,
}

/// Driver record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Driver {
    /// Stable identifier, e.g. "max_verstappen".
    pub driver_id: String,
    /// Permanent car number.
    pub permanent_number: Option<String>,
    /// Three-letter code.
    pub code: Option<String>,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Nationality.
    pub nationality: String,
    /// Reference URL.
    pub url: String,
}

impl Driver {
    /// "given family" display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }
}

/// Constructor (team) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constructor {
    /// Stable identifier, e.g. "red_bull".
    pub constructor_id: String,
    /// Display name.
    pub name: String,
    /// Nationality.
    pub nationality: String,
    /// Reference URL.
    pub url: String,
}

/// Standings table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsTable {
    /// Season the standings belong to.
    #[serde(deserialize_with = "lenient_string")]
    pub season: String,
    /// One list per requested round; the API returns at most one here.
    #[serde(rename = "StandingsLists")]
    pub standings_lists: Vec<StandingsList>,
}

/// Standings after a given round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsList {
    /// Season year.
    #[serde(deserialize_with = "lenient_string")]
    pub season: String,
    /// Round the standings were computed after.
    #[serde(deserialize_with = "lenient_string")]
    pub round: String,
    /// Driver championship.
    #[serde(rename = "DriverStandings")]
    pub driver_standings: Vec<DriverStanding>,
    /// Constructor championship.
    #[serde(rename = "ConstructorStandings")]
    pub constructor_standings: Vec<ConstructorStanding>,
}

/// Driver championship entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverStanding {
    /// Championship position.
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    /// Points total.
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    /// Race wins.
    #[serde(deserialize_with = "lenient_string")]
    pub wins: String,
    /// Driver record.
    #[serde(rename = "Driver")]
    pub driver: Driver,
    /// Teams driven for this season.
    #[serde(rename = "Constructors")]
    pub constructors: Vec<Constructor>,
}

/// Constructor championship entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstructorStanding {
    /// Championship position.
    #[serde(deserialize_with = "lenient_string")]
    pub position: String,
    /// Points total.
    #[serde(deserialize_with = "lenient_string")]
    pub points: String,
    /// Race wins.
    #[serde(deserialize_with = "lenient_string")]
    pub wins: String,
    /// Constructor record.
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

/// Drivers table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverTable {
    /// Matching drivers.
    #[serde(rename = "Drivers")]
    pub drivers: Vec<Driver>,
}

/// Constructors table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorTable {
    /// Matching constructors.
    #[serde(rename = "Constructors")]
    pub constructors: Vec<Constructor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_race_result_envelope() {
        let value = json!({
            "MRData": {
                "RaceTable": {
                    "season": "2024",
                    "Races": [{
                        "season": "2024",
                        "round": "10",
                        "raceName": "Spanish Grand Prix",
                        "Circuit": {
                            "circuitId": "catalunya",
                            "circuitName": "Circuit de Barcelona-Catalunya",
                            "Location": {"locality": "Montmeló", "country": "Spain"}
                        },
                        "date": "2024-06-23",
                        "time": "13:00:00Z",
                        "Results": [{
                            "number": "1",
                            "position": "1",
                            "positionText": "1",
                            "points": "25",
                            "Driver": {"driverId": "max_verstappen", "givenName": "Max", "familyName": "Verstappen"},
                            "Constructor": {"constructorId": "red_bull", "name": "Red Bull"},
                            "grid": "2",
                            "laps": "66",
                            "status": "Finished",
                            "Time": {"millis": "5307532", "time": "1:28:20.227"}
                        }]
                    }]
                }
            }
        });

        let envelope: Envelope = serde_json::from_value(value).unwrap();
        let race = &envelope.mr_data.race_table.races[0];
        assert_eq!(race.race_name, "Spanish Grand Prix");
        assert_eq!(race.circuit.circuit_name, "Circuit de Barcelona-Catalunya");
        assert_eq!(race.time.as_deref(), Some("13:00:00Z"));

        let result = &race.results[0];
        assert_eq!(result.driver.full_name(), "Max Verstappen");
        assert_eq!(result.constructor.name, "Red Bull");
        assert_eq!(result.time.as_ref().unwrap().time, "1:28:20.227");
    }

    #[test]
    fn test_missing_tables_default_to_empty() {
        let envelope: Envelope = serde_json::from_value(json!({"MRData": {}})).unwrap();
        assert!(envelope.mr_data.race_table.races.is_empty());
        assert!(envelope.mr_data.standings_table.standings_lists.is_empty());

        let envelope: Envelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.mr_data.driver_table.drivers.is_empty());
    }

    #[test]
    fn test_numbers_accepted_where_strings_expected() {
        let result: RawResult = serde_json::from_value(json!({
            "number": 44,
            "position": 3,
            "laps": 57,
            "status": "Finished"
        }))
        .unwrap();

        assert_eq!(result.number, "44");
        assert_eq!(result.position, "3");
        assert_eq!(result.laps, "57");
    }

    #[test]
    fn test_null_string_field_becomes_empty() {
        let result: RawResult = serde_json::from_value(json!({"number": null})).unwrap();
        assert_eq!(result.number, "");
        assert!(result.time.is_none());
    }

    #[test]
    fn test_driver_full_name_trims_missing_parts() {
        let driver = Driver {
            family_name: "Zhou".to_string(),
            ..Driver::default()
        };
        assert_eq!(driver.full_name(), "Zhou");
    }
}
