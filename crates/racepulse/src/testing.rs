//! Test doubles shared across module tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::gateway::Transport;

/// A request seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Default)]
struct Inner {
    replies: HashMap<String, Reply>,
    requests: Vec<RecordedRequest>,
}

/// Transport that answers from a URL table and records every call.
///
/// Unknown URLs answer 404. Clones share state so a test can keep a handle
/// after moving one into the component under test.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingTransport {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: Value) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .insert(url.to_string(), Reply::Json(body));
        self
    }

    pub fn fail_with_status(&self, url: &str, status: u16) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn answer(&self, request: RecordedRequest) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        let reply = inner.replies.get(&request.url).cloned();
        let url = request.url.clone();
        inner.requests.push(request);
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(Error::HttpStatus { url, status }),
            None => Err(Error::HttpStatus { url, status: 404 }),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.answer(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            bearer: None,
            body: None,
        })
    }

    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<Value> {
        self.answer(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            body: Some(body.clone()),
        })
    }
}

/// A classified result as the API encodes it.
pub(crate) fn raw_result(
    position: u32,
    number: &str,
    driver: (&str, &str),
    team: &str,
    laps: u32,
    status: &str,
    time: Option<&str>,
) -> Value {
    let mut result = json!({
        "number": number,
        "position": position.to_string(),
        "positionText": position.to_string(),
        "points": "0",
        "Driver": {
            "driverId": driver.1.to_lowercase(),
            "givenName": driver.0,
            "familyName": driver.1
        },
        "Constructor": {"constructorId": team.to_lowercase(), "name": team},
        "grid": "1",
        "laps": laps.to_string(),
        "status": status
    });
    if let Some(time) = time {
        result["Time"] = json!({"millis": "0", "time": time});
    }
    result
}

/// A results envelope carrying the given races.
pub(crate) fn races_envelope(races: Vec<Value>) -> Value {
    json!({"MRData": {"RaceTable": {"Races": races}}})
}

/// A race with a short, realistic result list.
pub(crate) fn sample_race(season: &str, name: &str) -> Value {
    json!({
        "season": season,
        "round": "10",
        "raceName": name,
        "Circuit": {
            "circuitId": "catalunya",
            "circuitName": "Circuit de Barcelona-Catalunya",
            "Location": {"locality": "Montmeló", "country": "Spain"}
        },
        "date": "2024-06-23",
        "time": "13:00:00Z",
        "Results": [
            raw_result(1, "1", ("Max", "Verstappen"), "Red Bull", 66, "Finished", Some("1:28:20.227")),
            raw_result(2, "4", ("Lando", "Norris"), "McLaren", 66, "Finished", Some("+2.219")),
            raw_result(3, "44", ("Lewis", "Hamilton"), "Mercedes", 66, "Finished", Some("+17.790")),
            raw_result(4, "18", ("Lance", "Stroll"), "Aston Martin", 65, "Finished", None),
            raw_result(5, "77", ("Valtteri", "Bottas"), "Sauber", 41, "Engine", None),
        ]
    })
}
