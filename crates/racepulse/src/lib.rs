//! `racepulse` - Motorsport live timing, standings and chat
//!
//! This library fetches race results from an Ergast-compatible results API,
//! projects them onto a live timing table with a progress estimate, and
//! answers motorsport questions through a keyword bot or a hosted completion
//! API whose key lives in a local settings store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod series;
pub mod settings;
pub mod timing;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatSession, CompletionClient, FaqBot, Responder};
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{HttpTransport, ResultsGateway, Season, Transport};
pub use logging::init_logging;
pub use series::{Series, SeriesCatalog};
pub use settings::{MemorySettingsStore, SettingsStore, SqliteSettingsStore};
pub use timing::{LiveBoard, RaceResultRow, SortField};
