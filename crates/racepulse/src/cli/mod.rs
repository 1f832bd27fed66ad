//! Command-line interface for racepulse.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ChatCommand, ConfigCommand, LookupCommand, RaceCommand, ScheduleCommand, SeriesCommand,
    SettingsCommand, StandingsCommand, TimingCommand,
};

/// racepulse - Motorsport live timing, standings and chat in the terminal
///
/// Follows the latest race result from a public results API, browses
/// championship standings, and answers motorsport questions.
#[derive(Debug, Parser)]
#[command(name = "racepulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the live timing table for the latest race
    Timing(TimingCommand),

    /// Show championship standings
    #[command(subcommand)]
    Standings(StandingsCommand),

    /// Show the season calendar
    Schedule(ScheduleCommand),

    /// Show the results of one race
    Race(RaceCommand),

    /// Look up a driver
    Driver(LookupCommand),

    /// Look up a constructor
    Constructor(LookupCommand),

    /// Browse the built-in series dataset
    Series(SeriesCommand),

    /// Ask the motorsport assistant a question
    Chat(ChatCommand),

    /// Manage stored settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
