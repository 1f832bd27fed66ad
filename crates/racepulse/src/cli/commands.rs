//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::gateway::Season;
use crate::timing::SortField;

/// Live timing command arguments.
#[derive(Debug, Args)]
pub struct TimingCommand {
    /// Sort column; repeat the same column to flip direction
    /// (pos, num, driver, team, time, gap, interval, laps, status)
    #[arg(short, long = "sort", value_name = "FIELD")]
    pub sort: Vec<SortField>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Keep refreshing until interrupted
    #[arg(short, long, conflicts_with = "json")]
    pub watch: bool,
}

/// Championship standings commands.
#[derive(Debug, Subcommand)]
pub enum StandingsCommand {
    /// Drivers' championship
    Drivers {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Constructors' championship
    Constructors {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Season schedule arguments.
#[derive(Debug, Args)]
pub struct ScheduleCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Single race lookup arguments.
#[derive(Debug, Args)]
pub struct RaceCommand {
    /// Season year or "current"
    pub season: Season,

    /// Round number within the season
    pub round: u32,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Driver or constructor lookup arguments.
#[derive(Debug, Args)]
pub struct LookupCommand {
    /// API identifier, e.g. "max_verstappen" or "red_bull"
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Series browser arguments.
#[derive(Debug, Args)]
pub struct SeriesCommand {
    /// Series slug; omit to list all series
    pub slug: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Chat command arguments.
#[derive(Debug, Args)]
pub struct ChatCommand {
    /// Answer from the built-in FAQ instead of the completion API
    #[arg(long)]
    pub offline: bool,

    /// The question to ask
    #[arg(required = true, num_args = 1.., value_name = "MESSAGE")]
    pub message: Vec<String>,
}

impl ChatCommand {
    /// The message words joined back into one question.
    #[must_use]
    pub fn question(&self) -> String {
        self.message.join(" ")
    }
}

/// Settings commands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Store the completion API key
    SetKey {
        /// The API key
        key: String,
    },

    /// Show stored settings (the key is masked)
    Show,

    /// Remove the stored API key
    Clear,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_question_joins_words() {
        let cmd = ChatCommand {
            offline: true,
            message: vec!["who".into(), "won".into(), "monaco?".into()],
        };
        assert_eq!(cmd.question(), "who won monaco?");
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: true };
        let debug = format!("{cmd:?}");
        assert!(debug.contains("Show"));
    }
}
