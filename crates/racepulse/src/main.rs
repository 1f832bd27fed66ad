//! `racepulse` - CLI for motorsport live timing, standings and chat
//!
//! This binary wires the library's gateway, live board, settings store and
//! chat responders to terminal output.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};

use racepulse::chat::{ChatSession, CompletionClient, FaqBot, Responder};
use racepulse::cli::render;
use racepulse::cli::{
    ChatCommand, Cli, Command, ConfigCommand, LookupCommand, RaceCommand, SeriesCommand,
    SettingsCommand, StandingsCommand, TimingCommand,
};
use racepulse::settings::{load_api_key, store_api_key, API_KEY_SETTING};
use racepulse::{
    init_logging, Config, HttpTransport, LiveBoard, ResultsGateway, SeriesCatalog, SettingsStore,
    SqliteSettingsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validating a file must not depend on the default config loading cleanly
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return Ok(handle_validate(file.clone().or_else(|| cli.config.clone())));
    }

    let config = Config::load_from(cli.config.clone())?;
    debug!("Configuration loaded");

    match cli.command {
        Command::Timing(cmd) => handle_timing(&config, &cmd).await,
        Command::Standings(cmd) => handle_standings(&config, &cmd).await,
        Command::Schedule(cmd) => {
            let races = gateway(&config)?.season_schedule().await;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&races)?);
            } else {
                println!("{}", render::render_schedule(&races));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Race(cmd) => handle_race(&config, &cmd).await,
        Command::Driver(cmd) => handle_driver(&config, &cmd).await,
        Command::Constructor(cmd) => handle_constructor(&config, &cmd).await,
        Command::Series(cmd) => handle_series(&cmd),
        Command::Chat(cmd) => handle_chat(&config, &cmd).await,
        Command::Settings(cmd) => handle_settings(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, &cmd),
    }
}

fn gateway(config: &Config) -> anyhow::Result<ResultsGateway<HttpTransport>> {
    Ok(ResultsGateway::new(HttpTransport::new()?, &config.results))
}

fn open_settings(config: &Config) -> anyhow::Result<Arc<dyn SettingsStore>> {
    let path = config.database_path();
    let store = SqliteSettingsStore::open(&path)
        .with_context(|| format!("failed to open settings at {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn handle_timing(config: &Config, cmd: &TimingCommand) -> anyhow::Result<ExitCode> {
    let board = LiveBoard::new(gateway(config)?, config.staleness_window());
    for field in &cmd.sort {
        board.sort_by(*field).await;
    }

    if cmd.watch {
        return watch(config, &board).await;
    }

    let refreshed = board.refresh().await;
    let view = board.view(Utc::now()).await;
    if cmd.json {
        println!("{}", render::board_json(&view)?);
    } else {
        println!("{}", render::render_board(&view));
    }

    Ok(if refreshed.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn watch(config: &Config, board: &LiveBoard<HttpTransport>) -> anyhow::Result<ExitCode> {
    let mut ticker = tokio::time::interval(config.watch_interval());
    info!(
        "Watching live timing every {}s",
        config.watch_interval().as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Failures land in the board's error state.
                if let Err(e) = board.refresh_if_stale(Utc::now()).await {
                    debug!("Refresh failed: {e}");
                }
                let view = board.view(Utc::now()).await;
                print!("\x1b[2J\x1b[H");
                println!("{}", render::render_board(&view));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(ExitCode::SUCCESS);
            }
        }
    }
}

async fn handle_standings(config: &Config, cmd: &StandingsCommand) -> anyhow::Result<ExitCode> {
    let gateway = gateway(config)?;
    match cmd {
        StandingsCommand::Drivers { json } => {
            let standings = gateway.driver_standings().await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                println!("{}", render::render_driver_standings(&standings));
            }
        }
        StandingsCommand::Constructors { json } => {
            let standings = gateway.constructor_standings().await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                println!("{}", render::render_constructor_standings(&standings));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_race(config: &Config, cmd: &RaceCommand) -> anyhow::Result<ExitCode> {
    let race = gateway(config)?
        .race_results(cmd.season, cmd.round)
        .await?;
    let Some(race) = race else {
        eprintln!("No results for round {} of {}.", cmd.round, cmd.season);
        return Ok(ExitCode::FAILURE);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&race)?);
    } else {
        println!("{}", render::render_race(&race));
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_driver(config: &Config, cmd: &LookupCommand) -> anyhow::Result<ExitCode> {
    let Some(driver) = gateway(config)?.driver_info(&cmd.id).await? else {
        eprintln!("No driver found with id '{}'.", cmd.id);
        return Ok(ExitCode::FAILURE);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&driver)?);
    } else {
        println!("{}", render::render_driver(&driver));
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_constructor(config: &Config, cmd: &LookupCommand) -> anyhow::Result<ExitCode> {
    let Some(constructor) = gateway(config)?.constructor_info(&cmd.id).await? else {
        eprintln!("No constructor found with id '{}'.", cmd.id);
        return Ok(ExitCode::FAILURE);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&constructor)?);
    } else {
        println!("{}", render::render_constructor(&constructor));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_series(cmd: &SeriesCommand) -> anyhow::Result<ExitCode> {
    let catalog = SeriesCatalog::builtin()?;
    match &cmd.slug {
        Some(slug) => {
            let series = catalog.get(slug)?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(series)?);
            } else {
                println!("{}", render::render_series(series));
            }
        }
        None => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(catalog.list())?);
            } else {
                println!("{}", render::render_series_list(catalog.list()));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn ask<R: Responder>(responder: R, question: &str) -> Option<String> {
    let mut session = ChatSession::new(responder);
    session.send(question).await.map(|reply| reply.text.clone())
}

async fn handle_chat(config: &Config, cmd: &ChatCommand) -> anyhow::Result<ExitCode> {
    let question = cmd.question();
    let reply = if cmd.offline {
        ask(FaqBot::new(), &question).await
    } else {
        let client = CompletionClient::new(
            HttpTransport::new()?,
            open_settings(config)?,
            config.completion.clone(),
        );
        ask(client, &question).await
    };

    match reply {
        Some(reply) => {
            println!("{reply}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Nothing to ask: the message is blank.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_settings(config: &Config, cmd: &SettingsCommand) -> anyhow::Result<ExitCode> {
    let store = open_settings(config)?;
    match cmd {
        SettingsCommand::SetKey { key } => {
            store_api_key(store.as_ref(), key)?;
            println!("API key saved.");
        }
        SettingsCommand::Show => {
            println!("Settings database: {}", config.database_path().display());
            match load_api_key(store.as_ref())? {
                Some(key) => println!("API key:           {}", render::mask_secret(&key)),
                None => println!("API key:           not set"),
            }
        }
        SettingsCommand::Clear => {
            if store.remove(API_KEY_SETTING)? {
                println!("API key removed.");
            } else {
                println!("No API key was stored.");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_validate(file: Option<std::path::PathBuf>) -> ExitCode {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Configuration error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Results]");
                println!("  Base URL:           {}", config.results.base_url);
                println!("  Format suffix:      {}", config.results.format_suffix);
                println!("  Preferred season:   {}", config.preferred_season());
                println!();
                println!("[Completion]");
                println!("  Endpoint:           {}", config.completion.endpoint);
                println!("  Model:              {}", config.completion.model);
                println!("  Temperature:        {}", config.completion.temperature);
                println!("  Max tokens:         {}", config.completion.max_tokens);
                println!();
                println!("[Timing]");
                println!("  Staleness (secs):   {}", config.timing.staleness_secs);
                println!("  Watch every (secs): {}", config.timing.watch_interval_secs);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            return Ok(handle_validate(file.clone()));
        }
    }
    Ok(ExitCode::SUCCESS)
}
