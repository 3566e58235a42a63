use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{Key, SearchApp};
use crate::config::{self, Config, ConfigError};
use crate::dataset::{self, DatasetSource};
use crate::history::HistoryStore;
use crate::kv_store::{KeyValueStore, SqliteStore, StoreError};
use crate::logging::{self, LoggingError};
use crate::render::{RenderSink, TerminalSink};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cardsearch", about = "Search a card catalogue from the terminal")]
pub struct CliArgs {
    /// Path to config.toml; defaults to the app data directory.
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,

    /// Dataset path or http(s) URL, overriding the config file.
    #[arg(long = "data")]
    pub dataset_source: Option<String>,

    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// One line of terminal input, mapped onto the triggers the coordinator knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(String),
    Enter,
    Search,
    History(usize),
    ClearHistory,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Input(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("enter"), None) => Command::Enter,
        (Some("search"), None) => Command::Search,
        (Some("history"), Some(position)) => match position.parse::<usize>() {
            Ok(position) if position > 0 => Command::History(position),
            _ => Command::Unknown(line.to_string()),
        },
        (Some("clear-history"), None) => Command::ClearHistory,
        (Some("quit"), None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub fn resolve_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let mut cfg = config::read(args.config_path.as_deref())?;
    if !cfg.config_path.exists() {
        config::save(&cfg)?;
    }

    if let Some(source) = &args.dataset_source {
        cfg.dataset_source = source.clone();
    }
    if let Some(debounce_ms) = args.debounce_ms {
        cfg.debounce_ms = debounce_ms;
    }
    config::validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub async fn run(args: CliArgs) -> Result<(), RuntimeError> {
    let cfg = resolve_config(&args)?;
    logging::init(&cfg)?;
    tracing::info!(
        config_path = %cfg.config_path.display(),
        dataset_source = %cfg.dataset_source,
        debounce_ms = cfg.debounce_ms,
        "startup"
    );

    let history = HistoryStore::new(SqliteStore::open_session()?);
    let sink = TerminalSink::new(std::io::stdout());
    let app = SearchApp::new(Duration::from_millis(cfg.debounce_ms), history, sink);

    let source = DatasetSource::parse(&cfg.dataset_source);
    event_loop(app, source).await
}

async fn event_loop<S, K>(mut app: SearchApp<S, K>, source: DatasetSource) -> Result<(), RuntimeError>
where
    S: RenderSink,
    K: KeyValueStore,
{
    let load = dataset::fetch(&source);
    tokio::pin!(load);
    let mut loading = true;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = app.pending_deadline();
        let sleep_until = deadline
            .map(tokio::time::Instant::from_std)
            .unwrap_or_else(|| tokio::time::Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            result = &mut load, if loading => {
                loading = false;
                app.finish_load(result);
            }
            _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                app.tick(Instant::now());
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("stdin closed; shutting down");
                    return Ok(());
                };
                if !dispatch(&mut app, parse_command(&line)) {
                    tracing::info!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}

/// Returns false once the user asked to quit.
fn dispatch<S: RenderSink, K: KeyValueStore>(app: &mut SearchApp<S, K>, command: Command) -> bool {
    match command {
        Command::Input(text) => app.input_changed(&text, Instant::now()),
        Command::Enter => {
            app.key_pressed(Key::Enter);
        }
        Command::Search => {
            app.submit();
        }
        Command::History(position) => {
            if app.select_history(position).is_none() {
                tracing::debug!(position, "history selection did not run a search");
            }
        }
        Command::ClearHistory => app.clear_history(),
        Command::Quit => return false,
        Command::Unknown(line) => tracing::warn!(%line, "unknown command"),
    }
    true
}
