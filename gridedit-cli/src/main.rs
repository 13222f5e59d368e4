mod error;
mod render;
mod script;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gridedit_lib::filter::FilterMode;
use gridedit_lib::model::TableSnapshot;
use gridedit_lib::{ApplyClient, EditableGrid, GridConfig, GridOutcome};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::CliError;
use crate::script::ScriptEvent;

/// Replay cell edits and filter input against a table and persist the changes.
#[derive(Debug, Parser)]
#[command(name = "gridedit", version)]
struct Args {
    /// Table snapshot (JSON: name, columns, rows, filters).
    #[arg(long)]
    table: PathBuf,

    /// Gesture script (JSON array of events).
    #[arg(long)]
    events: PathBuf,

    /// Base URL of the server hosting the persistence endpoint.
    #[arg(long)]
    url: String,

    /// Endpoint path, relative to the base URL.
    #[arg(long, default_value = gridedit_lib::DEFAULT_ENDPOINT_PATH)]
    endpoint: String,

    /// Show a row only if every non-empty filter matches it.
    #[arg(long)]
    combined_filters: bool,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write the final table snapshot here.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "gridedit.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Debug)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Args {
    fn config(&self) -> GridConfig {
        let mut config = GridConfig::default().with_endpoint_path(self.endpoint.clone());
        if self.combined_filters {
            config = config.with_filter_mode(FilterMode::Combined);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let log_file = File::create(&args.log_file).map_err(|source| CliError::Write {
        path: args.log_file.clone(),
        source,
    })?;
    WriteLogger::init(args.log_level.into(), Config::default(), log_file)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Replay the script and print one line per write, then the visible rows.
async fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let snapshot: TableSnapshot = read_json(&args.table)?;
    let events: Vec<ScriptEvent> = read_json(&args.events)?;
    let config = args.config();
    info!(
        "Loaded '{}' ({} rows, {} filters), {} events",
        snapshot.name,
        snapshot.rows.len(),
        snapshot.filters.len(),
        events.len()
    );

    let client = ApplyClient::builder()
        .url(args.url.as_str())
        .config(&config)
        .build()?;
    info!("Posting changes to {}", client.endpoint());

    let mut grid = EditableGrid::new(snapshot.to_table()?, client).with_config(&config);
    let controls = snapshot
        .filters
        .iter()
        .map(|column| grid.add_filter(*column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut writes = Vec::new();
    for (index, event) in events.iter().enumerate() {
        let event = event
            .resolve(grid.table(), &controls)
            .map_err(|source| CliError::Script { index, source })?;
        debug!("Event {}: {:?}", index, event);

        match grid
            .handle(event)
            .map_err(|source| CliError::Event { index, source })?
        {
            GridOutcome::Committed(write) => writes.push(write),
            GridOutcome::Filtered(outcome) => {
                debug!("{} rows visible, {} hidden", outcome.visible, outcome.hidden)
            }
            _ => {}
        }
    }

    for write in writes {
        let change = write.change().clone();
        match write.wait().await {
            Ok(response) => match response.error {
                Some(reason) => writeln!(out, "applied  {} (endpoint reported: {})", change, reason)?,
                None => writeln!(out, "applied  {}", change)?,
            },
            Err(e) => writeln!(out, "failed   {}: {}", change, e)?,
        }
    }

    write!(out, "{}", render::render_visible(grid.table()))?;

    if let Some(path) = &args.output {
        let mut out = grid.table().snapshot();
        out.filters = snapshot.filters.clone();
        let json = serde_json::to_string_pretty(&out).map_err(|source| CliError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
