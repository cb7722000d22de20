use anyhow::{Context, Result};
use arnscan::backend::{catalogue_registry, format_api_error, ApiHttpClient};
use arnscan::{Arn, Config, Credentials, EnumerateError, DEFAULT_ARN};
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Enumerate the cloud resources an ARN pattern denotes
#[derive(Parser, Debug)]
#[command(name = "arnscan", version, about, long_about = None)]
struct Args {
    /// Locator, e.g. `arn:aws:ec2:us-*:*:instance|data.State.Name`
    #[arg(default_value = DEFAULT_ARN)]
    arn: String,

    /// Config file (defaults to $ARNSCAN_CONFIG or the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inventory API endpoint, overrides the config file
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Bearer token used for every account
    #[arg(long)]
    token: Option<String>,

    /// Enumerate up to N branches concurrently (output order unspecified)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Stop at the first failed branch
    #[arg(long)]
    fail_fast: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
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

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("arnscan started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("arnscan").join("arnscan.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".arnscan").join("arnscan.log");
    }
    PathBuf::from("arnscan.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every branch succeeded
async fn run(args: Args) -> Result<bool> {
    let _log_guard = setup_logging(args.log_level)?;

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| config.endpoint.clone())
        .context("No inventory endpoint configured. Set `endpoint` in the config file or use --endpoint")?;
    let client = ApiHttpClient::new(&endpoint)?;
    let registry = Arc::new(catalogue_registry(&client));

    let mut arn = Arn::new(&args.arn, registry, &config)?;
    if let Some(token) = args.token.clone() {
        arn = arn.with_credentials(Credentials::new(token));
    }
    tracing::info!("Enumerating {} against {}", arn, endpoint);

    let mut resources = match args.concurrency {
        Some(limit) => arn.iter_unordered(limit),
        None => arn.iter(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let (mut found, mut failed) = (0usize, 0usize);

    while let Some(result) = resources.next().await {
        match result {
            Ok(resource) => {
                found += 1;
                let record = resource.to_json();
                let output = match arn.query() {
                    Some(query) => match query.apply(&record) {
                        Ok(output) => output,
                        Err(e) => {
                            tracing::warn!("Filtering {} failed: {}", resource.arn, e);
                            eprintln!("{}: {}", resource.arn, e);
                            None
                        }
                    },
                    None => Some(record),
                };
                if let Some(output) = output {
                    writeln!(out, "{}", output)?;
                }
            }
            Err(err) => {
                failed += 1;
                match &err {
                    EnumerateError::Backend { source, .. } => {
                        eprintln!("{}: {}", err, format_api_error(&**source))
                    }
                    _ => eprintln!("{}", err),
                }
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    tracing::info!("Enumerated {} resources, {} failed branches", found, failed);
    Ok(failed == 0)
}
