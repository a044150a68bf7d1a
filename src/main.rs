//! civic-prefs binary entrypoint kept minimal. Command handling lives in `app`.

use std::fmt;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

use civic_prefs::args::{Args, determine_log_level};
use civic_prefs::error::AppError;
use civic_prefs::{app, config};

/// Log file name inside the logs directory.
const LOG_FILE_NAME: &str = "civic-prefs.log";

/// Level used until `settings.conf` has been read.
const STARTUP_LOG_LEVEL: &str = "info";

/// Handle for swapping the level filter after startup.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Log timestamp in local time.
struct LocalTimer;

impl tracing_subscriber::fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S"))
    }
}

/// Installed logging; buffered file output is flushed when this is dropped.
struct Logging {
    /// Reload handle for the level filter.
    filter: FilterHandle,
    /// `RUST_LOG` decided the filter, so config levels are not applied.
    from_env: bool,
    /// Keeps the non-blocking file writer alive.
    _guard: Option<WorkerGuard>,
}

impl Logging {
    /// Replace the level filter unless `RUST_LOG` is in charge.
    fn set_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.filter.reload(EnvFilter::new(level)) {
            tracing::warn!(error = %e, requested = level, "cannot apply configured log level");
        }
    }
}

/// Open `<logs_dir>/civic-prefs.log` for appending behind a non-blocking writer.
fn open_log_file(logs_dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(logs_dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join(LOG_FILE_NAME))?;
    Ok(tracing_appender::non_blocking(file))
}

/// Subscriber writing formatted events to `writer` behind a reloadable filter.
fn build_subscriber(
    filter: EnvFilter,
    writer: BoxMakeWriter,
    ansi: bool,
) -> (impl tracing::Subscriber + Send + Sync + 'static, FilterHandle) {
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .with_timer(LocalTimer),
    );
    (subscriber, handle)
}

/// What: Initialize tracing to `<logs_dir>/civic-prefs.log`, falling back to stderr.
///
/// Inputs:
/// - `level`: Filter used when `RUST_LOG` is unset.
///
/// Output:
/// - Installed logging; keep it alive until the process is done logging.
///
/// Details:
/// - When the log file cannot be opened, the stderr logger is installed and
///   the `AppError::Directory` cause is logged through it.
fn init_logging(level: &str) -> Logging {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let logs_dir = config::logs_dir();
    match open_log_file(&logs_dir) {
        Ok((writer, guard)) => {
            let (subscriber, filter) = build_subscriber(env_filter, BoxMakeWriter::new(writer), false);
            subscriber.init();
            tracing::info!(path = %logs_dir.display(), "logging initialized");
            Logging {
                filter,
                from_env,
                _guard: Some(guard),
            }
        }
        Err(source) => {
            let (subscriber, filter) =
                build_subscriber(env_filter, BoxMakeWriter::new(std::io::stderr), true);
            subscriber.init();
            let err = AppError::Directory {
                path: logs_dir,
                source,
            };
            tracing::warn!(error = %err, "failed to open log file; using stderr");
            Logging {
                filter,
                from_env,
                _guard: None,
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let logging = init_logging(&determine_log_level(&args, STARTUP_LOG_LEVEL));
    let settings = config::load_settings(&config::settings_path());
    logging.set_level(&determine_log_level(&args, &settings.log_level));
    tracing::info!(command = ?args.command, "civic-prefs starting");
    let code = match app::run(&args, &settings).await {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("civic-prefs: {err}");
            ExitCode::FAILURE
        }
    };
    tracing::info!("civic-prefs exited");
    drop(logging);
    code
}
