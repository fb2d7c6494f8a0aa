//! Process-wide tracing setup.
//!
//! Console output is filtered by `RUST_LOG` (default `info`). On disk each
//! run writes into a dated folder:
//!
//! ```text
//! <log_dir>/YYYY-MM-DD/
//!     ALL.log      every event at debug and above
//!     DEBUG.log    debug only
//!     INFO.log     info only
//!     WARNING.log  warn only
//!     ERROR.log    error
//! ```

use std::path::{Path, PathBuf};

use time::{Date, OffsetDateTime};
use tracing::{Level, Metadata};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{filter_fn, FilterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::error::ServerError;

const FILE_FILTER: &str = "info,kennel_core=debug,kennel=debug,tower_http=debug";

/// Which events a log file keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelSelect {
    All,
    Exactly(Level),
    AtLeast(Level),
}

impl LevelSelect {
    fn accepts(self, level: &Level) -> bool {
        match self {
            Self::All => true,
            Self::Exactly(wanted) => *level == wanted,
            // `Level` orders by verbosity: ERROR is the smallest.
            Self::AtLeast(floor) => *level <= floor,
        }
    }
}

const LOG_FILES: [(&str, LevelSelect); 5] = [
    ("ALL.log", LevelSelect::All),
    ("DEBUG.log", LevelSelect::Exactly(Level::DEBUG)),
    ("INFO.log", LevelSelect::Exactly(Level::INFO)),
    ("WARNING.log", LevelSelect::Exactly(Level::WARN)),
    ("ERROR.log", LevelSelect::AtLeast(Level::ERROR)),
];

/// Flushes the file writers on drop; keep alive until the process exits.
#[must_use]
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

/// `<log_dir>/YYYY-MM-DD` for the given day.
fn dated_dir(log_dir: &Path, day: Date) -> PathBuf {
    log_dir.join(format!(
        "{:04}-{:02}-{:02}",
        day.year(),
        u8::from(day.month()),
        day.day()
    ))
}

/// Install the global subscriber.
pub fn init(log_dir: &Path) -> Result<LogGuards, ServerError> {
    let dir = dated_dir(log_dir, OffsetDateTime::now_utc().date());
    std::fs::create_dir_all(&dir)?;

    let mut guards = Vec::with_capacity(LOG_FILES.len());
    let mut file_layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> =
        Vec::with_capacity(LOG_FILES.len());

    for (file_name, select) in LOG_FILES {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(&dir)
            .map_err(|e| ServerError::Telemetry(e.to_string()))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        let level_filter = filter_fn(move |meta: &Metadata<'_>| select.accepts(meta.level()));
        file_layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_FILTER).and(level_filter))
                .boxed(),
        );
    }

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(file_layers)
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .try_init()
        .map_err(|e| ServerError::Telemetry(e.to_string()))?;

    tracing::info!(log_dir = %dir.display(), "logging initialized");
    Ok(LogGuards(guards))
}
