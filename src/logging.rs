use std::path::{Path, PathBuf};

use filepanel::kernel::services::adapters::ensure_log_dir;
use filepanel::kernel::services::ports::LogConfig;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn resolve_log_dir(config: &LogConfig) -> std::io::Result<PathBuf> {
    if let Some(dir) = &config.dir {
        std::fs::create_dir_all(dir)?;
        return Ok(dir.clone());
    }
    ensure_log_dir().or_else(|_| -> std::io::Result<PathBuf> {
        let dir = std::env::temp_dir().join("filepanel").join("logs");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    })
}

/// Daily rolling file log under the configured directory, filtered by
/// `RUST_LOG` or else the configured filter.
pub fn init(config: &LogConfig) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir(config).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "filepanel.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(
        log_dir = %log_dir.display(),
        filter = %config.filter,
        version = env!("CARGO_PKG_VERSION"),
        "filepanel logging initialized"
    );

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
