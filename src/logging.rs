use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "apply-schema.log";

/// Holds the file writer thread. Dropping it flushes pending lines, so keep
/// it alive until the run has finished.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber. Log lines go to stderr, leaving stdout for
/// the result line the operator reads. Returns a guard when file logging is
/// enabled and its directory could be created.
pub fn init_tracing(config: &LogConfig) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file_writer = if config.file_enabled {
        match std::fs::create_dir_all(&config.dir) {
            Ok(()) => Some(tracing_appender::non_blocking(RollingFileAppender::new(
                Rotation::DAILY,
                &config.dir,
                LOG_FILE_PREFIX,
            ))),
            Err(err) => {
                eprintln!("failed to create log directory {}: {err}", config.dir.display());
                None
            }
        }
    } else {
        None
    };

    let Some((writer, guard)) = file_writer else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return None;
    };

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::debug!(dir = %config.dir.display(), "file logging enabled");
    Some(FileLogGuard { _guard: guard })
}
