use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "server";

/// Console + daily rotating file logging
///
/// Files are named `server.YYYY-MM-DD` and only the newest `max_files` are kept.
/// The returned guard flushes the file writer on drop and must outlive the server.
pub fn init_logging(log_dir: &Path, max_files: usize, json: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(max_files.max(1))
        .build(log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let console_layer = if json {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized (dir: {}, retained files: {})", log_dir.display(), max_files);
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_creates_log_dir() {
        let dir = std::env::temp_dir().join(format!("bonkboy-logs-{}", std::process::id()));

        // Only the first subscriber in a process can be installed
        let guard = init_logging(&dir, 3, false);
        assert!(dir.is_dir());
        drop(guard);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
