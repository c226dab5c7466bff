//! Tracing setup driven by the `logging` config section.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::StaticConfig;

/// Install the global tracing subscriber.
///
/// The returned guard owns the background log writer; drop it only at
/// process exit or buffered lines are lost.
///
/// # Panics
/// Panics if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &StaticConfig) -> WorkerGuard {
    let log_file = config
        .logging
        .file
        .as_deref()
        .filter(|path| !path.is_empty());

    let (writer, guard) = tracing_appender::non_blocking(open_writer(config, log_file));

    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(EnvFilter::new(config.logging.level.clone()))
        .with_level(true)
        // 彩色输出只在没配日志文件时开
        .with_ansi(log_file.is_none());

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    guard
}

fn open_writer(config: &StaticConfig, log_file: Option<&str>) -> Box<dyn Write + Send + Sync> {
    let Some(path) = log_file else {
        return Box::new(std::io::stdout());
    };

    if config.logging.enable_rotation {
        let dir = Path::new(path).parent().unwrap_or(Path::new("."));
        let filename = Path::new(path)
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("afflink.log");
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.logging.max_backups as usize)
            .build(dir)
            .expect("Failed to create rolling log appender");
        Box::new(appender)
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Failed to open log file");
        Box::new(file)
    }
}
