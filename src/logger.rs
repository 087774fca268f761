//! Custom logging module.
//!
//! Log records are formatted and queued in memory. The render loop drains the
//! queue into the state so the log panel can show them; nothing is written to
//! the terminal while the UI owns it.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records kept while nobody drains the queue.
///
const MAX_QUEUED: usize = 1000;

/// Prefix of log targets belonging to this crate.
///
const CRATE_TARGET: &str = "spotify_albums_tui";

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    let target = record
        .target()
        .strip_prefix(CRATE_TARGET)
        .map(|rest| rest.trim_start_matches("::"))
        .unwrap_or_else(|| record.target());
    if target.is_empty() {
        format!("{} {} {}", timestamp, level_str, record.args())
    } else {
        format!("{} {} [{}] {}", timestamp, level_str, target, record.args())
    }
}

/// Logger that queues formatted records for the log panel.
///
pub struct CustomLogger {
    level: LevelFilter,
    queue: Mutex<VecDeque<String>>,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger {
            level,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Register a logger with the given verbosity as the global logger.
    ///
    pub fn install(level: LevelFilter) -> Result<&'static CustomLogger, AppError> {
        let logger: &'static CustomLogger = Box::leak(Box::new(CustomLogger::new(level)));
        log::set_logger(logger).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(logger)
    }

    /// Take every queued entry, oldest first.
    ///
    pub fn drain(&self) -> Vec<String> {
        match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => vec![],
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Dependencies only get through with warnings and errors
        metadata.level() <= self.level
            && (metadata.target().starts_with(CRATE_TARGET) || metadata.level() <= Level::Warn)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(format_log(record));
            while queue.len() > MAX_QUEUED {
                queue.pop_front();
            }
        }
    }

    fn flush(&self) {}
}
