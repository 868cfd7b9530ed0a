//! Structured logging configuration for promptshelf
//!
//! The terminal UI owns stdout, so logging is opt-in: it is only switched on
//! when `PROMPTSHELF_LOG_LEVEL` (or `LOG_LEVEL`) is set, and it goes to a log
//! file when `PROMPTSHELF_LOG_DIR` names a directory, stderr otherwise.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

/// File name used inside `PROMPTSHELF_LOG_DIR`
pub const LOG_FILENAME: &str = "promptshelf.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Log file directory (None for stderr)
    pub file_dir: Option<PathBuf>,
    /// Enable colored output
    pub colored: bool,
    /// Enable source location logging
    pub with_location: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Pretty human-readable
    Pretty,
    /// Compact single-line format
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Compact,
            file_dir: None,
            colored: false,
            with_location: false,
        }
    }
}

impl LogConfig {
    /// True when the environment asks for logging at all
    pub fn requested() -> bool {
        env::var("PROMPTSHELF_LOG_LEVEL").is_ok() || env::var("LOG_LEVEL").is_ok()
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let level = env::var("PROMPTSHELF_LOG_LEVEL")
            .or_else(|_| env::var("LOG_LEVEL"))
            .unwrap_or_else(|_| "error".to_string());

        let format = match env::var("PROMPTSHELF_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        };

        let file_dir = env::var("PROMPTSHELF_LOG_DIR").ok().map(PathBuf::from);

        // Colors only make sense on a terminal stderr, never in a file
        let colored = file_dir.is_none() && is_terminal::IsTerminal::is_terminal(&std::io::stderr());

        let with_location = env::var("PROMPTSHELF_LOG_LOCATION")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            level,
            format,
            file_dir,
            colored,
            with_location,
        }
    }
}

/// Initialize the global tracing subscriber
pub fn init_logging(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("error"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let writer = match &config.file_dir {
        Some(dir) => BoxMakeWriter::new(tracing_appender::rolling::never(dir, LOG_FILENAME)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(config.colored)
        .with_file(config.with_location)
        .with_line_number(config.with_location);

    match config.format {
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize JSON logging: {}", e))?,
        LogFormat::Pretty => subscriber
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize pretty logging: {}", e))?,
        LogFormat::Compact => subscriber
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize compact logging: {}", e))?,
    }

    info!(
        level = %config.level,
        format = ?config.format,
        file_dir = ?config.file_dir,
        "Logging initialized"
    );

    Ok(())
}

/// Log a read or write of the prompt file for the audit trail
pub fn log_storage_operation(
    operation: &str,
    prompt_name: Option<&str>,
    success: bool,
    duration_ms: Option<u64>,
) {
    let span = tracing::info_span!(
        "storage_operation",
        operation = operation,
        prompt_name = prompt_name,
        success = success,
        duration_ms = duration_ms
    );

    let _enter = span.enter();

    if success {
        debug!(
            operation = operation,
            prompt_name = prompt_name,
            duration_ms = duration_ms,
            "Storage operation completed"
        );
    } else {
        warn!(
            operation = operation,
            prompt_name = prompt_name,
            duration_ms = duration_ms,
            "Storage operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    /// Shared buffer the test subscriber writes into
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn output(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_log_config_from_env() {
        env::set_var("PROMPTSHELF_LOG_LEVEL", "debug");
        env::set_var("PROMPTSHELF_LOG_FORMAT", "json");
        env::set_var("PROMPTSHELF_LOG_DIR", "/tmp/promptshelf-logs");

        let config = LogConfig::from_env();
        assert!(LogConfig::requested());
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_dir, Some(PathBuf::from("/tmp/promptshelf-logs")));
        assert!(!config.colored);

        env::remove_var("PROMPTSHELF_LOG_LEVEL");
        env::remove_var("PROMPTSHELF_LOG_FORMAT");
        env::remove_var("PROMPTSHELF_LOG_DIR");
    }

    #[test]
    fn test_storage_operation_logging() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_storage_operation("load", None, true, Some(3));
            log_storage_operation("save", Some("Greeting"), false, Some(12));
        });

        let output = capture.output();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "unexpected log output: {output}");

        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("Storage operation completed"));
        assert!(lines[0].contains("operation=\"load\""));

        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("Storage operation failed"));
        assert!(lines[1].contains("Greeting"));
        assert!(lines[1].contains("duration_ms=12"));
    }

    #[test]
    fn test_storage_operation_logging_respects_level() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_storage_operation("load", None, true, Some(1));
        });

        assert!(capture.output().is_empty());
    }
}
