use std::fmt;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::error::CalibError;

/// Log level definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    fn as_tracing(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Local wall-clock timestamps for log lines.
struct JiffTimer;

impl FormatTime for JiffTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", jiff::Zoned::now())
    }
}

/// Install the stderr subscriber. Later calls keep the first subscriber.
pub fn init_logging(level: LogLevel) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_timer(JiffTimer)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        eprintln!("Warning: Logging system already initialized");
    }
}

/// Log a CalibError at error level, with its stable code attached.
pub fn log_calib_error(error: &CalibError, context: Option<&str>) {
    let message = match context {
        Some(ctx) => format!("{}: {}", ctx, error),
        None => error.to_string(),
    };
    tracing::error!(code = error.code(), "{message}");
}

/// Result extension for convenient error logging
pub trait ResultExt<T, E> {
    fn log_error(self, context: Option<&str>) -> Self;
}

impl<T> ResultExt<T, CalibError> for Result<T, CalibError> {
    fn log_error(self, context: Option<&str>) -> Self {
        if let Err(ref error) = self {
            log_calib_error(error, context);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_levels_when_rendering_then_names_are_lowercase() {
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::default().as_str(), "info");
        assert_eq!(LogLevel::Warn.as_tracing(), Level::WARN);
    }

    #[test]
    fn given_failed_result_when_logging_then_error_passes_through() {
        let result: Result<(), CalibError> = Err(CalibError::RotationsMasksCountMismatch {
            rotations: 2,
            masks: 1,
        });

        let logged = result.clone().log_error(Some("apply"));

        assert_eq!(logged, result);
    }

    #[test]
    fn given_repeated_init_when_installing_then_second_call_is_harmless() {
        init_logging(LogLevel::Error);
        init_logging(LogLevel::Debug);
    }
}
