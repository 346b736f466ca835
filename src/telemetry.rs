//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; applications opt into output
//! by calling one of the `init_*` functions.
//!
//! ```rust,ignore
//! use dreamgen::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::GenError;

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "DREAMGEN_LOG_LEVEL";
/// Environment variable holding the output format
pub const LOG_FORMAT_ENV: &str = "DREAMGEN_LOG_FORMAT";
/// Environment variable holding the log file path
pub const LOG_FILE_ENV: &str = "DREAMGEN_LOG_FILE";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON with thread ids and span context
    Json,
    /// Flattened single-line JSON
    JsonCompact,
}

impl FromStr for OutputFormat {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" | "json_compact" => Ok(Self::JsonCompact),
            other => Err(GenError::ConfigurationError(format!(
                "invalid log format: {other}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Parse a level name such as `debug` or `WARN`.
pub fn parse_level(level: &str) -> Result<tracing::Level, GenError> {
    tracing::Level::from_str(level.trim()).map_err(|_| {
        GenError::ConfigurationError(format!(
            "invalid log level: {level}. Valid options: trace, debug, info, warn, error"
        ))
    })
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Most verbose level emitted by this crate
    pub log_level: tracing::Level,
    /// Output format
    pub output_format: OutputFormat,
    /// Write to stdout when no log file is set
    pub enable_console: bool,
    /// Write to this file instead of the console
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    /// Create a new builder for SubscriberConfig
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Default configuration at `DEBUG` level
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        let level = self.log_level.as_str().to_lowercase();
        EnvFilter::new(format!("dreamgen={level}"))
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    /// Set the log level
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self, GenError> {
        self.log_level = Some(parse_level(level)?);
        Ok(self)
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Enable or disable console output
    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    /// Set the log file path
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Build the SubscriberConfig
    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

/// Install the global subscriber.
///
/// Returns the file writer guard when logging to a file; keep it alive for
/// the life of the program. A subscriber that is already installed is not
/// an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, GenError> {
    let filter = config.filter();

    let (result, guard) = match &config.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            (try_init(config.output_format, filter, writer, false), Some(guard))
        }
        None if config.enable_console => (
            try_init(config.output_format, filter, std::io::stdout, true),
            None,
        ),
        None => return Ok(None),
    };

    match result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") => Ok(guard),
        Err(e) => Err(GenError::ConfigurationError(format!(
            "failed to initialize tracing: {e}"
        ))),
    }
}

fn file_appender(path: &Path) -> Result<tracing_appender::rolling::RollingFileAppender, GenError> {
    let file_name = path.file_name().ok_or_else(|| {
        GenError::ConfigurationError(format!("log file path has no file name: {}", path.display()))
    })?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(tracing_appender::rolling::never(directory, file_name))
}

fn try_init<W>(
    format: OutputFormat,
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    match format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Json => builder
            .json()
            .with_thread_ids(true)
            .with_thread_names(true)
            .try_init(),
        OutputFormat::JsonCompact => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
    }
}

/// Initialize tracing subscriber with default configuration
pub fn init_default() -> Result<Option<WorkerGuard>, GenError> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber with debug configuration
pub fn init_debug() -> Result<Option<WorkerGuard>, GenError> {
    init_subscriber(SubscriberConfig::debug())
}

/// Build a configuration from `DREAMGEN_LOG_LEVEL`, `DREAMGEN_LOG_FORMAT`
/// and `DREAMGEN_LOG_FILE`.
pub fn config_from_env() -> Result<SubscriberConfig, GenError> {
    config_from_lookup(|key| std::env::var(key).ok())
}

fn config_from_lookup<F>(lookup: F) -> Result<SubscriberConfig, GenError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = SubscriberConfig::builder();

    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        builder = builder.log_level_str(&level)?;
    }
    if let Some(format) = lookup(LOG_FORMAT_ENV) {
        builder = builder.output_format(format.parse()?);
    }
    if let Some(file) = lookup(LOG_FILE_ENV).filter(|f| !f.trim().is_empty()) {
        builder = builder.log_file(file);
    }

    Ok(builder.build())
}

/// Initialize tracing subscriber from environment variables
pub fn init_from_env() -> Result<Option<WorkerGuard>, GenError> {
    init_subscriber(config_from_env()?)
}
