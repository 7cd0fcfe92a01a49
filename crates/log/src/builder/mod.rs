//! Logger builder implementation

// External dependencies
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

// Internal crates
use crate::Error;
use crate::config::{Config, Format};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger's root span entered
///
/// Dropping the guard exits the root span; the global subscriber itself
/// stays installed for the rest of the process.
#[derive(Debug)]
pub struct LoggerGuard {
    /// RAII guard for the root span carrying the service name
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerGuard {
    /// A guard that holds nothing (logger already installed elsewhere)
    #[must_use]
    pub fn noop() -> Self {
        Self { _root_span: None }
    }
}

/// Installs `Registry + filter + fmt` as the global subscriber.
macro_rules! init_subscriber {
    ($filter:expr, $fmt_layer:expr) => {
        Registry::default()
            .with($filter)
            .with($fmt_layer)
            .try_init()
            .map_err(|e| Error::Init(e.to_string()))?
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the logger
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber is already installed
    pub fn build(self) -> Result<LoggerGuard, Error> {
        let filter = parse_filter(&self.config.level)?;
        let display = &self.config.display;

        let layer = fmt::layer()
            .with_writer(self.config.writer.make())
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_thread_ids(display.thread_ids)
            .with_thread_names(display.thread_names);

        // `without_time` changes the layer type, so every pairing is spelled out
        match (self.config.format, display.time) {
            (Format::Pretty, true) => init_subscriber!(filter, layer.pretty()),
            (Format::Pretty, false) => init_subscriber!(filter, layer.pretty().without_time()),
            (Format::Compact, true) => init_subscriber!(filter, layer.compact()),
            (Format::Compact, false) => init_subscriber!(filter, layer.compact().without_time()),
            (Format::Json, true) => {
                init_subscriber!(filter, layer.json().flatten_event(display.flatten));
            }
            (Format::Json, false) => init_subscriber!(
                filter,
                layer.json().flatten_event(display.flatten).without_time()
            ),
        }

        let root_span = self
            .config
            .service
            .as_deref()
            .map(|service| tracing::info_span!("service", name = %service).entered());

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}

/// Parse a filter directive string into an [`EnvFilter`]
pub(crate) fn parse_filter(level: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(level).map_err(|e| Error::Filter {
        filter: level.to_string(),
        reason: e.to_string(),
    })
}
