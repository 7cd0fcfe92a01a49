//! # arbor-log
//!
//! Logging setup for arbor. The validation engine emits `tracing` events
//! (registration at `debug`, per-node dispatch at `trace`, recorded
//! failures at `warn`); this crate installs a `tracing-subscriber` stack to
//! render them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), arbor_log::Error> {
//!     // ARBOR_LOG / RUST_LOG if set, otherwise a build-profile preset
//!     let _guard = arbor_log::auto_init()?;
//!
//!     tracing::info!(namespace = "catalog", "validating");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, Writer};

/// Error type for logger operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filter parsing error
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The rejected directive string
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber could not be installed
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

// ============================================================================
// Initialization Functions
// ============================================================================

/// Auto-detect and initialize the best logging configuration
pub fn auto_init() -> Result<LoggerGuard, Error> {
    if std::env::var("ARBOR_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> Result<LoggerGuard, Error> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> Result<LoggerGuard, Error> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests (captures logs); safe to call from every test
pub fn init_test() -> LoggerGuard {
    if tracing::dispatcher::has_been_set() {
        return LoggerGuard::noop();
    }
    // Another test thread may win the race; that subscriber is equivalent.
    init_with(Config::test()).unwrap_or_else(|_| LoggerGuard::noop())
}
