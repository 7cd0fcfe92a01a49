//! Run configuration

use serde::{Deserialize, Serialize};

use crate::engine::Mode;
use crate::params::Options;

/// Mode and options for a validation run, loadable from JSON.
///
/// Missing fields take their defaults: fail-fast mode, no options.
///
/// ```rust
/// use arbor_validator::{Mode, ValidationConfig};
///
/// let config = ValidationConfig::from_json(r#"{"mode": "report", "options": {"min_count": 2}}"#)?;
/// assert_eq!(config.mode, Mode::Report);
/// assert!(config.options.contains("min_count"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Failure handling.
    pub mode: Mode,
    /// Options routed to validators.
    pub options: Options,
}

impl ValidationConfig {
    /// A fail-fast configuration with no options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Sets the mode.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds one option.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options.insert(name, value);
        self
    }
}
