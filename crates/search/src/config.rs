//! Controller configuration.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::mode::SearchMode;

/// Default quiet interval before a typed query is dispatched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Errors that can occur when building configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("config parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A key holds a value outside its allowed range.
	#[error("invalid value for '{key}': {reason}")]
	InvalidValue {
		/// The offending key.
		key: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},

	/// A search mode name was not recognised.
	#[error("unknown search mode: {0} (expected 'universal', 'mentor' or 'topic')")]
	UnknownMode(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Construction-time settings for a [`crate::SearchController`].
///
/// ```toml
/// mode = "mentor"
/// debounce-interval-ms = 300
/// request-timeout-ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchConfig {
	pub mode: SearchMode,
	/// Quiet period a query must survive before it is searched.
	pub debounce_interval_ms: u64,
	/// Per-call limit; `None` waits for the backend indefinitely.
	pub request_timeout_ms: Option<u64>,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			mode: SearchMode::default(),
			debounce_interval_ms: DEFAULT_DEBOUNCE_MS,
			request_timeout_ms: None,
		}
	}
}

impl SearchConfig {
	/// Default settings for `mode`.
	pub fn new(mode: SearchMode) -> Self {
		Self { mode, ..Self::default() }
	}

	/// Parses and validates a TOML document. Missing keys take defaults.
	pub fn from_toml_str(src: &str) -> Result<Self> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects values the controller cannot run with.
	pub fn validate(&self) -> Result<()> {
		if self.request_timeout_ms == Some(0) {
			return Err(ConfigError::InvalidValue {
				key: "request-timeout-ms",
				reason: "must be greater than zero when set",
			});
		}
		Ok(())
	}

	/// Overrides the quiet period, truncated to whole milliseconds.
	#[must_use]
	pub fn with_debounce(mut self, interval: Duration) -> Self {
		self.debounce_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
		self
	}

	#[must_use]
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
		self
	}

	pub fn debounce_interval(&self) -> Duration {
		Duration::from_millis(self.debounce_interval_ms)
	}

	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_timeout_ms.map(Duration::from_millis)
	}
}
