//! Search failure taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Failure of one backend search call.
///
/// An empty query is not an error: it is routed to an empty outcome without
/// touching a backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
	/// Network or backend failure reported by the capability.
	#[error("search transport failed: {0}")]
	Transport(String),

	/// The call exceeded the configured request timeout.
	#[error("search timed out after {0:?}")]
	Timeout(Duration),

	/// The call was abandoned because a newer query superseded it.
	///
	/// Internal bookkeeping only; never delivered to subscribers.
	#[error("search superseded")]
	Cancelled,
}

impl SearchError {
	/// Transport failure carrying `reason`'s display text.
	pub fn transport(reason: impl std::fmt::Display) -> Self {
		Self::Transport(reason.to_string())
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
