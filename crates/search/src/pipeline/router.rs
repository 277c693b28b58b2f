use std::fmt;

use crate::backend::{BackendRef, Backends};
use crate::mode::SearchMode;
use crate::types::QueryText;

/// Where a settled query goes.
#[derive(Clone)]
pub(crate) enum Route {
	/// Blank input: answer with an empty outcome, no backend call.
	Empty,
	/// Call the backend selected for the controller's mode.
	Backend { mode: SearchMode, backend: BackendRef },
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Backend { mode, .. } => f.debug_struct("Backend").field("mode", mode).finish_non_exhaustive(),
		}
	}
}

#[derive(Debug)]
pub(crate) struct ModeRouter {
	mode: SearchMode,
	backends: Backends,
}

impl ModeRouter {
	pub(crate) fn new(mode: SearchMode, backends: Backends) -> Self {
		Self { mode, backends }
	}

	pub(crate) fn route(&self, query: &QueryText) -> Route {
		if query.is_blank() {
			return Route::Empty;
		}
		Route::Backend {
			mode: self.mode,
			backend: self.backends.for_mode(self.mode).clone(),
		}
	}
}
