//! Injected backend capabilities.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::mode::SearchMode;
use crate::types::SearchOutcome;

/// One asynchronous search operation.
///
/// Implementations return an already ranked outcome. Cancellation is by drop:
/// when a newer query supersedes this call the returned future is dropped, so
/// transports that abort on drop get cancelled for free.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
	/// Searches for `query`, which is never blank.
	async fn search(&self, query: &str) -> Result<SearchOutcome>;
}

/// Shared handle to a backend capability.
pub type BackendRef = Arc<dyn SearchBackend>;

/// Single search endpoint taking an optional scope filter.
///
/// [`Backends::from_service`] derives all three per-mode capabilities from
/// one of these.
#[async_trait]
pub trait SearchService: Send + Sync + 'static {
	async fn search(&self, query: &str, filter: Option<&str>) -> Result<SearchOutcome>;
}

/// The three capabilities a controller is constructed with.
#[derive(Clone)]
pub struct Backends {
	universal: BackendRef,
	mentor: BackendRef,
	topic: BackendRef,
}

impl fmt::Debug for Backends {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Backends").finish_non_exhaustive()
	}
}

impl Backends {
	/// Wraps three owned backends, one per [`SearchMode`].
	pub fn new(universal: impl SearchBackend, mentor: impl SearchBackend, topic: impl SearchBackend) -> Self {
		Self::from_refs(Arc::new(universal), Arc::new(mentor), Arc::new(topic))
	}

	/// Like [`Backends::new`], for backends that are already shared.
	pub fn from_refs(universal: BackendRef, mentor: BackendRef, topic: BackendRef) -> Self {
		Self { universal, mentor, topic }
	}

	/// Scopes one filtered endpoint per mode using [`SearchMode::filter`].
	pub fn from_service<S: SearchService>(service: Arc<S>) -> Self {
		let scoped = |mode: SearchMode| -> BackendRef {
			Arc::new(Scoped {
				service: Arc::clone(&service),
				filter: mode.filter(),
			})
		};
		Self::from_refs(scoped(SearchMode::Universal), scoped(SearchMode::Mentor), scoped(SearchMode::Topic))
	}

	/// Selects the capability for `mode`.
	pub fn for_mode(&self, mode: SearchMode) -> &BackendRef {
		match mode {
			SearchMode::Universal => &self.universal,
			SearchMode::Mentor => &self.mentor,
			SearchMode::Topic => &self.topic,
		}
	}
}

struct Scoped<S> {
	service: Arc<S>,
	filter: Option<&'static str>,
}

#[async_trait]
impl<S: SearchService> SearchBackend for Scoped<S> {
	async fn search(&self, query: &str) -> Result<SearchOutcome> {
		self.service.search(query, self.filter).await
	}
}
