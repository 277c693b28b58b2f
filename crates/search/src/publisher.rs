//! Observable controller state and the generation-checked commit point.
//!
//! All mutation happens under one mutex so that issuing a generation,
//! comparing it against the latest, and committing are atomic with respect to
//! each other. Events are sent while the lock is held, which keeps every
//! subscriber's delivery order identical to the commit order.
//!
//! Each subscriber owns an unbounded queue, so a slow reader never loses a
//! commit or a failure. Queues whose receiver was dropped are pruned on the
//! next send.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::{Result, SearchError};
use crate::types::{QueryText, SearchOutcome};

/// Notification delivered to subscribers, in commit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
	/// The result set for `generation` replaced the previous one.
	Results { generation: u64, query: QueryText, outcome: SearchOutcome },
	/// The latest generation failed; the previous results remain visible.
	Failed { generation: u64, query: QueryText, error: SearchError },
}

/// Snapshot of the controller's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
	query: QueryText,
	results: SearchOutcome,
	generation: u64,
	loading: bool,
	retired: bool,
}

impl ControllerState {
	/// Last query that passed the distinct filter.
	pub fn query(&self) -> &QueryText {
		&self.query
	}

	/// Results of the newest generation that committed.
	pub fn results(&self) -> &SearchOutcome {
		&self.results
	}

	/// Latest generation issued. Zero until the first dispatch.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether the latest generation still awaits its backend.
	pub fn is_loading(&self) -> bool {
		self.loading
	}
}

/// What happened to one completion handed to [`ResultPublisher::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
	Committed,
	Surfaced,
	Discarded,
}

/// Receiving half of one subscription.
pub type EventReceiver = mpsc::UnboundedReceiver<SearchEvent>;

#[derive(Default)]
struct Inner {
	state: ControllerState,
	subscribers: Vec<mpsc::UnboundedSender<SearchEvent>>,
}

impl Inner {
	fn emit(&mut self, event: SearchEvent) {
		self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
	}
}

#[derive(Default)]
pub(crate) struct ResultPublisher {
	inner: Mutex<Inner>,
}

impl ResultPublisher {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn snapshot(&self) -> ControllerState {
		self.inner.lock().state.clone()
	}

	pub(crate) fn current_results(&self) -> SearchOutcome {
		self.inner.lock().state.results.clone()
	}

	pub(crate) fn current_query(&self) -> QueryText {
		self.inner.lock().state.query.clone()
	}

	pub(crate) fn generation(&self) -> u64 {
		self.inner.lock().state.generation
	}

	pub(crate) fn is_loading(&self) -> bool {
		self.inner.lock().state.loading
	}

	/// Registers a new subscriber. After retirement the returned stream is
	/// already closed.
	pub(crate) fn subscribe(&self) -> EventReceiver {
		let (tx, rx) = mpsc::unbounded_channel();
		let mut inner = self.inner.lock();
		if !inner.state.retired {
			inner.subscribers.push(tx);
		}
		rx
	}

	pub(crate) fn echo_query(&self, query: &QueryText) {
		let mut inner = self.inner.lock();
		let state = &mut inner.state;
		if !state.retired {
			state.query = query.clone();
		}
	}

	/// Stamps a new latest generation, making every earlier one stale.
	///
	/// Returns `None` once the publisher has been retired.
	pub(crate) fn issue(&self, awaits_backend: bool) -> Option<u64> {
		let mut inner = self.inner.lock();
		let state = &mut inner.state;
		if state.retired {
			return None;
		}
		state.generation += 1;
		state.loading = awaits_backend;
		Some(state.generation)
	}

	/// Commits or surfaces `result` if `generation` is still the latest;
	/// otherwise drops it.
	pub(crate) fn complete(&self, generation: u64, query: &QueryText, result: Result<SearchOutcome>) -> Completion {
		let mut inner = self.inner.lock();
		let state = &mut inner.state;
		if state.retired || generation != state.generation {
			trace!(generation, latest = state.generation, retired = state.retired, ok = result.is_ok(), "search.discard");
			return Completion::Discarded;
		}
		state.loading = false;

		match result {
			Ok(outcome) => {
				debug!(generation, query = %query, hits = outcome.len(), "search.commit");
				state.results = outcome.clone();
				inner.emit(SearchEvent::Results {
					generation,
					query: query.clone(),
					outcome,
				});
				Completion::Committed
			}
			Err(SearchError::Cancelled) => {
				trace!(generation, "search.cancelled");
				Completion::Discarded
			}
			Err(error) => {
				warn!(generation, query = %query, error = %error, "search.failed");
				inner.emit(SearchEvent::Failed {
					generation,
					query: query.clone(),
					error,
				});
				Completion::Surfaced
			}
		}
	}

	/// Ends the session: no generation, however late, may commit afterwards.
	///
	/// Subscriber streams close once their queued events are read.
	pub(crate) fn retire(&self) {
		let mut inner = self.inner.lock();
		if !inner.state.retired {
			debug!(generation = inner.state.generation, subscribers = inner.subscribers.len(), "search.retire");
		}
		inner.state.retired = true;
		inner.state.loading = false;
		inner.subscribers.clear();
	}
}
