use std::sync::Arc;

use seek_worker::{OfferOutcome, Slot, SlotSender, TaskClass};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::backend::Backends;
use crate::config::{self, SearchConfig};
use crate::mode::SearchMode;
use crate::pipeline::Pipeline;
use crate::publisher::{ControllerState, EventReceiver, ResultPublisher};
use crate::types::{NavTarget, QueryText, SearchOutcome, SearchResultItem};

/// One search session.
///
/// Construction spawns the pipeline task on the ambient tokio runtime.
/// [`submit`](Self::submit) never waits; results and failures of the newest
/// settled query are observed through [`current_results`](Self::current_results)
/// and [`subscribe`](Self::subscribe).
pub struct SearchController {
	mode: SearchMode,
	queries: SlotSender<QueryText>,
	publisher: Arc<ResultPublisher>,
	shutdown: CancellationToken,
	task: Option<JoinHandle<()>>,
}

impl SearchController {
	/// Validates `config` and starts the pipeline task.
	///
	/// Must be called within a tokio runtime, or the task lands on the
	/// detached worker runtime.
	pub fn new(config: SearchConfig, backends: Backends) -> config::Result<Self> {
		config.validate()?;

		let slot = Slot::new();
		let publisher = Arc::new(ResultPublisher::new());
		let shutdown = CancellationToken::new();
		let pipeline = Pipeline::new(
			slot.receiver(),
			shutdown.clone(),
			Arc::clone(&publisher),
			config.mode,
			backends,
			config.debounce_interval(),
			config.request_timeout(),
		);
		let task = seek_worker::spawn(TaskClass::Pipeline, "search.pipeline", pipeline.run());

		Ok(Self {
			mode: config.mode,
			queries: slot.sender(),
			publisher,
			shutdown,
			task: Some(task),
		})
	}

	/// Mode fixed at construction.
	pub fn mode(&self) -> SearchMode {
		self.mode
	}

	/// Hands the latest input to the pipeline, replacing an unread one.
	pub fn submit(&self, text: impl Into<QueryText>) {
		match self.queries.offer(text.into()) {
			Ok(OfferOutcome::Stored) => {}
			Ok(OfferOutcome::Replaced) => trace!("search.submit.replaced"),
			Err(_) => trace!("search.submit.closed"),
		}
	}

	/// Latest committed result set.
	pub fn current_results(&self) -> SearchOutcome {
		self.publisher.current_results()
	}

	/// Last query that made it past duplicate suppression.
	pub fn current_query(&self) -> QueryText {
		self.publisher.current_query()
	}

	/// Latest issued generation; zero before the first settled query.
	pub fn generation(&self) -> u64 {
		self.publisher.generation()
	}

	/// Whether the newest query is still waiting on its backend.
	pub fn is_loading(&self) -> bool {
		self.publisher.is_loading()
	}

	/// Consistent snapshot of query, results, generation and loading flag.
	pub fn state(&self) -> ControllerState {
		self.publisher.snapshot()
	}

	/// Subscribes to commits and surfaced failures, in commit order.
	///
	/// Only events after the call are delivered. Each subscriber has its own
	/// unbounded queue, so nothing is lost to a slow reader. The stream ends
	/// when the session is shut down or dropped.
	pub fn subscribe(&self) -> EventReceiver {
		self.publisher.subscribe()
	}

	/// Navigation target for a picked result, if its category has one.
	pub fn select_result(&self, item: &SearchResultItem) -> Option<NavTarget> {
		NavTarget::for_item(item)
	}

	/// Ends the session and waits for the pipeline task to finish.
	///
	/// A pending debounce timer is dropped and no outstanding request may
	/// commit afterwards.
	pub async fn shutdown(mut self) {
		self.stop();
		if let Some(task) = self.task.take()
			&& let Err(err) = task.await
		{
			warn!(error = %err, "search.pipeline.join_failed");
		}
	}

	fn stop(&self) {
		self.queries.close();
		self.shutdown.cancel();
		self.publisher.retire();
	}
}

impl Drop for SearchController {
	fn drop(&mut self) {
		self.stop();
	}
}

impl std::fmt::Debug for SearchController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchController")
			.field("mode", &self.mode)
			.field("state", &self.publisher.snapshot())
			.finish_non_exhaustive()
	}
}
