use std::sync::Arc;
use std::time::Duration;

use seek_worker::{GenerationToken, TaskClass};
use tokio::task::JoinError;
use tracing::{debug, trace, warn};

use super::router::Route;
use crate::backend::BackendRef;
use crate::error::{Result, SearchError};
use crate::publisher::ResultPublisher;
use crate::types::{QueryText, SearchOutcome};

/// Keeps exactly one live backend call.
///
/// Each dispatch stamps a new generation and cancels the previous call's
/// token. Cancellation only saves work; the publisher's generation check is
/// what keeps a superseded result from being committed.
///
/// The backend runs in its own task so that a panic inside it still reaches
/// the publisher, as a transport failure of that generation.
pub(crate) struct SwitchingExecutor {
	publisher: Arc<ResultPublisher>,
	request_timeout: Option<Duration>,
	in_flight: Option<GenerationToken>,
}

impl SwitchingExecutor {
	pub(crate) fn new(publisher: Arc<ResultPublisher>, request_timeout: Option<Duration>) -> Self {
		Self {
			publisher,
			request_timeout,
			in_flight: None,
		}
	}

	pub(crate) fn dispatch(&mut self, query: QueryText, route: Route) {
		let awaits_backend = matches!(route, Route::Backend { .. });
		let Some(generation) = self.publisher.issue(awaits_backend) else {
			trace!(query = %query, "search.dispatch.retired");
			return;
		};

		if let Some(previous) = self.in_flight.take() {
			trace!(superseded = previous.generation(), generation, "search.abandon");
			previous.cancel();
		}

		match route {
			Route::Empty => {
				debug!(generation, "search.dispatch.empty");
				self.publisher.complete(generation, &query, Ok(SearchOutcome::empty()));
			}
			Route::Backend { mode, backend } => {
				debug!(generation, %mode, query = %query, "search.dispatch");
				let token = GenerationToken::new(generation);
				self.in_flight = Some(token.clone());

				let publisher = Arc::clone(&self.publisher);
				let timeout = self.request_timeout;
				seek_worker::spawn(TaskClass::Request, "search.request", async move {
					let mut request = seek_worker::spawn(TaskClass::Request, "search.call", call(backend, query.clone(), timeout));
					let result = match token.run_until_cancelled(&mut request).await {
						Some(Ok(result)) => result,
						Some(Err(err)) => Err(join_failure(generation, err)),
						None => {
							request.abort();
							Err(SearchError::Cancelled)
						}
					};
					publisher.complete(generation, &query, result);
				});
			}
		}
	}

	/// Cancels the outstanding call, if any.
	pub(crate) fn abandon(&mut self) {
		if let Some(token) = self.in_flight.take() {
			trace!(generation = token.generation(), "search.abandon");
			token.cancel();
		}
	}
}

async fn call(backend: BackendRef, query: QueryText, timeout: Option<Duration>) -> Result<SearchOutcome> {
	let request = backend.search(query.as_str());
	match timeout {
		Some(limit) => tokio::time::timeout(limit, request)
			.await
			.unwrap_or(Err(SearchError::Timeout(limit))),
		None => request.await,
	}
}

fn join_failure(generation: u64, err: JoinError) -> SearchError {
	if err.is_panic() {
		warn!(generation, "search.call.panicked");
		SearchError::transport("backend panicked")
	} else {
		SearchError::Cancelled
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use async_trait::async_trait;
	use pretty_assertions::assert_eq;
	use tokio::sync::mpsc::error::TryRecvError;

	use super::*;
	use crate::backend::SearchBackend;
	use crate::mode::SearchMode;
	use crate::publisher::SearchEvent;
	use crate::types::{Category, SearchResultItem};

	/// Answers `<query>` after `<query length * 100ms>` and counts drops.
	#[derive(Default)]
	struct LengthLatency {
		dropped: Arc<AtomicUsize>,
	}

	struct DropCounter(Arc<AtomicUsize>, bool);

	impl Drop for DropCounter {
		fn drop(&mut self) {
			if !self.1 {
				self.0.fetch_add(1, Ordering::SeqCst);
			}
		}
	}

	#[async_trait]
	impl SearchBackend for LengthLatency {
		async fn search(&self, query: &str) -> Result<SearchOutcome> {
			let mut guard = DropCounter(Arc::clone(&self.dropped), false);
			tokio::time::sleep(Duration::from_millis(100 * query.len() as u64)).await;
			guard.1 = true;
			Ok(SearchOutcome::from(vec![SearchResultItem::new(query, Category::Article)]))
		}
	}

	/// Panics on `boom` after `delay`; answers anything else at once.
	struct Explosive {
		delay: Duration,
	}

	#[async_trait]
	impl SearchBackend for Explosive {
		async fn search(&self, query: &str) -> Result<SearchOutcome> {
			tokio::time::sleep(self.delay).await;
			assert_ne!(query, "boom", "backend blew up");
			Ok(SearchOutcome::from(vec![SearchResultItem::new(query, Category::Article)]))
		}
	}

	fn route(backend: &BackendRef) -> Route {
		Route::Backend {
			mode: SearchMode::Universal,
			backend: Arc::clone(backend),
		}
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn slow_superseded_call_never_commits() {
		let dropped = Arc::new(AtomicUsize::new(0));
		let backend: BackendRef = Arc::new(LengthLatency { dropped: Arc::clone(&dropped) });
		let publisher = Arc::new(ResultPublisher::new());
		let mut events = publisher.subscribe();
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), None);

		executor.dispatch("slowest".into(), route(&backend));
		tokio::time::sleep(Duration::from_millis(10)).await;
		executor.dispatch("ok".into(), route(&backend));
		tokio::time::sleep(Duration::from_secs(5)).await;

		assert_eq!(publisher.current_results().items()[0].id, "ok");
		assert!(matches!(events.try_recv(), Ok(SearchEvent::Results { generation: 2, .. })));
		assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
		assert_eq!(dropped.load(Ordering::SeqCst), 1, "superseded request should be cancelled");
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn empty_route_supersedes_in_flight_call() {
		let backend: BackendRef = Arc::new(LengthLatency::default());
		let publisher = Arc::new(ResultPublisher::new());
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), None);

		executor.dispatch("pending".into(), route(&backend));
		assert!(publisher.is_loading());
		executor.dispatch("".into(), Route::Empty);
		assert!(!publisher.is_loading());
		tokio::time::sleep(Duration::from_secs(5)).await;

		assert_eq!(publisher.generation(), 2);
		assert!(publisher.current_results().is_empty());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn timeout_surfaces_as_failure() {
		let backend: BackendRef = Arc::new(LengthLatency::default());
		let publisher = Arc::new(ResultPublisher::new());
		let mut events = publisher.subscribe();
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), Some(Duration::from_millis(250)));

		executor.dispatch("abcdef".into(), route(&backend));
		tokio::time::sleep(Duration::from_secs(1)).await;

		assert_eq!(
			events.try_recv().unwrap(),
			SearchEvent::Failed {
				generation: 1,
				query: "abcdef".into(),
				error: SearchError::Timeout(Duration::from_millis(250)),
			}
		);
		assert!(!publisher.is_loading());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn abandon_then_retire_drops_late_result() {
		let backend: BackendRef = Arc::new(LengthLatency::default());
		let publisher = Arc::new(ResultPublisher::new());
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), None);

		executor.dispatch("late".into(), route(&backend));
		executor.abandon();
		publisher.retire();
		tokio::time::sleep(Duration::from_secs(1)).await;

		assert!(publisher.current_results().is_empty());
		executor.dispatch("after".into(), route(&backend));
		assert_eq!(publisher.generation(), 1);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn panicking_backend_fails_latest_generation() {
		let backend: BackendRef = Arc::new(Explosive { delay: Duration::ZERO });
		let publisher = Arc::new(ResultPublisher::new());
		let mut events = publisher.subscribe();
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), None);

		executor.dispatch("boom".into(), route(&backend));
		tokio::time::sleep(Duration::from_secs(5)).await;

		assert!(!publisher.is_loading());
		assert_eq!(
			events.try_recv().unwrap(),
			SearchEvent::Failed {
				generation: 1,
				query: "boom".into(),
				error: SearchError::transport("backend panicked"),
			}
		);
		assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn later_queries_commit_after_a_panic() {
		let backend: BackendRef = Arc::new(Explosive {
			delay: Duration::from_millis(100),
		});
		let publisher = Arc::new(ResultPublisher::new());
		let mut events = publisher.subscribe();
		let mut executor = SwitchingExecutor::new(Arc::clone(&publisher), None);

		executor.dispatch("boom".into(), route(&backend));
		tokio::time::sleep(Duration::from_millis(500)).await;
		executor.dispatch("calm".into(), route(&backend));
		tokio::time::sleep(Duration::from_millis(500)).await;

		assert_eq!(publisher.current_results().items()[0].id, "calm");
		assert!(matches!(events.try_recv(), Ok(SearchEvent::Failed { generation: 1, .. })));
		assert!(matches!(events.try_recv(), Ok(SearchEvent::Results { generation: 2, .. })));
		assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
	}
}
