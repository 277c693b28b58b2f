//! Stage driver: debounce, distinct, route, switch.
//!
//! One task owns every stage's state, so the debounce timer and the "last
//! accepted" query need no locking. Only the backend calls run elsewhere.

mod debounce;
mod distinct;
mod executor;
mod router;

use std::sync::Arc;
use std::time::Duration;

use seek_worker::SlotReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use self::debounce::{Debouncer, quiet_period};
use self::distinct::DistinctFilter;
use self::executor::SwitchingExecutor;
use self::router::ModeRouter;
use crate::backend::Backends;
use crate::mode::SearchMode;
use crate::publisher::ResultPublisher;
use crate::types::QueryText;

pub(crate) struct Pipeline {
	queries: SlotReceiver<QueryText>,
	shutdown: CancellationToken,
	publisher: Arc<ResultPublisher>,
	debouncer: Debouncer,
	distinct: DistinctFilter,
	router: ModeRouter,
	executor: SwitchingExecutor,
}

impl Pipeline {
	pub(crate) fn new(
		queries: SlotReceiver<QueryText>,
		shutdown: CancellationToken,
		publisher: Arc<ResultPublisher>,
		mode: SearchMode,
		backends: Backends,
		debounce: Duration,
		request_timeout: Option<Duration>,
	) -> Self {
		Self {
			queries,
			shutdown,
			debouncer: Debouncer::new(debounce),
			distinct: DistinctFilter::default(),
			router: ModeRouter::new(mode, backends),
			executor: SwitchingExecutor::new(Arc::clone(&publisher), request_timeout),
			publisher,
		}
	}

	/// Runs until the query slot closes or shutdown is requested.
	pub(crate) async fn run(mut self) {
		debug!("search.pipeline.start");
		loop {
			let deadline = self.debouncer.deadline();
			tokio::select! {
				biased;
				_ = self.shutdown.cancelled() => break,
				next = self.queries.recv() => match next {
					Some(query) => self.debouncer.push(query),
					None => break,
				},
				_ = quiet_period(deadline) => {
					if let Some(query) = self.debouncer.take_settled() {
						self.settle(query);
					}
				}
			}
		}

		if let Some(query) = self.debouncer.cancel() {
			trace!(query = %query, "search.debounce.cancelled");
		}
		self.executor.abandon();
		self.publisher.retire();
		debug!("search.pipeline.stop");
	}

	fn settle(&mut self, query: QueryText) {
		if !self.distinct.admit(&query) {
			return;
		}
		self.publisher.echo_query(&query);
		let route = self.router.route(&query);
		self.executor.dispatch(query, route);
	}
}
