use std::time::Duration;

use tokio::time::Instant;

use crate::types::QueryText;

/// Holds the newest query until it has been quiet for `interval`.
///
/// At most one timer exists: every push replaces both the pending query and
/// its deadline.
#[derive(Debug)]
pub(crate) struct Debouncer {
	interval: Duration,
	pending: Option<(QueryText, Instant)>,
}

impl Debouncer {
	pub(crate) fn new(interval: Duration) -> Self {
		Self { interval, pending: None }
	}

	pub(crate) fn push(&mut self, query: QueryText) {
		let deadline = Instant::now() + self.interval;
		if let Some((superseded, _)) = self.pending.replace((query, deadline)) {
			tracing::trace!(query = %superseded, "search.debounce.reset");
		}
	}

	pub(crate) fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|(_, deadline)| *deadline)
	}

	/// Takes the pending query if its quiet period has elapsed.
	pub(crate) fn take_settled(&mut self) -> Option<QueryText> {
		match &self.pending {
			Some((_, deadline)) if *deadline <= Instant::now() => self.pending.take().map(|(query, _)| query),
			_ => None,
		}
	}

	/// Drops the pending query without emitting it.
	pub(crate) fn cancel(&mut self) -> Option<QueryText> {
		self.pending.take().map(|(query, _)| query)
	}
}

/// Resolves at `deadline`, or never when nothing is pending.
pub(crate) async fn quiet_period(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}
