use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Generation-scoped cancellation token for one unit of superseded-able work.
///
/// Cancellation is advisory: the holder of the generation number still decides
/// whether a late result is accepted.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates a fresh, uncancelled token for `generation`.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Drives `fut` until it finishes or this generation is cancelled.
	///
	/// Returns `None` on cancellation, dropping `fut` in place.
	pub async fn run_until_cancelled<F>(&self, fut: F) -> Option<F::Output>
	where
		F: Future,
	{
		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => None,
			out = fut => Some(out),
		}
	}
}
