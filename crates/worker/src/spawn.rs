use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime used by callers that are not inside one. Built on first use.
static DETACHED: OnceLock<Runtime> = OnceLock::new();

/// Spawns `fut` tagged with a class and name.
///
/// Runs on the caller's runtime when there is one. Otherwise the task goes to
/// a shared two-thread runtime, so synchronous embedders can still drive a
/// pipeline.
pub fn spawn<F>(class: TaskClass, name: &'static str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	let ambient = Handle::try_current().ok();
	tracing::trace!(worker_class = class.as_str(), task = name, detached = ambient.is_none(), "worker.spawn");
	match ambient {
		Some(handle) => handle.spawn(fut),
		None => DETACHED
			.get_or_init(|| {
				Builder::new_multi_thread()
					.enable_all()
					.worker_threads(2)
					.thread_name("seek-detached")
					.build()
					.expect("tokio runtime for detached seek tasks")
			})
			.spawn(fut),
	}
}
