//! Scripted backend shared by the controller scenarios.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use seek_search::{Backends, Category, EventReceiver, SearchBackend, SearchConfig, SearchController, SearchError, SearchEvent, SearchMode, SearchOutcome, SearchResultItem};
use tokio::time::Instant;

/// One recorded backend invocation.
#[derive(Debug, Clone)]
pub struct Call {
	pub backend: &'static str,
	pub query: String,
	pub at: Instant,
}

#[derive(Debug, Clone)]
enum Reply {
	Hits(Vec<&'static str>),
	Fail(&'static str),
	Panic,
}

#[derive(Debug, Clone)]
struct Script {
	latency: Duration,
	reply: Reply,
}

#[derive(Default)]
struct Shared {
	calls: Mutex<Vec<Call>>,
	scripts: Mutex<HashMap<String, Script>>,
}

/// Backend whose answer and latency are scripted per query.
///
/// Unscripted queries answer immediately with one hit `<name>:<query>`.
#[derive(Clone)]
pub struct ScriptedBackend {
	name: &'static str,
	shared: Arc<Shared>,
	log: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedBackend {
	fn new(name: &'static str, log: Arc<Mutex<Vec<Call>>>) -> Self {
		Self {
			name,
			shared: Arc::default(),
			log,
		}
	}

	pub fn reply(&self, query: &str, latency: Duration, hits: &[&'static str]) {
		self.shared.scripts.lock().insert(
			query.to_owned(),
			Script {
				latency,
				reply: Reply::Hits(hits.to_vec()),
			},
		);
	}

	pub fn fail(&self, query: &str, latency: Duration, reason: &'static str) {
		self.shared.scripts.lock().insert(
			query.to_owned(),
			Script {
				latency,
				reply: Reply::Fail(reason),
			},
		);
	}

	pub fn panic(&self, query: &str, latency: Duration) {
		self.shared.scripts.lock().insert(query.to_owned(), Script { latency, reply: Reply::Panic });
	}

	pub fn calls(&self) -> Vec<Call> {
		self.shared.calls.lock().clone()
	}
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
	async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
		let call = Call {
			backend: self.name,
			query: query.to_owned(),
			at: Instant::now(),
		};
		self.shared.calls.lock().push(call.clone());
		self.log.lock().push(call);

		let script = self.shared.scripts.lock().get(query).cloned();
		let script = script.unwrap_or_else(|| Script {
			latency: Duration::ZERO,
			reply: Reply::Hits(Vec::new()),
		});
		tokio::time::sleep(script.latency).await;

		match script.reply {
			Reply::Fail(reason) => Err(SearchError::transport(reason)),
			Reply::Panic => panic!("scripted panic for {query:?}"),
			Reply::Hits(hits) if hits.is_empty() => {
				let id = format!("{}:{query}", self.name);
				Ok(outcome(&[id.as_str()]))
			}
			Reply::Hits(hits) => Ok(outcome(&hits)),
		}
	}
}

pub fn outcome(ids: &[&str]) -> SearchOutcome {
	ids.iter().map(|id| SearchResultItem::new(*id, Category::Article)).collect()
}

/// A running controller plus handles onto its three backends.
pub struct Harness {
	pub controller: SearchController,
	pub universal: ScriptedBackend,
	pub mentor: ScriptedBackend,
	pub topic: ScriptedBackend,
	pub events: EventReceiver,
	log: Arc<Mutex<Vec<Call>>>,
	pub start: Instant,
}

impl Harness {
	pub fn new(mode: SearchMode) -> Self {
		Self::with_config(SearchConfig::new(mode))
	}

	pub fn with_config(config: SearchConfig) -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		let log = Arc::new(Mutex::new(Vec::new()));
		let universal = ScriptedBackend::new("universal", Arc::clone(&log));
		let mentor = ScriptedBackend::new("mentor", Arc::clone(&log));
		let topic = ScriptedBackend::new("topic", Arc::clone(&log));
		let backends = Backends::new(universal.clone(), mentor.clone(), topic.clone());
		let controller = SearchController::new(config, backends).expect("valid config");
		let events = controller.subscribe();

		Self {
			controller,
			universal,
			mentor,
			topic,
			events,
			log,
			start: Instant::now(),
		}
	}

	/// Every backend call in the order it was issued, across modes.
	pub fn calls(&self) -> Vec<Call> {
		self.log.lock().clone()
	}

	/// Milliseconds since the harness was created.
	pub fn elapsed_ms(&self, at: Instant) -> u128 {
		at.duration_since(self.start).as_millis()
	}

	/// Drains events delivered so far without waiting.
	pub fn drain_events(&mut self) -> Vec<SearchEvent> {
		let mut out = Vec::new();
		while let Ok(event) = self.events.try_recv() {
			out.push(event);
		}
		out
	}
}

/// Advances paused time by `ms` while letting spawned tasks run.
pub async fn wait_ms(ms: u64) {
	tokio::time::sleep(Duration::from_millis(ms)).await;
}
