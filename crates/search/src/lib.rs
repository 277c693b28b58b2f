//! Incremental typeahead search controller.
//!
//! Query text flows one way through a fixed chain of stages:
//!
//! ```text
//! submit -> Slot -> Debouncer -> DistinctFilter -> ModeRouter -> SwitchingExecutor -> ResultPublisher
//! ```
//!
//! Every settled query is stamped with a generation. Only the newest
//! generation may commit results or surface an error, so a slow superseded
//! request can never overwrite the answer to a newer query.
//!
//! [`SearchController`] owns the pipeline; backends are injected as
//! [`SearchBackend`] capabilities, one per [`SearchMode`].

mod backend;
mod config;
mod controller;
mod error;
mod mode;
mod pipeline;
mod publisher;
mod types;

pub use backend::{BackendRef, Backends, SearchBackend, SearchService};
pub use config::{ConfigError, SearchConfig};
pub use controller::SearchController;
pub use error::SearchError;
pub use mode::SearchMode;
pub use publisher::{ControllerState, EventReceiver, SearchEvent};
pub use types::{Category, NavTarget, QueryText, SearchOutcome, SearchResultItem};
