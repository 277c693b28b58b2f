/// Execution classes attached to spawned tasks for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Long-lived stage driver that owns pipeline state for a whole session.
	Pipeline,
	/// One outstanding backend request; may be abandoned when superseded.
	Request,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Pipeline => "pipeline",
			Self::Request => "request",
		}
	}
}
