use crate::types::QueryText;

/// Suppresses a settled query equal to the previous accepted one.
///
/// `None` is the unmatchable initial state, so an empty first query still
/// passes.
#[derive(Debug, Default)]
pub(crate) struct DistinctFilter {
	last: Option<QueryText>,
}

impl DistinctFilter {
	pub(crate) fn admit(&mut self, query: &QueryText) -> bool {
		if self.last.as_ref() == Some(query) {
			tracing::trace!(query = %query, "search.distinct.drop");
			return false;
		}
		self.last = Some(query.clone());
		true
	}
}
