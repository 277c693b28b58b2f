//! Query and result value types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One snapshot of user input.
///
/// Equality is exact: case and whitespace are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryText(Arc<str>);

impl QueryText {
	/// Borrows the raw text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true for the empty string and whitespace-only input.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl From<&str> for QueryText {
	fn from(text: &str) -> Self {
		Self(Arc::from(text))
	}
}

impl From<String> for QueryText {
	fn from(text: String) -> Self {
		Self(Arc::from(text))
	}
}

impl PartialEq<str> for QueryText {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for QueryText {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl fmt::Display for QueryText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Content category of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
	Audio,
	Video,
	Image,
	FacebookVideo,
	Article,
	Quote,
	Youtube,
	MentorInfo,
	TopicInfo,
}

/// One backend search hit. Only `category` is interpreted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
	pub id: String,
	pub category: Category,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail: Option<String>,
}

impl SearchResultItem {
	/// Item with no display fields.
	pub fn new(id: impl Into<String>, category: Category) -> Self {
		Self {
			id: id.into(),
			category,
			title: None,
			thumbnail: None,
		}
	}

	/// Sets the display title.
	#[must_use]
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	#[must_use]
	pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
		self.thumbnail = Some(thumbnail.into());
		self
	}
}

/// Ordered result list for one settled query.
///
/// Cloning shares the underlying list. An empty outcome is a real answer,
/// distinct from "no result yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome(Arc<[SearchResultItem]>);

impl SearchOutcome {
	/// The "no hits" answer; also what a blank query resolves to.
	pub fn empty() -> Self {
		Self(Arc::from(Vec::new()))
	}

	/// Items in backend ranking order.
	pub fn items(&self) -> &[SearchResultItem] {
		&self.0
	}

	/// Number of hits.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates items in ranking order.
	pub fn iter(&self) -> std::slice::Iter<'_, SearchResultItem> {
		self.0.iter()
	}
}

impl Default for SearchOutcome {
	fn default() -> Self {
		Self::empty()
	}
}

impl From<Vec<SearchResultItem>> for SearchOutcome {
	fn from(items: Vec<SearchResultItem>) -> Self {
		Self(Arc::from(items))
	}
}

impl FromIterator<SearchResultItem> for SearchOutcome {
	fn from_iter<I: IntoIterator<Item = SearchResultItem>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a SearchOutcome {
	type Item = &'a SearchResultItem;
	type IntoIter = std::slice::Iter<'a, SearchResultItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Follow-up destination for a selected result. Navigating is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavTarget {
	YouTube(String),
	Mentor(String),
	Topic(String),
}

impl NavTarget {
	/// Maps a selected item to its destination, if its category has one.
	pub fn for_item(item: &SearchResultItem) -> Option<Self> {
		match item.category {
			Category::Youtube => Some(Self::YouTube(item.id.clone())),
			Category::MentorInfo => Some(Self::Mentor(item.id.clone())),
			Category::TopicInfo => Some(Self::Topic(item.id.clone())),
			Category::Audio | Category::Video | Category::Image | Category::FacebookVideo | Category::Article | Category::Quote => None,
		}
	}
}
