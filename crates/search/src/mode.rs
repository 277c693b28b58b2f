use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::ConfigError;

/// Which backend operation a controller dispatches to. Fixed per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
	#[default]
	#[serde(alias = "UNIVERSAL")]
	Universal,
	#[serde(alias = "MENTOR")]
	Mentor,
	#[serde(alias = "TOPIC")]
	Topic,
}

impl SearchMode {
	/// Every mode, in declaration order.
	pub const ALL: [Self; 3] = [Self::Universal, Self::Mentor, Self::Topic];

	/// Lower-case config name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Universal => "universal",
			Self::Mentor => "mentor",
			Self::Topic => "topic",
		}
	}

	/// Filter value understood by a single filtered search endpoint.
	pub const fn filter(self) -> Option<&'static str> {
		match self {
			Self::Universal => None,
			Self::Mentor => Some("mentor"),
			Self::Topic => Some("topic"),
		}
	}

	/// Resolves a navigation argument, falling back to [`SearchMode::Universal`]
	/// when it is absent or unrecognised.
	pub fn from_nav_arg(arg: Option<&str>) -> Self {
		match arg.map(str::parse::<Self>) {
			Some(Ok(mode)) => mode,
			Some(Err(err)) => {
				tracing::debug!(error = %err, "search.mode.fallback");
				Self::Universal
			}
			None => Self::Universal,
		}
	}
}

impl FromStr for SearchMode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"universal" | "UNIVERSAL" => Ok(Self::Universal),
			"mentor" | "MENTOR" => Ok(Self::Mentor),
			"topic" | "TOPIC" => Ok(Self::Topic),
			other => Err(ConfigError::UnknownMode(other.to_owned())),
		}
	}
}

impl fmt::Display for SearchMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
