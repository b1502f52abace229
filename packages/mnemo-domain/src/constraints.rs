use crate::Category;

/// Interpreter output never carries more than this many categories; longer
/// classifier lists are truncated, not rejected.
pub const MAX_CATEGORIES: usize = 2;

/// Raw, validated output of the query interpreter before name resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryConstraints {
	pub raw_name: Option<String>,
	pub categories: Vec<Category>,
}

/// Constraints after fuzzy name resolution. `user_name` is either a
/// lower-cased canonical registry name or `None` (no name filter).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedConstraints {
	pub user_name: Option<String>,
	pub categories: Vec<Category>,
	/// Diagnostics only; never returned to callers.
	pub resolution_score: f32,
}
