//! Vector retrieval with a widening filter cascade.

use tracing::warn;

use crate::MnemoService;
use mnemo_domain::{Category, EvidenceItem};
use mnemo_storage::qdrant::MessageFilter;

impl MnemoService {
	/// Queries the vector index, relaxing filters until something comes
	/// back: name and category, name alone, category alone, then
	/// unfiltered. Index errors are logged and treated as empty so the
	/// cascade keeps widening.
	pub async fn search_semantic(
		&self,
		embedding: &[f32],
		user_name: Option<&str>,
		category: Option<Category>,
		top_k: u64,
	) -> Vec<EvidenceItem> {
		for filter in cascade(user_name, category) {
			match self.index.nearest(embedding, &filter, top_k).await {
				Ok(items) if !items.is_empty() => return items,
				Ok(_) => (),
				Err(err) => warn!("vector search failed for {filter:?}: {err}"),
			}
		}

		Vec::new()
	}
}

fn cascade(user_name: Option<&str>, category: Option<Category>) -> Vec<MessageFilter> {
	// Stored payloads carry names in title case.
	let user_name = user_name.map(title_case);
	let category = category.map(|c| c.as_str().to_string());
	let mut filters = Vec::new();

	if user_name.is_some() && category.is_some() {
		filters.push(MessageFilter { user_name: user_name.clone(), category: category.clone() });
	}
	if user_name.is_some() {
		filters.push(MessageFilter { user_name: user_name.clone(), category: None });
	}
	if category.is_some() {
		filters.push(MessageFilter { user_name: None, category: category.clone() });
	}

	filters.push(MessageFilter::default());

	filters
}

fn title_case(name: &str) -> String {
	name.trim()
		.split_whitespace()
		.map(|word| {
			let mut chars = word.chars();

			match chars.next() {
				Some(first) =>
					first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn title_case_should_work() {
		assert_eq!(title_case("layla haddad"), "Layla Haddad");
		assert_eq!(title_case("  VIKRAM   desai "), "Vikram Desai");
	}

	#[test]
	fn cascade_should_widen_from_both_filters() {
		let filters = cascade(Some("layla haddad"), Some(Category::PersonalWellness));

		assert_eq!(filters.len(), 4);
		assert_eq!(filters[0].user_name.as_deref(), Some("Layla Haddad"));
		assert_eq!(filters[0].category.as_deref(), Some("Personal & Wellness"));
		assert_eq!(filters[1].category, None);
		assert_eq!(filters[2].user_name, None);
		assert!(filters[3].is_empty());
	}

	#[test]
	fn cascade_should_always_end_unfiltered() {
		assert_eq!(cascade(None, None), [MessageFilter::default()]);
		assert_eq!(cascade(Some("a b"), None).len(), 2);
		assert_eq!(cascade(None, Some(Category::AccountFinance)).len(), 2);
	}
}
