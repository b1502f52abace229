//! BM25 keyword retrieval over the in-memory corpus.
//!
//! Scoring is computed over the post-filter subset only, so document
//! frequencies reflect the constrained population rather than the full
//! corpus.

use std::collections::HashMap;

use mnemo_domain::{Category, EvidenceItem, Message};

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// Runs the lexical channel for one category pass. Filtering cascades:
/// name and category together, then name alone if a name was given at
/// all, then nothing.
pub fn search_lexical(
	query: &str,
	corpus: &[Message],
	user_name: Option<&str>,
	category: Option<Category>,
	top_k: usize,
) -> Vec<EvidenceItem> {
	let mut subset = filter_messages(corpus, user_name, category);

	if subset.is_empty() {
		if let Some(name) = user_name {
			subset = filter_messages(corpus, Some(name), None);
		}
	}
	if subset.is_empty() {
		return Vec::new();
	}

	let query_terms = tokenize(query);

	if query_terms.is_empty() {
		return Vec::new();
	}

	let scores = bm25_scores(&query_terms, &subset);
	let mut order = (0..subset.len()).collect::<Vec<_>>();

	// Stable sort keeps corpus order among ties.
	order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

	order.into_iter().take(top_k).map(|i| subset[i].to_evidence()).collect()
}

fn filter_messages<'a>(
	corpus: &'a [Message],
	user_name: Option<&str>,
	category: Option<Category>,
) -> Vec<&'a Message> {
	corpus
		.iter()
		.filter(|m| {
			user_name.is_none_or(|name| m.user_name.trim().eq_ignore_ascii_case(name.trim()))
				&& category.is_none_or(|c| m.category == c)
		})
		.collect()
}

fn tokenize(text: &str) -> Vec<String> {
	text.to_lowercase()
		.split(|c: char| !c.is_alphanumeric())
		.filter(|t| !t.is_empty())
		.map(ToOwned::to_owned)
		.collect()
}

fn bm25_scores(query_terms: &[String], subset: &[&Message]) -> Vec<f64> {
	let docs = subset.iter().map(|m| tokenize(&m.text)).collect::<Vec<_>>();
	let n = docs.len() as f64;
	let avg_len = docs.iter().map(Vec::len).sum::<usize>() as f64 / n;
	let mut doc_freq = HashMap::<&str, usize>::new();

	for doc in &docs {
		let mut seen = doc.iter().map(String::as_str).collect::<Vec<_>>();

		seen.sort_unstable();
		seen.dedup();

		for term in seen {
			*doc_freq.entry(term).or_default() += 1;
		}
	}

	docs.iter()
		.map(|doc| {
			let len = doc.len() as f64;

			query_terms
				.iter()
				.map(|term| {
					let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;

					if df == 0. {
						return 0.;
					}

					let tf = doc.iter().filter(|t| *t == term).count() as f64;
					let idf = (1. + (n - df + 0.5) / (df + 0.5)).ln();

					idf * (tf * (K1 + 1.)) / (tf + K1 * (1. - B + B * len / avg_len))
				})
				.sum()
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn message(id: i64, user_name: &str, category: Category, text: &str) -> Message {
		Message {
			id,
			user_id: None,
			user_name: user_name.to_string(),
			timestamp: id,
			category,
			text: text.to_string(),
		}
	}

	fn corpus() -> Vec<Message> {
		vec![
			message(1, "vikram desai", Category::TravelAccommodation, "Book a villa in Tuscany for August."),
			message(2, "vikram desai", Category::DiningExperiences, "Reserve a table, no peanuts please."),
			message(3, "layla haddad", Category::DiningExperiences, "Dinner for two near the marina."),
			message(4, "layla haddad", Category::AccountFinance, "Update my credit card on file."),
		]
	}

	#[test]
	fn search_lexical_should_rank_matching_terms_first() {
		let corpus = corpus();
		let results = search_lexical("villa in Tuscany", &corpus, None, None, 2);

		assert_eq!(results[0].text, "Book a villa in Tuscany for August.");
	}

	#[test]
	fn search_lexical_should_respect_name_and_category_filters() {
		let corpus = corpus();
		let results =
			search_lexical("dinner", &corpus, Some("layla haddad"), Some(Category::DiningExperiences), 10);

		assert_eq!(results.len(), 1);
		assert_eq!(results[0].text, "Dinner for two near the marina.");
	}

	#[test]
	fn search_lexical_should_fall_back_to_name_only() {
		// No Transport & Mobility messages exist for this member, so the
		// cascade widens to everything they wrote.
		let corpus = corpus();
		let results = search_lexical(
			"chauffeur",
			&corpus,
			Some("vikram desai"),
			Some(Category::TransportMobility),
			10,
		);

		assert_eq!(results.len(), 2);
		assert!(results.iter().all(|item| item.user_name == "vikram desai"));
	}

	#[test]
	fn search_lexical_should_weight_terms_by_subset_frequency() {
		// "massage" saturates the full corpus but is rare inside the
		// member's own messages, where "spa" is the common term. Document
		// frequency must come from the filtered subset, so the lone
		// massage message outranks the spa ones.
		let mut corpus = vec![
			message(1, "layla haddad", Category::PersonalWellness, "Spa day."),
			message(2, "layla haddad", Category::PersonalWellness, "Spa trip."),
			message(3, "layla haddad", Category::PersonalWellness, "Massage soon."),
		];

		for id in 4..10 {
			corpus.push(message(id, "vikram desai", Category::PersonalWellness, "Massage again."));
		}

		let results = search_lexical("spa massage", &corpus, Some("layla haddad"), None, 3);

		assert_eq!(results[0].text, "Massage soon.");
	}

	#[test]
	fn search_lexical_should_return_empty_for_unknown_name() {
		let corpus = corpus();

		assert!(search_lexical("dinner", &corpus, Some("nobody"), None, 10).is_empty());
	}

	#[test]
	fn search_lexical_should_return_empty_for_blank_query() {
		let corpus = corpus();

		assert!(search_lexical("   ", &corpus, None, None, 10).is_empty());
	}

	#[test]
	fn search_lexical_should_cap_at_top_k() {
		let corpus = corpus();

		assert_eq!(search_lexical("a for my the", &corpus, None, None, 2).len(), 2);
	}
}
