use serde_json::{Value, json};
use tracing::{info, warn};

use crate::MnemoService;
use mnemo_domain::{self as domain, Category, MAX_CATEGORIES, QueryConstraints, ResolvedConstraints};

const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are a precise and reasoning-based information extractor.

Your task:
1. Identify the user_name mentioned in the query (if any).
2. Classify the query into up to two of the following 5 categories, ordered by relevance:
   - Travel & Accommodation: hotels, flights, villas, itineraries, trip bookings, or travel arrangements.
   - Dining & Experiences: restaurant bookings, dietary or allergy requests, concerts, cultural or social events, entertainment, or art-related experiences.
   - Personal & Wellness: spa, health, beauty, gifting, security, personal trainers, or wellness-related needs.
   - Account & Finance: payments, invoices, refunds, credit cards, or profile/contact updates.
   - Transport & Mobility: cars, drivers, chauffeurs, limousines, or other ground transport not part of a larger travel booking.

Classification Rules:
- Always return a list containing one or two categories.
- The first category must be the one most directly related to the query (explicit meaning).
- The second category, if applicable, should reflect a logical or contextual relationship that can be inferred from the situation.
  - Example: "What are Vikram's dietary allergies?" -> ["Dining & Experiences", "Personal & Wellness"]
  - Example: "What are Lorenzo's pillow preferences?" -> ["Personal & Wellness", "Travel & Accommodation"]
- If no secondary category makes sense, return only one.
- Do not add reasoning text - return only JSON.

Return a JSON object with exactly these fields:
{"user_name": "<full name or null>", "category": ["<category>", ...]}"#;

impl MnemoService {
	/// Derives resolved query constraints. Interpretation is best-effort
	/// and never fails; any classifier or parsing problem degrades to
	/// empty constraints.
	pub async fn interpret(&self, query: &str) -> ResolvedConstraints {
		let constraints = self.extract_constraints(query).await;

		self.resolve_constraints(constraints)
	}

	async fn extract_constraints(&self, query: &str) -> QueryConstraints {
		let messages = build_classifier_messages(query);

		match self
			.providers
			.classifier
			.classify(&self.cfg.providers.classifier, &messages)
			.await
		{
			Ok(raw) => parse_constraints(&raw),
			Err(err) => {
				warn!("classifier unavailable, proceeding unconstrained: {err}");

				QueryConstraints::default()
			},
		}
	}

	fn resolve_constraints(&self, constraints: QueryConstraints) -> ResolvedConstraints {
		let QueryConstraints { raw_name, categories } = constraints;
		let mut resolution_score = 0.;
		let user_name = raw_name.as_deref().and_then(|raw| {
			let (canonical, score) = domain::resolve(
				raw,
				self.corpus.registry(),
				self.cfg.retrieval.resolve_threshold,
			);

			resolution_score = score;

			match canonical {
				Some(canonical) => {
					if !canonical.eq_ignore_ascii_case(raw.trim()) {
						info!("resolved queried name {raw:?} to {canonical:?} ({score:.1})");
					}

					Some(canonical.to_lowercase())
				},
				None => {
					info!("no registry entry matched {raw:?} (best score {score:.1})");

					None
				},
			}
		});

		ResolvedConstraints { user_name, categories, resolution_score }
	}
}

pub(crate) fn build_classifier_messages(query: &str) -> Vec<Value> {
	vec![
		json!({ "role": "system", "content": CLASSIFIER_SYSTEM_PROMPT }),
		json!({ "role": "user", "content": format!("Query: {query}") }),
	]
}

fn parse_constraints(raw: &Value) -> QueryConstraints {
	let raw_name = raw
		.get("user_name")
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(ToOwned::to_owned);
	let mut categories = match raw.get("category") {
		Some(Value::String(s)) => vec![s.as_str()],
		Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
		_ => Vec::new(),
	}
	.into_iter()
	.filter_map(Category::parse)
	.collect::<Vec<_>>();

	categories.truncate(MAX_CATEGORIES);

	QueryConstraints { raw_name, categories }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_constraints_should_work() {
		let parsed = parse_constraints(&json!({
			"user_name": " Vikram Desai ",
			"category": ["Transport & Mobility", "Travel & Accommodation"],
		}));

		assert_eq!(parsed.raw_name.as_deref(), Some("Vikram Desai"));
		assert_eq!(parsed.categories, [Category::TransportMobility, Category::TravelAccommodation]);
	}

	#[test]
	fn parse_constraints_should_accept_scalar_category() {
		let parsed = parse_constraints(&json!({ "user_name": null, "category": "Account & Finance" }));

		assert!(parsed.raw_name.is_none());
		assert_eq!(parsed.categories, [Category::AccountFinance]);
	}

	#[test]
	fn parse_constraints_should_drop_unknown_categories_and_cap() {
		let parsed = parse_constraints(&json!({
			"category": ["Shopping", "Dining & Experiences", "Personal & Wellness", "Account & Finance"],
		}));

		assert_eq!(parsed.categories, [Category::DiningExperiences, Category::PersonalWellness]);
	}

	#[test]
	fn parse_constraints_should_tolerate_garbage() {
		assert_eq!(parse_constraints(&json!("not an object")), QueryConstraints::default());
		assert_eq!(parse_constraints(&json!({ "user_name": 42, "category": 7 })), QueryConstraints::default());
	}
}
