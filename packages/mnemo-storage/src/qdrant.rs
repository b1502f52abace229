use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{
		Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, Query,
		QueryPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder, value::Kind,
	},
};

use mnemo_domain::{Category, EvidenceItem, Message};

use crate::{Error, Result};

/// The vector-index collaborator: one dense cosine vector per message, keyed
/// by message id, with equality-filterable `user_name`/`category` payload
/// fields.
pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}

/// Exact-match payload filter. Both fields optional; empty compiles to no
/// filter at all (full index scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageFilter {
	pub user_name: Option<String>,
	pub category: Option<String>,
}
impl MessageFilter {
	pub fn is_empty(&self) -> bool {
		self.user_name.is_none() && self.category.is_none()
	}

	fn to_qdrant(&self) -> Option<Filter> {
		let mut conditions = Vec::new();

		if let Some(user_name) = &self.user_name {
			conditions.push(Condition::matches("user_name", user_name.clone()));
		}
		if let Some(category) = &self.category {
			conditions.push(Condition::matches("category", category.clone()));
		}

		if conditions.is_empty() { None } else { Some(Filter::all(conditions)) }
	}
}

impl QdrantStore {
	pub fn new(cfg: &mnemo_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection when missing. Used by the indexer; the query
	/// path assumes the collection exists.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
				),
			)
			.await?;

		Ok(())
	}

	pub async fn upsert_messages(
		&self,
		messages: &[Message],
		vectors: &[Vec<f32>],
	) -> Result<()> {
		if messages.len() != vectors.len() {
			return Err(Error::InvalidArgument(
				"Message and vector counts must match.".to_string(),
			));
		}

		let mut points = Vec::with_capacity(messages.len());

		for (message, vector) in messages.iter().zip(vectors) {
			if vector.len() != self.vector_dim as usize {
				return Err(Error::InvalidArgument(format!(
					"Vector for message {} has dimension {}, expected {}.",
					message.id,
					vector.len(),
					self.vector_dim,
				)));
			}

			let id = u64::try_from(message.id).map_err(|_| {
				Error::InvalidArgument(format!("Message id {} is negative.", message.id))
			})?;
			let mut payload = Payload::new();

			for (key, value) in encode_payload(message) {
				payload.insert(key, value);
			}

			points.push(PointStruct::new(id, vector.clone(), payload));
		}

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
			.await?;

		Ok(())
	}

	/// Top-k nearest neighbors under the given filter. Points with missing
	/// or malformed payload are skipped rather than failing the query.
	pub async fn nearest(
		&self,
		vector: &[f32],
		filter: &MessageFilter,
		k: u64,
	) -> Result<Vec<EvidenceItem>> {
		let mut query = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.with_payload(true)
			.limit(k);

		if let Some(filter) = filter.to_qdrant() {
			query = query.filter(filter);
		}

		let response = self.client.query(query).await?;

		Ok(response.result.iter().filter_map(|point| decode_payload(&point.payload)).collect())
	}
}

/// Point payload for one message. `user_id` rides along as pass-through
/// metadata; retrieval never filters on it and `decode_payload` ignores it.
fn encode_payload(message: &Message) -> HashMap<String, Value> {
	let mut payload = HashMap::from([
		("user_name".to_string(), Value::from(message.user_name.clone())),
		("category".to_string(), Value::from(message.category.as_str())),
		("timestamp".to_string(), Value::from(message.timestamp)),
		("text".to_string(), Value::from(message.text.clone())),
	]);

	if let Some(user_id) = message.user_id {
		payload.insert("user_id".to_string(), Value::from(user_id));
	}

	payload
}

fn decode_payload(payload: &HashMap<String, Value>) -> Option<EvidenceItem> {
	let text = payload_str(payload, "text")?;

	if text.is_empty() {
		return None;
	}

	Some(EvidenceItem {
		text,
		user_name: payload_str(payload, "user_name")?,
		category: Category::parse(&payload_str(payload, "category")?)?,
		timestamp: payload_i64(payload, "timestamp")?,
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(value) => Some(value.clone()),
		_ => None,
	}
}

fn payload_i64(payload: &HashMap<String, Value>, key: &str) -> Option<i64> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::IntegerValue(value) => Some(*value),
		Kind::DoubleValue(value) => Some(*value as i64),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_payload() -> HashMap<String, Value> {
		HashMap::from([
			("text".to_string(), Value::from("Layla mentioned her husband's name is Omar.")),
			("user_name".to_string(), Value::from("Layla Haddad")),
			("category".to_string(), Value::from("Personal & Wellness")),
			("timestamp".to_string(), Value::from(42_i64)),
		])
	}

	#[test]
	fn encoded_payloads_carry_user_id_and_decode_back() {
		let message = Message {
			id: 1,
			user_id: Some(7),
			user_name: "Layla Haddad".to_string(),
			timestamp: 42,
			category: Category::PersonalWellness,
			text: "Layla mentioned her husband's name is Omar.".to_string(),
		};
		let payload = encode_payload(&message);

		assert_eq!(payload.get("user_id"), Some(&Value::from(7_i64)));

		let item = decode_payload(&payload).expect("decode failed");

		assert_eq!(item, message.to_evidence());
	}

	#[test]
	fn encoded_payloads_omit_user_id_when_absent() {
		let message = Message {
			id: 2,
			user_id: None,
			user_name: "Vikram Desai".to_string(),
			timestamp: 7,
			category: Category::TravelAccommodation,
			text: "Book a villa in Tuscany.".to_string(),
		};

		assert!(!encode_payload(&message).contains_key("user_id"));
	}

	#[test]
	fn decodes_a_complete_payload() {
		let item = decode_payload(&sample_payload()).expect("decode failed");

		assert_eq!(item.user_name, "Layla Haddad");
		assert_eq!(item.category, Category::PersonalWellness);
		assert_eq!(item.timestamp, 42);
	}

	#[test]
	fn skips_payloads_with_empty_or_missing_text() {
		let mut payload = sample_payload();

		payload.insert("text".to_string(), Value::from(""));
		assert!(decode_payload(&payload).is_none());

		payload.remove("text");
		assert!(decode_payload(&payload).is_none());
	}

	#[test]
	fn skips_payloads_with_unknown_categories() {
		let mut payload = sample_payload();

		payload.insert("category".to_string(), Value::from("Mystery"));
		assert!(decode_payload(&payload).is_none());
	}

	#[test]
	fn empty_filter_compiles_to_no_filter() {
		assert!(MessageFilter::default().to_qdrant().is_none());

		let filter = MessageFilter {
			user_name: Some("Vikram Desai".to_string()),
			category: None,
		};
		assert!(filter.to_qdrant().is_some());
	}
}
