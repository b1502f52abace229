use serde::{Deserialize, Serialize};

use crate::{Category, EvidenceItem};

/// One corpus entry. The corpus is loaded once per process lifetime and never
/// mutated afterwards; concurrent queries read it without locking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
	pub id: i64,
	#[serde(default)]
	pub user_id: Option<i64>,
	pub user_name: String,
	/// Opaque ordinal; higher means more recent. Printed raw in prompts.
	pub timestamp: i64,
	pub category: Category,
	/// The upstream message store names this field `message`.
	#[serde(alias = "message")]
	pub text: String,
}
impl Message {
	pub fn to_evidence(&self) -> EvidenceItem {
		EvidenceItem {
			text: self.text.clone(),
			user_name: self.user_name.clone(),
			category: self.category,
			timestamp: self.timestamp,
		}
	}
}
