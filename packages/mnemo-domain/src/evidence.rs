use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Category;

/// A retrieved message handed to answer generation. Two items with identical
/// `text` are the same evidence regardless of which channel produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
	pub text: String,
	pub user_name: String,
	pub category: Category,
	pub timestamp: i64,
}

/// Ordered, text-deduplicated evidence. Insertion order is significant:
/// lexical results are pushed before semantic ones, so on a text collision
/// the lexical entry's metadata wins.
#[derive(Clone, Debug, Default)]
pub struct EvidenceSet {
	items: Vec<EvidenceItem>,
	seen: HashSet<String>,
}
impl EvidenceSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `false` when the item's text was already present; later
	/// duplicates are discarded along with their metadata.
	pub fn push(&mut self, item: EvidenceItem) -> bool {
		if self.seen.contains(&item.text) {
			return false;
		}

		self.seen.insert(item.text.clone());
		self.items.push(item);

		true
	}

	pub fn from_channels(lexical: Vec<EvidenceItem>, semantic: Vec<EvidenceItem>) -> Self {
		let mut set = Self::new();

		for item in lexical.into_iter().chain(semantic) {
			set.push(item);
		}

		set
	}

	pub fn items(&self) -> &[EvidenceItem] {
		&self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn into_items(self) -> Vec<EvidenceItem> {
		self.items
	}
}
