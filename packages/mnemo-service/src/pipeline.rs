//! Hybrid retrieval fan-out and fusion.

use color_eyre::eyre::eyre;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::{BoxFuture, MnemoService, ServiceError, ServiceResult, lexical};
use mnemo_domain::{EvidenceItem, EvidenceSet, ResolvedConstraints};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Channel {
	Lexical,
	Semantic,
}

impl MnemoService {
	/// Runs both retrieval channels for every category pass concurrently
	/// and fuses the results. One pass per resolved category, or a single
	/// unconstrained pass when classification produced none.
	///
	/// Fusion keeps deterministic order independent of completion order:
	/// lexical passes in category order, then semantic passes in category
	/// order, text-deduplicated with first occurrence winning.
	pub async fn retrieve(&self, query: &str, constraints: &ResolvedConstraints) -> EvidenceSet {
		let embedding = match self.embed_query(query).await {
			Ok(embedding) => Some(embedding),
			Err(err) => {
				warn!("embedding unavailable, semantic channel disabled: {err}");

				None
			},
		};
		let passes = if constraints.categories.is_empty() {
			vec![None]
		} else {
			constraints.categories.iter().copied().map(Some).collect()
		};
		let user_name = constraints.user_name.as_deref();
		let lexical_top_k = self.cfg.retrieval.lexical_top_k as usize;
		let semantic_top_k = self.cfg.retrieval.semantic_top_k as u64;
		let mut tasks: Vec<BoxFuture<'_, (Channel, usize, Vec<EvidenceItem>)>> = Vec::new();

		for (pass, category) in passes.iter().copied().enumerate() {
			tasks.push(Box::pin(async move {
				let items = lexical::search_lexical(
					query,
					self.corpus.messages(),
					user_name,
					category,
					lexical_top_k,
				);

				(Channel::Lexical, pass, items)
			}));

			if let Some(embedding) = embedding.as_deref() {
				tasks.push(Box::pin(async move {
					let items =
						self.search_semantic(embedding, user_name, category, semantic_top_k).await;

					(Channel::Semantic, pass, items)
				}));
			}
		}

		let mut lexical_slots = vec![Vec::new(); passes.len()];
		let mut semantic_slots = vec![Vec::new(); passes.len()];

		for (channel, pass, items) in join_all(tasks).await {
			match channel {
				Channel::Lexical => lexical_slots[pass] = items,
				Channel::Semantic => semantic_slots[pass] = items,
			}
		}

		let set = EvidenceSet::from_channels(
			lexical_slots.into_iter().flatten().collect(),
			semantic_slots.into_iter().flatten().collect(),
		);

		debug!("retrieved {} evidence items over {} passes", set.len(), passes.len());

		set
	}

	pub(crate) async fn embed_query(&self, query: &str) -> ServiceResult<Vec<f32>> {
		let texts = [query.to_string()];
		let mut vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.is_empty() {
			Err(eyre!("embedding provider returned no vector"))?;
		}

		let vector = vectors.swap_remove(0);
		let expect = self.cfg.storage.qdrant.vector_dim as usize;

		if vector.len() != expect {
			return Err(ServiceError::Provider {
				message: format!(
					"embedding dimension mismatch, expected {expect} got {}",
					vector.len()
				),
			});
		}

		Ok(vector)
	}
}
