pub mod answer;
pub mod interpret;
pub mod lexical;
pub mod pipeline;
pub mod prompt;
pub mod semantic;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use answer::{AnswerResponse, QuestionRequest};
pub use lexical::search_lexical;
pub use prompt::build_answer_prompt;

use mnemo_config::{AnswerProviderConfig, Config, EmbeddingProviderConfig, LlmProviderConfig};
use mnemo_domain::EvidenceItem;
use mnemo_providers::{answer as answer_api, classify, embedding};
use mnemo_storage::{
	corpus::Corpus,
	qdrant::{MessageFilter, QdrantStore},
};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ClassifierProvider
where
	Self: Send + Sync,
{
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait AnswerProvider
where
	Self: Send + Sync,
{
	fn answer<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

/// The vector-index collaborator boundary. The default implementation is
/// backed by qdrant; tests substitute an in-memory index.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		filter: &'a MessageFilter,
		k: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<EvidenceItem>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Provider { message: String },
	Index { message: String },
}
impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Index { message } => write!(f, "Index error: {message}"),
		}
	}
}
impl std::error::Error for ServiceError {}
impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub classifier: Arc<dyn ClassifierProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub answerer: Arc<dyn AnswerProvider>,
}
impl Providers {
	pub fn new(
		classifier: Arc<dyn ClassifierProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
		answerer: Arc<dyn AnswerProvider>,
	) -> Self {
		Self { classifier, embedding, answerer }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { classifier: provider.clone(), embedding: provider.clone(), answerer: provider }
	}
}

pub struct MnemoService {
	pub cfg: Config,
	pub corpus: Corpus,
	pub providers: Providers,
	pub index: Arc<dyn VectorIndex>,
}
impl MnemoService {
	pub fn new(cfg: Config, corpus: Corpus, qdrant: QdrantStore) -> Self {
		Self {
			cfg,
			corpus,
			providers: Providers::default(),
			index: Arc::new(QdrantIndex::new(qdrant)),
		}
	}

	pub fn with_collaborators(
		cfg: Config,
		corpus: Corpus,
		providers: Providers,
		index: Arc<dyn VectorIndex>,
	) -> Self {
		Self { cfg, corpus, providers, index }
	}
}

struct DefaultProviders;

impl ClassifierProvider for DefaultProviders {
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(classify::classify(cfg, messages))
	}
}
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl AnswerProvider for DefaultProviders {
	fn answer<'a>(
		&'a self,
		cfg: &'a AnswerProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(answer_api::answer(cfg, prompt))
	}
}

pub struct QdrantIndex {
	store: QdrantStore,
}
impl QdrantIndex {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}
}
impl VectorIndex for QdrantIndex {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		filter: &'a MessageFilter,
		k: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<EvidenceItem>>> {
		Box::pin(async move { Ok(self.store.nearest(vector, filter, k).await?) })
	}
}
