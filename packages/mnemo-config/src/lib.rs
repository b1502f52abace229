mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AnswerProviderConfig, Config, Corpus, EmbeddingProviderConfig, LlmProviderConfig, Providers,
	Qdrant, Retrieval, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, path) in [
		("corpus.messages_path", &cfg.corpus.messages_path),
		("corpus.registry_path", &cfg.corpus.registry_path),
	] {
		if path.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.answerer.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.answerer.max_tokens must be greater than zero.".to_string(),
		});
	}

	for (label, top_k) in [
		("retrieval.lexical_top_k", cfg.retrieval.lexical_top_k),
		("retrieval.semantic_top_k", cfg.retrieval.semantic_top_k),
		("retrieval.prompt_top_k", cfg.retrieval.prompt_top_k),
	] {
		if top_k == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if !cfg.retrieval.resolve_threshold.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.resolve_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=100.0).contains(&cfg.retrieval.resolve_threshold) {
		return Err(Error::Validation {
			message: "retrieval.resolve_threshold must be in the range 0.0-100.0.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("classifier", &cfg.providers.classifier.api_key),
		("answerer", &cfg.providers.answerer.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}
