use std::sync::Arc;

use mnemo_service::MnemoService;
use mnemo_storage::{corpus::Corpus, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MnemoService>,
}
impl AppState {
	pub fn new(config: mnemo_config::Config) -> color_eyre::Result<Self> {
		let corpus = Corpus::load(&config.corpus)?;
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = MnemoService::new(config, corpus, qdrant);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: MnemoService) -> Self {
		Self { service: Arc::new(service) }
	}
}
