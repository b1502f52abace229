//! One-shot corpus indexer: embeds every message and upserts the vectors
//! into qdrant. Run it whenever the message corpus changes; upserts are
//! keyed by message id, so re-running is safe.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mnemo_storage::{corpus::Corpus, qdrant::QdrantStore};

const EMBED_BATCH: usize = 64;

#[derive(Debug, Parser)]
#[command(
	version = mnemo_cli::VERSION,
	rename_all = "kebab",
	styles = mnemo_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = mnemo_config::load(&args.config)?;
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let corpus = Corpus::load(&config.corpus)?;
	let qdrant = QdrantStore::new(&config.storage.qdrant)?;

	qdrant.ensure_collection().await?;

	let mut indexed = 0;

	for batch in corpus.messages().chunks(EMBED_BATCH) {
		let texts = batch.iter().map(|m| m.text.clone()).collect::<Vec<_>>();
		let vectors = mnemo_providers::embedding::embed(&config.providers.embedding, &texts).await?;

		qdrant.upsert_messages(batch, &vectors).await?;

		indexed += batch.len();

		info!("indexed {indexed}/{} messages.", corpus.messages().len());
	}

	info!(
		collection = %config.storage.qdrant.collection,
		total = indexed,
		"Indexing complete."
	);

	Ok(())
}
