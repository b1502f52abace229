use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mnemo_indexer::Args::parse();

	mnemo_indexer::run(args).await
}
