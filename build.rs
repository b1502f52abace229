fn main() -> Result<(), Box<dyn std::error::Error>> {
	use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

	// Emitter falls back to idempotent defaults when the git context is
	// unavailable (e.g. release tarball builds).
	Emitter::default()
		.add_instructions(&GitclBuilder::default().sha(true).build()?)?
		.add_instructions(&CargoBuilder::default().target_triple(true).build()?)?
		.emit()?;

	Ok(())
}
