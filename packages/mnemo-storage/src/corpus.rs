use std::{fs, path::Path};

use mnemo_domain::{EntityRegistry, Message};

use crate::{Error, Result};

/// The message store and entity registry, loaded once at startup. Both are
/// read-only for the lifetime of the process; a load failure is fatal on
/// purpose so the service never starts degraded.
#[derive(Debug)]
pub struct Corpus {
	messages: Vec<Message>,
	registry: EntityRegistry,
}
impl Corpus {
	pub fn load(cfg: &mnemo_config::Corpus) -> Result<Self> {
		let messages: Vec<Message> = load_json(Path::new(&cfg.messages_path))?;
		let registry: EntityRegistry = load_json(Path::new(&cfg.registry_path))?;

		Ok(Self { messages, registry })
	}

	pub fn new(messages: Vec<Message>, registry: EntityRegistry) -> Self {
		Self { messages, registry }
	}

	pub fn messages(&self) -> &[Message] {
		&self.messages
	}

	pub fn registry(&self) -> &EntityRegistry {
		&self.registry
	}
}

fn load_json<T>(path: &Path) -> Result<T>
where
	T: serde::de::DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	serde_json::from_str(&raw).map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })
}
