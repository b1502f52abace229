pub mod category;
pub mod constraints;
pub mod evidence;
pub mod message;
pub mod resolve;

pub use category::Category;
pub use constraints::{MAX_CATEGORIES, QueryConstraints, ResolvedConstraints};
pub use evidence::{EvidenceItem, EvidenceSet};
pub use message::Message;
pub use resolve::{DEFAULT_RESOLVE_THRESHOLD, EntityRegistry, resolve};
