use serde::{Deserialize, Serialize};

/// Minimum score (0–100) for a match to count as confident.
pub const DEFAULT_RESOLVE_THRESHOLD: f32 = 85.0;

/// Canonical person names, loaded once at startup and read-only afterwards.
/// Order matters: score ties resolve to the first-encountered entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRegistry {
	names: Vec<String>,
}
impl EntityRegistry {
	pub fn new(names: Vec<String>) -> Self {
		Self { names }
	}

	pub fn names(&self) -> &[String] {
		&self.names
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

/// Maps a free-text name mention to a canonical registry name.
///
/// Token-positional matching: first tokens always compared, last tokens
/// averaged in when both names have at least two tokens, joined middle
/// tokens averaged in when both have at least three. Returns the best
/// candidate when its score reaches `threshold`, otherwise `(None, score)`.
/// Fully deterministic for identical inputs; never invents a name absent
/// from the registry.
pub fn resolve<'a>(
	query_name: &str,
	registry: &'a EntityRegistry,
	threshold: f32,
) -> (Option<&'a str>, f32) {
	let query_tokens = tokenize(query_name);

	if query_tokens.is_empty() {
		return (None, 0.0);
	}

	let mut best_match = None;
	let mut best_score = 0.0_f32;

	for candidate in registry.names() {
		let candidate_tokens = tokenize(candidate);

		if candidate_tokens.is_empty() {
			continue;
		}

		let score = candidate_score(&query_tokens, &candidate_tokens);

		// Strict improvement keeps the first-encountered candidate on ties.
		if score > best_score {
			best_score = score;
			best_match = Some(candidate.as_str());
		}
	}

	if best_score >= threshold { (best_match, best_score) } else { (None, best_score) }
}

fn candidate_score(query: &[String], candidate: &[String]) -> f32 {
	let first = ratio(&query[0], &candidate[0]);

	if query.len() < 2 || candidate.len() < 2 {
		return first;
	}

	let last = ratio(&query[query.len() - 1], &candidate[candidate.len() - 1]);

	if query.len() < 3 || candidate.len() < 3 {
		return (first + last) / 2.0;
	}

	let middle = ratio(
		&query[1..query.len() - 1].join(" "),
		&candidate[1..candidate.len() - 1].join(" "),
	);

	(first + middle + last) / 3.0
}

/// Normalized indel similarity on the 0–100 scale: `100 * (1 - d / (|a| +
/// |b|))` where `d` counts insertions and deletions only. Equivalent to
/// `200 * lcs(a, b) / (|a| + |b|)`.
fn ratio(a: &str, b: &str) -> f32 {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();
	let total = a.len() + b.len();

	if total == 0 {
		return 100.0;
	}

	(200.0 * lcs_len(&a, &b) as f32) / total as f32
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
	let mut row = vec![0_usize; b.len() + 1];

	for &ch_a in a {
		let mut diagonal = 0;

		for (j, &ch_b) in b.iter().enumerate() {
			let above = row[j + 1];

			row[j + 1] = if ch_a == ch_b { diagonal + 1 } else { above.max(row[j]) };
			diagonal = above;
		}
	}

	row[b.len()]
}

fn tokenize(name: &str) -> Vec<String> {
	normalize(name).split_whitespace().map(str::to_string).collect()
}

/// Lowercase, collapse apostrophes/backticks/hyphens to spaces.
fn normalize(name: &str) -> String {
	name.to_lowercase()
		.chars()
		.map(|ch| if matches!(ch, '\'' | '\u{2019}' | '`' | '-') { ' ' } else { ch })
		.collect()
}
