use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Closed topic taxonomy. Every stored message carries exactly one of these
/// labels, and query interpretation clamps anything outside the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	TravelAccommodation,
	DiningExperiences,
	PersonalWellness,
	AccountFinance,
	TransportMobility,
}
impl Category {
	pub const ALL: [Self; 5] = [
		Self::TravelAccommodation,
		Self::DiningExperiences,
		Self::PersonalWellness,
		Self::AccountFinance,
		Self::TransportMobility,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::TravelAccommodation => "Travel & Accommodation",
			Self::DiningExperiences => "Dining & Experiences",
			Self::PersonalWellness => "Personal & Wellness",
			Self::AccountFinance => "Account & Finance",
			Self::TransportMobility => "Transport & Mobility",
		}
	}

	/// Lenient label parse used at the interpreter boundary: whitespace is
	/// trimmed and case ignored. Unknown labels yield `None` and are dropped
	/// by the caller rather than passed through.
	pub fn parse(label: &str) -> Option<Self> {
		let trimmed = label.trim();

		Self::ALL.into_iter().find(|category| trimmed.eq_ignore_ascii_case(category.as_str()))
	}
}
impl std::fmt::Display for Category {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl Serialize for Category {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for Category {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let label = String::deserialize(deserializer)?;

		Self::parse(&label)
			.ok_or_else(|| de::Error::custom(format!("Unknown category label: {label}.")))
	}
}
