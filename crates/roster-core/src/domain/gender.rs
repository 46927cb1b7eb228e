use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "Autre")]
    Other,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "Autre",
        }
    }

    /// Accepts the stored codes plus the French and English labels used by
    /// the registration form and spreadsheet exports.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed {
            "M" | "H" => return Some(Gender::Male),
            "F" => return Some(Gender::Female),
            _ => {}
        }
        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "masculin" | "homme" | "male" | "man" => Some(Gender::Male),
            "féminin" | "feminin" | "femme" | "female" | "woman" => Some(Gender::Female),
            "autre" | "other" | "préfère ne pas dire" | "prefere ne pas dire" => {
                Some(Gender::Other)
            }
            _ => None,
        }
    }
}
