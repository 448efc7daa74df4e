use serde::{Deserialize, Serialize};

/// Market region a ticker universe belongs to.
///
/// Variants are declared in alphabetical order of their names, so the derived
/// `Ord` sorts regions exactly like the Region column of a saved watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "ASIA")]
    Asia,
    #[serde(rename = "DE")]
    De,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "US")]
    Us,
}

impl Region {
    pub fn name(&self) -> &str {
        match self {
            Region::Asia => "ASIA",
            Region::De => "DE",
            Region::Eu => "EU",
            Region::Us => "US",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "DE" => Ok(Region::De),
            "EU" => Ok(Region::Eu),
            "ASIA" => Ok(Region::Asia),
            other => Err(format!("Unknown region: {}", other)),
        }
    }
}
