//! The closed set of languages the parser registry (§4.D) understands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cobol,
    Assembly,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Cobol => "cobol",
            Language::Assembly => "assembly",
        }
    }

    /// Language-declared entry-point symbol names used by dead-code
    /// analysis (§9 Open Questions: "configurable list of entry symbol
    /// names per language").
    pub fn default_entry_points(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["main", "__main__"],
            Language::C => &["main"],
            Language::Cobol => &["MAIN-PARAGRAPH", "MAIN-PROCEDURE"],
            Language::Assembly => &["_start", "main"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
