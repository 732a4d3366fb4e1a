//! Keyword classification of jams.
//!
//! Auto-classification only ever promotes a jam to tabletop: the keyword
//! list describes the tabletop vocabulary, and anything that misses stays
//! unclassified until a human says otherwise. Digital is never assigned
//! automatically, which keeps false positives out of the tabletop list at
//! the cost of a manual pass over the rest.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::GameType;

/// Built-in tabletop vocabulary, matched case-insensitively as
/// substrings. Human-maintained; extend it via a keyword file rather
/// than in code.
pub const DEFAULT_TABLETOP_KEYWORDS: &[&str] = &[
    "analog game",
    "analogue game",
    "belonging outside belonging",
    "board game",
    "card game",
    "fitd",
    "gmless",
    "megadungeon",
    "osr",
    "pamphlet",
    "pbta",
    "physical game",
    "srd",
    "sword dream",
    "sworddream",
    "system reference document",
    "tabletop",
    "ttrpg",
];

/// Keyword list the classifier scans with. Loadable from a TOML file
/// with a `tabletop` string array; defaults to the built-in list.
#[derive(Debug, Clone, Deserialize)]
pub struct Keywords {
    tabletop: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            tabletop: DEFAULT_TABLETOP_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
        }
    }
}

impl Keywords {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file: {}", path.display()))?;
        let mut keywords: Keywords = toml::from_str(&text)
            .with_context(|| format!("Failed to parse keyword file: {}", path.display()))?;
        for kw in &mut keywords.tabletop {
            *kw = kw.to_lowercase();
        }
        Ok(keywords)
    }

    /// Keyword pass over a jam's textual fields. Deterministic: fixed
    /// input and a fixed list always produce the same answer.
    pub fn classify(&self, name: &str, description: &str, hashtag: &str) -> GameType {
        let haystack = format!("{} {} {}", name, description, hashtag).to_lowercase();
        if self.tabletop.iter().any(|kw| haystack.contains(kw.as_str())) {
            GameType::Tabletop
        } else {
            GameType::Unclassified
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_hit_classifies_tabletop() {
        let kw = Keywords::default();
        assert_eq!(
            kw.classify("Board Game Jam 2024", "", ""),
            GameType::Tabletop
        );
        assert_eq!(
            kw.classify("Spring Jam", "Make a one-page TTRPG in a weekend", ""),
            GameType::Tabletop
        );
        assert_eq!(kw.classify("Winter Jam", "", "#osrjam"), GameType::Tabletop);
    }

    #[test]
    fn test_keyword_miss_stays_unclassified() {
        let kw = Keywords::default();
        assert_eq!(kw.classify("Pixel Art Jam", "", ""), GameType::Unclassified);
        // digital-sounding text is still never auto-assigned
        assert_eq!(
            kw.classify("Unity Jam", "Make a video game in 48 hours", ""),
            GameType::Unclassified
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let kw = Keywords::default();
        assert_eq!(
            kw.classify("ANALOG GAME JAM", "", ""),
            GameType::Tabletop
        );
    }

    #[test]
    fn test_keyword_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.toml");
        fs::write(&path, "tabletop = [\"Solitaire\"]\n").unwrap();

        let kw = Keywords::load(&path).unwrap();
        assert_eq!(
            kw.classify("Solitaire Design Jam", "", ""),
            GameType::Tabletop
        );
        // the built-in list no longer applies
        assert_eq!(
            kw.classify("Tabletop Jam", "", ""),
            GameType::Unclassified
        );
    }
}
