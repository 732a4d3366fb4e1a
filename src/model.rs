use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

pub const ITCH_BASE_URL: &str = "https://itch.io";

const SECS_PER_DAY: i64 = 86_400;

/// Classification of a jam. Stored in SQLite as the integer code and
/// mirrored by the seeded `game_types` lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    Unclassified = 0,
    Tabletop = 1,
    Digital = 2,
}

impl GameType {
    pub const ALL: &'static [GameType] = &[
        GameType::Unclassified,
        GameType::Tabletop,
        GameType::Digital,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(GameType::Unclassified),
            1 => Some(GameType::Tabletop),
            2 => Some(GameType::Digital),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameType::Unclassified => "unclassified",
            GameType::Tabletop => "tabletop",
            GameType::Digital => "digital",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "ttrpg" has always been accepted as a synonym for tabletop
        match s.to_ascii_lowercase().as_str() {
            "unclassified" => Ok(GameType::Unclassified),
            "tabletop" | "ttrpg" => Ok(GameType::Tabletop),
            "digital" => Ok(GameType::Digital),
            _ => Err(StoreError::InvalidGameType(s.to_string())),
        }
    }
}

/// An individual or group credited as host of a jam. The id is the
/// itch.io profile slug (`<id>.itch.io`), assigned by the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub name: String,
}

/// A single game jam as stored in the database, owners resolved.
#[derive(Debug, Clone)]
pub struct Jam {
    pub id: String,
    pub name: String,
    /// Start of the jam, epoch seconds UTC.
    pub start_ts: i64,
    pub duration_days: i64,
    pub gametype: GameType,
    pub hashtag: Option<String>,
    pub description: Option<String>,
    pub owners: Vec<Owner>,
}

impl Jam {
    pub fn end_ts(&self) -> i64 {
        self.start_ts + self.duration_days * SECS_PER_DAY
    }

    pub fn url(&self) -> String {
        format!("{}/jam/{}", ITCH_BASE_URL, self.id)
    }

    pub fn owner_ids(&self) -> String {
        self.owners
            .iter()
            .map(|o| o.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A crawled jam before classification, as handed to the store.
/// All ids are assigned by the site, never generated here.
#[derive(Debug, Clone, Default)]
pub struct JamDraft {
    pub id: String,
    pub name: String,
    pub start_ts: i64,
    pub duration_days: i64,
    pub hashtag: Option<String>,
    pub description: Option<String>,
    /// `(owner_id, owner_name)` pairs in page order.
    pub owners: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gametype_codes_round_trip() {
        for gt in GameType::ALL {
            assert_eq!(GameType::from_code(gt.code()), Some(*gt));
        }
        assert_eq!(GameType::from_code(3), None);
        assert_eq!(GameType::from_code(-1), None);
    }

    #[test]
    fn test_gametype_from_str() {
        assert_eq!("tabletop".parse::<GameType>().unwrap(), GameType::Tabletop);
        assert_eq!("TTRPG".parse::<GameType>().unwrap(), GameType::Tabletop);
        assert_eq!("digital".parse::<GameType>().unwrap(), GameType::Digital);
        assert_eq!(
            "unclassified".parse::<GameType>().unwrap(),
            GameType::Unclassified
        );
        assert!(matches!(
            "not-a-real-type".parse::<GameType>(),
            Err(StoreError::InvalidGameType(_))
        ));
    }

    #[test]
    fn test_gametype_display() {
        assert_eq!(GameType::Tabletop.to_string(), "tabletop");
        assert_eq!(GameType::Unclassified.to_string(), "unclassified");
    }

    #[test]
    fn test_jam_end_and_url() {
        let jam = Jam {
            id: "autumn-jam".into(),
            name: "Autumn Jam".into(),
            start_ts: 1_700_000_000,
            duration_days: 2,
            gametype: GameType::Unclassified,
            hashtag: None,
            description: None,
            owners: vec![
                Owner {
                    id: "alice".into(),
                    name: "Alice".into(),
                },
                Owner {
                    id: "bob".into(),
                    name: "Bob".into(),
                },
            ],
        };
        assert_eq!(jam.end_ts(), 1_700_000_000 + 2 * 86_400);
        assert_eq!(jam.url(), "https://itch.io/jam/autumn-jam");
        assert_eq!(jam.owner_ids(), "alice, bob");
    }
}
