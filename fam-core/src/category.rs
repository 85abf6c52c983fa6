//! Fate object categories and their display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of fate object being tracked.
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A player character.
    Pc,
    /// A non-player character.
    Npc,
    /// A place in the fiction.
    Location,
    /// A scene-level situation or circumstance.
    Situation,
    /// A notable item or thing.
    Object,
}

/// An RGBA colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to 8-bit channels, ignoring alpha.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Presentation metadata for a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryInfo {
    /// Human-readable name, e.g. "Situation".
    pub name: &'static str,
    /// Single-letter code shown in compact views.
    pub short: char,
    /// Header colour.
    pub color: Rgba,
}

static CATEGORY_TABLE: [CategoryInfo; 5] = [
    CategoryInfo {
        name: "PC",
        short: 'P',
        color: Rgba::new(0.0, 0.8, 0.0, 1.0),
    },
    CategoryInfo {
        name: "NPC",
        short: 'N',
        color: Rgba::new(0.0, 0.0, 0.9, 1.0),
    },
    CategoryInfo {
        name: "Location",
        short: 'L',
        color: Rgba::new(0.6, 1.0, 0.4, 1.0),
    },
    CategoryInfo {
        name: "Situation",
        short: 'S',
        color: Rgba::new(1.0, 0.2, 0.9, 1.0),
    },
    CategoryInfo {
        name: "Object",
        short: 'O',
        color: Rgba::new(0.7, 0.7, 0.5, 1.0),
    },
];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Pc,
        Category::Npc,
        Category::Location,
        Category::Situation,
        Category::Object,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Pc => 0,
            Category::Npc => 1,
            Category::Location => 2,
            Category::Situation => 3,
            Category::Object => 4,
        }
    }

    /// Look up a category by its position in [`Category::ALL`].
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// Get the display metadata for this category.
    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self.index()]
    }

    /// Get the display name for this category.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Get the single-letter short code.
    pub fn short(self) -> char {
        self.info().short
    }

    /// Get the display colour.
    pub fn color(self) -> Rgba {
        self.info().color
    }

    /// The value written to `.fam` files.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pc => "pc",
            Category::Npc => "npc",
            Category::Location => "location",
            Category::Situation => "situation",
            Category::Object => "object",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}` (expected one of pc, npc, location, situation, object)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts the wire value or the short code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.as_str() == normalized
                    || (normalized.chars().count() == 1
                        && normalized.starts_with(c.short().to_ascii_lowercase()))
            })
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_table() {
        assert_eq!(Category::Pc.name(), "PC");
        assert_eq!(Category::Situation.short(), 'S');
        assert_eq!(Category::Npc.color(), Rgba::new(0.0, 0.0, 0.9, 1.0));
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(Category::from_index(i), Some(*category));
        }
        assert_eq!(Category::from_index(5), None);
    }

    #[test]
    fn test_parse_wire_value_and_short_code() {
        assert_eq!("location".parse::<Category>(), Ok(Category::Location));
        assert_eq!(" NPC ".parse::<Category>(), Ok(Category::Npc));
        assert_eq!("o".parse::<Category>(), Ok(Category::Object));
        assert_eq!("S".parse::<Category>(), Ok(Category::Situation));

        let err = "monster".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("monster".to_string()));
        assert!(err.to_string().contains("monster"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Situation).unwrap();
        assert_eq!(json, "\"situation\"");
        let back: Category = serde_json::from_str("\"pc\"").unwrap();
        assert_eq!(back, Category::Pc);
        assert!(serde_json::from_str::<Category>("\"PC\"").is_err());
    }

    #[test]
    fn test_rgb8_conversion() {
        assert_eq!(Category::Pc.color().to_rgb8(), (0, 204, 0));
        assert_eq!(Rgba::new(2.0, -1.0, 0.5, 1.0).to_rgb8(), (255, 0, 128));
    }
}
