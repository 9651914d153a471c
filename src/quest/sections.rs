//! Section catalog: the four stops of the date and their copy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestError;

/// Key of one documented stop. Closed set; parsing anything else fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Photobox,
    Secret,
    Dinner,
    Dessert,
}

impl SectionKey {
    /// All sections in itinerary order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Photobox,
        SectionKey::Secret,
        SectionKey::Dinner,
        SectionKey::Dessert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Photobox => "photobox",
            SectionKey::Secret => "secret",
            SectionKey::Dinner => "dinner",
            SectionKey::Dessert => "dessert",
        }
    }

    /// 1-based position in the itinerary, used by the progress indicator.
    pub fn position(self) -> usize {
        match self {
            SectionKey::Photobox => 1,
            SectionKey::Secret => 2,
            SectionKey::Dinner => 3,
            SectionKey::Dessert => 4,
        }
    }

    pub fn info(self) -> &'static SectionInfo {
        match self {
            SectionKey::Photobox => &PHOTOBOX,
            SectionKey::Secret => &SECRET,
            SectionKey::Dinner => &DINNER,
            SectionKey::Dessert => &DESSERT,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photobox" => Ok(SectionKey::Photobox),
            "secret" => Ok(SectionKey::Secret),
            "dinner" => Ok(SectionKey::Dinner),
            "dessert" => Ok(SectionKey::Dessert),
            other => Err(QuestError::UnknownSection(other.to_string())),
        }
    }
}

/// A selectable venue.
#[derive(Debug)]
pub struct VenueOption {
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Static copy and options for one section.
#[derive(Debug)]
pub struct SectionInfo {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Short label used in album captions ("Our Dinner at ...").
    pub label: &'static str,
    /// Emoji shown in the album when no photo was captured.
    pub placeholder_emoji: &'static str,
    /// Acknowledgment shown between confirming arrival and documenting.
    pub feedback: &'static str,
    /// Placeholder text for the description box.
    pub prompt: &'static str,
    /// Empty for the secret section: the venue is pre-seeded.
    pub options: &'static [VenueOption],
}

impl SectionInfo {
    pub fn is_secret(&self) -> bool {
        self.options.is_empty()
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }
}

static PHOTOBOX: SectionInfo = SectionInfo {
    title: "\u{1F4F8} Photobox Time!",
    subtitle: "Pick your favorite photobox spot!",
    label: "Photobox",
    placeholder_emoji: "\u{1F4F8}",
    feedback: "TAU AKU TAU KAMU PILIH INI! YESYES! \u{1F4F8}",
    prompt: "Tulis pose paling aneh kita...",
    options: &[
        VenueOption { name: "Photoplace (Tentrem)", emoji: "\u{1F4F7}" },
        VenueOption { name: "Snapobox (APK Unika)", emoji: "\u{1F4F7}" },
        VenueOption { name: "Photoplace (Serambi)", emoji: "\u{1F4F7}" },
    ],
};

static SECRET: SectionInfo = SectionInfo {
    title: "\u{1F92B} Secret Activity",
    subtitle: "Guess where are we going?",
    label: "Secret Activity",
    placeholder_emoji: "\u{1F92B}",
    feedback: "Hayo, kaget nggak pas nyampe sini? \u{1F60F}",
    prompt: "Hayo, kaget nggak pas nyampe sini?",
    options: &[],
};

static DINNER: SectionInfo = SectionInfo {
    title: "\u{1F37D}\u{FE0F} Dinner Date",
    subtitle: "Time to refuel with something delicious!",
    label: "Dinner",
    placeholder_emoji: "\u{1F37D}\u{FE0F}",
    feedback: "NYOK MAM! \u{1F37D}\u{FE0F}",
    prompt: "Makanan favoritnya apa nih?",
    options: &[
        VenueOption { name: "At First Date", emoji: "\u{1F495}" },
        VenueOption { name: "Flevor", emoji: "\u{1F44C}\u{1F3FB}" },
        VenueOption { name: "One Day Atelier", emoji: "\u{1F4AF}" },
    ],
};

static DESSERT: SectionInfo = SectionInfo {
    title: "\u{1F370} Sweet Ending",
    subtitle: "End the night on a sweet note!",
    label: "Dessert",
    placeholder_emoji: "\u{1F370}",
    feedback: "ooooo okey",
    prompt: "Seberapa manis momen ini? \u{1F36B}",
    options: &[
        VenueOption { name: "Desserts Here!", emoji: "\u{1F36B}" },
        VenueOption { name: "Go Out Searching Sweets Outside", emoji: "\u{1F36D}" },
        VenueOption { name: "I'M FULL ALREADY", emoji: "\u{1F634}" },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_keys() {
        for key in SectionKey::ALL {
            assert_eq!(key.as_str().parse::<SectionKey>().unwrap(), key);
        }
    }

    #[test]
    fn parse_unknown_key_fails() {
        let err = "brunch".parse::<SectionKey>().unwrap_err();
        assert!(err.to_string().contains("brunch"));
    }

    #[test]
    fn only_secret_has_no_options() {
        assert!(SectionKey::Secret.info().is_secret());
        assert!(!SectionKey::Dinner.info().is_secret());
        assert!(SectionKey::Dinner.info().has_option("Flevor"));
    }

    #[test]
    fn positions_follow_itinerary() {
        let positions: Vec<usize> = SectionKey::ALL.iter().map(|k| k.position()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SectionKey::Photobox).unwrap();
        assert_eq!(json, r#""photobox""#);
    }
}
