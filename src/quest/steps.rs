//! Screen sequencing.
//!
//! The step index is the only persisted navigation state. Which screen it
//! shows, and which phase a venue flow is in, are derived here on every
//! request, so a reload always lands on the same screen and phase.

use crate::quest::sections::SectionKey;
use crate::quest::state::SectionRecord;

/// The fixed linear sequence of screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    MoodBefore,
    Teaser,
    Section(SectionKey),
    MoodAfter,
    Album,
}

/// Number of the last screen (the album).
pub const TERMINAL_STEP: u32 = 8;

impl Screen {
    /// Map a step index to its screen. Out-of-range indices fall back to the
    /// welcome screen.
    pub fn for_step(step: u32) -> Screen {
        match step {
            0 => Screen::Welcome,
            1 => Screen::MoodBefore,
            2 => Screen::Teaser,
            3 => Screen::Section(SectionKey::Photobox),
            4 => Screen::Section(SectionKey::Secret),
            5 => Screen::Section(SectionKey::Dinner),
            6 => Screen::Section(SectionKey::Dessert),
            7 => Screen::MoodAfter,
            TERMINAL_STEP => Screen::Album,
            _ => Screen::Welcome,
        }
    }

    /// The teaser auto-advances and the welcome screen is the start, so
    /// neither gets a back button.
    pub fn shows_back(self, step: u32) -> bool {
        step > 0 && self != Screen::Teaser
    }
}

/// Phase of a venue flow. Feedback sits between the two but is transient
/// and never derived from stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Selection,
    Documentation,
}

impl Phase {
    pub fn of(record: &SectionRecord) -> Phase {
        if record.confirmed || record.documented {
            Phase::Documentation
        } else {
            Phase::Selection
        }
    }
}

/// Clues shown on the teaser screen, one per period.
pub const TEASER_CLUES: [&str; 3] = ["TEBAKK MAU KEMANA?", "CLUE NYA POTOO", "CISSS! \u{1F4F8}"];

/// Total teaser dwell before it advances by itself.
pub fn teaser_dwell_ms(clue_ms: u32) -> u32 {
    clue_ms.saturating_mul(TEASER_CLUES.len() as u32)
}

/// Progress through the four venue sections, as (current, total).
pub fn progress(key: SectionKey) -> (usize, usize) {
    (key.position(), SectionKey::ALL.len())
}

/// Emoji for a mood score.
pub fn mood_emoji(value: u8) -> &'static str {
    match value {
        0..=20 => "\u{1F610}",
        21..=40 => "\u{1F642}",
        41..=60 => "\u{1F60A}",
        61..=80 => "\u{1F604}",
        _ => "\u{1F970}",
    }
}

/// Label for a mood score.
pub fn mood_label(value: u8) -> &'static str {
    match value {
        0..=20 => "Biasa aja",
        21..=40 => "Lumayan",
        41..=60 => "Seneng",
        61..=80 => "Happy banget!",
        _ => "Loveee!",
    }
}

/// Clamp a submitted slider value into 1..=100.
pub fn clamp_mood(raw: i64) -> u8 {
    raw.clamp(1, 100) as u8
}
