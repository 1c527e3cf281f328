//! Caption tone options.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Tone requested for a generated caption.
///
/// The set is closed: tones are fixed at compile time and parsed from their
/// lowercase identifier.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneOption {
    /// Humor and wit.
    #[default]
    Funny,
    /// Emotional and intense.
    Dramatic,
    /// Questioning and engaging.
    Curious,
    /// Motivational and uplifting.
    Inspirational,
    /// Witty and ironic.
    Sarcastic,
    /// Relaxed and friendly.
    Casual,
}

impl ToneOption {
    /// Every tone, in display order.
    pub const ALL: [Self; 6] = [
        Self::Funny,
        Self::Dramatic,
        Self::Curious,
        Self::Inspirational,
        Self::Sarcastic,
        Self::Casual,
    ];

    /// Returns the identifier embedded in prompts and history rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Dramatic => "dramatic",
            Self::Curious => "curious",
            Self::Inspirational => "inspirational",
            Self::Sarcastic => "sarcastic",
            Self::Casual => "casual",
        }
    }

    /// Returns the human-friendly label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Funny => "Funny",
            Self::Dramatic => "Dramatic",
            Self::Curious => "Curious",
            Self::Inspirational => "Inspirational",
            Self::Sarcastic => "Sarcastic",
            Self::Casual => "Casual",
        }
    }

    /// Returns the short description shown next to the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Funny => "Humor and wit",
            Self::Dramatic => "Emotional and intense",
            Self::Curious => "Questioning and engaging",
            Self::Inspirational => "Motivational and uplifting",
            Self::Sarcastic => "Witty and ironic",
            Self::Casual => "Relaxed and friendly",
        }
    }

    /// Returns the icon shown in front of the label.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Funny => "😄",
            Self::Dramatic => "🎭",
            Self::Curious => "🤔",
            Self::Inspirational => "✨",
            Self::Sarcastic => "😏",
            Self::Casual => "😊",
        }
    }
}

impl Display for ToneOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownTone { tone: s.to_owned() })
    }
}
