//! Entry type: the fixed taxonomy of trade-setup strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Setup strategy used to enter a trade.
///
/// Ordering follows declaration order and is the canonical order used by
/// statistics tables and chart labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryType {
    #[serde(rename = "2 touch")]
    TwoTouch,
    #[serde(rename = "3 touch")]
    ThreeTouch,
    #[serde(rename = "mechanical")]
    Mechanical,
    #[serde(rename = "breakout")]
    Breakout,
    #[serde(rename = "retest")]
    Retest,
    #[serde(rename = "reversal")]
    Reversal,
}

impl EntryType {
    pub const ALL: [EntryType; 6] = [
        EntryType::TwoTouch,
        EntryType::ThreeTouch,
        EntryType::Mechanical,
        EntryType::Breakout,
        EntryType::Retest,
        EntryType::Reversal,
    ];

    /// The label stored in records and shown in charts.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::TwoTouch => "2 touch",
            EntryType::ThreeTouch => "3 touch",
            EntryType::Mechanical => "mechanical",
            EntryType::Breakout => "breakout",
            EntryType::Retest => "retest",
            EntryType::Reversal => "reversal",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known entry type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry type '{0}' (valid: 2 touch, 3 touch, mechanical, breakout, retest, reversal)")]
pub struct UnknownEntryType(pub String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    /// Accepts the stored label, with `-`/`_` allowed in place of the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        EntryType::ALL
            .into_iter()
            .find(|t| t.label() == normalized)
            .ok_or_else(|| UnknownEntryType(s.to_string()))
    }
}
