//! Media attachments and per-timeframe chart screenshots.
//!
//! Attachments are opaque references (data URLs or file paths) produced by
//! capture collaborators. The core stores them but never inspects them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered media attached to a trade or missed trade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaBundle {
    #[serde(default)]
    pub before_images: Vec<String>,
    #[serde(default)]
    pub after_images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl MediaBundle {
    pub fn is_empty(&self) -> bool {
        self.before_images.is_empty()
            && self.after_images.is_empty()
            && self.videos.is_empty()
            && self.audio.is_none()
    }

    /// Total number of attachments.
    pub fn len(&self) -> usize {
        self.before_images.len()
            + self.after_images.len()
            + self.videos.len()
            + usize::from(self.audio.is_some())
    }
}

/// Chart timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "5m")]
    M5,
}

impl Timeframe {
    /// Highest to lowest.
    pub const ALL: [Timeframe; 6] = [
        Timeframe::Weekly,
        Timeframe::Daily,
        Timeframe::H4,
        Timeframe::H1,
        Timeframe::M15,
        Timeframe::M5,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Weekly => "weekly",
            Timeframe::Daily => "daily",
            Timeframe::H4 => "4h",
            Timeframe::H1 => "1h",
            Timeframe::M15 => "15m",
            Timeframe::M5 => "5m",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe '{0}' (valid: weekly, daily, 4h, 1h, 15m, 5m)")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.label() == normalized)
            .ok_or_else(|| UnknownTimeframe(s.to_string()))
    }
}

/// One optional screenshot per timeframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeScreenshots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<String>,
    #[serde(default, rename = "4h", skip_serializing_if = "Option::is_none")]
    pub h4: Option<String>,
    #[serde(default, rename = "1h", skip_serializing_if = "Option::is_none")]
    pub h1: Option<String>,
    #[serde(default, rename = "15m", skip_serializing_if = "Option::is_none")]
    pub m15: Option<String>,
    #[serde(default, rename = "5m", skip_serializing_if = "Option::is_none")]
    pub m5: Option<String>,
}

impl TimeframeScreenshots {
    pub fn get(&self, timeframe: Timeframe) -> Option<&str> {
        self.slot(timeframe).as_deref()
    }

    pub fn set(&mut self, timeframe: Timeframe, image: Option<String>) {
        *self.slot_mut(timeframe) = image;
    }

    /// Present screenshots, highest timeframe first.
    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, &str)> + '_ {
        Timeframe::ALL
            .into_iter()
            .filter_map(move |tf| self.get(tf).map(|image| (tf, image)))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn slot(&self, timeframe: Timeframe) -> &Option<String> {
        match timeframe {
            Timeframe::Weekly => &self.weekly,
            Timeframe::Daily => &self.daily,
            Timeframe::H4 => &self.h4,
            Timeframe::H1 => &self.h1,
            Timeframe::M15 => &self.m15,
            Timeframe::M5 => &self.m5,
        }
    }

    fn slot_mut(&mut self, timeframe: Timeframe) -> &mut Option<String> {
        match timeframe {
            Timeframe::Weekly => &mut self.weekly,
            Timeframe::Daily => &mut self.daily,
            Timeframe::H4 => &mut self.h4,
            Timeframe::H1 => &mut self.h1,
            Timeframe::M15 => &mut self.m15,
            Timeframe::M5 => &mut self.m5,
        }
    }
}
