//! BacktestScreenshot: a tagged reference chart, independent of any trade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry_type::EntryType;
use super::ids::RecordId;
use super::media::Timeframe;
use super::validate;
use super::{Record, RecordKind};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestScreenshot {
    pub id: RecordId,
    pub pair: String,
    pub entry_type: EntryType,
    pub timeframe: Timeframe,
    pub image: String,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BacktestScreenshot {
    pub(crate) fn from_draft(id: RecordId, draft: BacktestDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            pair: draft.pair.trim().to_string(),
            entry_type: draft.entry_type,
            timeframe: draft.timeframe,
            image: draft.image,
            strategy: draft.strategy,
            notes: draft.notes,
            tags: normalize_tags(draft.tags),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive pair comparison, ignoring surrounding whitespace.
    pub fn matches_pair(&self, pair: &str) -> bool {
        self.pair.eq_ignore_ascii_case(pair.trim())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Record for BacktestScreenshot {
    const KIND: RecordKind = RecordKind::Backtest;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::non_empty("image", &self.image)?;
        Ok(())
    }
}

/// Trim, drop blanks and duplicates; first spelling wins.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestDraft {
    pub pair: String,
    pub entry_type: EntryType,
    pub timeframe: Timeframe,
    pub image: String,
    pub strategy: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl BacktestDraft {
    pub fn new(
        pair: impl Into<String>,
        entry_type: EntryType,
        timeframe: Timeframe,
        image: impl Into<String>,
    ) -> Self {
        Self {
            pair: pair.into(),
            entry_type,
            timeframe,
            image: image.into(),
            strategy: None,
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::non_empty("image", &self.image)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestPatch {
    pub pair: Option<String>,
    pub entry_type: Option<EntryType>,
    pub timeframe: Option<Timeframe>,
    pub image: Option<String>,
    pub strategy: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl BacktestPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pair) = &self.pair {
            validate::non_empty("pair", pair)?;
        }
        if let Some(image) = &self.image {
            validate::non_empty("image", image)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, shot: &mut BacktestScreenshot) {
        if let Some(pair) = self.pair {
            shot.pair = pair.trim().to_string();
        }
        if let Some(v) = self.entry_type {
            shot.entry_type = v;
        }
        if let Some(v) = self.timeframe {
            shot.timeframe = v;
        }
        if let Some(v) = self.image {
            shot.image = v;
        }
        if let Some(v) = self.strategy {
            shot.strategy = v;
        }
        if let Some(v) = self.notes {
            shot.notes = v;
        }
        if let Some(v) = self.tags {
            shot.tags = normalize_tags(v);
        }
    }
}
