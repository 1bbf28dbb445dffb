//! MissedTrade: an opportunity that was spotted but not taken.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry_type::EntryType;
use super::ids::RecordId;
use super::media::{MediaBundle, TimeframeScreenshots};
use super::trade::Direction;
use super::validate;
use super::{Record, RecordKind};
use crate::error::ValidationError;
use crate::format::calculate_pips;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedTrade {
    pub id: RecordId,
    pub pair: String,
    pub entry_type: EntryType,
    pub direction: Direction,
    pub spotted_at: NaiveDateTime,
    pub potential_entry: f64,
    pub potential_exit: f64,
    /// Pip distance between potential entry and exit, stored at write time.
    pub potential_pips: f64,
    pub reason: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub media: MediaBundle,
    #[serde(default)]
    pub timeframe_screenshots: TimeframeScreenshots,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MissedTrade {
    pub(crate) fn from_draft(id: RecordId, draft: MissedTradeDraft, now: DateTime<Utc>) -> Self {
        let pair = draft.pair.trim().to_string();
        let potential_pips = calculate_pips(draft.potential_exit - draft.potential_entry, &pair);
        Self {
            id,
            pair,
            entry_type: draft.entry_type,
            direction: draft.direction,
            spotted_at: draft.spotted_at,
            potential_entry: draft.potential_entry,
            potential_exit: draft.potential_exit,
            potential_pips,
            reason: draft.reason,
            notes: draft.notes,
            media: draft.media,
            timeframe_screenshots: draft.timeframe_screenshots,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for MissedTrade {
    const KIND: RecordKind = RecordKind::MissedTrade;

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

    fn refresh_derived(&mut self) {
        self.potential_pips = calculate_pips(self.potential_exit - self.potential_entry, &self.pair);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::finite("potential_entry", self.potential_entry)?;
        validate::finite("potential_exit", self.potential_exit)?;
        validate::finite("potential_pips", self.potential_pips)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedTradeDraft {
    pub pair: String,
    pub entry_type: EntryType,
    pub direction: Direction,
    pub spotted_at: NaiveDateTime,
    pub potential_entry: f64,
    pub potential_exit: f64,
    pub reason: String,
    pub notes: String,
    pub media: MediaBundle,
    pub timeframe_screenshots: TimeframeScreenshots,
}

impl MissedTradeDraft {
    pub fn new(
        pair: impl Into<String>,
        entry_type: EntryType,
        direction: Direction,
        spotted_at: NaiveDateTime,
        potential_entry: f64,
        potential_exit: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            pair: pair.into(),
            entry_type,
            direction,
            spotted_at,
            potential_entry,
            potential_exit,
            reason: reason.into(),
            notes: String::new(),
            media: MediaBundle::default(),
            timeframe_screenshots: TimeframeScreenshots::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::finite("potential_entry", self.potential_entry)?;
        validate::finite("potential_exit", self.potential_exit)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissedTradePatch {
    pub pair: Option<String>,
    pub entry_type: Option<EntryType>,
    pub direction: Option<Direction>,
    pub spotted_at: Option<NaiveDateTime>,
    pub potential_entry: Option<f64>,
    pub potential_exit: Option<f64>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub media: Option<MediaBundle>,
    pub timeframe_screenshots: Option<TimeframeScreenshots>,
}

impl MissedTradePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pair) = &self.pair {
            validate::non_empty("pair", pair)?;
        }
        validate::optional_finite("potential_entry", self.potential_entry)?;
        validate::optional_finite("potential_exit", self.potential_exit)?;
        Ok(())
    }

    /// Merge into `missed` and recompute potential pips.
    pub(crate) fn apply_to(self, missed: &mut MissedTrade) {
        if let Some(pair) = self.pair {
            missed.pair = pair.trim().to_string();
        }
        if let Some(v) = self.entry_type {
            missed.entry_type = v;
        }
        if let Some(v) = self.direction {
            missed.direction = v;
        }
        if let Some(v) = self.spotted_at {
            missed.spotted_at = v;
        }
        if let Some(v) = self.potential_entry {
            missed.potential_entry = v;
        }
        if let Some(v) = self.potential_exit {
            missed.potential_exit = v;
        }
        if let Some(v) = self.reason {
            missed.reason = v;
        }
        if let Some(v) = self.notes {
            missed.notes = v;
        }
        if let Some(v) = self.media {
            missed.media = v;
        }
        if let Some(v) = self.timeframe_screenshots {
            missed.timeframe_screenshots = v;
        }
        missed.refresh_derived();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(pair: &str, entry: f64, exit: f64) -> MissedTradeDraft {
        MissedTradeDraft::new(
            pair,
            EntryType::Breakout,
            Direction::Sell,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            entry,
            exit,
            "hesitated at the open",
        )
    }

    #[test]
    fn potential_pips_are_pair_aware() {
        let now = Utc::now();
        let eur = MissedTrade::from_draft(RecordId::from("m1"), draft("EUR/USD", 1.1000, 1.0950), now);
        assert!((eur.potential_pips - 50.0).abs() < 1e-6);

        let jpy = MissedTrade::from_draft(RecordId::from("m2"), draft("USD/JPY", 150.00, 150.50), now);
        assert!((jpy.potential_pips - 50.0).abs() < 1e-6);
    }

    #[test]
    fn patch_recomputes_pips_when_pair_changes() {
        let mut missed =
            MissedTrade::from_draft(RecordId::from("m1"), draft("EUR/USD", 1.0, 1.5), Utc::now());
        MissedTradePatch {
            pair: Some("EUR/JPY".into()),
            ..Default::default()
        }
        .apply_to(&mut missed);
        assert!((missed.potential_pips - 50.0).abs() < 1e-9);
    }

    #[test]
    fn draft_rejects_non_finite_prices() {
        assert!(draft("EUR/USD", f64::INFINITY, 1.0).validate().is_err());
        assert!(draft("EUR/USD", 1.0, 1.1).validate().is_ok());
    }

    #[test]
    fn overflowing_pip_distance_fails_record_validation() {
        let missed = MissedTrade::from_draft(
            RecordId::from("m1"),
            draft("EUR/USD", -1e308, 1e308),
            Utc::now(),
        );
        assert!(missed.potential_pips.is_infinite());
        assert_eq!(
            missed.validate(),
            Err(ValidationError::NonFinite {
                field: "potential_pips"
            })
        );
    }
}
