//! Domain types for the journal.

pub mod backtest;
pub mod entry_type;
pub mod ids;
pub mod media;
pub mod missed_trade;
pub mod trade;
pub mod validate;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

pub use backtest::{BacktestDraft, BacktestPatch, BacktestScreenshot};
pub use entry_type::{EntryType, UnknownEntryType};
pub use ids::RecordId;
pub use media::{MediaBundle, Timeframe, TimeframeScreenshots, UnknownTimeframe};
pub use missed_trade::{MissedTrade, MissedTradeDraft, MissedTradePatch};
pub use trade::{risk_reward_ratio, Direction, Outcome, Trade, TradeDraft, TradePatch, TradeType};

/// The three kinds of record the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Trade,
    MissedTrade,
    Backtest,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Trade => "trade",
            RecordKind::MissedTrade => "missed trade",
            RecordKind::Backtest => "backtest",
        };
        f.write_str(name)
    }
}

/// A stored, timestamped record with an immutable id.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> &RecordId;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// Recompute fields the store derives from other fields.
    fn refresh_derived(&mut self) {}

    /// Field rules for a stored record, the same ones drafts and patches
    /// are held to, plus finiteness of derived values.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Refresh `updated_at`, never moving it before `created_at`.
    fn touch(&mut self, now: DateTime<Utc>) {
        let at = now.max(self.created_at());
        self.set_updated_at(at);
    }
}
