//! Trade: one executed (or missed-and-later-logged) position.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::backtest::BacktestScreenshot;
use super::entry_type::EntryType;
use super::ids::RecordId;
use super::media::{MediaBundle, TimeframeScreenshots};
use super::validate;
use super::{Record, RecordKind};
use crate::error::ValidationError;
use crate::format::calculate_pips;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Breakeven,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Breakeven => "breakeven",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Executed,
    Missed,
}

impl TradeType {
    pub fn label(self) -> &'static str {
        match self {
            TradeType::Executed => "executed",
            TradeType::Missed => "missed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            "breakeven" | "be" => Ok(Outcome::Breakeven),
            other => Err(format!("unknown outcome '{other}' (valid: win, loss, breakeven)")),
        }
    }
}

impl FromStr for TradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "executed" => Ok(TradeType::Executed),
            "missed" => Ok(TradeType::Missed),
            other => Err(format!("unknown trade type '{other}' (valid: executed, missed)")),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Ok(Direction::Buy),
            "sell" | "short" => Ok(Direction::Sell),
            other => Err(format!("unknown direction '{other}' (valid: buy, sell)")),
        }
    }
}

/// Reward distance over risk distance.
///
/// Returns 0.0 when either leg is missing, the risk distance is zero, or the
/// quotient is not finite (a risk distance too small to divide by).
pub fn risk_reward_ratio(entry: f64, stop_loss: Option<f64>, take_profit: Option<f64>) -> f64 {
    let (Some(sl), Some(tp)) = (stop_loss, take_profit) else {
        return 0.0;
    };
    let risk = (entry - sl).abs();
    if risk <= 0.0 {
        return 0.0;
    }
    let ratio = (tp - entry).abs() / risk;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// A journaled trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: RecordId,
    pub pair: String,
    pub entry_type: EntryType,
    pub outcome: Outcome,
    pub trade_type: TradeType,
    pub direction: Direction,
    pub entry_time: NaiveDateTime,

    // ── Prices ──
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub volume: f64,
    /// Stored at write time from entry, stop-loss and take-profit.
    pub risk_reward_ratio: f64,

    // ── Money ──
    pub stop_loss_amount: f64,
    pub take_profit_amount: f64,
    #[serde(default)]
    pub break_even_amount: Option<f64>,

    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub media: MediaBundle,
    #[serde(default)]
    pub timeframe_screenshots: TimeframeScreenshots,
    /// Denormalized copy kept for display only. Associations are resolved
    /// with `Journal::backtests_for`.
    #[serde(default)]
    pub backtest_screenshots: Vec<BacktestScreenshot>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    /// Build a stored trade from a validated draft.
    pub(crate) fn from_draft(id: RecordId, draft: TradeDraft, now: DateTime<Utc>) -> Self {
        let risk_reward_ratio =
            risk_reward_ratio(draft.entry_price, draft.stop_loss, draft.take_profit);
        Self {
            id,
            pair: draft.pair.trim().to_string(),
            entry_type: draft.entry_type,
            outcome: draft.outcome,
            trade_type: draft.trade_type,
            direction: draft.direction,
            entry_time: draft.entry_time,
            entry_price: draft.entry_price,
            exit_price: draft.exit_price,
            stop_loss: draft.stop_loss,
            take_profit: draft.take_profit,
            volume: draft.volume,
            risk_reward_ratio,
            stop_loss_amount: draft.stop_loss_amount,
            take_profit_amount: draft.take_profit_amount,
            break_even_amount: draft.break_even_amount,
            notes: draft.notes,
            media: draft.media,
            timeframe_screenshots: draft.timeframe_screenshots,
            backtest_screenshots: draft.backtest_screenshots,
            created_at: now,
            updated_at: now,
        }
    }

    /// Absolute pip distance between entry and exit.
    pub fn pips(&self) -> f64 {
        calculate_pips(self.exit_price - self.entry_price, &self.pair)
    }
}

impl Record for Trade {
    const KIND: RecordKind = RecordKind::Trade;

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
        self.risk_reward_ratio =
            risk_reward_ratio(self.entry_price, self.stop_loss, self.take_profit);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::finite("entry_price", self.entry_price)?;
        validate::finite("exit_price", self.exit_price)?;
        validate::optional_finite("stop_loss", self.stop_loss)?;
        validate::optional_finite("take_profit", self.take_profit)?;
        validate::non_negative("volume", self.volume)?;
        validate::non_negative("risk_reward_ratio", self.risk_reward_ratio)?;
        validate::finite("stop_loss_amount", self.stop_loss_amount)?;
        validate::finite("take_profit_amount", self.take_profit_amount)?;
        validate::optional_finite("break_even_amount", self.break_even_amount)?;
        Ok(())
    }
}

/// Everything a caller supplies to create a trade. The store assigns the id,
/// timestamps and risk:reward ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDraft {
    pub pair: String,
    pub entry_type: EntryType,
    pub outcome: Outcome,
    pub trade_type: TradeType,
    pub direction: Direction,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub volume: f64,
    pub stop_loss_amount: f64,
    pub take_profit_amount: f64,
    pub break_even_amount: Option<f64>,
    pub notes: String,
    pub media: MediaBundle,
    pub timeframe_screenshots: TimeframeScreenshots,
    pub backtest_screenshots: Vec<BacktestScreenshot>,
}

impl TradeDraft {
    /// A minimal executed trade; optional fields start empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pair: impl Into<String>,
        entry_type: EntryType,
        outcome: Outcome,
        direction: Direction,
        entry_time: NaiveDateTime,
        entry_price: f64,
        exit_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            pair: pair.into(),
            entry_type,
            outcome,
            trade_type: TradeType::Executed,
            direction,
            entry_time,
            entry_price,
            exit_price,
            stop_loss: None,
            take_profit: None,
            volume,
            stop_loss_amount: 0.0,
            take_profit_amount: 0.0,
            break_even_amount: None,
            notes: String::new(),
            media: MediaBundle::default(),
            timeframe_screenshots: TimeframeScreenshots::default(),
            backtest_screenshots: Vec::new(),
        }
    }

    pub fn with_levels(mut self, stop_loss: f64, take_profit: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("pair", &self.pair)?;
        validate::finite("entry_price", self.entry_price)?;
        validate::finite("exit_price", self.exit_price)?;
        validate::optional_finite("stop_loss", self.stop_loss)?;
        validate::optional_finite("take_profit", self.take_profit)?;
        validate::non_negative("volume", self.volume)?;
        validate::finite("stop_loss_amount", self.stop_loss_amount)?;
        validate::finite("take_profit_amount", self.take_profit_amount)?;
        validate::optional_finite("break_even_amount", self.break_even_amount)?;
        Ok(())
    }
}

/// Typed partial update. `None` leaves a field unchanged; for optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradePatch {
    pub pair: Option<String>,
    pub entry_type: Option<EntryType>,
    pub outcome: Option<Outcome>,
    pub trade_type: Option<TradeType>,
    pub direction: Option<Direction>,
    pub entry_time: Option<NaiveDateTime>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub stop_loss: Option<Option<f64>>,
    pub take_profit: Option<Option<f64>>,
    pub volume: Option<f64>,
    pub stop_loss_amount: Option<f64>,
    pub take_profit_amount: Option<f64>,
    pub break_even_amount: Option<Option<f64>>,
    pub notes: Option<String>,
    pub media: Option<MediaBundle>,
    pub timeframe_screenshots: Option<TimeframeScreenshots>,
    pub backtest_screenshots: Option<Vec<BacktestScreenshot>>,
}

impl TradePatch {
    pub fn is_empty(&self) -> bool {
        *self == TradePatch::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pair) = &self.pair {
            validate::non_empty("pair", pair)?;
        }
        validate::optional_finite("entry_price", self.entry_price)?;
        validate::optional_finite("exit_price", self.exit_price)?;
        validate::optional_finite("stop_loss", self.stop_loss.flatten())?;
        validate::optional_finite("take_profit", self.take_profit.flatten())?;
        if let Some(volume) = self.volume {
            validate::non_negative("volume", volume)?;
        }
        validate::optional_finite("stop_loss_amount", self.stop_loss_amount)?;
        validate::optional_finite("take_profit_amount", self.take_profit_amount)?;
        validate::optional_finite("break_even_amount", self.break_even_amount.flatten())?;
        Ok(())
    }

    /// Merge into `trade` and recompute the risk:reward ratio. Id and
    /// timestamps are left to the store.
    pub(crate) fn apply_to(self, trade: &mut Trade) {
        if let Some(pair) = self.pair {
            trade.pair = pair.trim().to_string();
        }
        if let Some(v) = self.entry_type {
            trade.entry_type = v;
        }
        if let Some(v) = self.outcome {
            trade.outcome = v;
        }
        if let Some(v) = self.trade_type {
            trade.trade_type = v;
        }
        if let Some(v) = self.direction {
            trade.direction = v;
        }
        if let Some(v) = self.entry_time {
            trade.entry_time = v;
        }
        if let Some(v) = self.entry_price {
            trade.entry_price = v;
        }
        if let Some(v) = self.exit_price {
            trade.exit_price = v;
        }
        if let Some(v) = self.stop_loss {
            trade.stop_loss = v;
        }
        if let Some(v) = self.take_profit {
            trade.take_profit = v;
        }
        if let Some(v) = self.volume {
            trade.volume = v;
        }
        if let Some(v) = self.stop_loss_amount {
            trade.stop_loss_amount = v;
        }
        if let Some(v) = self.take_profit_amount {
            trade.take_profit_amount = v;
        }
        if let Some(v) = self.break_even_amount {
            trade.break_even_amount = v;
        }
        if let Some(v) = self.notes {
            trade.notes = v;
        }
        if let Some(v) = self.media {
            trade.media = v;
        }
        if let Some(v) = self.timeframe_screenshots {
            trade.timeframe_screenshots = v;
        }
        if let Some(v) = self.backtest_screenshots {
            trade.backtest_screenshots = v;
        }
        trade.refresh_derived();
    }
}
