//! Trade statistics: a pure reduction of a trade collection.
//!
//! `calculate_stats` never fails and never produces NaN or infinity: every
//! ratio with an empty or zero denominator is reported as 0, and so is any
//! sum or ratio that overflows.
//!
//! The result does not depend on input order. Counts are commutative and
//! floating sums are taken over sorted values, so any permutation of the same
//! trades yields bit-identical output.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::{Serialize, Serializer};

use crate::domain::{EntryType, Outcome, Trade};

/// Win/loss/breakeven counts for a subset of trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeBreakdown {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// Percentage 0–100; 0 when `total == 0`.
    pub win_rate: f64,
}

impl OutcomeBreakdown {
    fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Breakeven => self.breakeven += 1,
        }
    }

    fn finish(&mut self) {
        self.win_rate = percentage(self.wins, self.total);
    }
}

/// Calendar month bucket, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Short English month name, e.g. `"Mar"`.
    pub fn month_name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Display label, e.g. `"Mar 2024"`.
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// Serialized as "YYYY-MM" so it can key a JSON object.
impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Aggregate statistics over a trade collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// Percentage 0–100.
    pub win_rate: f64,
    /// Mean stored risk:reward ratio over all trades.
    pub average_rr: f64,
    /// `total_profit / total_loss`; 0 when there are no realized losses.
    pub profit_factor: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    /// Every known entry type is present, including those with no trades.
    pub by_entry_type: BTreeMap<EntryType, OutcomeBreakdown>,
    /// Only months that contain at least one trade.
    pub by_month: BTreeMap<MonthKey, OutcomeBreakdown>,
}

impl TradeStats {
    /// Zeroed statistics with the full entry-type table.
    pub fn empty() -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            breakeven: 0,
            win_rate: 0.0,
            average_rr: 0.0,
            profit_factor: 0.0,
            total_profit: 0.0,
            total_loss: 0.0,
            by_entry_type: EntryType::ALL
                .into_iter()
                .map(|t| (t, OutcomeBreakdown::default()))
                .collect(),
            by_month: BTreeMap::new(),
        }
    }

    pub fn entry_type(&self, entry_type: EntryType) -> &OutcomeBreakdown {
        // Always populated by `empty()`.
        &self.by_entry_type[&entry_type]
    }
}

impl Default for TradeStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reduce a trade collection into a [`TradeStats`] snapshot.
///
/// Realized amounts use the price move from entry to exit times volume:
/// a win contributes `(exit - entry) * volume` when positive, a loss
/// contributes `(entry - exit) * volume` when positive. Breakeven trades
/// only count toward totals.
///
/// Profit factor is defined as 0 (not infinity) when there are no realized
/// losses, so a loss-free history never reports an unbounded value. A price
/// move that overflows `f64` is left out of the totals.
pub fn calculate_stats(trades: &[Trade]) -> TradeStats {
    let mut stats = TradeStats::empty();
    if trades.is_empty() {
        return stats;
    }

    let mut overall = OutcomeBreakdown::default();
    let mut rr_values = Vec::with_capacity(trades.len());
    let mut profits = Vec::new();
    let mut losses = Vec::new();

    for trade in trades {
        overall.record(trade.outcome);
        rr_values.push(trade.risk_reward_ratio);

        let price_move = (trade.exit_price - trade.entry_price) * trade.volume;
        match trade.outcome {
            _ if !price_move.is_finite() => {}
            Outcome::Win if price_move > 0.0 => profits.push(price_move),
            Outcome::Loss if -price_move > 0.0 => losses.push(-price_move),
            _ => {}
        }

        if let Some(bucket) = stats.by_entry_type.get_mut(&trade.entry_type) {
            bucket.record(trade.outcome);
        }
        stats
            .by_month
            .entry(MonthKey::of(trade.entry_time))
            .or_default()
            .record(trade.outcome);
    }

    let total = overall.total;
    let total_profit = finite_or_zero(ordered_sum(profits));
    let total_loss = finite_or_zero(ordered_sum(losses));

    stats.total_trades = total;
    stats.wins = overall.wins;
    stats.losses = overall.losses;
    stats.breakeven = overall.breakeven;
    stats.win_rate = percentage(overall.wins, total);
    stats.average_rr = finite_or_zero(ordered_sum(rr_values) / total as f64);
    stats.profit_factor = if total_loss > 0.0 {
        finite_or_zero(total_profit / total_loss)
    } else {
        0.0
    };
    stats.total_profit = total_profit;
    stats.total_loss = total_loss;

    stats
        .by_entry_type
        .values_mut()
        .chain(stats.by_month.values_mut())
        .for_each(OutcomeBreakdown::finish);

    stats
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sum in ascending order so the result is independent of input order.
fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, RecordId, TradeDraft};
    use chrono::{NaiveDate, Utc};

    fn trade(
        entry_type: EntryType,
        outcome: Outcome,
        entry: f64,
        exit: f64,
        volume: f64,
        month: u32,
    ) -> Trade {
        let draft = TradeDraft::new(
            "EUR/USD",
            entry_type,
            outcome,
            Direction::Buy,
            NaiveDate::from_ymd_opt(2024, month, 10)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            entry,
            exit,
            volume,
        );
        Trade::from_draft(RecordId::generate(), draft, Utc::now())
    }

    #[test]
    fn empty_input_is_zeroed_with_full_entry_table() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.average_rr, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.by_entry_type.len(), EntryType::ALL.len());
        for breakdown in stats.by_entry_type.values() {
            assert_eq!(*breakdown, OutcomeBreakdown::default());
        }
        assert!(stats.by_month.is_empty());
    }

    #[test]
    fn single_win_has_full_win_rate() {
        let stats = calculate_stats(&[trade(EntryType::TwoTouch, Outcome::Win, 1.1, 1.105, 1.0, 3)]);
        assert_eq!(stats.win_rate, 100.0);
        assert_eq!(stats.entry_type(EntryType::TwoTouch).win_rate, 100.0);
        assert_eq!(stats.entry_type(EntryType::Mechanical).win_rate, 0.0);
        assert_eq!(stats.entry_type(EntryType::Mechanical).total, 0);
    }

    #[test]
    fn equal_win_and_loss_give_unit_profit_factor() {
        let stats = calculate_stats(&[
            trade(EntryType::TwoTouch, Outcome::Win, 1.0, 2.0, 10.0, 1),
            trade(EntryType::Retest, Outcome::Loss, 2.0, 1.0, 10.0, 1),
        ]);
        assert_eq!(stats.total_profit, 10.0);
        assert_eq!(stats.total_loss, 10.0);
        assert_eq!(stats.profit_factor, 1.0);
        assert_eq!(stats.win_rate, 50.0);
    }

    #[test]
    fn profit_factor_is_zero_without_losses() {
        let stats = calculate_stats(&[
            trade(EntryType::TwoTouch, Outcome::Win, 1.0, 5.0, 100.0, 1),
            trade(EntryType::TwoTouch, Outcome::Breakeven, 1.0, 1.0, 1.0, 1),
        ]);
        assert!(stats.total_profit > 0.0);
        assert_eq!(stats.profit_factor, 0.0);
    }

    #[test]
    fn breakeven_counts_but_adds_no_pnl() {
        let stats = calculate_stats(&[trade(EntryType::Breakout, Outcome::Breakeven, 1.0, 1.2, 5.0, 2)]);
        assert_eq!(stats.total_trades, 1);
        assert_eq!(stats.breakeven, 1);
        assert_eq!(stats.total_profit, 0.0);
        assert_eq!(stats.total_loss, 0.0);
        assert_eq!(stats.win_rate, 0.0);
    }

    #[test]
    fn mislabelled_direction_contributes_nothing() {
        // A "win" whose exit is below entry has no positive price move.
        let stats = calculate_stats(&[trade(EntryType::Breakout, Outcome::Win, 1.2, 1.1, 1.0, 2)]);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.total_profit, 0.0);
    }

    #[test]
    fn overflowing_price_moves_are_left_out() {
        let stats = calculate_stats(&[
            trade(EntryType::TwoTouch, Outcome::Win, -1e308, 1e308, 10.0, 1),
            trade(EntryType::TwoTouch, Outcome::Loss, 1e308, -1e308, 10.0, 1),
            trade(EntryType::TwoTouch, Outcome::Win, 1.0, 2.0, 1.0, 1),
        ]);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.total_profit, 1.0);
        assert_eq!(stats.total_loss, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
    }

    #[test]
    fn overflowing_sums_report_zero() {
        let big = trade(EntryType::Retest, Outcome::Win, 0.0, 1e308, 1.0, 2);
        let loss = trade(EntryType::Retest, Outcome::Loss, 1.0, 0.0, 1.0, 2);
        let mut huge_rr = big.clone();
        huge_rr.risk_reward_ratio = f64::MAX;

        let stats = calculate_stats(&[big.clone(), big, huge_rr.clone(), huge_rr, loss]);
        assert_eq!(stats.total_profit, 0.0);
        assert_eq!(stats.total_loss, 1.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.average_rr, 0.0);
    }

    #[test]
    fn month_breakdown_groups_by_entry_month() {
        let stats = calculate_stats(&[
            trade(EntryType::TwoTouch, Outcome::Win, 1.0, 1.1, 1.0, 1),
            trade(EntryType::TwoTouch, Outcome::Loss, 1.1, 1.0, 1.0, 1),
            trade(EntryType::TwoTouch, Outcome::Win, 1.0, 1.1, 1.0, 3),
        ]);
        let jan = stats.by_month[&MonthKey { year: 2024, month: 1 }];
        assert_eq!((jan.total, jan.wins, jan.losses), (2, 1, 1));
        assert_eq!(jan.win_rate, 50.0);
        assert_eq!(stats.by_month.len(), 2);
    }

    #[test]
    fn average_rr_uses_stored_ratio() {
        let mut a = trade(EntryType::TwoTouch, Outcome::Win, 1.0, 1.1, 1.0, 1);
        let mut b = trade(EntryType::TwoTouch, Outcome::Loss, 1.0, 0.9, 1.0, 1);
        a.risk_reward_ratio = 3.0;
        b.risk_reward_ratio = 1.0;
        assert_eq!(calculate_stats(&[a, b]).average_rr, 2.0);
    }

    #[test]
    fn month_key_navigation_and_labels() {
        let jan = MonthKey { year: 2024, month: 1 };
        assert_eq!(jan.previous(), MonthKey { year: 2023, month: 12 });
        assert_eq!(jan.label(), "Jan 2024");
        assert_eq!(jan.to_string(), "2024-01");
    }

    #[test]
    fn stats_serialize_with_string_keys() {
        let stats = calculate_stats(&[trade(EntryType::TwoTouch, Outcome::Win, 1.0, 1.1, 1.0, 4)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_entry_type"]["2 touch"]["wins"], 1);
        assert_eq!(json["by_month"]["2024-04"]["total"], 1);
    }
}
