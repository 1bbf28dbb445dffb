//! Chart-data shaping: labelled series for bar and doughnut charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{EntryType, Outcome, Trade};
use crate::stats::MonthKey;

/// Number of monthly buckets in the trailing window.
pub const MONTH_WINDOW: usize = 6;

pub const WIN_COLOR: &str = "#22c55e";
pub const LOSS_COLOR: &str = "#ef4444";
pub const BREAKEVEN_COLOR: &str = "#eab308";

/// One series of a chart, aligned index-for-index with the chart labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<usize>,
    /// One color for bar series, one per label for doughnut series.
    pub background_color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

/// Everything the dashboard charts need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Bar groups for each entry type present in the data.
    pub by_entry_type: ChartSeries,
    /// Bar groups for the trailing six months, oldest first.
    pub by_month: ChartSeries,
    /// Doughnut of overall outcomes.
    pub outcomes: ChartSeries,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    wins: usize,
    losses: usize,
    breakeven: usize,
}

impl Counts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Breakeven => self.breakeven += 1,
        }
    }
}

/// Shape trades into chart series, with the month window ending at the
/// month containing `as_of`.
pub fn generate_chart_data(trades: &[Trade], as_of: NaiveDate) -> ChartData {
    ChartData {
        by_entry_type: entry_type_series(trades),
        by_month: month_series(trades, as_of),
        outcomes: outcome_series(trades),
    }
}

/// [`generate_chart_data`] anchored at today's local date.
pub fn generate_chart_data_now(trades: &[Trade]) -> ChartData {
    generate_chart_data(trades, chrono::Local::now().date_naive())
}

/// The trailing month window ending at `as_of`, oldest first.
pub fn trailing_months(as_of: NaiveDate) -> Vec<MonthKey> {
    let mut months = Vec::with_capacity(MONTH_WINDOW);
    let mut key = MonthKey::of(as_of);
    for _ in 0..MONTH_WINDOW {
        months.push(key);
        key = key.previous();
    }
    months.reverse();
    months
}

fn entry_type_series(trades: &[Trade]) -> ChartSeries {
    let mut groups: BTreeMap<EntryType, Counts> = BTreeMap::new();
    for trade in trades {
        groups.entry(trade.entry_type).or_default().record(trade.outcome);
    }

    let labels = groups.keys().map(|t| t.label().to_string()).collect();
    let counts: Vec<Counts> = groups.into_values().collect();
    ChartSeries {
        labels,
        datasets: outcome_datasets(&counts),
    }
}

fn month_series(trades: &[Trade], as_of: NaiveDate) -> ChartSeries {
    let months = trailing_months(as_of);
    let mut buckets: BTreeMap<MonthKey, Counts> =
        months.iter().map(|m| (*m, Counts::default())).collect();

    for trade in trades {
        // Trades outside the window are ignored.
        if let Some(bucket) = buckets.get_mut(&MonthKey::of(trade.entry_time)) {
            bucket.record(trade.outcome);
        }
    }

    ChartSeries {
        labels: months.iter().map(|m| m.label()).collect(),
        datasets: outcome_datasets(&buckets.into_values().collect::<Vec<_>>()),
    }
}

fn outcome_series(trades: &[Trade]) -> ChartSeries {
    let mut counts = Counts::default();
    for trade in trades {
        counts.record(trade.outcome);
    }
    ChartSeries {
        labels: vec!["Wins".into(), "Losses".into(), "Breakeven".into()],
        datasets: vec![Dataset {
            label: "Outcomes".into(),
            data: vec![counts.wins, counts.losses, counts.breakeven],
            background_color: vec![
                WIN_COLOR.into(),
                LOSS_COLOR.into(),
                BREAKEVEN_COLOR.into(),
            ],
        }],
    }
}

fn outcome_datasets(counts: &[Counts]) -> Vec<Dataset> {
    let series = |label: &str, color: &str, pick: fn(&Counts) -> usize| Dataset {
        label: label.to_string(),
        data: counts.iter().map(pick).collect(),
        background_color: vec![color.to_string()],
    };
    vec![
        series("Wins", WIN_COLOR, |c| c.wins),
        series("Losses", LOSS_COLOR, |c| c.losses),
        series("Breakeven", BREAKEVEN_COLOR, |c| c.breakeven),
    ]
}
