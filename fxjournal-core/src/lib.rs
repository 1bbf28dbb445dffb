//! fxjournal core: domain model, persistence, statistics and chart shaping
//! for a personal forex trading journal.
//!
//! This crate contains:
//! - Domain types (trades, missed trades, backtest screenshots, media)
//! - A keyed record store with pluggable backends and versioned export/import
//! - Trade statistics and chart-series shaping
//! - Pip, currency and percentage formatting
//! - TOML configuration and CSV trade export

pub mod charts;
pub mod config;
pub mod csv_export;
pub mod domain;
pub mod error;
pub mod format;
pub mod stats;
pub mod store;

pub use charts::{generate_chart_data, generate_chart_data_now, ChartData};
pub use config::JournalConfig;
pub use error::{ImportFormatError, JournalError, StorageError, ValidationError};
pub use stats::{calculate_stats, TradeStats};
pub use store::{JsonFileBackend, Journal, MemoryBackend, StorageBackend};
