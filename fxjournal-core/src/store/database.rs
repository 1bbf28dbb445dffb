//! The full store contents: one collection per record kind.

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use crate::domain::{BacktestScreenshot, MissedTrade, Record, Trade};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub trades: Collection<Trade>,
    #[serde(default)]
    pub missed_trades: Collection<MissedTrade>,
    #[serde(default)]
    pub backtests: Collection<BacktestScreenshot>,
}

impl Database {
    pub fn record_count(&self) -> usize {
        self.trades.len() + self.missed_trades.len() + self.backtests.len()
    }

    /// Recompute every derived field from the fields it depends on.
    pub(crate) fn refresh_derived(&mut self) {
        self.trades.iter_mut().for_each(|r| r.refresh_derived());
        self.missed_trades.iter_mut().for_each(|r| r.refresh_derived());
        self.backtests.iter_mut().for_each(|r| r.refresh_derived());
    }

    /// Check invariants that serde cannot express: field rules and
    /// timestamp ordering of every record.
    pub fn check_invariants(&self) -> Result<(), String> {
        check_records(&self.trades)?;
        check_records(&self.missed_trades)?;
        check_records(&self.backtests)?;
        Ok(())
    }
}

fn check_records<T: Record>(collection: &Collection<T>) -> Result<(), String> {
    for record in collection.iter() {
        if let Err(e) = record.validate() {
            return Err(format!("{} '{}': {e}", T::KIND, record.id()));
        }
        if record.created_at() > record.updated_at() {
            return Err(format!(
                "{} '{}' was updated before it was created",
                T::KIND,
                record.id()
            ));
        }
    }
    Ok(())
}

/// Maps a record type to its collection inside [`Database`].
pub trait Stored: Record {
    fn collection(db: &Database) -> &Collection<Self>;
    fn collection_mut(db: &mut Database) -> &mut Collection<Self>;
}

impl Stored for Trade {
    fn collection(db: &Database) -> &Collection<Self> {
        &db.trades
    }

    fn collection_mut(db: &mut Database) -> &mut Collection<Self> {
        &mut db.trades
    }
}

impl Stored for MissedTrade {
    fn collection(db: &Database) -> &Collection<Self> {
        &db.missed_trades
    }

    fn collection_mut(db: &mut Database) -> &mut Collection<Self> {
        &mut db.missed_trades
    }
}

impl Stored for BacktestScreenshot {
    fn collection(db: &Database) -> &Collection<Self> {
        &db.backtests
    }

    fn collection_mut(db: &mut Database) -> &mut Collection<Self> {
        &mut db.backtests
    }
}
