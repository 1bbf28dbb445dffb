//! The journal store: typed CRUD over a [`Database`] with write-through
//! persistence.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::backend::{MemoryBackend, StorageBackend};
use super::database::{Database, Stored};
use super::snapshot;
use crate::domain::{
    BacktestDraft, BacktestPatch, BacktestScreenshot, EntryType, MissedTrade, MissedTradeDraft,
    MissedTradePatch, RecordId, Trade, TradeDraft, TradePatch,
};
use crate::error::JournalError;

/// Record counts and content size of an accepted import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub trades: usize,
    pub missed_trades: usize,
    pub backtests: usize,
    pub exported_at: Option<DateTime<Utc>>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.trades + self.missed_trades + self.backtests
    }
}

/// Informational storage footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsage {
    pub trades: usize,
    pub missed_trades: usize,
    pub backtests: usize,
    /// Size of the compact serialized snapshot.
    pub bytes: usize,
}

/// Owns every stored record. Each mutation is written through the backend
/// before it returns; a failed write leaves the in-memory state exactly as it
/// was before the call.
#[derive(Debug)]
pub struct Journal<B: StorageBackend = MemoryBackend> {
    db: Database,
    backend: B,
}

impl Journal<MemoryBackend> {
    pub fn in_memory() -> Self {
        Self {
            db: Database::default(),
            backend: MemoryBackend::new(),
        }
    }
}

impl<B: StorageBackend> Journal<B> {
    /// Load the backend's current contents.
    pub fn open(mut backend: B) -> Result<Self, JournalError> {
        let db = backend.load()?;
        debug!(
            backend = %backend.describe(),
            records = db.record_count(),
            "opened journal"
        );
        Ok(Self { db, backend })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // ----- trades -----

    pub fn add_trade(&mut self, draft: TradeDraft) -> Result<RecordId, JournalError> {
        draft.validate()?;
        self.add(|id, now| Trade::from_draft(id, draft, now))
    }

    pub fn update_trade(&mut self, id: &RecordId, patch: TradePatch) -> Result<Trade, JournalError> {
        patch.validate()?;
        self.update(id, |trade: &mut Trade| patch.apply_to(trade))
    }

    /// Returns whether a record was removed. Unknown ids are not an error.
    pub fn delete_trade(&mut self, id: &RecordId) -> Result<bool, JournalError> {
        self.delete::<Trade>(id)
    }

    pub fn get_trade(&self, id: &RecordId) -> Option<Trade> {
        self.db.trades.get(id).cloned()
    }

    /// All trades in insertion order.
    pub fn all_trades(&self) -> Vec<Trade> {
        self.db.trades.to_vec()
    }

    // ----- missed trades -----

    pub fn add_missed_trade(&mut self, draft: MissedTradeDraft) -> Result<RecordId, JournalError> {
        draft.validate()?;
        self.add(|id, now| MissedTrade::from_draft(id, draft, now))
    }

    pub fn update_missed_trade(
        &mut self,
        id: &RecordId,
        patch: MissedTradePatch,
    ) -> Result<MissedTrade, JournalError> {
        patch.validate()?;
        self.update(id, |missed: &mut MissedTrade| patch.apply_to(missed))
    }

    pub fn delete_missed_trade(&mut self, id: &RecordId) -> Result<bool, JournalError> {
        self.delete::<MissedTrade>(id)
    }

    pub fn get_missed_trade(&self, id: &RecordId) -> Option<MissedTrade> {
        self.db.missed_trades.get(id).cloned()
    }

    pub fn all_missed_trades(&self) -> Vec<MissedTrade> {
        self.db.missed_trades.to_vec()
    }

    // ----- backtests -----

    pub fn add_backtest(&mut self, draft: BacktestDraft) -> Result<RecordId, JournalError> {
        draft.validate()?;
        self.add(|id, now| BacktestScreenshot::from_draft(id, draft, now))
    }

    pub fn update_backtest(
        &mut self,
        id: &RecordId,
        patch: BacktestPatch,
    ) -> Result<BacktestScreenshot, JournalError> {
        patch.validate()?;
        self.update(id, |shot: &mut BacktestScreenshot| patch.apply_to(shot))
    }

    pub fn delete_backtest(&mut self, id: &RecordId) -> Result<bool, JournalError> {
        self.delete::<BacktestScreenshot>(id)
    }

    pub fn get_backtest(&self, id: &RecordId) -> Option<BacktestScreenshot> {
        self.db.backtests.get(id).cloned()
    }

    /// All backtests, newest created first. Equal timestamps keep insertion
    /// order.
    pub fn all_backtests(&self) -> Vec<BacktestScreenshot> {
        newest_first(self.db.backtests.iter())
    }

    /// Backtests for a pair (case-insensitive) and entry type, newest first.
    pub fn backtests_for(&self, pair: &str, entry_type: EntryType) -> Vec<BacktestScreenshot> {
        newest_first(
            self.db
                .backtests
                .iter()
                .filter(|b| b.entry_type == entry_type && b.matches_pair(pair)),
        )
    }

    // ----- whole-store operations -----

    /// Pretty-printed export artifact of the whole store.
    pub fn export_all(&self) -> Result<String, JournalError> {
        self.export(true)
    }

    pub fn export_all_compact(&self) -> Result<String, JournalError> {
        self.export(false)
    }

    fn export(&self, pretty: bool) -> Result<String, JournalError> {
        let text = snapshot::encode(&self.db, pretty)?;
        info!(
            records = self.db.record_count(),
            bytes = text.len(),
            "exported journal"
        );
        Ok(text)
    }

    /// Replace the whole store with the artifact's contents.
    ///
    /// The artifact is validated completely before anything changes. The new
    /// contents are persisted first and only then swapped in, so on any error
    /// the store is untouched.
    pub fn import_all(&mut self, artifact: &str) -> Result<ImportSummary, JournalError> {
        let (db, meta) = snapshot::decode(artifact).map_err(|e| {
            warn!(error = %e, "rejected import");
            e
        })?;
        self.backend.save(&db)?;

        let summary = ImportSummary {
            trades: db.trades.len(),
            missed_trades: db.missed_trades.len(),
            backtests: db.backtests.len(),
            exported_at: meta.exported_at,
        };
        self.db = db;
        info!(
            trades = summary.trades,
            missed_trades = summary.missed_trades,
            backtests = summary.backtests,
            "imported journal"
        );
        Ok(summary)
    }

    pub fn usage(&self) -> Result<StorageUsage, JournalError> {
        let bytes = snapshot::encode(&self.db, false)?.len();
        Ok(StorageUsage {
            trades: self.db.trades.len(),
            missed_trades: self.db.missed_trades.len(),
            backtests: self.db.backtests.len(),
            bytes,
        })
    }

    // ----- generic write path -----

    fn fresh_id<T: Stored>(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            if !T::collection(&self.db).contains(&id) {
                return id;
            }
        }
    }

    fn add<T: Stored>(
        &mut self,
        build: impl FnOnce(RecordId, DateTime<Utc>) -> T,
    ) -> Result<RecordId, JournalError> {
        let id = self.fresh_id::<T>();
        let record = build(id.clone(), Utc::now());
        record.validate()?;
        T::collection_mut(&mut self.db).insert(record);

        if let Err(e) = self.backend.save(&self.db) {
            T::collection_mut(&mut self.db).remove(&id);
            warn!(kind = %T::KIND, %id, error = %e, "add rolled back");
            return Err(e.into());
        }
        debug!(kind = %T::KIND, %id, "added record");
        Ok(id)
    }

    fn update<T: Stored>(
        &mut self,
        id: &RecordId,
        apply: impl FnOnce(&mut T),
    ) -> Result<T, JournalError> {
        let Some(slot) = T::collection_mut(&mut self.db).get_mut(id) else {
            return Err(JournalError::NotFound {
                kind: T::KIND,
                id: id.clone(),
            });
        };
        let mut updated = slot.clone();
        apply(&mut updated);
        updated.validate()?;
        updated.touch(Utc::now());
        let previous = std::mem::replace(slot, updated.clone());

        if let Err(e) = self.backend.save(&self.db) {
            if let Some(record) = T::collection_mut(&mut self.db).get_mut(id) {
                *record = previous;
            }
            warn!(kind = %T::KIND, %id, error = %e, "update rolled back");
            return Err(e.into());
        }
        debug!(kind = %T::KIND, %id, "updated record");
        Ok(updated)
    }

    fn delete<T: Stored>(&mut self, id: &RecordId) -> Result<bool, JournalError> {
        let Some((index, record)) = T::collection_mut(&mut self.db).remove(id) else {
            debug!(kind = %T::KIND, %id, "delete of unknown id ignored");
            return Ok(false);
        };

        if let Err(e) = self.backend.save(&self.db) {
            T::collection_mut(&mut self.db).restore(index, record);
            warn!(kind = %T::KIND, %id, error = %e, "delete rolled back");
            return Err(e.into());
        }
        debug!(kind = %T::KIND, %id, "deleted record");
        Ok(true)
    }
}

fn newest_first<'a>(
    shots: impl Iterator<Item = &'a BacktestScreenshot>,
) -> Vec<BacktestScreenshot> {
    let mut out: Vec<BacktestScreenshot> = shots.cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Outcome, Timeframe};
    use crate::error::{ImportFormatError, StorageError, ValidationError};
    use chrono::{NaiveDate, TimeZone};
    use std::cell::Cell;
    use std::rc::Rc;

    fn draft() -> TradeDraft {
        TradeDraft::new(
            "EUR/USD",
            EntryType::TwoTouch,
            Outcome::Win,
            Direction::Buy,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            1.1000,
            1.1050,
            1.0,
        )
        .with_levels(1.0950, 1.1100)
    }

    /// Memory backend whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail: Rc<Cell<bool>>,
    }

    impl StorageBackend for FlakyBackend {
        fn load(&mut self) -> Result<Database, StorageError> {
            self.inner.load()
        }

        fn save(&mut self, db: &Database) -> Result<(), StorageError> {
            if self.fail.get() {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.inner.save(db)
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    fn flaky() -> (Journal<FlakyBackend>, Rc<Cell<bool>>) {
        let backend = FlakyBackend::default();
        let fail = Rc::clone(&backend.fail);
        (Journal::open(backend).unwrap(), fail)
    }

    #[test]
    fn add_get_and_list_in_insertion_order() {
        let mut journal = Journal::in_memory();
        let a = journal.add_trade(draft()).unwrap();
        let b = journal.add_trade(draft()).unwrap();
        assert_ne!(a, b);

        let ids: Vec<_> = journal.all_trades().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.clone(), b]);

        let trade = journal.get_trade(&a).unwrap();
        assert_eq!(trade.created_at, trade.updated_at);
        assert!((trade.risk_reward_ratio - 2.0).abs() < 1e-9);
        assert_eq!(journal.backend().writes(), 2);
    }

    #[test]
    fn invalid_draft_is_rejected_without_a_write() {
        let mut journal = Journal::in_memory();
        let mut bad = draft();
        bad.entry_price = f64::NAN;
        assert!(matches!(
            journal.add_trade(bad),
            Err(JournalError::Validation(_))
        ));
        assert_eq!(journal.backend().writes(), 0);
        assert!(journal.all_trades().is_empty());
    }

    #[test]
    fn update_keeps_identity_and_moves_updated_at_forward() {
        let mut journal = Journal::in_memory();
        let id = journal.add_trade(draft()).unwrap();
        let before = journal.get_trade(&id).unwrap();

        let patch = TradePatch {
            outcome: Some(Outcome::Loss),
            take_profit: Some(None),
            ..TradePatch::default()
        };
        let after = journal.update_trade(&id, patch).unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.outcome, Outcome::Loss);
        assert_eq!(after.risk_reward_ratio, 0.0);
        assert_eq!(journal.get_trade(&id).unwrap(), after);
    }

    #[test]
    fn update_with_overflowing_derived_field_is_rejected_without_a_write() {
        let mut journal = Journal::in_memory();
        let id = journal
            .add_missed_trade(MissedTradeDraft::new(
                "EUR/USD",
                EntryType::Breakout,
                Direction::Sell,
                NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
                -1e308,
                1.0,
                "late",
            ))
            .unwrap();
        let before = journal.get_missed_trade(&id).unwrap();
        let writes = journal.backend().writes();

        let patch = MissedTradePatch {
            potential_exit: Some(1e308),
            ..MissedTradePatch::default()
        };
        assert!(matches!(
            journal.update_missed_trade(&id, patch),
            Err(JournalError::Validation(ValidationError::NonFinite {
                field: "potential_pips"
            }))
        ));
        assert_eq!(journal.get_missed_trade(&id).unwrap(), before);
        assert_eq!(journal.backend().writes(), writes);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let mut journal = Journal::in_memory();
        let err = journal
            .update_backtest(&RecordId::from("nope"), BacktestPatch::default())
            .unwrap_err();
        assert!(matches!(err, JournalError::NotFound { .. }));
        assert_eq!(err.to_string(), "backtest 'nope' not found");
    }

    #[test]
    fn delete_is_idempotent_and_skips_the_write() {
        let mut journal = Journal::in_memory();
        let id = journal.add_trade(draft()).unwrap();
        assert!(journal.delete_trade(&id).unwrap());
        let writes = journal.backend().writes();

        assert!(!journal.delete_trade(&id).unwrap());
        assert!(!journal.delete_trade(&RecordId::from("never-existed")).unwrap());
        assert_eq!(journal.backend().writes(), writes);
    }

    #[test]
    fn failed_add_is_rolled_back() {
        let (mut journal, fail) = flaky();
        fail.set(true);
        assert!(matches!(
            journal.add_trade(draft()),
            Err(JournalError::Storage(_))
        ));
        assert!(journal.all_trades().is_empty());
    }

    #[test]
    fn failed_update_restores_previous_record() {
        let (mut journal, fail) = flaky();
        let id = journal.add_trade(draft()).unwrap();
        let before = journal.get_trade(&id).unwrap();

        fail.set(true);
        let patch = TradePatch {
            notes: Some("changed".into()),
            ..TradePatch::default()
        };
        assert!(journal.update_trade(&id, patch).is_err());
        assert_eq!(journal.get_trade(&id).unwrap(), before);
    }

    #[test]
    fn failed_delete_reinserts_at_original_position() {
        let (mut journal, fail) = flaky();
        let ids: Vec<_> = (0..3).map(|_| journal.add_trade(draft()).unwrap()).collect();

        fail.set(true);
        assert!(journal.delete_trade(&ids[1]).is_err());
        let after: Vec<_> = journal.all_trades().into_iter().map(|t| t.id).collect();
        assert_eq!(after, ids);
    }

    #[test]
    fn backtests_are_listed_newest_first_and_queried_by_pair() {
        let mut db = Database::default();
        let at = |day| Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        let shots = [
            ("a", "EUR/USD", EntryType::Retest, 1),
            ("b", "eur/usd", EntryType::Retest, 3),
            ("c", "EUR/USD", EntryType::Breakout, 2),
            ("d", "GBP/USD", EntryType::Retest, 3),
        ];
        for (id, pair, entry_type, day) in shots {
            db.backtests.insert(BacktestScreenshot::from_draft(
                RecordId::from(id),
                BacktestDraft::new(pair, entry_type, Timeframe::H1, format!("{id}.png")),
                at(day),
            ));
        }
        let journal = Journal::open(MemoryBackend::with_database(db)).unwrap();

        let order: Vec<_> = journal
            .all_backtests()
            .into_iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);

        let matched: Vec<_> = journal
            .backtests_for("Eur/Usd", EntryType::Retest)
            .into_iter()
            .map(|b| b.id.to_string())
            .collect();
        assert_eq!(matched, vec!["b", "a"]);
    }

    #[test]
    fn export_then_import_reproduces_the_store() {
        let mut source = Journal::in_memory();
        source.add_trade(draft()).unwrap();
        source
            .add_backtest(BacktestDraft::new(
                "USD/JPY",
                EntryType::Reversal,
                Timeframe::M15,
                "shot.png",
            ))
            .unwrap();
        let artifact = source.export_all().unwrap();

        let mut target = Journal::in_memory();
        let summary = target.import_all(&artifact).unwrap();
        assert_eq!(summary.total(), 2);
        assert_eq!(target.database(), source.database());
    }

    #[test]
    fn rejected_import_leaves_store_untouched() {
        let mut journal = Journal::in_memory();
        journal.add_trade(draft()).unwrap();
        let before = journal.database().clone();
        let writes = journal.backend().writes();

        let err = journal.import_all("{\"format\":\"fxjournal-export\"}").unwrap_err();
        assert!(matches!(
            err,
            JournalError::ImportFormat(ImportFormatError::Malformed(_))
        ));
        assert_eq!(journal.database(), &before);
        assert_eq!(journal.backend().writes(), writes);
    }

    #[test]
    fn import_that_cannot_be_persisted_is_not_applied() {
        let (mut journal, fail) = flaky();
        let artifact = {
            let mut other = Journal::in_memory();
            other.add_trade(draft()).unwrap();
            other.export_all_compact().unwrap()
        };

        fail.set(true);
        assert!(matches!(
            journal.import_all(&artifact),
            Err(JournalError::Storage(_))
        ));
        assert!(journal.all_trades().is_empty());
    }

    #[test]
    fn usage_counts_records() {
        let mut journal = Journal::in_memory();
        let empty = journal.usage().unwrap();
        journal.add_trade(draft()).unwrap();
        let usage = journal.usage().unwrap();
        assert_eq!(usage.trades, 1);
        assert_eq!(usage.missed_trades, 0);
        assert!(usage.bytes > empty.bytes);
    }
}
