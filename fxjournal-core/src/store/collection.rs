//! Insertion-ordered, id-keyed record collection.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{Record, RecordId};

/// Records of one kind keyed by id, iterated in insertion order.
///
/// Serializes as a plain JSON array; deserialization rejects duplicate ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    records: IndexMap<RecordId, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in order. Returns the first repeated id on conflict.
    pub fn from_records(records: Vec<T>) -> Result<Self, RecordId> {
        let mut map = IndexMap::with_capacity(records.len());
        for record in records {
            let id = record.id().clone();
            if map.contains_key(&id) {
                return Err(id);
            }
            map.insert(id, record);
        }
        Ok(Self { records: map })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records.values()
    }

    /// Clone every record, in insertion order.
    pub fn to_vec(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.records.values_mut()
    }

    pub(crate) fn get_mut(&mut self, id: &RecordId) -> Option<&mut T> {
        self.records.get_mut(id)
    }

    /// Append a record whose id is not yet present.
    pub(crate) fn insert(&mut self, record: T) {
        self.records.insert(record.id().clone(), record);
    }

    /// Remove by id, returning the position it occupied.
    pub(crate) fn remove(&mut self, id: &RecordId) -> Option<(usize, T)> {
        self.records
            .shift_remove_full(id)
            .map(|(index, _, record)| (index, record))
    }

    /// Undo a [`remove`](Self::remove), putting the record back at `index`.
    pub(crate) fn restore(&mut self, index: usize, record: T) {
        let index = index.min(self.records.len());
        self.records.shift_insert(index, record.id().clone(), record);
    }
}

impl<T: Record> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

impl<'de, T: Record> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<T>::deserialize(deserializer)?;
        Collection::from_records(records)
            .map_err(|id| D::Error::custom(format!("duplicate {} id '{id}'", T::KIND)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BacktestDraft, BacktestScreenshot, EntryType, Timeframe};
    use chrono::Utc;

    fn shot(id: &str) -> BacktestScreenshot {
        BacktestScreenshot::from_draft(
            RecordId::from(id),
            BacktestDraft::new("EUR/USD", EntryType::TwoTouch, Timeframe::H4, "x.png"),
            Utc::now(),
        )
    }

    fn ids(c: &Collection<BacktestScreenshot>) -> Vec<&str> {
        c.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn preserves_insertion_order_across_removal() {
        let mut c = Collection::new();
        for id in ["a", "b", "c"] {
            c.insert(shot(id));
        }
        c.remove(&RecordId::from("b"));
        assert_eq!(ids(&c), vec!["a", "c"]);
    }

    #[test]
    fn restore_puts_record_back_in_place() {
        let mut c = Collection::new();
        for id in ["a", "b", "c"] {
            c.insert(shot(id));
        }
        let (index, record) = c.remove(&RecordId::from("b")).unwrap();
        c.restore(index, record);
        assert_eq!(ids(&c), vec!["a", "b", "c"]);
    }

    #[test]
    fn deserialize_rejects_duplicate_ids() {
        let json = serde_json::to_string(&vec![shot("a"), shot("a")]).unwrap();
        let err = serde_json::from_str::<Collection<BacktestScreenshot>>(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate backtest id 'a'"));
    }

    #[test]
    fn serializes_as_array() {
        let mut c = Collection::new();
        c.insert(shot("a"));
        let value = serde_json::to_value(&c).unwrap();
        assert!(value.is_array());
        let back: Collection<BacktestScreenshot> = serde_json::from_value(value).unwrap();
        assert_eq!(back, c);
    }
}
