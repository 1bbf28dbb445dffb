//! Persistence: the keyed record store, its storage backends and the
//! versioned export artifact.

pub mod backend;
pub mod collection;
pub mod database;
pub mod journal;
pub mod snapshot;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use collection::Collection;
pub use database::{Database, Stored};
pub use journal::{ImportSummary, Journal, StorageUsage};
pub use snapshot::{SnapshotInfo, FORMAT_TAG, SCHEMA_VERSION};
