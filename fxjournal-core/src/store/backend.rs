//! Storage backends: where a [`Database`] lives between runs.
//!
//! The journal writes the whole database on every mutation. A backend must
//! either persist the full snapshot or fail without side effects visible to
//! the next `load`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::database::Database;
use super::snapshot;
use crate::error::StorageError;

pub trait StorageBackend {
    /// Load the stored database. An empty store is `Ok(Database::default())`.
    fn load(&mut self) -> Result<Database, StorageError>;

    /// Persist the full database.
    fn save(&mut self, db: &Database) -> Result<(), StorageError>;

    /// Short human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Keeps the last saved snapshot in memory. Used for tests and ephemeral
/// sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    saved: Option<Database>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing database, as if it had been saved earlier.
    pub fn with_database(db: Database) -> Self {
        Self {
            saved: Some(db),
            writes: 0,
        }
    }

    /// Number of successful `save` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn saved(&self) -> Option<&Database> {
        self.saved.as_ref()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&mut self) -> Result<Database, StorageError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, db: &Database) -> Result<(), StorageError> {
        self.saved = Some(db.clone());
        self.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// A single JSON file holding the export envelope.
///
/// Writes are atomic: the snapshot goes to `<file>.tmp` and is renamed into
/// place, so a crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Pretty-print the stored file.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Database, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no journal file yet, starting empty");
                return Ok(Database::default());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        // A damaged file is an error, never an empty journal: the next save
        // would otherwise overwrite the user's data.
        let (db, info) = snapshot::decode(&text).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        info!(
            path = %self.path.display(),
            records = db.record_count(),
            schema_version = info.schema_version,
            "loaded journal"
        );
        Ok(db)
    }

    fn save(&mut self, db: &Database) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let text = snapshot::encode(db, self.pretty)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, text).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::io(&self.path, e)
        })?;

        debug!(path = %self.path.display(), records = db.record_count(), "saved journal");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
