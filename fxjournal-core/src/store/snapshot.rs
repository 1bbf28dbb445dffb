//! Versioned export envelope.
//!
//! ```json
//! {
//!   "format": "fxjournal-export",
//!   "schema_version": 1,
//!   "exported_at": "2024-03-20T10:00:00Z",
//!   "checksum": "<blake3 hex of the canonical data payload>",
//!   "data": { "trades": [...], "missed_trades": [...], "backtests": [...] }
//! }
//! ```
//!
//! The checksum covers the compact serialization of `data` as a
//! `serde_json::Value` (object keys sorted), so it is independent of pretty
//! printing and of field order in the file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::database::Database;
use crate::error::{ImportFormatError, StorageError};

/// Format tag written into every artifact.
pub const FORMAT_TAG: &str = "fxjournal-export";

/// Current schema version. Artifacts with any other version are rejected.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    format: &'a str,
    schema_version: u32,
    exported_at: DateTime<Utc>,
    checksum: String,
    data: Value,
}

/// Header fields of a decoded artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub schema_version: u32,
    pub exported_at: Option<DateTime<Utc>>,
    pub checksum: String,
}

/// Serialize the database into an export artifact.
pub fn encode(db: &Database, pretty: bool) -> Result<String, StorageError> {
    let data = serde_json::to_value(db)?;
    let checksum = checksum_of(&data)?;
    let envelope = Envelope {
        format: FORMAT_TAG,
        schema_version: SCHEMA_VERSION,
        exported_at: Utc::now(),
        checksum,
        data,
    };
    let text = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(text)
}

/// Parse and fully validate an artifact without touching any store.
///
/// Checks run in order: JSON shape, format tag, schema version, checksum,
/// record shape (including duplicate ids), then the field rules and
/// timestamp ordering of every record. Derived fields are recomputed before
/// the field rules run, so a stale stored value never survives a load.
pub fn decode(text: &str) -> Result<(Database, SnapshotInfo), ImportFormatError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| ImportFormatError::Malformed(e.to_string()))?;
    let obj = root
        .as_object()
        .ok_or_else(|| ImportFormatError::Malformed("top level is not an object".into()))?;

    let format = obj
        .get("format")
        .and_then(Value::as_str)
        .ok_or_else(|| ImportFormatError::Malformed("missing format tag".into()))?;
    if format != FORMAT_TAG {
        return Err(ImportFormatError::UnknownFormat(format.to_string()));
    }

    let found = obj
        .get("schema_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| ImportFormatError::Malformed("missing schema_version".into()))?;
    if found != u64::from(SCHEMA_VERSION) {
        return Err(ImportFormatError::UnsupportedVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            expected: SCHEMA_VERSION,
        });
    }

    let expected_checksum = obj
        .get("checksum")
        .and_then(Value::as_str)
        .ok_or_else(|| ImportFormatError::Malformed("missing checksum".into()))?;
    let data = obj
        .get("data")
        .ok_or_else(|| ImportFormatError::Malformed("missing data".into()))?;
    let actual = checksum_of(data).map_err(|e| ImportFormatError::Malformed(e.to_string()))?;
    if actual != expected_checksum {
        return Err(ImportFormatError::ChecksumMismatch);
    }

    let mut db = Database::deserialize(data)
        .map_err(|e| ImportFormatError::InvalidRecord(e.to_string()))?;
    db.refresh_derived();
    db.check_invariants()
        .map_err(ImportFormatError::InvalidRecord)?;

    let exported_at = obj
        .get("exported_at")
        .and_then(|v| DateTime::<Utc>::deserialize(v).ok());

    Ok((
        db,
        SnapshotInfo {
            schema_version: SCHEMA_VERSION,
            exported_at,
            checksum: actual,
        },
    ))
}

fn checksum_of(data: &Value) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(data)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
