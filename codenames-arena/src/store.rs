//! Match persistence boundary and its adapters
//!
//! Readers only ever observe fully committed records: the memory store
//! appends under a write lock, the file store replaces the file by rename.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{ArenaError, Result};
use crate::record::{MatchDraft, MatchRecord};

/// Durable home for match records
pub trait MatchStore: Send + Sync {
    /// Persist a finished game, returning it with its id and timestamp
    fn append_match(&self, draft: MatchDraft) -> Result<MatchRecord>;

    /// Every committed record, oldest first
    fn list_matches(&self) -> Result<Vec<MatchRecord>>;
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// In-process store; clones share the same records
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<MatchRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with existing records
    pub fn with_records(records: Vec<MatchRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchStore for MemoryStore {
    fn append_match(&self, draft: MatchDraft) -> Result<MatchRecord> {
        let record = MatchRecord::from_draft(draft, &mut rand::thread_rng());
        let mut records = self
            .records
            .write()
            .map_err(|e| ArenaError::write_failure(e))?;
        records.push(record.clone());
        Ok(record)
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| ArenaError::read_failure(e))?;
        Ok(records.clone())
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// Records kept as a JSON array in a single file
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating an empty file (and parent dirs) if missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    ArenaError::write_failure(format!("create {}: {}", parent.display(), e))
                })?;
            }
            write_atomically(&path, &[])?;
            tracing::info!("Created match store at {}", path.display());
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<MatchRecord>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ArenaError::read_failure(format!("read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ArenaError::read_failure(format!("parse {}: {}", self.path.display(), e))
        })
    }
}

impl MatchStore for JsonFileStore {
    fn append_match(&self, draft: MatchDraft) -> Result<MatchRecord> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| ArenaError::write_failure(e))?;

        let mut records = self.read_all().map_err(|e| ArenaError::write_failure(e))?;
        let record = MatchRecord::from_draft(draft, &mut rand::thread_rng());
        records.push(record.clone());
        write_atomically(&self.path, &records)?;

        Ok(record)
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>> {
        self.read_all()
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_atomically(path: &Path, records: &[MatchRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| ArenaError::write_failure(e))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)
        .map_err(|e| ArenaError::write_failure(format!("write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| ArenaError::write_failure(format!("rename to {}: {}", path.display(), e)))?;

    Ok(())
}
