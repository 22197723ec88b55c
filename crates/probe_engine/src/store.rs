use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use probe_core::HistoryEntry;
use probe_logging::probe_debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{HistoryError, HistoryStore};

/// Fixed name of the history slot.
pub const HISTORY_KEY: &str = "ocr_history";

#[derive(Debug, Serialize, Deserialize, Default)]
struct PersistedHistory {
    entries: Vec<HistoryEntry>,
}

/// Stores the history as RON in `<dir>/ocr_history.ron`.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{HISTORY_KEY}.ron"))
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, HistoryError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let persisted: PersistedHistory =
            ron::from_str(&content).map_err(|err| HistoryError::Format(err.to_string()))?;
        probe_debug!("Read {} history entries from {:?}", persisted.entries.len(), path);
        Ok(Some(persisted.entries))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let persisted = PersistedHistory {
            entries: entries.to_vec(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&persisted, pretty)
            .map_err(|err| HistoryError::Format(err.to_string()))?;
        write_atomically(&self.dir, &self.path(), &content)
    }
}

/// Writes to a temp file in `dir`, then renames it over `target`.
fn write_atomically(dir: &Path, target: &Path, content: &str) -> Result<(), HistoryError> {
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| HistoryError::Io(err.error))?;
    Ok(())
}

/// In-process slot; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    slot: Arc<Mutex<Option<Vec<HistoryEntry>>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(entries))),
        }
    }

    /// What the last `save` wrote, if anything.
    pub fn saved(&self) -> Option<Vec<HistoryEntry>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, HistoryError> {
        Ok(self.saved())
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(entries.to_vec());
        Ok(())
    }
}
