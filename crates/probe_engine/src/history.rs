use probe_core::{CompletedJob, HistoryEntry, HISTORY_CAPACITY};
use probe_logging::{probe_error, probe_info, probe_warn};

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("no history entry at position {index} (history holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("history store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history store is corrupt: {0}")]
    Format(String),
}

/// A durable slot holding the serialized history sequence.
pub trait HistoryStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, HistoryError>;

    /// Replaces the stored sequence wholesale.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
}

/// Most-recent-first record of completed jobs, capped at [`HISTORY_CAPACITY`].
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    store: Box<dyn HistoryStore>,
}

impl HistoryLog {
    /// Reads the store once. A missing or unreadable slot yields an empty log.
    pub fn load(store: Box<dyn HistoryStore>) -> Self {
        Self::load_with_capacity(store, HISTORY_CAPACITY)
    }

    pub fn load_with_capacity(store: Box<dyn HistoryStore>, capacity: usize) -> Self {
        let mut entries = match store.load() {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(err) => {
                probe_warn!("Failed to load history, starting empty: {}", err);
                Vec::new()
            }
        };
        entries.truncate(capacity);
        probe_info!("Loaded {} history entries", entries.len());
        Self {
            entries,
            capacity,
            store,
        }
    }

    /// Prepends a snapshot of `job`, drops the oldest beyond capacity and
    /// persists the whole sequence. Returns the updated sequence.
    pub fn record(&mut self, job: &CompletedJob, timestamp: impl Into<String>) -> &[HistoryEntry] {
        self.insert(HistoryEntry::from_completed(job, timestamp))
    }

    pub fn insert(&mut self, entry: HistoryEntry) -> &[HistoryEntry] {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist();
        &self.entries
    }

    pub fn load_all(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        self.entries
            .get(index)
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.entries) {
            probe_error!("Failed to persist history: {}", err);
        }
    }
}
