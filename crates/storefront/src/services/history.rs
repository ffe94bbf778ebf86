//! Bounded most-recent-first histories.

/// Recent searches kept under the search box.
pub const MAX_RECENT_SEARCHES: usize = 8;

/// Scanned codes kept in the scanner history.
pub const MAX_SCANNED_CODES: usize = 10;

/// Most-recent-first list of distinct entries with a fixed capacity.
///
/// Entries are stored exactly as given and compared case-insensitively,
/// ignoring surrounding whitespace; re-inserting an entry moves it to the front
/// with its latest spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentHistory {
    entries: Vec<String>,
    capacity: usize,
}

impl RecentHistory {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Restore persisted entries, enforcing the capacity.
    #[must_use]
    pub fn from_entries(capacity: usize, mut entries: Vec<String>) -> Self {
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Insert at the front. Blank input is ignored and returns `false`.
    pub fn push(&mut self, entry: &str) -> bool {
        if entry.trim().is_empty() {
            return false;
        }

        let key = dedupe_key(entry);
        self.entries.retain(|e| dedupe_key(e) != key);
        self.entries.insert(0, entry.to_owned());
        self.entries.truncate(self.capacity);
        true
    }

    /// Remove an exact entry. Returns whether anything was removed.
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != entry);
        self.entries.len() != before
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn dedupe_key(entry: &str) -> String {
    entry.trim().to_lowercase()
}
