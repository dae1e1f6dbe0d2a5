use serde::Serialize;

use crate::observer::{Observers, SubscriptionId};

/// A saved world as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub filename: String,
    /// The filename up to its first `.`.
    pub label: String,
}

impl CatalogEntry {
    pub fn new(filename: &str) -> Self {
        let label = filename.split('.').next().unwrap_or(filename).to_string();
        Self {
            filename: filename.to_string(),
            label,
        }
    }
}

/// The list of saved worlds. Every mutation notifies the subscribers.
#[derive(Debug, Default)]
pub struct WorldCatalog {
    entries: Vec<CatalogEntry>,
    observers: Observers<[CatalogEntry]>,
}

impl WorldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.label == label || e.filename == label)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&[CatalogEntry]) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Replace every entry with one per filename.
    pub fn set_filenames<S: AsRef<str>>(&mut self, filenames: &[S]) {
        self.entries = filenames.iter().map(|f| CatalogEntry::new(f.as_ref())).collect();
        self.notify();
    }

    /// Add an entry unless one with the same filename exists.
    pub fn insert(&mut self, filename: &str) -> bool {
        if self.entries.iter().any(|e| e.filename == filename) {
            return false;
        }
        self.entries.push(CatalogEntry::new(filename));
        self.notify();
        true
    }

    pub fn remove(&mut self, filename: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.filename != filename);
        let removed = self.entries.len() != before;
        if removed {
            self.notify();
        }
        removed
    }

    fn notify(&mut self) {
        self.observers.notify(&self.entries);
    }
}
