use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Alias to location map for one frame.
///
/// Widgets are located in parallel, so every access goes through one mutex;
/// check-and-insert is a single critical section. Entries are never removed
/// or replaced.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    entries: Mutex<HashMap<String, String>>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `alias` unless it is already bound. Returns `false` on a clash.
    pub fn try_insert(&self, alias: &str, location: &str) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(alias) {
            return false;
        }
        entries.insert(alias.to_string(), location.to_string());
        true
    }

    /// Location bound to `alias`.
    pub fn get(&self, alias: &str) -> Option<String> {
        self.lock().get(alias).cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.lock().contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere cannot leave the map half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/alias.rs"]
mod tests;
