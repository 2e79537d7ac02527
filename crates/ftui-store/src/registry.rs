#![forbid(unsafe_code)]

//! Ordered name-to-function registry shared by the binder and the store.
//!
//! A [`NamedRegistry<F>`] is a small insertion-ordered mapping from a
//! `&'static str` name to an entry `F` (a boxed method or reducer). It is the
//! explicit registry both halves of the crate are built on: the binder fixes
//! its key set from one, the store looks reducers up in one on every
//! dispatch.
//!
//! # Invariants
//!
//! 1. Names are unique; re-inserting an existing name replaces its entry.
//! 2. Iteration order is insertion order of first registration.
//! 3. `same_keys` compares key *sets* only, never entry values or order.
//!
//! Registries are expected to stay small (a handful of actions per
//! component), so lookups are linear scans rather than a hash map.

use tracing::warn;

/// Insertion-ordered mapping from static names to entries.
pub struct NamedRegistry<F> {
    entries: Vec<(&'static str, F)>,
}

impl<F> NamedRegistry<F> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: &'static str, entry: F) -> Self {
        self.insert(name, entry);
        self
    }

    /// Register `entry` under `name`.
    ///
    /// Re-registering an existing name replaces the previous entry in place
    /// (last write wins) and logs a warning.
    pub fn insert(&mut self, name: &'static str, entry: F) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            warn!(name, "duplicate registration replaces earlier entry");
            slot.1 = entry;
        } else {
            self.entries.push((name, entry));
        }
    }

    /// Look up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&F> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f)
    }

    /// Look up an entry by name, mutably.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut F> {
        self.entries
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f)
    }

    /// Registered names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `other` registers exactly the same set of names.
    ///
    /// Order-insensitive: two registries with the same names in different
    /// insertion orders compare equal. Entry types may differ.
    #[must_use]
    pub fn same_keys<G>(&self, other: &NamedRegistry<G>) -> bool {
        self.entries.len() == other.entries.len()
            && other.names().all(|name| self.get(name).is_some())
    }

    /// Comma-joined name list, for diagnostics.
    #[must_use]
    pub fn key_list(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    /// Consume the registry, yielding its entries in insertion order.
    pub(crate) fn into_entries(self) -> Vec<(&'static str, F)> {
        self.entries
    }
}

impl<F> Default for NamedRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> std::fmt::Debug for NamedRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
