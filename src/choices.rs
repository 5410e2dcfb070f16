//! Choice list - the named-items collaborator the wheel spins over
//!
//! Owns ordering (index order is wheel position) and the admission rules:
//! names are trimmed, must be non-empty, and are de-duplicated
//! case-insensitively. Ids are opaque and stable for the session.

use serde::{Deserialize, Serialize};

/// One entry on the wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: u64,
    pub name: String,
}

/// Ordered, de-duplicated list of choices
#[derive(Debug, Clone, Default)]
pub struct ChoiceList {
    entries: Vec<Choice>,
    next_id: u64,
}

impl ChoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from raw names, skipping entries `add` rejects
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for name in names {
            let name = name.as_ref();
            if !list.add(name) {
                tracing::warn!(name, "skipped choice (empty or duplicate)");
            }
        }
        list
    }

    /// Add a choice. Returns `false` for a blank name or a case-insensitive
    /// duplicate of an existing one.
    pub fn add(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains_name(trimmed) {
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Choice {
            id,
            name: trimmed.to_string(),
        });
        tracing::debug!(id, name = trimmed, "choice added");
        true
    }

    /// Remove by id. Returns `false` when no entry matches.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|c| c.id != id);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Choice] {
        &self.entries
    }

    fn contains_name(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.entries.iter().any(|c| c.name.to_lowercase() == lowered)
    }
}
