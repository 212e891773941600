//! Reminder completion set.
//!
//! # Invariants
//! - Membership hides a reminder id from every later generation pass.
//! - Once more than [`COMPLETION_SET_LIMIT`] ids are held, the next `mark`
//!   clears the whole set before inserting (coarse bound, not LRU).

use std::collections::BTreeSet;

/// Size above which the set is reset on the next insert.
pub const COMPLETION_SET_LIMIT: usize = 100;

/// Reminder ids the user has dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    ids: BTreeSet<String>,
}

/// Outcome of [`CompletionSet::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// Whether the id was not already present.
    pub inserted: bool,
    /// Whether the set was cleared before inserting.
    pub pruned: bool,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, reminder_id: &str) -> bool {
        self.ids.contains(reminder_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    /// Marks one reminder id done, pruning first when over the limit.
    pub fn mark(&mut self, reminder_id: impl Into<String>) -> MarkOutcome {
        let pruned = self.ids.len() > COMPLETION_SET_LIMIT;
        if pruned {
            self.ids.clear();
        }
        let inserted = self.ids.insert(reminder_id.into());
        MarkOutcome { inserted, pruned }
    }

    /// Inserts a persisted id without pruning.
    pub(crate) fn insert_loaded(&mut self, reminder_id: String) {
        self.ids.insert(reminder_id);
    }
}

impl FromIterator<String> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
