//! Persistence for the reminder completion set.
//!
//! # Invariants
//! - `save` replaces the persisted set in a single transaction.
//! - Ids are stored verbatim; no normalization.

use crate::repo::application_repo::RepoResult;
use crate::reminder::completion::CompletionSet;
use rusqlite::{params, Connection};

/// Durable key-value storage for dismissed reminder ids.
pub trait CompletionStore {
    /// Loads the full persisted set.
    fn load(&self) -> RepoResult<CompletionSet>;
    /// Replaces the persisted set with `set`.
    fn save(&self, set: &CompletionSet) -> RepoResult<()>;
}

/// SQLite-backed completion store (`reminder_completions` table).
pub struct SqliteCompletionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CompletionStore for SqliteCompletionStore<'_> {
    fn load(&self) -> RepoResult<CompletionSet> {
        let mut stmt = self
            .conn
            .prepare("SELECT reminder_id FROM reminder_completions ORDER BY reminder_id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut set = CompletionSet::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            set.insert_loaded(id);
        }
        Ok(set)
    }

    fn save(&self, set: &CompletionSet) -> RepoResult<()> {
        // Shared borrow: callers hold the same connection for the record store.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM reminder_completions;", [])?;
        for id in set.iter() {
            tx.execute(
                "INSERT INTO reminder_completions (reminder_id) VALUES (?1);",
                params![id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
