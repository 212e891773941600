//! Record change events.

use crate::model::application::{ApplicationId, ApplicationRecord};

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Emitted after a successful store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub record_id: ApplicationId,
    /// Post-write row; `None` for deletes.
    pub record: Option<ApplicationRecord>,
}

/// Observer used to trigger recomputation of derived views.
///
/// Called inline, in subscription order, after the write committed.
pub trait ChangeListener {
    fn on_change(&self, event: &ChangeEvent);
}
