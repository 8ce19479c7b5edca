/*!
 * Change tracking for an editing session.
 *
 * This module provides:
 * - The unit of work that collects inserted, updated and deleted objects
 * - A per-instance notification channel fired when tracked work changes
 * - Disconnected batch snapshots for the save layer
 */

pub mod batch;
pub mod events;
pub mod unit_of_work;

use std::fmt;

// Re-export main types
pub use batch::{WorkBatch, WorkSummary};
pub use events::{ListenerId, NotificationChannel, WorkEvent};
pub use unit_of_work::UnitOfWork;

/// Membership of an object in a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedState {
    /// Not present in any collection
    Untracked,
    /// Created during this session
    Inserted,
    /// Existed before the session and was modified
    Updated,
    /// Marked for removal
    Deleted,
}

impl fmt::Display for TrackedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Untracked => "untracked",
            Self::Inserted => "inserted",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        write!(f, "{}", name)
    }
}
