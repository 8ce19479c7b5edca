/*!
 * Point-in-time snapshots of pending work.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Disconnected copy of the registry collections, in registration order
#[derive(Debug)]
pub struct WorkBatch<T> {
    /// Objects created during the session and not yet persisted
    pub inserted: Vec<Arc<T>>,
    /// Pre-existing objects that were modified
    pub updated: Vec<Arc<T>>,
    /// Objects marked for removal
    pub deleted: Vec<Arc<T>>,
}

impl<T> WorkBatch<T> {
    /// Total number of objects in the batch
    pub fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }

    /// True if there is nothing to persist
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counts per collection
    pub fn summary(&self) -> WorkSummary {
        WorkSummary {
            inserted: self.inserted.len(),
            updated: self.updated.len(),
            deleted: self.deleted.len(),
        }
    }
}

// Manual impl: cloning a batch clones the handles, never requires `T: Clone`
impl<T> Clone for WorkBatch<T> {
    fn clone(&self) -> Self {
        Self {
            inserted: self.inserted.clone(),
            updated: self.updated.clone(),
            deleted: self.deleted.clone(),
        }
    }
}

/// Per-collection counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl WorkSummary {
    /// Sum of all three counts
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

impl fmt::Display for WorkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} deleted",
            self.inserted, self.updated, self.deleted
        )
    }
}
