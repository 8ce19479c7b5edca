/*!
 * Unit of work: pending create/update/delete operations of one session.
 *
 * Objects are tracked by `Arc` identity, never by value. Each object lives in
 * at most one of the three collections, and each collection keeps the order
 * in which objects were registered.
 */

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::WorkError;

use super::batch::WorkBatch;
use super::events::{ListenerId, NotificationChannel, WorkEvent};
use super::TrackedState;

/// Identity key of a tracked object. The registry holds a clone of every
/// tracked `Arc`, so the address cannot be reused while it is a key.
fn identity<T>(obj: &Arc<T>) -> usize {
    Arc::as_ptr(obj) as usize
}

fn remove_from<T>(list: &mut Vec<Arc<T>>, obj: &Arc<T>) {
    list.retain(|tracked| !Arc::ptr_eq(tracked, obj));
}

/// Pending work of an editing session
pub struct UnitOfWork<T> {
    inserted: Vec<Arc<T>>,
    updated: Vec<Arc<T>>,
    deleted: Vec<Arc<T>>,

    /// Identity index over the three collections
    membership: HashMap<usize, TrackedState>,

    /// Sticky: survives `clear`
    ever_contained_work: bool,

    title: String,
    description: String,

    channel: NotificationChannel,
}

impl<T> UnitOfWork<T> {
    /// Create an empty unit of work
    pub fn new() -> Self {
        Self {
            inserted: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            membership: HashMap::new(),
            ever_contained_work: false,
            title: String::new(),
            description: String::new(),
            channel: NotificationChannel::new(),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Mark an object as newly created.
    ///
    /// Fails if the object is already tracked in any collection.
    pub fn register_new(&mut self, obj: &Arc<T>) -> Result<(), WorkError> {
        let state = self.state_of(obj);
        if state != TrackedState::Untracked {
            warn!("registerNew rejected: object already {}", state);
            return Err(WorkError::DuplicateRegistration { state });
        }

        self.ever_contained_work = true;
        self.inserted.push(Arc::clone(obj));
        self.membership.insert(identity(obj), TrackedState::Inserted);
        debug!("Registered new object ({} inserted)", self.inserted.len());
        self.issue_work_event();
        Ok(())
    }

    /// Mark an object as modified.
    ///
    /// Objects already inserted or updated are left where they are.
    /// Fails if the object has been deleted.
    pub fn register_updated(&mut self, obj: &Arc<T>) -> Result<(), WorkError> {
        match self.state_of(obj) {
            TrackedState::Deleted => {
                warn!("registerUpdated rejected: object is deleted");
                Err(WorkError::InvalidTransition {
                    from: TrackedState::Deleted,
                })
            }
            TrackedState::Inserted | TrackedState::Updated => Ok(()),
            TrackedState::Untracked => {
                self.ever_contained_work = true;
                self.updated.push(Arc::clone(obj));
                self.membership.insert(identity(obj), TrackedState::Updated);
                debug!("Registered updated object ({} updated)", self.updated.len());
                self.issue_work_event();
                Ok(())
            }
        }
    }

    /// Mark an object as deleted.
    ///
    /// Deleting an object inserted in this session cancels it out: it is
    /// dropped without recording a deletion and listeners are not told.
    pub fn register_deleted(&mut self, obj: &Arc<T>) {
        let state = self.state_of(obj);
        if state == TrackedState::Inserted {
            remove_from(&mut self.inserted, obj);
            self.membership.remove(&identity(obj));
            debug!("Dropped inserted object on delete ({} inserted)", self.inserted.len());
            return;
        }

        self.ever_contained_work = true;
        if state == TrackedState::Updated {
            remove_from(&mut self.updated, obj);
        }
        if state != TrackedState::Deleted {
            self.deleted.push(Arc::clone(obj));
            self.membership.insert(identity(obj), TrackedState::Deleted);
        }
        debug!("Registered deleted object ({} deleted)", self.deleted.len());
        self.issue_work_event();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Where the object currently lives
    pub fn state_of(&self, obj: &Arc<T>) -> TrackedState {
        self.membership
            .get(&identity(obj))
            .copied()
            .unwrap_or(TrackedState::Untracked)
    }

    /// True once any registration has ever changed the tracked work
    pub fn ever_contained_work(&self) -> bool {
        self.ever_contained_work
    }

    /// True if any collection is currently non-empty
    pub fn contains_work(&self) -> bool {
        !self.inserted.is_empty() || !self.updated.is_empty() || !self.deleted.is_empty()
    }

    /// Number of tracked objects across all collections
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// True if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Snapshot of the pending work, unaffected by later registrations
    pub fn get_work(&self) -> WorkBatch<T> {
        WorkBatch {
            inserted: self.inserted.clone(),
            updated: self.updated.clone(),
            deleted: self.deleted.clone(),
        }
    }

    /// Forget all pending work and session metadata.
    ///
    /// Does not notify listeners and keeps `ever_contained_work`.
    pub fn clear(&mut self) {
        self.inserted = Vec::new();
        self.updated = Vec::new();
        self.deleted = Vec::new();
        self.membership.clear();
        self.title.clear();
        self.description.clear();
        debug!("Unit of work cleared");
    }

    // =========================================================================
    // Session metadata
    // =========================================================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Subscribe to `WorkEvent::WorkPerformed`
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(WorkEvent) + Send + 'static,
    {
        self.channel.subscribe(listener)
    }

    /// Remove a listener added with `subscribe`
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.channel.unsubscribe(id)
    }

    fn issue_work_event(&mut self) {
        self.channel.notify(WorkEvent::WorkPerformed);
    }
}

impl<T> Default for UnitOfWork<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for UnitOfWork<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("inserted", &self.inserted.len())
            .field("updated", &self.updated.len())
            .field("deleted", &self.deleted.len())
            .field("ever_contained_work", &self.ever_contained_work)
            .field("title", &self.title)
            .field("channel", &self.channel)
            .finish()
    }
}
