/*!
 * Save seam between the unit of work and a persistence layer.
 *
 * The crate never talks to a server itself. A `WorkPersister` receives the
 * pending batch; the unit of work is cleared only once it reports success.
 */

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::SyncError;
use crate::work::{ListenerId, UnitOfWork, WorkBatch, WorkSummary};

/// Everything a persister needs to store one batch
#[derive(Debug)]
pub struct SaveRequest<'a, T> {
    /// Editing session the batch belongs to
    pub session_id: &'a str,
    /// Session title at the time of the save
    pub title: &'a str,
    /// Session description at the time of the save
    pub description: &'a str,
    /// Pending work, in registration order
    pub batch: WorkBatch<T>,
}

/// Storage backend for pending work
pub trait WorkPersister<T> {
    /// Store the batch. Returning an error keeps the work pending.
    fn persist(&mut self, request: &SaveRequest<'_, T>) -> Result<(), SyncError>;
}

/// Record of a successful save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub session_id: String,
    pub summary: WorkSummary,
    pub saved_at: DateTime<Utc>,
}

/// Persist pending work and clear it on success.
///
/// Returns `Ok(None)` without calling the persister when there is nothing
/// to save.
pub fn commit_pending<T, P>(
    work: &mut UnitOfWork<T>,
    session_id: &str,
    persister: &mut P,
) -> Result<Option<SaveReceipt>, SyncError>
where
    P: WorkPersister<T> + ?Sized,
{
    if !work.contains_work() {
        return Ok(None);
    }

    let summary = {
        let request = SaveRequest {
            session_id,
            title: work.title(),
            description: work.description(),
            batch: work.get_work(),
        };
        let summary = request.batch.summary();

        if let Err(e) = persister.persist(&request) {
            warn!("Save of session {} failed, keeping {} pending: {}", session_id, summary, e);
            return Err(e);
        }
        summary
    };

    work.clear();
    info!("Saved session {}: {}", session_id, summary);

    Ok(Some(SaveReceipt {
        session_id: session_id.to_string(),
        summary,
        saved_at: Utc::now(),
    }))
}

/// What an unsaved-changes prompt should say about a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsavedState {
    /// No edits were ever made
    Clean,
    /// Edits are waiting to be saved
    Pending,
    /// Everything was saved, but the session did make edits
    SavedEarlier,
}

impl UnsavedState {
    pub fn of<T>(work: &UnitOfWork<T>) -> Self {
        if work.contains_work() {
            Self::Pending
        } else if work.ever_contained_work() {
            Self::SavedEarlier
        } else {
            Self::Clean
        }
    }

    /// True if leaving now would lose edits
    pub fn has_unsaved_work(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Counts work events so a consumer can decide when a save is due
#[derive(Debug)]
pub struct SaveScheduler {
    pending_events: Arc<AtomicUsize>,
    threshold: usize,
    listener: ListenerId,
}

impl SaveScheduler {
    /// Subscribe to `work` and start counting
    pub fn attach<T>(work: &mut UnitOfWork<T>, threshold: usize) -> Self {
        let pending_events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pending_events);
        let listener = work.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        Self {
            pending_events,
            threshold: threshold.max(1),
            listener,
        }
    }

    /// Events received since the last reset
    pub fn pending_events(&self) -> usize {
        self.pending_events.load(Ordering::Relaxed)
    }

    pub fn save_due(&self) -> bool {
        self.pending_events() >= self.threshold
    }

    /// Start counting from zero, typically after a save
    pub fn reset(&self) {
        self.pending_events.store(0, Ordering::Relaxed);
    }

    /// Stop counting
    pub fn detach<T>(self, work: &mut UnitOfWork<T>) -> bool {
        work.unsubscribe(self.listener)
    }
}
