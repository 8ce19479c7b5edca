/*!
 * Mock persister for testing
 *
 * Records every batch it receives instead of storing it anywhere, and can
 * be told to fail so tests can check that work stays pending.
 */

use parking_lot::RwLock;
use std::sync::{Arc, Mutex};

use subedit::errors::SyncError;
use subedit::subtitle::Subtitle;
use subedit::sync::{SaveRequest, WorkPersister};
use subedit::work::WorkSummary;

/// A batch as seen by the persister
#[derive(Debug, Clone)]
pub struct RecordedSave {
    pub session_id: String,
    pub title: String,
    pub summary: WorkSummary,
    /// Texts of inserted captions, in batch order
    pub inserted_texts: Vec<String>,
    /// Texts of deleted captions, in batch order
    pub deleted_texts: Vec<String>,
}

/// Tracks persister calls
#[derive(Debug, Default)]
pub struct SaveTracker {
    /// Count of persist calls, failed ones included
    pub call_count: usize,
    /// Batches accepted
    pub saves: Vec<RecordedSave>,
    /// Should the next calls fail
    pub should_fail: bool,
}

/// Mock implementation of a persister
#[derive(Debug, Clone, Default)]
pub struct MockPersister {
    tracker: Arc<Mutex<SaveTracker>>,
}

impl MockPersister {
    /// Create a new mock persister
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock persister that rejects every batch
    pub fn failing() -> Self {
        let persister = Self::new();
        persister.set_failing(true);
        persister
    }

    pub fn set_failing(&self, should_fail: bool) {
        self.tracker.lock().unwrap().should_fail = should_fail;
    }

    pub fn call_count(&self) -> usize {
        self.tracker.lock().unwrap().call_count
    }

    pub fn saves(&self) -> Vec<RecordedSave> {
        self.tracker.lock().unwrap().saves.clone()
    }
}

fn texts(captions: &[Arc<RwLock<Subtitle>>]) -> Vec<String> {
    captions.iter().map(|caption| caption.read().text.clone()).collect()
}

impl WorkPersister<RwLock<Subtitle>> for MockPersister {
    fn persist(&mut self, request: &SaveRequest<'_, RwLock<Subtitle>>) -> Result<(), SyncError> {
        let mut tracker = self.tracker.lock().unwrap();
        tracker.call_count += 1;

        if tracker.should_fail {
            return Err(SyncError::PersistFailed("Mock persister is offline".to_string()));
        }

        tracker.saves.push(RecordedSave {
            session_id: request.session_id.to_string(),
            title: request.title.to_string(),
            summary: request.batch.summary(),
            inserted_texts: texts(&request.batch.inserted),
            deleted_texts: texts(&request.batch.deleted),
        });
        Ok(())
    }
}
