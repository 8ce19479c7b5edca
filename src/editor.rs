/*!
 * Editable caption set for one authoring session.
 *
 * The editor is the producer side of the unit of work: every caption it
 * creates, changes or removes is registered so the save layer can pick the
 * batch up later. It does no rendering.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::{Config, EditorConfig};
use crate::errors::{EditorError, SyncError};
use crate::language_utils;
use crate::subtitle::{validate_timing, SharedSubtitle, Subtitle};
use crate::sync::{commit_pending, SaveReceipt, SaveScheduler, UnsavedState, WorkPersister};
use crate::work::{TrackedState, UnitOfWork};

/// Captions of one language plus the pending work on them
pub struct SubtitleEditor {
    /// Session ID
    session_id: String,
    /// Normalized ISO 639-2/T language code
    language: String,
    /// Limits applied to edits
    config: EditorConfig,
    /// Live captions in the order they were loaded or added
    captions: Vec<SharedSubtitle>,
    /// Pending work
    work: UnitOfWork<RwLock<Subtitle>>,
    /// Counts work events between saves
    scheduler: SaveScheduler,
    /// Session title, outlives the registry's per-batch copy
    title: String,
    /// Session description
    description: String,
}

impl SubtitleEditor {
    /// Create an editor for the configured language
    pub fn new(config: &Config) -> Result<Self> {
        let language = language_utils::normalize_to_part2t(&config.language)
            .context("Editor language is not a valid ISO 639 code")?;
        let session_id = Uuid::new_v4().to_string();

        let mut work = UnitOfWork::new();
        let scheduler = SaveScheduler::attach(&mut work, config.editor.save_after_events);

        info!("Opened editing session {} ({})", &session_id[..8], language);

        Ok(Self {
            session_id,
            language,
            config: config.editor.clone(),
            captions: Vec::new(),
            work,
            scheduler,
            title: String::new(),
            description: String::new(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Live captions in load/add order
    pub fn captions(&self) -> &[SharedSubtitle] {
        &self.captions
    }

    /// Live captions ordered by start time
    pub fn captions_by_time(&self) -> Vec<SharedSubtitle> {
        let mut sorted = self.captions.clone();
        sorted.sort_by_key(|caption| {
            let guard = caption.read();
            (guard.start_time_ms, guard.end_time_ms)
        });
        sorted
    }

    /// First caption displayed at the given playback time
    pub fn caption_at(&self, time_ms: u64) -> Option<SharedSubtitle> {
        self.captions_by_time().into_iter().find(|caption| {
            let guard = caption.read();
            guard.start_time_ms <= time_ms && time_ms < guard.end_time_ms
        })
    }

    pub fn unit_of_work(&self) -> &UnitOfWork<RwLock<Subtitle>> {
        &self.work
    }

    pub fn unit_of_work_mut(&mut self) -> &mut UnitOfWork<RwLock<Subtitle>> {
        &mut self.work
    }

    /// Tracked state of a caption
    pub fn state_of(&self, caption: &SharedSubtitle) -> TrackedState {
        self.work.state_of(caption)
    }

    // =========================================================================
    // Caption edits
    // =========================================================================

    /// Adopt captions that already exist on the server. No work is recorded.
    pub fn load_existing(&mut self, subtitles: Vec<Subtitle>) -> Vec<SharedSubtitle> {
        let loaded: Vec<SharedSubtitle> =
            subtitles.into_iter().map(Subtitle::into_shared).collect();
        self.captions.extend(loaded.iter().cloned());
        debug!(
            "Session {} loaded {} existing captions",
            &self.session_id[..8],
            loaded.len()
        );
        loaded
    }

    /// Create a new caption
    pub fn add_caption(
        &mut self,
        start_time_ms: u64,
        end_time_ms: u64,
        text: &str,
    ) -> Result<SharedSubtitle, EditorError> {
        let subtitle = Subtitle::new_validated(
            start_time_ms,
            end_time_ms,
            text,
            self.config.min_caption_duration_ms,
        )?;
        let caption = subtitle.into_shared();

        self.work.register_new(&caption)?;
        self.captions.push(Arc::clone(&caption));
        Ok(caption)
    }

    /// Replace the text of a caption
    pub fn edit_text(&mut self, caption: &SharedSubtitle, text: &str) -> Result<(), EditorError> {
        self.ensure_known(caption)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EditorError::EmptyText);
        }

        self.work.register_updated(caption)?;
        caption.write().text = trimmed.to_string();
        Ok(())
    }

    /// Move a caption in time
    pub fn retime(
        &mut self,
        caption: &SharedSubtitle,
        start_time_ms: u64,
        end_time_ms: u64,
    ) -> Result<(), EditorError> {
        self.ensure_known(caption)?;
        validate_timing(start_time_ms, end_time_ms, self.config.min_caption_duration_ms)?;

        self.work.register_updated(caption)?;
        let mut guard = caption.write();
        guard.start_time_ms = start_time_ms;
        guard.end_time_ms = end_time_ms;
        Ok(())
    }

    /// Remove a caption from the set
    pub fn remove_caption(&mut self, caption: &SharedSubtitle) -> Result<(), EditorError> {
        self.ensure_known(caption)?;
        self.captions.retain(|live| !Arc::ptr_eq(live, caption));
        self.work.register_deleted(caption);
        Ok(())
    }

    fn ensure_known(&self, caption: &SharedSubtitle) -> Result<(), EditorError> {
        if self.captions.iter().any(|live| Arc::ptr_eq(live, caption)) {
            Ok(())
        } else {
            Err(EditorError::UnknownCaption)
        }
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), EditorError> {
        let len = title.chars().count();
        if len > self.config.max_title_chars {
            return Err(EditorError::TitleTooLong { len, max: self.config.max_title_chars });
        }
        self.title = title.to_string();
        self.work.set_title(title);
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EditorError> {
        let len = description.chars().count();
        if len > self.config.max_description_chars {
            return Err(EditorError::DescriptionTooLong {
                len,
                max: self.config.max_description_chars,
            });
        }
        self.description = description.to_string();
        self.work.set_description(description);
        Ok(())
    }

    // =========================================================================
    // Saving
    // =========================================================================

    /// Whether enough work events arrived since the last save
    pub fn save_due(&self) -> bool {
        self.scheduler.save_due() && self.work.contains_work()
    }

    /// Work events seen since the last successful save
    pub fn pending_events(&self) -> usize {
        self.scheduler.pending_events()
    }

    pub fn unsaved_state(&self) -> UnsavedState {
        UnsavedState::of(&self.work)
    }

    /// Hand pending work to the persister and clear it on success.
    ///
    /// Title and description survive the save and go out with every later batch.
    pub fn save<P>(&mut self, persister: &mut P) -> Result<Option<SaveReceipt>, SyncError>
    where
        P: WorkPersister<RwLock<Subtitle>> + ?Sized,
    {
        let receipt = commit_pending(&mut self.work, &self.session_id, persister)?;
        if receipt.is_some() {
            self.work.set_title(self.title.as_str());
            self.work.set_description(self.description.as_str());
            self.scheduler.reset();
        }
        Ok(receipt)
    }
}
