/*!
 * Replay of recorded edit scripts.
 *
 * An edit script is a JSON document listing the captions that already exist
 * on the server and the operations a user performed on them. Replaying it
 * drives a `SubtitleEditor` exactly like an editing surface would and
 * reports the pending work that results.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::app_config::Config;
use crate::editor::SubtitleEditor;
use crate::errors::SyncError;
use crate::subtitle::{SharedSubtitle, Subtitle};
use crate::sync::{SaveReceipt, SaveRequest, UnsavedState, WorkPersister};
use crate::work::WorkSummary;

/// A caption referenced by label within a script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptCaption {
    pub id: String,
    /// SRT timestamp, e.g. "00:00:01,000"
    pub start: String,
    pub end: String,
    pub text: String,
}

/// One recorded user action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditOperation {
    Add { id: String, start: String, end: String, text: String },
    Edit { id: String, text: String },
    Retime { id: String, start: String, end: String },
    Remove { id: String },
    Title { value: String },
    Description { value: String },
    Save,
}

impl EditOperation {
    fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Retime { .. } => "retime",
            Self::Remove { .. } => "remove",
            Self::Title { .. } => "title",
            Self::Description { .. } => "description",
            Self::Save => "save",
        }
    }
}

/// A complete edit script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditScript {
    /// Captions loaded from the server before editing starts
    #[serde(default)]
    pub existing: Vec<ScriptCaption>,

    /// Operations in the order they were performed
    #[serde(default)]
    pub operations: Vec<EditOperation>,
}

impl EditScript {
    /// Load a script from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open edit script: {}", path.display()))?;
        let script = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse edit script: {}", path.display()))?;
        Ok(script)
    }
}

/// Persister that only reports batches through the log
#[derive(Debug, Default)]
pub struct ReportingPersister {
    /// Number of batches received
    pub batches: usize,
}

impl WorkPersister<RwLock<Subtitle>> for ReportingPersister {
    fn persist(&mut self, request: &SaveRequest<'_, RwLock<Subtitle>>) -> Result<(), SyncError> {
        for caption in &request.batch.inserted {
            debug!("+ {}", caption.read());
        }
        for caption in &request.batch.updated {
            debug!("~ {}", caption.read());
        }
        for caption in &request.batch.deleted {
            debug!("- {}", caption.read());
        }
        self.batches += 1;
        Ok(())
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub session_id: String,
    pub language: String,
    pub title: String,
    pub description: String,
    /// Live captions ordered by time
    pub captions: Vec<String>,
    pub pending: WorkSummary,
    pub unsaved: UnsavedState,
    pub ever_contained_work: bool,
    pub pending_events: usize,
    pub save_due: bool,
    pub saves: Vec<SaveReceipt>,
}

/// Replay a script, reporting saves through the log
pub fn replay(script: &EditScript, config: &Config) -> Result<ReplayReport> {
    let mut persister = ReportingPersister::default();
    replay_with(script, config, &mut persister)
}

/// Replay a script against the given persister
pub fn replay_with<P>(
    script: &EditScript,
    config: &Config,
    persister: &mut P,
) -> Result<ReplayReport>
where
    P: WorkPersister<RwLock<Subtitle>> + ?Sized,
{
    let mut editor = SubtitleEditor::new(config)?;
    let mut labels: HashMap<String, SharedSubtitle> = HashMap::new();
    let mut saves = Vec::new();

    let mut existing = Vec::with_capacity(script.existing.len());
    for caption in &script.existing {
        existing.push(Subtitle::new(
            Subtitle::parse_timestamp(&caption.start)?,
            Subtitle::parse_timestamp(&caption.end)?,
            caption.text.clone(),
        ));
    }
    let loaded = editor.load_existing(existing);
    for (caption, shared) in script.existing.iter().zip(loaded) {
        if labels.insert(caption.id.clone(), shared).is_some() {
            return Err(anyhow!("Duplicate caption id in script: {}", caption.id));
        }
    }

    for (index, operation) in script.operations.iter().enumerate() {
        apply(&mut editor, &mut labels, operation, persister, &mut saves)
            .with_context(|| format!("Operation #{} ({}) failed", index + 1, operation.name()))?;
    }

    let work = editor.unit_of_work();
    let report = ReplayReport {
        session_id: editor.session_id().to_string(),
        language: editor.language().to_string(),
        title: editor.title().to_string(),
        description: editor.description().to_string(),
        captions: editor
            .captions_by_time()
            .iter()
            .map(|caption| caption.read().to_string())
            .collect(),
        pending: work.get_work().summary(),
        unsaved: editor.unsaved_state(),
        ever_contained_work: work.ever_contained_work(),
        pending_events: editor.pending_events(),
        save_due: editor.save_due(),
        saves,
    };

    info!(
        "Replayed {} operations: {} pending, {} saves",
        script.operations.len(),
        report.pending,
        report.saves.len()
    );

    Ok(report)
}

fn apply<P>(
    editor: &mut SubtitleEditor,
    labels: &mut HashMap<String, SharedSubtitle>,
    operation: &EditOperation,
    persister: &mut P,
    saves: &mut Vec<SaveReceipt>,
) -> Result<()>
where
    P: WorkPersister<RwLock<Subtitle>> + ?Sized,
{
    match operation {
        EditOperation::Add { id, start, end, text } => {
            if labels.contains_key(id) {
                return Err(anyhow!("Duplicate caption id in script: {}", id));
            }
            let caption = editor.add_caption(
                Subtitle::parse_timestamp(start)?,
                Subtitle::parse_timestamp(end)?,
                text,
            )?;
            labels.insert(id.clone(), caption);
        }
        EditOperation::Edit { id, text } => {
            let caption = lookup(labels, id)?;
            editor.edit_text(&caption, text)?;
        }
        EditOperation::Retime { id, start, end } => {
            let caption = lookup(labels, id)?;
            editor.retime(
                &caption,
                Subtitle::parse_timestamp(start)?,
                Subtitle::parse_timestamp(end)?,
            )?;
        }
        EditOperation::Remove { id } => {
            let caption = lookup(labels, id)?;
            editor.remove_caption(&caption)?;
        }
        EditOperation::Title { value } => editor.set_title(value)?,
        EditOperation::Description { value } => editor.set_description(value)?,
        EditOperation::Save => {
            if let Some(receipt) = editor.save(persister)? {
                saves.push(receipt);
            }
        }
    }
    Ok(())
}

fn lookup(labels: &HashMap<String, SharedSubtitle>, id: &str) -> Result<SharedSubtitle> {
    labels
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Unknown caption id: {}", id))
}
