/*!
 * # subedit - change tracking for subtitle authoring sessions
 *
 * A Rust library that records what a subtitle editing surface changed so a
 * save layer knows exactly what to persist.
 *
 * ## Features
 *
 * - Unit of work collecting inserted, updated and deleted captions by identity
 * - Collapsing of transitions (create-then-delete cancels out, update after
 *   insert stays an insert)
 * - Per-session notification channel fired when pending work changes
 * - Sticky "session ever had edits" flag for unsaved-changes prompts
 * - Editable caption set with timing and metadata validation
 * - Save seam: persisters receive a batch, work is cleared only on success
 * - Replay of JSON edit scripts from the command line
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `work`: The change registry:
 *   - `work::unit_of_work`: Inserted/updated/deleted collections
 *   - `work::events`: Notification channel
 *   - `work::batch`: Snapshots handed to the save layer
 * - `subtitle`: Timed caption entries
 * - `editor`: Editing surface model driving the unit of work
 * - `sync`: Persister trait, commit discipline and save scheduling
 * - `replay`: Edit script replay
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod editor;
pub mod errors;
pub mod language_utils;
pub mod replay;
pub mod subtitle;
pub mod sync;
pub mod work;

// Re-export main types for easier usage
pub use app_config::Config;
pub use editor::SubtitleEditor;
pub use errors::{AppError, EditorError, SyncError, WorkError};
pub use subtitle::{SharedSubtitle, Subtitle};
pub use sync::{commit_pending, SaveReceipt, SaveRequest, UnsavedState, WorkPersister};
pub use work::{TrackedState, UnitOfWork, WorkBatch, WorkEvent};
