/*!
 * Tests for error types and conversions
 */

use subedit::errors::{AppError, EditorError, SyncError, WorkError};
use subedit::work::TrackedState;

#[test]
fn test_workError_duplicateRegistration_shouldDisplayState() {
    let error = WorkError::DuplicateRegistration { state: TrackedState::Updated };
    let display = format!("{}", error);
    assert!(display.contains("Duplicate registration"));
    assert!(display.contains("updated"));
}

#[test]
fn test_workError_invalidTransition_shouldDisplayCorrectly() {
    let error = WorkError::InvalidTransition { from: TrackedState::Deleted };
    let display = format!("{}", error);
    assert!(display.contains("Invalid transition"));
    assert!(display.contains("deleted"));
}

#[test]
fn test_editorError_fromWorkError_shouldWrapCorrectly() {
    let work_error = WorkError::InvalidTransition { from: TrackedState::Deleted };
    let editor_error: EditorError = work_error.into();
    let display = format!("{}", editor_error);
    assert!(display.contains("Work error"));
}

#[test]
fn test_editorError_titleTooLong_shouldDisplayLimits() {
    let error = EditorError::TitleTooLong { len: 3000, max: 2048 };
    let display = format!("{}", error);
    assert!(display.contains("3000"));
    assert!(display.contains("2048"));
}

#[test]
fn test_appError_fromSyncError_shouldWrapCorrectly() {
    let app_error: AppError = SyncError::PersistFailed("Network down".to_string()).into();
    let display = format!("{}", app_error);
    assert!(display.contains("Sync error"));
    assert!(display.contains("Network down"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("Something went wrong");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}

#[test]
fn test_appError_debug_shouldBeImplemented() {
    let error = AppError::Work(WorkError::DuplicateRegistration { state: TrackedState::Inserted });
    let debug = format!("{:?}", error);
    assert!(debug.contains("DuplicateRegistration"));
}
