use anyhow::{Context, Result, anyhow};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::errors::EditorError;

// @module: Editable caption entries

// @type: Caption shared between the editing surface and the unit of work
pub type SharedSubtitle = Arc<RwLock<Subtitle>>;

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Caption text
    pub text: String,
}

impl Subtitle {
    /// Creates a caption without validation - used by tests and loaders of
    /// already persisted data
    pub fn new(start_time_ms: u64, end_time_ms: u64, text: impl Into<String>) -> Self {
        Subtitle {
            start_time_ms,
            end_time_ms,
            text: text.into(),
        }
    }

    // @creates: Validated caption
    // @validates: Time range, minimum duration and non-empty text
    pub fn new_validated(
        start_time_ms: u64,
        end_time_ms: u64,
        text: &str,
        min_duration_ms: u64,
    ) -> Result<Self, EditorError> {
        validate_timing(start_time_ms, end_time_ms, min_duration_ms)?;

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(EditorError::EmptyText);
        }

        Ok(Subtitle {
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Wrap into the shared handle tracked by the unit of work
    pub fn into_shared(self) -> SharedSubtitle {
        Arc::new(RwLock::new(self))
    }

    /// Caption duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --> {} {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms),
            self.text
        )
    }
}

// @validates: end after start and at least min_duration_ms long
pub fn validate_timing(
    start_time_ms: u64,
    end_time_ms: u64,
    min_duration_ms: u64,
) -> Result<(), EditorError> {
    if end_time_ms <= start_time_ms {
        return Err(EditorError::InvalidTiming(format!(
            "end time {} <= start time {}",
            end_time_ms, start_time_ms
        )));
    }

    let duration = end_time_ms - start_time_ms;
    if duration < min_duration_ms {
        return Err(EditorError::InvalidTiming(format!(
            "duration {}ms is shorter than the minimum {}ms",
            duration, min_duration_ms
        )));
    }

    Ok(())
}
