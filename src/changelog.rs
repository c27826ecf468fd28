//! Append-only change log
//!
//! Every detected rate change becomes exactly one line in a UTF-8 text log.
//! Existing entries are never truncated or reordered, and a failed write is
//! an error for the calling cycle rather than a silently lost change.

use crate::currency::Currency;
use crate::error::{MonitorError, Result};
use crate::types::{Rate, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A detected rate change, alive only for one log append
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub currency: Currency,
    pub old_rate: Rate,
    pub new_rate: Rate,
    /// Bank-local time of the poll that observed the change
    pub timestamp: NaiveDateTime,
}

impl ChangeEvent {
    pub fn new(
        currency: Currency,
        old_rate: Rate,
        new_rate: Rate,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            currency,
            old_rate,
            new_rate,
            timestamp,
        }
    }

    /// Render the log line for this event, without the trailing newline
    pub fn log_line(&self) -> String {
        format!(
            "[{}] {}: {} -> {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.currency,
            self.old_rate,
            self.new_rate
        )
    }
}

/// Appends change events to a text log
pub struct ChangeLogger {
    path: PathBuf,
}

impl ChangeLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Change log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for the event
    pub fn record(&self, event: &ChangeEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                MonitorError::ChangeLogError(format!(
                    "Cannot open {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", event.log_line()).map_err(|e| {
            MonitorError::ChangeLogError(format!("Cannot write {}: {}", self.path.display(), e))
        })?;

        log::info!("Rate change recorded: {}", event.log_line());
        Ok(())
    }
}
