//! Rate snapshot persistence
//!
//! The snapshot is a single JSON document holding the last fetched rates,
//! fanned out to every calendar date the publication covers. It is read once
//! at startup and rewritten wholesale after each poll cycle; a missing or
//! corrupt file is the canonical first-run signal, never an error.

use crate::calendar::PublicationCalendar;
use crate::error::{MonitorError, Result};
use crate::types::{RateMap, DATE_FORMAT, TIMESTAMP_FORMAT};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persisted snapshot of known rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// When the snapshot was written, bank-local time
    pub timestamp: String,
    /// Rates keyed by the ISO date they apply to
    pub rates: BTreeMap<String, RateMap>,
}

impl RateSnapshot {
    /// Create an empty snapshot (no prior data)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether the snapshot holds any rates
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rates under the most recent date key, used to seed the comparison
    /// baseline at startup
    pub fn latest_rates(&self) -> Option<&RateMap> {
        self.rates.values().next_back()
    }
}

/// Store for loading and saving rate snapshots
pub struct RateStore {
    path: PathBuf,
    calendar: Arc<dyn PublicationCalendar>,
}

impl RateStore {
    /// Create a store writing to `path`, filing rates under the dates the
    /// given calendar assigns
    pub fn new(path: impl Into<PathBuf>, calendar: Arc<dyn PublicationCalendar>) -> Self {
        Self {
            path: path.into(),
            calendar,
        }
    }

    /// Snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Calendar this store files rates under
    pub fn calendar(&self) -> &Arc<dyn PublicationCalendar> {
        &self.calendar
    }

    /// Load the stored snapshot, degrading to an empty one on missing or
    /// malformed files
    pub fn load(&self) -> RateSnapshot {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No snapshot at {}, starting fresh", self.path.display());
                return RateSnapshot::empty();
            }
            Err(e) => {
                log::warn!("Cannot read snapshot {}: {}", self.path.display(), e);
                return RateSnapshot::empty();
            }
        };

        match serde_json::from_str::<RateSnapshot>(&text) {
            Ok(snapshot) if snapshot_dates_valid(&snapshot) => snapshot,
            Ok(_) => {
                log::warn!(
                    "Snapshot {} has invalid date keys, ignoring it",
                    self.path.display()
                );
                RateSnapshot::empty()
            }
            Err(e) => {
                log::warn!(
                    "Snapshot {} is malformed ({}), ignoring it",
                    self.path.display(),
                    e
                );
                RateSnapshot::empty()
            }
        }
    }

    /// Persist `rates` under every target date for `now`, replacing the file.
    ///
    /// The same map is written for all target dates of a single call. The
    /// document is written to a sibling temp file first and renamed over the
    /// old snapshot, so a crash mid-write leaves the previous file intact.
    pub fn save(&self, rates: &RateMap, now: DateTime<Utc>) -> Result<RateSnapshot> {
        if let Some((currency, rate)) = rates.iter().find(|(_, rate)| **rate <= 0.0) {
            return Err(MonitorError::DataError(format!(
                "Refusing to store non-positive rate {} for {}",
                rate, currency
            )));
        }

        let local = now.with_timezone(&self.calendar.timezone());
        let mut dated = BTreeMap::new();
        for date in self.calendar.target_dates(local.date_naive()) {
            dated.insert(date.format(DATE_FORMAT).to_string(), rates.clone());
        }

        let snapshot = RateSnapshot {
            timestamp: local.format(TIMESTAMP_FORMAT).to_string(),
            rates: dated,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        log::info!("Snapshot saved to {}", self.path.display());

        Ok(snapshot)
    }
}

fn snapshot_dates_valid(snapshot: &RateSnapshot) -> bool {
    snapshot
        .rates
        .keys()
        .all(|key| NaiveDate::parse_from_str(key, DATE_FORMAT).is_ok())
}
