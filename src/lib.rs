//! # ratewatch
//!
//! Monitors official NBRB exchange rates: polls the bank's API on an
//! interval, detects rate changes against the last known snapshot, persists
//! the latest rates to a JSON file keyed by the dates they apply to, and
//! appends every change to a human-readable log.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ratewatch::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = MonitorConfig::default();
//! let calendar = Arc::new(NbrbCalendar::new());
//! let source = NbrbSource::new(&config.api_url)?;
//! let store = RateStore::new(&config.snapshot_path, calendar);
//! let logger = ChangeLogger::new(&config.log_path);
//!
//! let mut monitor = Monitor::new(config, source, store, logger);
//! monitor.run().await;
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod changelog;
pub mod config;
pub mod currency;
pub mod error;
pub mod monitor;
pub mod snapshot;
pub mod source;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::calendar::{NbrbCalendar, PublicationCalendar};
    pub use crate::changelog::{ChangeEvent, ChangeLogger};
    pub use crate::config::MonitorConfig;
    pub use crate::currency::Currency;
    pub use crate::error::{MonitorError, Result};
    pub use crate::monitor::{CycleOutcome, Monitor};
    pub use crate::snapshot::{RateSnapshot, RateStore};
    pub use crate::source::NbrbSource;
    pub use crate::types::{Rate, RateMap};
}
