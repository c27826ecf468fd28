//! Poll cycle and monitoring loop
//!
//! One cycle is fetch -> compare -> persist -> log. The loop runs cycles on a
//! fixed interval, gated to the bank's working hours; cycles never overlap and
//! the in-memory baseline map is owned exclusively by the loop between cycles.

use crate::calendar::PublicationCalendar;
use crate::changelog::{ChangeEvent, ChangeLogger};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::snapshot::RateStore;
use crate::source::NbrbSource;
use crate::types::RateMap;
use chrono::{DateTime, Timelike, Utc};
use std::time::Duration;

/// What one poll cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Current time is outside the working-hours window; nothing was fetched
    OffHours,
    /// Upstream returned no usable data; nothing was mutated
    NoData,
    /// Cold start: the baseline was stored, no change events emitted
    Initialized,
    /// Steady state: rates compared and persisted, zero or more changes logged
    Observed { events: Vec<ChangeEvent> },
}

/// Compare freshly fetched rates against the baseline, log changes, and
/// persist the updated baseline.
///
/// An empty `previous` means cold start: `current` becomes the stored
/// baseline and no events fire. Otherwise each currency in `current` with a
/// baseline is compared by exact value; a currency with no baseline is
/// skipped. The updated baseline is persisted after every cycle, changed or
/// not, while the change log only gains lines for actual changes.
pub fn run_cycle(
    previous: &mut RateMap,
    current: &RateMap,
    store: &RateStore,
    logger: &ChangeLogger,
    now: DateTime<Utc>,
) -> Result<CycleOutcome> {
    if previous.is_empty() {
        log::info!("No previous rates, storing initial snapshot");
        store.save(current, now)?;
        *previous = current.clone();
        return Ok(CycleOutcome::Initialized);
    }

    let local_now = now.with_timezone(&store.calendar().timezone()).naive_local();
    let mut events = Vec::new();

    for (&currency, &new_rate) in current {
        let old_rate = match previous.get(&currency) {
            Some(&rate) => rate,
            // No comparable baseline for this currency
            None => continue,
        };
        if new_rate != old_rate {
            let event = ChangeEvent::new(currency, old_rate, new_rate, local_now);
            logger.record(&event)?;
            previous.insert(currency, new_rate);
            events.push(event);
        }
    }

    store.save(previous, now)?;
    Ok(CycleOutcome::Observed { events })
}

/// The monitoring loop: owns the source, store, logger, and baseline map
pub struct Monitor {
    config: MonitorConfig,
    source: NbrbSource,
    store: RateStore,
    logger: ChangeLogger,
    previous: RateMap,
}

impl Monitor {
    /// Build a monitor from configuration, seeding the baseline from the
    /// stored snapshot if one exists
    pub fn new(
        config: MonitorConfig,
        source: NbrbSource,
        store: RateStore,
        logger: ChangeLogger,
    ) -> Self {
        let previous = store.load().latest_rates().cloned().unwrap_or_default();
        if previous.is_empty() {
            log::info!("Starting without a baseline, first cycle will initialize it");
        } else {
            log::info!("Loaded baseline for {} currencies", previous.len());
        }

        Self {
            config,
            source,
            store,
            logger,
            previous,
        }
    }

    /// Baseline rates currently held by the monitor
    pub fn previous_rates(&self) -> &RateMap {
        &self.previous
    }

    /// Execute one gated poll cycle.
    ///
    /// Outside working hours nothing is fetched. A failed fetch is treated as
    /// absence of new data for this cycle; snapshot-save and change-log
    /// failures propagate.
    pub async fn run_once(&mut self) -> Result<CycleOutcome> {
        let now = Utc::now();
        let calendar = self.store.calendar();
        let local = now.with_timezone(&calendar.timezone());

        if !self.config.in_working_hours(local.hour()) {
            log::debug!("Outside working hours ({:02}:00), waiting", local.hour());
            return Ok(CycleOutcome::OffHours);
        }
        if !calendar.is_publication_day(local.date_naive()) {
            log::debug!(
                "{} is not a publication day, upstream repeats the last published rates",
                local.date_naive()
            );
        }

        let current = match self.source.fetch_rates(&self.config.currencies).await {
            Ok(rates) if !rates.is_empty() => rates,
            Ok(_) => {
                log::warn!("Upstream response contained no tracked currencies");
                return Ok(CycleOutcome::NoData);
            }
            Err(e) => {
                log::warn!("Fetch failed, no new data this cycle: {}", e);
                return Ok(CycleOutcome::NoData);
            }
        };
        log::debug!("Fetched rates: {:?}", current);

        run_cycle(
            &mut self.previous,
            &current,
            &self.store,
            &self.logger,
            now,
        )
    }

    /// Run poll cycles on the configured interval until the task is aborted.
    ///
    /// Cycle errors (snapshot or change-log I/O) are logged and the loop
    /// keeps ticking; they do not terminate monitoring.
    pub async fn run(&mut self) {
        log::info!(
            "Monitoring {} currencies every {}s within {:02}:00-{:02}:00",
            self.config.currencies.len(),
            self.config.poll_interval_secs,
            self.config.start_hour,
            self.config.end_hour
        );

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));
        loop {
            interval.tick().await;
            match self.run_once().await {
                Ok(CycleOutcome::Observed { events }) if !events.is_empty() => {
                    log::info!("{} rate change(s) detected", events.len());
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Poll cycle failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NbrbCalendar;
    use crate::currency::Currency;
    use chrono::TimeZone;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn fixtures(dir: &Path) -> (RateStore, ChangeLogger) {
        let store = RateStore::new(dir.join("rates.json"), Arc::new(NbrbCalendar::new()));
        let logger = ChangeLogger::new(dir.join("changes.log"));
        (store, logger)
    }

    fn rates(usd: f64) -> RateMap {
        RateMap::from([
            (Currency::USD, usd),
            (Currency::EUR, 3.0),
            (Currency::RUB, 0.034),
        ])
    }

    fn noon() -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_cold_start_initializes_without_events() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = RateMap::new();

        let outcome = run_cycle(&mut previous, &rates(2.5), &store, &logger, noon()).unwrap();

        assert_eq!(outcome, CycleOutcome::Initialized);
        assert_eq!(previous, rates(2.5));
        assert!(store.path().exists());
        // No change log written on cold start
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_change_detection() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = rates(2.5);

        let outcome = run_cycle(&mut previous, &rates(2.6), &store, &logger, noon()).unwrap();

        let events = match outcome {
            CycleOutcome::Observed { events } => events,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].currency, Currency::USD);
        assert_eq!(events[0].old_rate, 2.5);
        assert_eq!(events[0].new_rate, 2.6);
        assert_eq!(previous[&Currency::USD], 2.6);

        let log = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("USD: 2.5 -> 2.6"));
    }

    #[test]
    fn test_idempotent_cycles() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = RateMap::new();

        run_cycle(&mut previous, &rates(2.5), &store, &logger, noon()).unwrap();
        let outcome = run_cycle(&mut previous, &rates(2.5), &store, &logger, noon()).unwrap();

        assert_eq!(outcome, CycleOutcome::Observed { events: vec![] });
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_currency_without_baseline_is_skipped() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        // Baseline tracks USD only
        let mut previous = RateMap::from([(Currency::USD, 2.5)]);

        let outcome = run_cycle(&mut previous, &rates(2.5), &store, &logger, noon()).unwrap();

        assert_eq!(outcome, CycleOutcome::Observed { events: vec![] });
        // EUR/RUB had no baseline and were not adopted
        assert_eq!(previous.len(), 1);
    }

    #[test]
    fn test_persists_even_without_changes() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = rates(2.5);

        run_cycle(&mut previous, &rates(2.5), &store, &logger, noon()).unwrap();

        // Unchanged rates still produce a fresh snapshot
        let loaded = store.load();
        assert_eq!(loaded.latest_rates(), Some(&previous));
    }

    #[test]
    fn test_multiple_changes_in_one_cycle() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = rates(2.5);

        let mut current = rates(2.6);
        current.insert(Currency::EUR, 3.1);

        let outcome = run_cycle(&mut previous, &current, &store, &logger, noon()).unwrap();
        let events = match outcome {
            CycleOutcome::Observed { events } => events,
            other => panic!("unexpected outcome: {:?}", other),
        };

        assert_eq!(events.len(), 2);
        let log = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn test_change_events_use_bank_local_time() {
        let dir = tempdir().unwrap();
        let (store, logger) = fixtures(dir.path());
        let mut previous = rates(2.5);

        // 12:00 UTC is 15:00 in Minsk
        let outcome = run_cycle(&mut previous, &rates(2.6), &store, &logger, noon()).unwrap();
        let events = match outcome {
            CycleOutcome::Observed { events } => events,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert!(events[0].log_line().starts_with("[2024-01-10 15:00:00]"));
    }
}
