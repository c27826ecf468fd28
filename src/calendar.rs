//! Rate publication calendar
//!
//! Central banks publish official rates for future calendar dates; the exact
//! fan-out depends on the weekday (a Thursday publication covers the weekend).
//! The rule is kept behind a trait so other market calendars can be swapped in
//! without touching persistence logic.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;

/// Strategy deciding which calendar dates a freshly fetched rate applies to
pub trait PublicationCalendar: Send + Sync {
    /// Get the timezone for this calendar
    fn timezone(&self) -> Tz;

    /// Check if the bank publishes fresh rates on this date
    fn is_publication_day(&self, date: NaiveDate) -> bool;

    /// Calendar dates a rate fetched on `today` is valid for.
    ///
    /// Pure function of `today`; returns an ordered sequence of 2-3 dates
    /// with no duplicates within one call.
    fn target_dates(&self, today: NaiveDate) -> Vec<NaiveDate>;
}

/// NBRB publication calendar
///
/// The bank publishes no rates on weekends: Thursday's and Friday's
/// publications extend over the weekend, and a weekend poll carries the
/// preceding Friday's rate through the next Monday.
#[derive(Debug, Clone, Copy, Default)]
pub struct NbrbCalendar;

impl NbrbCalendar {
    pub fn new() -> Self {
        Self
    }
}

impl PublicationCalendar for NbrbCalendar {
    fn timezone(&self) -> Tz {
        chrono_tz::Europe::Minsk
    }

    fn is_publication_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn target_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let day = |n: i64| today + Duration::days(n);
        match today.weekday() {
            // Thursday's publication covers Fri/Sat/Sun, Friday's covers
            // the following Monday.
            Weekday::Thu | Weekday::Fri => vec![day(0), day(1), day(3)],
            // Weekend carries the preceding Friday's rate through Monday.
            Weekday::Sat => vec![day(-1), day(0), day(2)],
            Weekday::Sun => vec![day(-2), day(0), day(1)],
            _ => vec![day(0), day(1)],
        }
    }
}
