//! Time source for everything that depends on "now" or "today".
//!
//! Timestamps are stored as UTC instants; calendar questions ("was this
//! yesterday?") are answered on the local calendar through the clock, so the
//! rest of the crate never reads the wall clock or the time zone directly.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock reading of `instant` on the local calendar.
    fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime;

    /// The first instant of `date` on the local calendar.
    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc>;

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    fn next_midnight(&self) -> DateTime<Utc> {
        let tomorrow = self.today().succ_opt().unwrap_or(NaiveDate::MAX);
        self.start_of_day(tomorrow)
    }
}

/// Reads the machine clock and time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&Local).naive_local()
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        first_instant_of(&Local, date)
    }
}

/// Settable clock with a fixed UTC offset. Clones share the same instant, so
/// a test can keep one handle and advance time after giving another away.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            offset,
        }
    }

    /// Clock fixed at `now`, with the local calendar equal to UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        first_instant_of(&self.offset, date)
    }
}

// Midnight can fall inside a DST gap; walk forward to the first local time
// that exists.
fn first_instant_of<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let mut local = date.and_time(NaiveTime::MIN);
    for _ in 0..8 {
        if let Some(instant) = tz.from_local_datetime(&local).earliest() {
            return instant.with_timezone(&Utc);
        }
        local += Duration::minutes(30);
    }
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
