//! Daily boundary schedule: first deadline at the next local midnight, then
//! every 24 hours.

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCheck {
    next_due: DateTime<Utc>,
}

impl DailyCheck {
    pub const PERIOD_HOURS: i64 = 24;

    pub fn arm(clock: &dyn Clock) -> Self {
        Self {
            next_due: clock.next_midnight(),
        }
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }

    /// Returns true once per passed deadline and re-arms. Periods missed
    /// while the process was suspended collapse into a single firing.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.next_due {
            return false;
        }
        let period = Duration::hours(Self::PERIOD_HOURS);
        while self.next_due <= now {
            self.next_due += period;
        }
        true
    }

    /// How long the event loop may wait before the next deadline.
    pub fn time_until(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.next_due - now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_arms_for_next_midnight() {
        let clock = ManualClock::utc(at(10, 15, 30));
        let check = DailyCheck::arm(&clock);
        assert_eq!(check.next_due(), at(11, 0, 0));
        assert_eq!(
            check.time_until(clock.now()),
            std::time::Duration::from_secs(8 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn test_poll_before_deadline_does_not_fire() {
        let clock = ManualClock::utc(at(10, 15, 30));
        let mut check = DailyCheck::arm(&clock);
        assert!(!check.poll(at(10, 23, 59)));
        assert_eq!(check.next_due(), at(11, 0, 0));
    }

    #[test]
    fn test_poll_fires_once_and_rearms_daily() {
        let clock = ManualClock::utc(at(10, 15, 30));
        let mut check = DailyCheck::arm(&clock);

        assert!(check.poll(at(11, 0, 0)));
        assert_eq!(check.next_due(), at(12, 0, 0));
        assert!(!check.poll(at(11, 0, 1)));

        assert!(check.poll(at(12, 0, 5)));
        assert_eq!(check.next_due(), at(13, 0, 0));
    }

    #[test]
    fn test_missed_periods_fire_once() {
        let clock = ManualClock::utc(at(10, 15, 30));
        let mut check = DailyCheck::arm(&clock);

        assert!(check.poll(at(14, 6, 0)));
        assert_eq!(check.next_due(), at(15, 0, 0));
        assert!(!check.poll(at(14, 7, 0)));
    }

    #[test]
    fn test_time_until_past_deadline_is_zero() {
        let clock = ManualClock::utc(at(10, 15, 30));
        let check = DailyCheck::arm(&clock);
        assert_eq!(check.time_until(at(11, 1, 0)), std::time::Duration::ZERO);
    }
}
