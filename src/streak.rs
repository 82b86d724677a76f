//! Consecutive-day completion streak.
//!
//! The streak is advanced on completion events and reset by the daily
//! boundary check. It is never recomputed from task history: un-completing
//! or deleting a task leaves it as it is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::task::Task;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub count: u32,
    pub last_completed: Option<DateTime<Utc>>,
}

impl Streak {
    /// Records a task completion at `clock.now()`.
    ///
    /// A first completion, or another one on the same local day, only moves
    /// `last_completed`. A completion on the day after the previous one
    /// extends the streak; anything later starts a new streak of one.
    pub fn record_completion(&mut self, clock: &dyn Clock) {
        let now = clock.now();
        let today = clock.today();

        match self.last_completed.map(|last| clock.local_date(last)) {
            None => {}
            Some(day) if day == today => {}
            Some(day) if day.succ_opt() == Some(today) => self.count += 1,
            Some(_) => self.count = 1,
        }
        self.last_completed = Some(now);
    }

    /// Resets the streak when nothing was completed today and the last
    /// recorded completion was on an earlier day. Returns whether it reset.
    pub fn check_daily_boundary(&mut self, tasks: &[Task], clock: &dyn Clock) -> bool {
        let today = clock.today();

        let completed_today = tasks.iter().any(|t| {
            t.completed
                && t
                    .completed_at
                    .is_some_and(|at| clock.local_date(at) == today)
        });
        let last_was_earlier = self
            .last_completed
            .is_some_and(|last| clock.local_date(last) != today);

        if !completed_today && last_was_earlier {
            *self = Streak::default();
            true
        } else {
            false
        }
    }

    pub fn label(&self) -> String {
        let plural = if self.count == 1 { "" } else { "s" };
        format!("{} Day{} Streak", self.count, plural)
    }
}
