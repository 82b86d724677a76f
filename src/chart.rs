use chrono::{Duration, NaiveDate};

use crate::clock::Clock;
use crate::task::Task;

pub const CHART_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    /// Abbreviated weekday, e.g. "Mon".
    pub label: String,
    pub completed: u64,
}

/// Completed-task counts for the last seven local days, oldest first,
/// ending today.
pub fn weekly_completions(tasks: &[Task], clock: &dyn Clock) -> Vec<DayCount> {
    let today = clock.today();

    (0..CHART_DAYS)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            let completed = tasks
                .iter()
                .filter(|t| t.completed)
                .filter_map(|t| t.completed_at)
                .filter(|at| clock.local_date(*at) == date)
                .count() as u64;
            DayCount {
                date,
                label: date.format("%a").to_string(),
                completed,
            }
        })
        .collect()
}
