use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    /// Set exactly while `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a fresh, not yet completed task. `text` is stored as given;
    /// callers trim and reject blank input.
    pub fn new(
        text: impl Into<String>,
        due_date: Option<NaiveDate>,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            due_date,
            category,
            created_at,
            completed_at: None,
        }
    }

    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        match self.due_date {
            None => DueStatus::None,
            Some(due) if due < today => DueStatus::Overdue,
            Some(due) if due == today => DueStatus::Today,
            Some(due) if today.succ_opt() == Some(due) => DueStatus::Tomorrow,
            Some(_) => DueStatus::Later,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Work,
    Personal,
    Study,
    Health,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Health,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Study => "Study",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::All => "No tasks yet. Add one above!",
            Self::Active => "No active tasks",
            Self::Completed => "No completed tasks",
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    None,
    Overdue,
    Today,
    Tomorrow,
    Later,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(due: Option<NaiveDate>) -> Task {
        Task::new(
            "Water plants",
            due,
            Category::Personal,
            Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_task_is_incomplete() {
        let task = sample(None);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn test_new_tasks_get_distinct_ids() {
        assert_ne!(sample(None).id, sample(None).id);
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let task = sample(NaiveDate::from_ymd_opt(2026, 3, 12));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2026-03-12");
        assert_eq!(json["category"], "Personal");
        assert!(json["completedAt"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_due_status() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(sample(None).due_status(today), DueStatus::None);
        assert_eq!(
            sample(NaiveDate::from_ymd_opt(2026, 3, 9)).due_status(today),
            DueStatus::Overdue
        );
        assert_eq!(sample(Some(today)).due_status(today), DueStatus::Today);
        assert_eq!(
            sample(NaiveDate::from_ymd_opt(2026, 3, 11)).due_status(today),
            DueStatus::Tomorrow
        );
        assert_eq!(
            sample(NaiveDate::from_ymd_opt(2026, 4, 1)).due_status(today),
            DueStatus::Later
        );
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("work".parse::<Category>(), Ok(Category::Work));
        assert_eq!(" Health ".parse::<Category>(), Ok(Category::Health));
        assert!("chores".parse::<Category>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        let mut task = sample(None);
        assert!(Filter::All.matches(&task));
        assert!(Filter::Active.matches(&task));
        assert!(!Filter::Completed.matches(&task));

        task.completed = true;
        assert!(!Filter::Active.matches(&task));
        assert!(Filter::Completed.matches(&task));
    }

    #[test]
    fn test_filter_cycles() {
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Active.next(), Filter::Completed);
        assert_eq!(Filter::Completed.next(), Filter::All);
    }
}
