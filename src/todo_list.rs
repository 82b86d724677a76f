use chrono::NaiveDate;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::store::{self, Store, DARK_MODE_KEY, STREAK_KEY, TASKS_KEY};
use crate::streak::Streak;
use crate::task::{Category, Filter, Task};

/// The ordered task list, the streak and the theme flag, written through to
/// a [`Store`] after every mutation.
pub struct TodoList {
    tasks: Vec<Task>,
    streak: Streak,
    dark_mode: bool,
    store: Box<dyn Store>,
    clock: Box<dyn Clock>,
}

impl TodoList {
    /// Loads the persisted state and runs the start-up boundary check.
    /// `dark_mode_default` applies only when no theme has been stored yet.
    pub fn load(
        store: Box<dyn Store>,
        clock: Box<dyn Clock>,
        dark_mode_default: bool,
    ) -> store::Result<Self> {
        let tasks: Vec<Task> = store::load_json(store.as_ref(), TASKS_KEY)?;
        let streak: Streak = store::load_json(store.as_ref(), STREAK_KEY)?;
        let dark_mode: Option<bool> = store::load_json(store.as_ref(), DARK_MODE_KEY)?;
        debug!(tasks = tasks.len(), streak = streak.count, "loaded state");

        let mut list = Self {
            tasks,
            streak,
            dark_mode: dark_mode.unwrap_or(dark_mode_default),
            store,
            clock,
        };
        list.check_daily_boundary()?;
        Ok(list)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn streak(&self) -> Streak {
        self.streak
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Appends a task. Blank text is ignored and yields `None`.
    pub fn add_task(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        category: Category,
    ) -> store::Result<Option<&Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let task = Task::new(text, due_date, category, self.clock.now());
        debug!(id = %task.id, %category, "adding task");
        self.tasks.push(task);
        self.persist()?;
        Ok(self.tasks.last())
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: &str) -> store::Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }

        debug!(id, "deleted task");
        self.persist()?;
        Ok(true)
    }

    /// Flips completion of the task with `id` and returns its new state.
    /// Completing a task advances the streak; un-completing leaves it alone.
    pub fn toggle_complete(&mut self, id: &str) -> store::Result<Option<bool>> {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        let completed = task.completed;
        debug!(id, completed, "toggled task");

        if completed {
            let before = self.streak.count;
            self.streak.record_completion(self.clock.as_ref());
            if self.streak.count != before {
                info!(from = before, to = self.streak.count, "streak changed");
            }
        }

        self.persist()?;
        Ok(Some(completed))
    }

    /// Moves the task at `from` to `to`. Without a destination, or with
    /// `from` out of range, nothing happens; `to` past the end means last.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) -> store::Result<bool> {
        let Some(to) = to else {
            return Ok(false);
        };
        if from >= self.tasks.len() {
            return Ok(false);
        }

        let task = self.tasks.remove(from);
        let to = to.min(self.tasks.len());
        self.tasks.insert(to, task);
        debug!(from, to, "reordered task");

        self.persist()?;
        Ok(true)
    }

    pub fn filtered(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Resets the streak if the day rolled over without a completion.
    pub fn check_daily_boundary(&mut self) -> store::Result<bool> {
        let reset = self
            .streak
            .check_daily_boundary(&self.tasks, self.clock.as_ref());
        if reset {
            info!("no completion since the last streak day; streak reset");
            self.persist()?;
        }
        Ok(reset)
    }

    pub fn toggle_dark_mode(&mut self) -> store::Result<bool> {
        self.dark_mode = !self.dark_mode;
        store::save_json(self.store.as_mut(), DARK_MODE_KEY, &self.dark_mode)?;
        Ok(self.dark_mode)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Finds a task by exact id, or by an id prefix that matches only one task.
    pub fn find(&self, id_or_prefix: &str) -> Option<&Task> {
        if let Some(task) = self.tasks.iter().find(|t| t.id == id_or_prefix) {
            return Some(task);
        }
        if id_or_prefix.is_empty() {
            return None;
        }

        let mut matches = self.tasks.iter().filter(|t| t.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task),
            _ => None,
        }
    }

    fn persist(&mut self) -> store::Result<()> {
        store::save_json(self.store.as_mut(), TASKS_KEY, &self.tasks)?;
        store::save_json(self.store.as_mut(), STREAK_KEY, &self.streak)
    }
}
