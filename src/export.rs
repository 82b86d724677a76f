//! Plain-text export of the task list, grouped by category.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::task::{Category, Task};

pub const DEFAULT_EXPORT_FILE: &str = "todo-list.txt";
const TITLE: &str = "My Todo List";

/// Categories appear in the order their first task appears in the list.
pub fn group_by_category<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<(Category, Vec<&'a Task>)> {
    let mut groups: Vec<(Category, Vec<&'a Task>)> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|(c, _)| *c == task.category) {
            Some((_, members)) => members.push(task),
            None => groups.push((task.category, vec![task])),
        }
    }
    groups
}

pub fn render(tasks: &[Task]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

    for (category, members) in group_by_category(tasks) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", category);
        for task in members {
            let status = if task.completed { "[x]" } else { "[ ]" };
            let _ = write!(out, "  {} {}", status, task.text);
            if let Some(due) = task.due_date {
                let _ = write!(out, " (Due: {})", due.format("%b %-d, %Y"));
            }
            let _ = writeln!(out);
        }
    }
    out
}

pub fn write(tasks: &[Task], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(tasks))
}
