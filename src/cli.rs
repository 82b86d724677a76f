//! Command-line interface: one-shot subcommands over the same task list the
//! terminal UI edits.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Timelike};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::chart::weekly_completions;
use crate::clock::SystemClock;
use crate::config::{Config, DATA_DIR_ENV};
use crate::export;
use crate::store::FileStore;
use crate::suggestions::{random_quote, suggestions_for};
use crate::task::{Category, Filter, Task};
use crate::todo_list::TodoList;

const COL_ID: usize = 8;
const COL_CATEGORY: usize = 10;
const COL_DUE: usize = 12;

#[derive(Parser)]
#[command(name = "taskstreak", version, about = "To-do list with a daily completion streak")]
pub struct Cli {
    /// Directory holding tasks, streak and config (defaults to the platform data dir)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Toggle a task between done and not done
    Done {
        /// Task id or unique id prefix
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
    },
    /// Move a task to another position (1-based)
    Mv { from: usize, to: usize },
    /// Show the current streak
    Streak,
    /// Show completions for the last seven days
    Chart,
    /// Write the list to a text file
    Export {
        /// Output file (defaults to the configured export path)
        path: Option<PathBuf>,
    },
    /// Show suggested tasks for this time of day
    Suggest {
        /// Add the suggestion with this number
        #[arg(long)]
        add: Option<usize>,
    },
    /// Print a motivational quote
    Quote,
    /// Open the terminal UI (default)
    Tui,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    text: Vec<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(short, long)]
    due: Option<NaiveDate>,

    /// Work, Personal, Study, Health or Other
    #[arg(short, long)]
    category: Option<Category>,

    /// Read the task text from stdin, e.g. from a speech-to-text tool
    #[arg(long)]
    stdin: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// all, active or completed
    #[arg(short, long, default_value = "all")]
    filter: Filter,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Opens the list stored in `data_dir` with the system clock, writing a
/// default config on first run.
pub fn open(data_dir: &Path) -> Result<(TodoList, Config)> {
    let config = Config::load_or_init(data_dir)?;
    let list = TodoList::load(
        Box::new(FileStore::new(data_dir)),
        Box::new(SystemClock),
        config.dark_mode_default,
    )?;
    Ok((list, config))
}

pub fn run(data_dir: &Path, command: Commands) -> Result<()> {
    let (mut list, config) = open(data_dir)?;

    match command {
        Commands::Add(args) => run_add(&mut list, &config, args),
        Commands::List(args) => run_list(&list, args),
        Commands::Done { id } => {
            let id = resolve(&list, &id)?;
            let completed = list.toggle_complete(&id)?;
            if completed == Some(true) {
                println!("✓ Completed. {}", list.streak().label());
            } else {
                println!("Marked as not done.");
            }
            Ok(())
        }
        Commands::Rm { id } => {
            let id = resolve(&list, &id)?;
            list.delete_task(&id)?;
            println!("Deleted {}", short_id(&id));
            Ok(())
        }
        Commands::Mv { from, to } => {
            if from == 0 || to == 0 || from > list.tasks().len() {
                bail!("Positions are 1-based and must refer to an existing task");
            }
            list.reorder(from - 1, Some(to - 1))?;
            Ok(())
        }
        Commands::Streak => {
            let streak = list.streak();
            println!("🔥 {}", streak.label());
            if let Some(last) = streak.last_completed {
                let local = list.clock().local_datetime(last);
                println!("Last completion: {}", local.format("%Y-%m-%d %H:%M"));
            }
            Ok(())
        }
        Commands::Chart => {
            print_chart(&list);
            Ok(())
        }
        Commands::Export { path } => {
            let path = path.unwrap_or(config.export_path);
            export::write(list.tasks(), &path)?;
            println!("Exported {} tasks to {}", list.tasks().len(), path.display());
            Ok(())
        }
        Commands::Suggest { add } => run_suggest(&mut list, &config, add),
        Commands::Quote => {
            let quote = random_quote();
            println!("\"{}\"\n  - {}", quote.text, quote.author);
            Ok(())
        }
        Commands::Tui => bail!("Run `taskstreak tui` from an interactive terminal"),
    }
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(COL_ID) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn resolve(list: &TodoList, id: &str) -> Result<String> {
    match list.find(id) {
        Some(task) => Ok(task.id.clone()),
        None => bail!("Task not found: {}", id),
    }
}

fn run_add(list: &mut TodoList, config: &Config, args: AddArgs) -> Result<()> {
    let text = if args.stdin {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.text.join(" ")
    };
    let category = args.category.unwrap_or(config.default_category);

    match list.add_task(&text, args.due, category)? {
        Some(task) => println!(
            "Added {} [{}] {}",
            short_id(&task.id),
            task.category,
            task.text
        ),
        None => println!("Nothing to add: task text is empty."),
    }
    Ok(())
}

fn run_list(list: &TodoList, args: ListArgs) -> Result<()> {
    let tasks = list.filtered(args.filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", args.filter.empty_message());
        return Ok(());
    }

    println!(
        "{:<3} {:<id$} {:<3} {:<cat$} {:<due$} TEXT",
        "#",
        "ID",
        "",
        "CATEGORY",
        "DUE",
        id = COL_ID,
        cat = COL_CATEGORY,
        due = COL_DUE
    );
    for task in tasks {
        print_row(list, task);
    }
    println!();
    println!("🔥 {}", list.streak().label());
    Ok(())
}

fn print_row(list: &TodoList, task: &Task) {
    let position = list.position(&task.id).map(|p| p + 1).unwrap_or_default();
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<3} {:<id$} {:<3} {:<cat$} {:<due_w$} {}",
        position,
        short_id(&task.id),
        if task.completed { "[x]" } else { "[ ]" },
        task.category.label(),
        due,
        task.text,
        id = COL_ID,
        cat = COL_CATEGORY,
        due_w = COL_DUE
    );
}

fn print_chart(list: &TodoList) {
    let counts = weekly_completions(list.tasks(), list.clock());
    for day in counts {
        println!(
            "{} {:>2} {}",
            day.label,
            day.completed,
            "█".repeat(day.completed as usize)
        );
    }
}

fn run_suggest(list: &mut TodoList, config: &Config, add: Option<usize>) -> Result<()> {
    let clock = list.clock();
    let now = clock.local_datetime(clock.now());
    let suggestions = suggestions_for(now.hour(), now.weekday());

    match add {
        None => {
            for (i, s) in suggestions.iter().enumerate() {
                println!("{}. {}", i + 1, s);
            }
        }
        Some(n) => {
            let Some(text) = n.checked_sub(1).and_then(|i| suggestions.get(i)) else {
                bail!("No suggestion number {}", n);
            };
            list.add_task(text, None, config.default_category)?;
            println!("Added {}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("3f2a9c1e-77aa-4b1c"), "3f2a9c1e");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_options() {
        let cli = Cli::try_parse_from([
            "taskstreak",
            "add",
            "buy",
            "milk",
            "--due",
            "2026-03-12",
            "--category",
            "personal",
        ])
        .unwrap();
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.text, vec!["buy", "milk"]);
        assert_eq!(args.due, NaiveDate::from_ymd_opt(2026, 3, 12));
        assert_eq!(args.category, Some(Category::Personal));
    }

    #[test]
    fn test_parse_rejects_bad_category() {
        assert!(Cli::try_parse_from(["taskstreak", "add", "x", "--category", "chores"]).is_err());
    }

    #[test]
    fn test_parse_list_filter() {
        let cli = Cli::try_parse_from(["taskstreak", "list", "--filter", "completed"]).unwrap();
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.filter, Filter::Completed);
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["taskstreak", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    #[serial]
    fn test_data_dir_from_env() {
        std::env::set_var(DATA_DIR_ENV, "/from/env");
        let from_env = Cli::try_parse_from(["taskstreak", "list"]);
        let from_flag = Cli::try_parse_from(["taskstreak", "list", "--data-dir", "/from/flag"]);
        std::env::remove_var(DATA_DIR_ENV);

        assert_eq!(from_env.unwrap().data_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(from_flag.unwrap().data_dir, Some(PathBuf::from("/from/flag")));
    }

    #[test]
    #[serial]
    fn test_data_dir_unset() {
        std::env::remove_var(DATA_DIR_ENV);
        let cli = Cli::try_parse_from(["taskstreak"]).unwrap();
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_run_tui_command_is_an_error() {
        let temp = tempdir().unwrap();
        assert!(run(temp.path(), Commands::Tui).is_err());
    }

    #[test]
    fn test_open_writes_default_config() -> Result<()> {
        let temp = tempdir()?;
        let (list, config) = open(temp.path())?;
        assert!(list.tasks().is_empty());
        assert_eq!(config, Config::default());
        assert!(temp.path().join("config.toml").exists());
        Ok(())
    }
}
