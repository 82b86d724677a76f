use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use taskstreak::cli::{self, Cli, Commands};
use taskstreak::config::{self, DEBUG_ENV};
use taskstreak::ui::{run_app, App};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = config::data_dir(cli.data_dir.as_deref())?;
    init_logging(&data_dir)?;

    match cli.command {
        None | Some(Commands::Tui) => run_tui(&data_dir),
        Some(command) => cli::run(&data_dir, command),
    }
}

// Logs go to a file so they never draw over the terminal UI.
fn init_logging(data_dir: &Path) -> Result<()> {
    if std::env::var_os(DEBUG_ENV).is_none() {
        return Ok(());
    }

    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("taskstreak.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter("taskstreak=debug")
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(data_dir: &Path) -> Result<()> {
    let (list, config) = cli::open(data_dir)?;
    let mut app = App::new(list, config);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
