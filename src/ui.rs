use crate::chart::weekly_completions;
use crate::config::Config;
use crate::export::{self, group_by_category};
use crate::schedule::DailyCheck;
use crate::suggestions::{random_quote, suggestions_for, Quote};
use crate::task::{Category, DueStatus, Filter, Task};
use crate::todo_list::TodoList;
use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::warn;

// Redraw at least this often so "today" in the chart and due colours stays current.
const MAX_WAIT: Duration = Duration::from_secs(60);

const FILTERS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

#[derive(Debug, Clone)]
struct Theme {
    background: Color,
    text: Color,
    dimmed: Color,
    border: Color,
    accent: Color,
    selection: Color,
    streak: Color,
    bar: Color,
    due_soon: Color,
    due_tomorrow: Color,
    due_later: Color,
}

impl Theme {
    fn light() -> Self {
        Self {
            background: Color::Rgb(243, 244, 246),
            text: Color::Rgb(17, 24, 39),
            dimmed: Color::Rgb(107, 114, 128),
            border: Color::Rgb(156, 163, 175),
            accent: Color::Rgb(59, 130, 246),
            selection: Color::Rgb(219, 234, 254),
            streak: Color::Rgb(30, 64, 175),
            bar: Color::Rgb(16, 185, 129),
            due_soon: Color::Rgb(220, 38, 38),
            due_tomorrow: Color::Rgb(202, 138, 4),
            due_later: Color::Rgb(22, 163, 74),
        }
    }

    fn dark() -> Self {
        Self {
            background: Color::Rgb(17, 24, 39),
            text: Color::Rgb(243, 244, 246),
            dimmed: Color::Rgb(156, 163, 175),
            border: Color::Rgb(55, 65, 81),
            accent: Color::Rgb(96, 165, 250),
            selection: Color::Rgb(31, 41, 55),
            streak: Color::Rgb(191, 219, 254),
            bar: Color::Rgb(16, 185, 129),
            due_soon: Color::Rgb(248, 113, 113),
            due_tomorrow: Color::Rgb(250, 204, 21),
            due_later: Color::Rgb(74, 222, 128),
        }
    }

    fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

pub struct App {
    list: TodoList,
    config: Config,
    filter: Filter,
    selected: usize,
    daily: DailyCheck,
    quote: Quote,
    status: Option<String>,
}

/// What the event loop does after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
    PromptTask,
    PromptSuggestion,
}

impl App {
    pub fn new(list: TodoList, config: Config) -> Self {
        let daily = DailyCheck::arm(list.clock());
        Self {
            list,
            config,
            filter: Filter::All,
            selected: 0,
            daily,
            quote: random_quote(),
            status: None,
        }
    }

    /// Filtered tasks in display order: grouped by category, each group in
    /// list order.
    fn visible(&self) -> Vec<&Task> {
        group_by_category(self.list.filtered(self.filter))
            .into_iter()
            .flat_map(|(_, members)| members)
            .collect()
    }

    fn selected_id(&self) -> Option<String> {
        self.visible().get(self.selected).map(|t| t.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.list.filtered(self.filter).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Swaps the selected task with its visible neighbour in the same
    /// category, which may be several positions away in the full list.
    fn move_selected(&mut self, up: bool) -> Result<()> {
        let visible = self.visible();
        let target = if up {
            self.selected.checked_sub(1)
        } else {
            Some(self.selected + 1)
        };
        let neighbour = target.and_then(|i| visible.get(i).map(|t| (i, *t)));
        let (Some(current), Some((index, neighbour))) = (visible.get(self.selected), neighbour)
        else {
            return Ok(());
        };
        if current.category != neighbour.category {
            return Ok(());
        }

        let from = self.list.position(&current.id);
        let to = self.list.position(&neighbour.id);
        if let Some(from) = from {
            if self.list.reorder(from, to)? {
                self.selected = index;
            }
        }
        Ok(())
    }

    /// Runs the daily streak check once it is due. Returns true when it ran.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if !self.daily.poll(now) {
            return Ok(false);
        }
        self.list.check_daily_boundary()?;
        Ok(true)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        self.status = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Char('K') => self.move_selected(true)?,
            KeyCode::Char('J') => self.move_selected(false)?,
            KeyCode::Up if shift => self.move_selected(true)?,
            KeyCode::Down if shift => self.move_selected(false)?,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.list.toggle_complete(&id)?;
                    self.clamp_selection();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.list.delete_task(&id)?;
                    self.clamp_selection();
                }
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.selected = 0;
            }
            KeyCode::Char('t') => {
                self.list.toggle_dark_mode()?;
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('a') => return Ok(Action::PromptTask),
            KeyCode::Char('s') => return Ok(Action::PromptSuggestion),
            _ => {}
        }
        Ok(Action::Continue)
    }

    fn export(&mut self) {
        let path = self.config.export_path.clone();
        self.status = Some(match export::write(self.list.tasks(), &path) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(e) => {
                warn!("export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        let timeout = app.daily.time_until(app.list.clock().now()).min(MAX_WAIT);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key)? {
                        Action::Continue => {}
                        Action::Quit => return Ok(()),
                        Action::PromptTask => {
                            let added = prompt_new_task(app)?;
                            terminal.clear()?;
                            if !added {
                                app.status = Some("Nothing added".to_string());
                            }
                        }
                        Action::PromptSuggestion => {
                            prompt_suggestion(app)?;
                            terminal.clear()?;
                        }
                    }
                }
            }
        }

        let now = app.list.clock().now();
        app.tick(now)?;
    }
}

fn prompt_new_task(app: &mut App) -> Result<bool> {
    let Some(text) = prompt("Enter task description") else {
        return Ok(false);
    };
    if text.is_empty() {
        return Ok(false);
    }

    let due_date = prompt("Enter due date (YYYY-MM-DD, blank for none)")
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

    let choices: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let category = prompt(&format!(
        "Category ({}), blank for {}",
        choices.join("/"),
        app.config.default_category
    ))
    .and_then(|c| c.parse::<Category>().ok())
    .unwrap_or(app.config.default_category);

    Ok(app.list.add_task(&text, due_date, category)?.is_some())
}

fn prompt_suggestion(app: &mut App) -> Result<()> {
    let clock = app.list.clock();
    let now = clock.local_datetime(clock.now());
    let suggestions = suggestions_for(now.hour(), now.weekday());

    let mut message = String::from("Suggestions:\r\n");
    for (i, s) in suggestions.iter().enumerate() {
        message.push_str(&format!("  {}. {}\r\n", i + 1, s));
    }
    message.push_str("Pick a number (blank to cancel)");

    let picked = prompt(&message)
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| suggestions.get(i).copied());
    if let Some(text) = picked {
        app.list
            .add_task(text, None, app.config.default_category)?;
    }
    Ok(())
}

fn draw(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.list.dark_mode());
    let base = Style::default().fg(theme.text).bg(theme.background);
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(9),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(Block::default().style(base), area);
    draw_header(f, chunks[0], app, &theme);
    draw_filters(f, chunks[1], app, &theme);
    draw_tasks(f, chunks[2], app, &theme);
    draw_chart(f, chunks[3], app, &theme);

    let footer = app.status.clone().unwrap_or_else(|| {
        "a add  space toggle  d delete  J/K move  f filter  s suggest  e export  t theme  q quit"
            .to_string()
    });
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(theme.dimmed)),
        chunks[4],
    );
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "My To-Do List  ",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("🔥 {}", app.list.streak().label()),
                Style::default().fg(theme.streak),
            ),
        ]),
        Line::from(Span::styled(
            format!("\"{}\" - {}", app.quote.text, app.quote.author),
            Style::default()
                .fg(theme.dimmed)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_filters(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let selected = FILTERS.iter().position(|m| *m == app.filter).unwrap_or(0);
    let tabs = Tabs::new(FILTERS.iter().map(|m| m.label()))
        .select(selected)
        .style(Style::default().fg(theme.dimmed))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(tabs, area);
}

fn draw_tasks(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let today = app.list.clock().today();
    let tasks = app.list.filtered(app.filter);

    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    if tasks.is_empty() {
        let empty = Paragraph::new(app.filter.empty_message())
            .style(Style::default().fg(theme.dimmed))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut items: Vec<ListItem> = Vec::new();
    let mut highlighted = None;
    let mut index = 0;
    for (category, members) in group_by_category(tasks) {
        items.push(ListItem::new(Line::from(Span::styled(
            category.label(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))));
        for task in members {
            if index == app.selected {
                highlighted = Some(items.len());
            }
            items.push(ListItem::new(task_line(task, today, theme)));
            index += 1;
        }
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(highlighted);
    f.render_stateful_widget(list, area, &mut state);
}

fn task_line<'a>(task: &'a Task, today: NaiveDate, theme: &Theme) -> Line<'a> {
    let text_style = if task.completed {
        Style::default()
            .fg(theme.dimmed)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text)
    };

    let mut spans = vec![
        Span::raw(if task.completed { "  [x] " } else { "  [ ] " }),
        Span::styled(task.text.as_str(), text_style),
    ];
    if let Some(due) = task.due_date {
        let color = match task.due_status(today) {
            DueStatus::Overdue | DueStatus::Today => theme.due_soon,
            DueStatus::Tomorrow => theme.due_tomorrow,
            DueStatus::Later | DueStatus::None => theme.due_later,
        };
        spans.push(Span::styled(
            format!("  (Due: {})", due.format("%b %-d, %Y")),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let counts = weekly_completions(app.list.tasks(), app.list.clock());
    let data: Vec<(&str, u64)> = counts
        .iter()
        .map(|d| (d.label.as_str(), d.completed))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Completed this week")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.bar))
        .value_style(Style::default().fg(theme.background).bg(theme.bar))
        .label_style(Style::default().fg(theme.dimmed));
    f.render_widget(chart, area);
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    let result = io::stdin().read_line(&mut input);
    enable_raw_mode().ok();
    match result {
        Ok(_) => Some(input.trim().to_string()),
        Err(_) => None,
    }
}
