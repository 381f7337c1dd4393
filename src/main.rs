use std::path::Path;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::KeyCode;
use event_calendar::app::{Action, App, Outcome, ViewMode};
use event_calendar::calendar::{CalendarEvent, EventBackend, EventClient};
use event_calendar::components::{DayView, EventForm, Help, MonthView, StatusBar, WeekView};
use event_calendar::config::Config;
use event_calendar::error::TransportError;
use event_calendar::input::{self, Command, FormCommand};
use event_calendar::{logging, theme, tui};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let log_path = logging::init()?;
    let config = Config::load()?;
    theme::init(&config.theme);

    let client = EventClient::new(&config.api_url)?;
    info!(api_url = %client.base_url(), "Starting event calendar");
    eprintln!("Loading events from {}...", client.base_url());

    let mut app = App::new(client, config.slot());
    if let Err(err) = app.dispatch(Action::Load).await {
        app.status_message = Some(failure_message(&err, log_path.as_deref()));
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, log_path.as_deref()).await;
    tui::restore()?;
    result
}

async fn run<B: EventBackend>(
    terminal: &mut tui::Tui,
    app: &mut App<B>,
    log_path: Option<&Path>,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        let Some(key) = input::next_key_event(Duration::from_millis(250))? else {
            continue;
        };
        app.status_message = None;

        if app.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                app.show_help = false;
            }
            continue;
        }

        let active_field = app.editor.as_ref().map(|e| e.active_field);
        let action = match active_field {
            Some(field) => input::form_command(key, field).and_then(|cmd| form_action(app, cmd)),
            None => input::normal_command(key, app.view_mode)
                .and_then(|cmd| normal_action(app, cmd)),
        };

        if let Some(action) = action {
            match app.dispatch(action).await {
                Ok(outcome) => {
                    if let Some(msg) = outcome_message(outcome) {
                        app.status_message = Some(msg);
                    }
                }
                Err(err) => app.status_message = Some(failure_message(&err, log_path)),
            }
        }
    }

    Ok(())
}

fn normal_action<B: EventBackend>(app: &mut App<B>, cmd: Command) -> Option<Action> {
    match cmd {
        Command::Quit => app.running = false,
        Command::Help => app.show_help = true,
        Command::View(mode) => app.view_mode = mode,
        Command::Today => app.go_to_today(),
        Command::Reload => return Some(Action::Load),
        Command::NewEvent => {
            return app
                .selected_slot()
                .map(|(start, end)| Action::SelectSlot { start, end })
        }
        Command::OpenEvent => return app.highlighted_event().map(Action::SelectEvent),
        Command::PrevDay => app.prev_day(),
        Command::NextDay => app.next_day(),
        Command::PrevWeek => app.prev_week(),
        Command::NextWeek => app.next_week(),
        Command::PrevMonth => app.prev_month(),
        Command::NextMonth => app.next_month(),
        Command::CursorUp => app.cursor_up(),
        Command::CursorDown => app.cursor_down(),
    }
    None
}

fn form_action<B: EventBackend>(app: &mut App<B>, cmd: FormCommand) -> Option<Action> {
    match cmd {
        FormCommand::Dismiss => Some(Action::Dismiss),
        FormCommand::Save => Some(Action::Save),
        FormCommand::Delete => Some(Action::Delete),
        FormCommand::NextField => {
            app.focus_next_field();
            None
        }
        FormCommand::PrevField => {
            app.focus_prev_field();
            None
        }
        FormCommand::Backspace => app.edit_active_field(|value| {
            value.pop();
        }),
        FormCommand::Insert(c) => app.edit_active_field(|value| value.push(c)),
    }
}

fn outcome_message(outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::Loaded(1) => Some("Loaded 1 event".to_string()),
        Outcome::Loaded(n) => Some(format!("Loaded {n} events")),
        Outcome::Invalid => Some("Fix the marked fields".to_string()),
        Outcome::Saved => Some("Event saved".to_string()),
        Outcome::Deleted => Some("Event deleted".to_string()),
        _ => None,
    }
}

fn failure_message(err: &TransportError, log_path: Option<&Path>) -> String {
    match log_path {
        Some(path) => format!("{err} (see {})", path.display()),
        None => err.to_string(),
    }
}

fn draw<B: EventBackend>(frame: &mut Frame, app: &App<B>) {
    let area = frame.area();
    let theme = theme::current();

    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    let heading = Paragraph::new(Span::styled("Event Calendar", theme.header))
        .alignment(Alignment::Center);
    frame.render_widget(heading, layout[0]);

    let content = layout[1];
    match app.view_mode {
        ViewMode::Month => render_month_layout(frame, content, app),
        ViewMode::Week => WeekView::render(
            frame,
            content,
            app.selected_date,
            app.today,
            app.week_start(),
            &app.events,
        ),
        ViewMode::Day => DayView::render(
            frame,
            content,
            app.selected_date,
            &day_events(app),
            app.day_cursor,
        ),
    }

    if let Some(editor) = &app.editor {
        EventForm::render(frame, area, editor);
    }

    if app.show_help {
        Help::render(frame, area);
    }

    StatusBar::render(
        frame,
        layout[2],
        app.view_mode,
        app.editor.as_ref().map(|e| e.draft.is_new()),
        app.status_message.as_deref(),
    );
}

fn day_events<B>(app: &App<B>) -> Vec<&CalendarEvent> {
    app.day_events
        .iter()
        .filter_map(|&i| app.events.get(i))
        .collect()
}

fn render_month_layout<B: EventBackend>(frame: &mut Frame, area: Rect, app: &App<B>) {
    if area.width < 60 {
        MonthView::render(frame, area, app.selected_date, app.today, &app.days_with_events);
        return;
    }

    let month_w = if area.width >= 100 { 44 } else { 37 };
    let columns = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

    MonthView::render(
        frame,
        columns[0],
        app.selected_date,
        app.today,
        &app.days_with_events,
    );
    DayView::render(
        frame,
        columns[1],
        app.selected_date,
        &day_events(app),
        app.day_cursor,
    );
}
