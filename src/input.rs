use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::ViewMode;
use crate::calendar::DraftField;

/// Wait up to `timeout` for a key press, skipping other terminal events.
pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    loop {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(Some(key)),
            _ => continue,
        }
    }
}

/// Keys while browsing the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    View(ViewMode),
    Today,
    Reload,
    NewEvent,
    OpenEvent,
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    CursorUp,
    CursorDown,
}

pub fn normal_command(key: KeyEvent, mode: ViewMode) -> Option<Command> {
    let vertical = |up: bool| match (mode, up) {
        (ViewMode::Week, true) => Command::PrevWeek,
        (ViewMode::Week, false) => Command::NextWeek,
        (_, true) => Command::CursorUp,
        (_, false) => Command::CursorDown,
    };

    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Command::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Command::Quit,
        (KeyCode::Char('?'), _) => Command::Help,
        (KeyCode::Char('1'), _) => Command::View(ViewMode::Month),
        (KeyCode::Char('2'), _) => Command::View(ViewMode::Week),
        (KeyCode::Char('3'), _) => Command::View(ViewMode::Day),
        (KeyCode::Char('t'), _) => Command::Today,
        (KeyCode::Char('r'), _) => Command::Reload,
        (KeyCode::Char('n'), _) => Command::NewEvent,
        (KeyCode::Enter, _) => Command::OpenEvent,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Command::PrevDay,
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Command::NextDay,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => vertical(true),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => vertical(false),
        (KeyCode::Char('['), _) => Command::PrevMonth,
        (KeyCode::Char(']'), _) => Command::NextMonth,
        _ => return None,
    };
    Some(command)
}

/// Keys while the event form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    Dismiss,
    Save,
    Delete,
    NextField,
    PrevField,
    Backspace,
    Insert(char),
}

pub fn form_command(key: KeyEvent, field: DraftField) -> Option<FormCommand> {
    let command = match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => FormCommand::Dismiss,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => FormCommand::Save,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => FormCommand::Delete,
        (KeyCode::Enter, _) if field == DraftField::Description => FormCommand::Insert('\n'),
        (KeyCode::Enter, _) => FormCommand::Save,
        (KeyCode::Tab, _) | (KeyCode::Down, _) => FormCommand::NextField,
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => FormCommand::PrevField,
        (KeyCode::Backspace, _) => FormCommand::Backspace,
        (KeyCode::Char(_), m) if m.contains(KeyModifiers::CONTROL) => return None,
        (KeyCode::Char(c), _) => FormCommand::Insert(c),
        _ => return None,
    };
    Some(command)
}
