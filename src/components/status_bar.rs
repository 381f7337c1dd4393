use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::ViewMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    /// Mode on the left; the status message or key hints on the right.
    /// `form_open` is `Some(is_new)` while the event form is shown.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        mode: ViewMode,
        form_open: Option<bool>,
        message: Option<&str>,
    ) {
        let style = theme::current().status;
        let w = area.width as usize;

        let mode_str = match mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
        };
        let form_str = match form_open {
            Some(true) => " [New Event]",
            Some(false) => " [Edit Event]",
            None => "",
        };

        let right = match message {
            Some(msg) => format!(" {msg} "),
            None => hints(mode, form_open.is_some(), w).to_string(),
        };

        let left = format!(" {mode_str}{form_str} ");
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

fn hints(mode: ViewMode, form_open: bool, w: usize) -> &'static str {
    if form_open {
        return if w >= 60 {
            " Tab:Field Enter/^S:Save ^D:Delete Esc:Close "
        } else {
            " ^S:Save Esc:Close "
        };
    }
    match mode {
        ViewMode::Day | ViewMode::Month if w >= 80 => {
            " hjkl:Nav [/]:Mon t:Today Enter:Open n:New r:Reload ?:Help q:Quit "
        }
        ViewMode::Day | ViewMode::Month if w >= 50 => " jk:Select Enter:Open n:New q:Quit ",
        ViewMode::Week if w >= 70 => " hl:Day jk:Week [/]:Mon t:Today n:New ?:Help q:Quit ",
        ViewMode::Week if w >= 50 => " arrows:Nav n:New q:Quit ",
        _ => " ?:Help q:Quit ",
    }
}
