use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::Editor;
use crate::calendar::DraftField;
use crate::theme;

const LABEL_W: usize = 7;

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, editor: &Editor) {
        let theme = theme::current();
        let draft = &editor.draft;

        let form_w = area.width.clamp(30, 60);
        let form_h = area.height.clamp(12, 16);
        let x = area.x + area.width.saturating_sub(form_w) / 2;
        let y = area.y + area.height.saturating_sub(form_h) / 2;
        let form_area = Rect::new(x, y, form_w, form_h).intersection(area);

        frame.render_widget(Clear, form_area);

        let title = if draft.is_new() {
            " Create Event "
        } else {
            " Edit Event "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme.accent)
            .title_bottom(Line::from(Span::styled(" Esc:Close ", theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.accent.remove_modifier(Modifier::BOLD));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        // Each field takes a value row and an error row.
        let mut constraints = vec![Constraint::Length(1); DraftField::ALL.len() * 2];
        constraints.push(Constraint::Length(1)); // spacer
        constraints.push(Constraint::Length(1)); // help
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in DraftField::ALL.into_iter().enumerate() {
            let active = editor.active_field == field;
            render_field(frame, rows[i * 2], field.label(), draft.field(field), active);

            let message = if editor.errors.get(field) {
                Some(field.required_message())
            } else if editor.errors.malformed(field) {
                Some(field.malformed_message())
            } else {
                None
            };
            if let Some(message) = message {
                let msg = Line::from(vec![
                    Span::raw(" ".repeat(LABEL_W)),
                    Span::styled(message, theme.error),
                ]);
                frame.render_widget(Paragraph::new(msg), rows[i * 2 + 1]);
            }
        }

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut help = vec![
            Span::styled("Tab", bold),
            Span::styled(":Next ", theme.dim),
            Span::styled("^S", bold),
            Span::styled(":Save ", theme.dim),
        ];
        if !draft.is_new() {
            help.push(Span::styled("^D", bold));
            help.push(Span::styled(":Delete ", theme.dim));
        }
        let help_row = rows[DraftField::ALL.len() * 2 + 1];
        frame.render_widget(Paragraph::new(Line::from(help)), help_row);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let theme = theme::current();
    let cursor = if active { "_" } else { "" };
    let style = if active {
        theme.accent.remove_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    // Multi-line descriptions show their last line, marked as continued.
    let shown = match value.rsplit_once('\n') {
        Some((_, last)) => format!("\u{21b5} {last}"),
        None => value.to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_W), theme.dim),
        Span::styled(format!("{shown}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
