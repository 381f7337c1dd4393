use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("h/l \u{2190}/\u{2192}", "Previous/next day"),
            ("j/k \u{2191}/\u{2193}", "Select event (week: move by week)"),
            ("[/]", "Previous/next month"),
            ("t", "Jump to today"),
            ("1/2/3", "Month / Week / Day view"),
        ],
    ),
    (
        "Events",
        &[
            ("n", "New event on selected day"),
            ("Enter", "Open selected event"),
            ("r", "Reload from server"),
        ],
    ),
    (
        "Event form",
        &[
            ("Tab", "Next field"),
            ("Enter ^S", "Save"),
            ("^D", "Delete event"),
            ("Esc", "Close without saving"),
        ],
    ),
];

pub struct Help;

impl Help {
    pub fn render(frame: &mut Frame, area: Rect) {
        let theme = theme::current();

        let popup_w = area.width.clamp(30, 54);
        let popup_h = area.height.clamp(12, 22);
        let x = area.x + area.width.saturating_sub(popup_w) / 2;
        let y = area.y + area.height.saturating_sub(popup_h) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h).intersection(area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keybindings ")
            .title_style(theme.accent)
            .borders(Borders::ALL)
            .border_style(theme.accent.remove_modifier(Modifier::BOLD));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key_style = theme.header;
        let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

        let mut lines = Vec::new();
        for (i, (section, keys)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(*section, section_style)));
            for (key, desc) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<10}"), key_style),
                    Span::raw(*desc),
                ]));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("q quits, ? or Esc closes this", theme.dim)));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
