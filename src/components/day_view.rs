use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme;

pub struct DayView;

impl DayView {
    /// Agenda for one day. `cursor` indexes into `events`.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&CalendarEvent],
        cursor: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {n} events "),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events. Press n to add one.").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = events
            .iter()
            .map(|ev| format_event(ev, date, inner_w))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight)
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(cursor.min(events.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn format_event(ev: &CalendarEvent, date: NaiveDate, max_width: usize) -> ListItem<'static> {
    let theme = theme::current();

    let time_str = if ev.local_start().date_naive() < date {
        format!(" (cont.) until {} ", ev.local_end().format("%H:%M"))
    } else {
        format!(" {} ", ev.duration_display())
    };

    let mut spans = vec![
        Span::styled(" ", theme.event),
        Span::styled(time_str.clone(), theme.dim),
        Span::styled(ev.title().to_string(), Style::default()),
    ];

    // Description only if the first line fits.
    let used = 1 + time_str.chars().count() + ev.title().chars().count();
    if let Some(first) = ev.description().lines().next() {
        let first = first.trim();
        if !first.is_empty() && used + 3 + first.chars().count() <= max_width {
            spans.push(Span::styled(format!(" - {first}"), theme.dim));
        }
    }

    ListItem::new(Line::from(spans))
}
