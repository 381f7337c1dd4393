use chrono::{Duration, NaiveDate, Timelike};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme;

const HOUR_START: u32 = 6;
const HOUR_END: u32 = 23;

pub struct WeekView;

impl WeekView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: NaiveDate,
        events: &[CalendarEvent],
    ) {
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %d, %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let time_col_w: u16 = if inner.width >= 70 { 6 } else { 4 };
        let col_w = (inner.width.saturating_sub(time_col_w) / 7).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        col_constraints.extend([Constraint::Length(col_w); 7]);
        col_constraints.push(Constraint::Min(0));
        let cols = Layout::horizontal(col_constraints).split(inner);

        // One header row, then as many hours as fit.
        let total_hours = (HOUR_END - HOUR_START) as usize;
        let visible_hours = (inner.height as usize).saturating_sub(1).min(total_hours);
        let mut row_constraints = vec![Constraint::Length(1); visible_hours + 1];
        row_constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(row_constraints).split(inner);

        let days: Vec<NaiveDate> = (0..7).map(|i| week_start + Duration::days(i)).collect();

        for (i, date) in days.iter().enumerate() {
            let label = if col_w >= 10 {
                date.format("%a %d").to_string()
            } else if col_w >= 5 {
                date.format("%a").to_string()
            } else {
                date.format("%d").to_string()
            };

            let style = if *date == selected_date {
                theme.selected
            } else if *date == today {
                theme.today
            } else {
                theme.header
            };

            let cell = Paragraph::new(Span::styled(
                format!("{:^width$}", label, width = col_w as usize),
                style,
            ));
            frame.render_widget(cell, cols[i + 1].intersection(rows[0]));
        }

        for hour_idx in 0..visible_hours {
            let hour = HOUR_START + hour_idx as u32;
            let row = rows[hour_idx + 1];

            let time_label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(time_label, theme.dim)),
                cols[0].intersection(row),
            );

            for (i, date) in days.iter().enumerate() {
                let cell = cols[i + 1].intersection(row);
                if cell.width == 0 || cell.height == 0 {
                    continue;
                }

                let Some(ev) = events.iter().find(|ev| covers_hour(ev, *date, hour)) else {
                    continue;
                };

                let width = cell.width as usize;
                let title: String = ev.title().chars().take(width).collect();
                let style = if *date == selected_date {
                    theme.event.add_modifier(Modifier::BOLD)
                } else {
                    theme.event
                };
                let line = Line::from(Span::styled(format!("{:<width$}", title), style));
                frame.render_widget(Paragraph::new(line), cell);
            }
        }
    }
}

/// Whether `ev` occupies any part of `hour` on `date`, in local time.
fn covers_hour(ev: &CalendarEvent, date: NaiveDate, hour: u32) -> bool {
    let Some(slot_start) = date.and_hms_opt(hour, 0, 0) else {
        return false;
    };
    let slot_end = slot_start + Duration::hours(1);
    let start = ev.local_start().naive_local();
    let end = ev.local_end().naive_local();

    if end <= start {
        // Zero-length or inverted events still show in their starting hour.
        return start.date() == date && start.hour() == hour;
    }
    start < slot_end && end > slot_start
}
