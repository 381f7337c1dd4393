use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        days_with_events: &HashSet<u32>,
    ) {
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" {} ", selected_date.format("%B %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let weeks = month_grid(selected_date);

        let header = Line::from(
            DAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:^5}", d), theme.header))
                .collect::<Vec<_>>(),
        );

        let lines: Vec<Line> = weeks
            .iter()
            .map(|week| {
                let cells: Vec<Span> = week
                    .iter()
                    .map(|cell| match cell {
                        None => Span::raw("     "),
                        Some(date) => {
                            let marker = if days_with_events.contains(&date.day()) {
                                '*'
                            } else {
                                ' '
                            };
                            let style = if *date == today && *date == selected_date {
                                theme.today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                            } else if *date == selected_date {
                                theme.selected
                            } else if *date == today {
                                theme.today
                            } else {
                                Style::default()
                            };
                            Span::styled(format!(" {:>2}{} ", date.day(), marker), style)
                        }
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1); lines.len() + 1];
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, line) in lines.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(line), rows[i + 1]);
        }
    }
}

/// Sunday-first weeks of the month containing `date`; `None` pads the edges.
fn month_grid(date: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = date - Duration::days(i64::from(date.day0()));
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = lead;
    for day in first.iter_days().take_while(|d| d.month() == first.month()) {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}
