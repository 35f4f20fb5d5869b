use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{DayCell, Event, MonthGrid};
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        grid: &MonthGrid<'_>,
        selected_date: NaiveDate,
        today: NaiveDate,
    ) {
        let theme = theme::current();
        let cursor = grid.cursor;

        let title = format!(" {} {} ", cursor.name(), cursor.year());
        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Layout: header + one row per week, weeks share the rest
        let weeks = grid.week_count().max(1) as u32;
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend((0..weeks).map(|_| Constraint::Ratio(1, weeks)));
        let rows = Layout::vertical(constraints).split(inner);

        let header_cols = columns(rows[0]);
        for (name, col) in DAY_NAMES.iter().zip(header_cols.iter()) {
            let header = Paragraph::new(Span::styled(*name, theme.header));
            frame.render_widget(header, *col);
        }

        for (week, row) in grid.weeks().zip(rows.iter().skip(1)) {
            let cols = columns(*row);
            for (cell, col) in week.iter().zip(cols.iter()) {
                if let DayCell::Day { day, events } = cell {
                    let date = cursor.clamp_day(*day);
                    render_day(frame, *col, *day, events, date == selected_date, date == today);
                }
            }
        }
    }
}

fn columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(area)
}

fn render_day(
    frame: &mut Frame,
    area: Rect,
    day: u32,
    events: &[&Event],
    selected: bool,
    today: bool,
) {
    let theme = theme::current();
    let width = area.width.saturating_sub(1) as usize;

    let number_style = if selected && today {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        theme.selected
    } else if today {
        theme.today
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(Span::styled(format!("{:>2}", day), number_style))];

    let room = area.height.saturating_sub(1) as usize;
    let (shown, hidden) = if events.len() > room {
        (room.saturating_sub(1), events.len() - room.saturating_sub(1))
    } else {
        (events.len(), 0)
    };

    for event in events.iter().take(shown) {
        lines.push(Line::from(Span::styled(
            truncate(&event.title, width),
            theme.category(event.category),
        )));
    }
    if hidden > 0 && room > 0 {
        lines.push(Line::from(Span::styled(
            truncate(&format!("+{} more", hidden), width),
            theme.dim,
        )));
    } else if hidden > 0 {
        // No room below the number: mark the day instead
        lines[0].spans.push(Span::styled("*", theme.dim));
    }

    let style = if selected {
        theme.highlight
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(lines).style(style), area);
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 1 {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('\u{2026}');
        out
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_char_aware() {
        assert_eq!(truncate("Standup", 10), "Standup");
        assert_eq!(truncate("Standup", 4), "Sta\u{2026}");
        assert_eq!(truncate("Café au lait", 4), "Caf\u{2026}");
        assert_eq!(truncate("abc", 1), "a");
        assert_eq!(truncate("abc", 0), "");
    }
}
