use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::{Category, Event, EventDraft, EventId, StoreError, StoreResult};
use crate::theme;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Category,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Category,
            FormField::Category => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Category,
            FormField::Date => FormField::Title,
            FormField::Category => FormField::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(EventId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventFormState {
    pub mode: FormMode,
    pub title: String,
    pub date: String,
    pub category: Category,
    pub active_field: FormField,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
            date: date.format(DATE_FORMAT).to_string(),
            category: Category::default(),
            active_field: FormField::Title,
        }
    }

    pub fn edit(event: &Event) -> Self {
        Self {
            mode: FormMode::Edit(event.id),
            title: event.title.clone(),
            date: event.date.format(DATE_FORMAT).to_string(),
            category: event.category,
            active_field: FormField::Title,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Form contents as a draft. Title emptiness is checked by the store.
    pub fn to_draft(&self) -> StoreResult<EventDraft> {
        let date = self.parsed_date().ok_or(StoreError::Validation {
            field: "date",
            reason: "expected YYYY-MM-DD",
        })?;
        Ok(EventDraft::new(self.title.trim(), date).with_category(self.category))
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Date => self.date.push(c),
            FormField::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Category => {}
        }
    }

    pub fn next_category(&mut self) {
        self.category = self.category.next();
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && self.parsed_date().is_some()
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let theme = theme::current();

        // Center the form popup
        let form_w = area.width.clamp(30, 50).min(area.width);
        let form_h = area.height.clamp(8, 9).min(area.height);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let heading = match state.mode {
            FormMode::Add => " Add Event ",
            FormMode::Edit(_) => " Edit Event ",
        };
        let accent = if state.is_valid() {
            Color::Green
        } else {
            Color::Yellow
        };
        let block = Block::default()
            .title(heading)
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // category
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        render_field(frame, rows[0], "Title:", &state.title, state.active_field == FormField::Title);
        render_field(frame, rows[1], "Date:", &state.date, state.active_field == FormField::Date);

        let category = format!("< {} >", state.category);
        render_field(
            frame,
            rows[2],
            "Type:",
            &category,
            state.active_field == FormField::Category,
        );

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Type ", theme.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[4]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::styled(format!("{:<7}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
