use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::ViewMode;
use crate::components::event_form::FormField;

/// Everything the user can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowView(ViewMode),
    ToggleHelp,
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    Today,
    NewEvent,
    EditSelected,
    DeleteSelected,
    SelectPrev,
    SelectNext,
    CycleFilter,
    FormNext,
    FormPrev,
    FormInput(char),
    FormBackspace,
    FormToggle,
    FormSubmit,
    FormCancel,
}

/// What currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Normal(ViewMode),
    Form(FormField),
    Help,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Next key press. Releases and non-key events are skipped.
pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

pub fn action_for(context: KeyContext, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match context {
        KeyContext::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::ToggleHelp),
            _ => None,
        },
        KeyContext::Form(field) => form_action(field, key.code),
        KeyContext::Normal(view) => normal_action(view, key.code),
    }
}

fn form_action(field: FormField, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::FormCancel),
        KeyCode::Enter => Some(Action::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(Action::FormNext),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrev),
        KeyCode::Backspace => Some(Action::FormBackspace),
        // Space cycles the category; elsewhere it is text
        KeyCode::Char(' ') if field == FormField::Category => Some(Action::FormToggle),
        KeyCode::Left | KeyCode::Right if field == FormField::Category => {
            Some(Action::FormToggle)
        }
        KeyCode::Char(c) => Some(Action::FormInput(c)),
        _ => None,
    }
}

fn normal_action(view: ViewMode, code: KeyCode) -> Option<Action> {
    let shared = match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::ShowView(ViewMode::Calendar)),
        KeyCode::Char('2') => Some(Action::ShowView(ViewMode::Events)),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('n') => Some(Action::NewEvent),
        KeyCode::Char('[') => Some(Action::PrevMonth),
        KeyCode::Char(']') => Some(Action::NextMonth),
        KeyCode::Char('t') => Some(Action::Today),
        _ => None,
    };
    if shared.is_some() {
        return shared;
    }

    match view {
        ViewMode::Calendar => match code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevDay),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextDay),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::PrevWeek),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NextWeek),
            KeyCode::Enter => Some(Action::NewEvent),
            KeyCode::Tab => Some(Action::ShowView(ViewMode::Events)),
            _ => None,
        },
        ViewMode::Events => match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Enter | KeyCode::Char('e') => Some(Action::EditSelected),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteSelected),
            KeyCode::Char('f') => Some(Action::CycleFilter),
            KeyCode::Tab => Some(Action::ShowView(ViewMode::Calendar)),
            _ => None,
        },
    }
}
