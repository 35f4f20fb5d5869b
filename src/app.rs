use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::calendar::{
    CategoryFilter, Event, EventPatch, MonthCursor, MonthGrid, Store, StoreChange, StoreError,
};
use crate::components::event_form::{EventFormState, FormMode};
use crate::event::{Action, KeyContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Calendar,
    Events,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub filter: CategoryFilter,
    pub list_index: usize,
    pub form_state: Option<EventFormState>,
    pub show_help: bool,
    pub status_message: Option<String>,
    store: Store,
    changes: Rc<RefCell<Vec<StoreChange>>>,
}

impl App {
    pub fn new(mut store: Store, today: NaiveDate) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        store.subscribe(move |change| sink.borrow_mut().push(*change));

        Self {
            running: true,
            view_mode: ViewMode::Calendar,
            selected_date: today,
            today,
            filter: CategoryFilter::All,
            list_index: 0,
            form_state: None,
            show_help: false,
            status_message: None,
            store,
            changes,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn cursor(&self) -> MonthCursor {
        MonthCursor::of(self.selected_date)
    }

    pub fn grid(&self) -> MonthGrid<'_> {
        MonthGrid::build(self.cursor(), self.store.list())
    }

    /// The event list as filtered on the Events view.
    pub fn visible_events(&self) -> Vec<&Event> {
        self.store.filtered(self.filter)
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.visible_events().get(self.list_index).copied()
    }

    pub fn key_context(&self) -> KeyContext {
        if self.show_help {
            KeyContext::Help
        } else if let Some(ref form) = self.form_state {
            KeyContext::Form(form.active_field)
        } else {
            KeyContext::Normal(self.view_mode)
        }
    }

    pub fn apply(&mut self, action: Action) {
        self.status_message = None;

        match action {
            Action::Quit => self.running = false,
            Action::ShowView(view) => self.view_mode = view,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::PrevDay => self.move_days(-1),
            Action::NextDay => self.move_days(1),
            Action::PrevWeek => self.move_days(-7),
            Action::NextWeek => self.move_days(7),
            Action::PrevMonth => self.prev_month(),
            Action::NextMonth => self.next_month(),
            Action::Today => self.go_to_today(),
            Action::NewEvent => self.open_event_form(),
            Action::EditSelected => self.open_edit_form(),
            Action::DeleteSelected => self.delete_selected_event(),
            Action::SelectPrev => self.list_index = self.list_index.saturating_sub(1),
            Action::SelectNext => self.select_next(),
            Action::CycleFilter => {
                self.filter = self.filter.next();
                self.list_index = 0;
            }
            Action::FormNext => self.with_form(|f| f.active_field = f.active_field.next()),
            Action::FormPrev => self.with_form(|f| f.active_field = f.active_field.prev()),
            Action::FormInput(c) => self.with_form(|f| f.input_char(c)),
            Action::FormBackspace => self.with_form(|f| f.backspace()),
            Action::FormToggle => self.with_form(|f| f.next_category()),
            Action::FormSubmit => self.submit_event_form(),
            Action::FormCancel => self.form_state = None,
        }

        self.drain_changes();
    }

    pub fn prev_month(&mut self) {
        let target = self.cursor().prev();
        self.selected_date = target.clamp_day(self.selected_date.day());
    }

    pub fn next_month(&mut self) {
        let target = self.cursor().next();
        self.selected_date = target.clamp_day(self.selected_date.day());
    }

    pub fn go_to_today(&mut self) {
        self.selected_date = self.today;
    }

    pub fn open_event_form(&mut self) {
        self.form_state = Some(EventFormState::new(self.selected_date));
    }

    pub fn open_edit_form(&mut self) {
        match self.selected_event() {
            Some(event) => self.form_state = Some(EventFormState::edit(event)),
            None => self.status_message = Some("No event selected".to_string()),
        }
    }

    pub fn submit_event_form(&mut self) {
        let Some(ref form) = self.form_state else {
            return;
        };
        let mode = form.mode;
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                debug!(%err, "event form rejected");
                self.status_message = Some(err.to_string());
                return;
            }
        };
        let date = draft.date;

        let result = match mode {
            FormMode::Add => self.store.add(draft).map(|_| ()),
            FormMode::Edit(id) => self.store.update(id, EventPatch::from(draft)),
        };

        match result {
            Ok(()) => {
                self.form_state = None;
                self.selected_date = date;
            }
            // The store already holds the change; submitting again would add
            // it twice.
            Err(err @ (StoreError::Save(_) | StoreError::Serialize(_))) => {
                warn!(%err, "event kept in memory but not saved");
                self.form_state = None;
                self.selected_date = date;
                self.status_message = Some(err.to_string());
            }
            Err(err) if err.is_not_found() => {
                warn!(%err, "edited event disappeared");
                self.form_state = None;
                self.status_message = Some(err.to_string());
            }
            Err(err) => {
                debug!(%err, "event form rejected");
                self.status_message = Some(err.to_string());
            }
        }
    }

    pub fn delete_selected_event(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        if let Err(err) = self.store.remove(id) {
            self.status_message = Some(err.to_string());
        }
    }

    fn move_days(&mut self, days: i64) {
        if let Some(date) = self.selected_date.checked_add_signed(Duration::days(days)) {
            self.selected_date = date;
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_events().len();
        if self.list_index + 1 < len {
            self.list_index += 1;
        }
    }

    fn with_form(&mut self, f: impl FnOnce(&mut EventFormState)) {
        if let Some(ref mut form) = self.form_state {
            f(form);
        }
    }

    // Store changes arrive through the subscription; turn them into status
    // text and keep the list selection in range.
    fn drain_changes(&mut self) {
        let changes: Vec<StoreChange> = self.changes.borrow_mut().drain(..).collect();
        if changes.is_empty() {
            return;
        }

        for change in &changes {
            debug!(?change, "store changed");
            let text = match change {
                StoreChange::Added(_) => "Event added",
                StoreChange::Updated(_) => "Event updated",
                StoreChange::Removed(_) => "Event deleted",
            };
            // An error from the same action (e.g. a failed save) stays visible
            if self.status_message.is_none() {
                self.status_message = Some(text.to_string());
            }
        }

        let len = self.visible_events().len();
        self.list_index = self.list_index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Category, EventDraft, FileSlot};
    use crate::components::event_form::FormField;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.apply(Action::FormInput(c));
        }
    }

    #[test]
    fn month_navigation_rolls_years_and_clamps_days() {
        let mut app = App::new(Store::in_memory(), date(2024, 1, 31));
        app.apply(Action::PrevMonth);
        assert_eq!(app.selected_date, date(2023, 12, 31));
        app.apply(Action::NextMonth);
        app.apply(Action::NextMonth);
        assert_eq!(app.selected_date, date(2024, 2, 29));
        app.apply(Action::Today);
        assert_eq!(app.selected_date, date(2024, 1, 31));
    }

    #[test]
    fn adding_through_the_form_selects_the_new_day() {
        let mut app = App::new(Store::in_memory(), date(2024, 2, 1));
        app.apply(Action::NewEvent);
        type_text(&mut app, "Planning");
        app.apply(Action::FormNext);
        for _ in 0..2 {
            app.apply(Action::FormBackspace);
        }
        type_text(&mut app, "15");
        app.apply(Action::FormNext);
        assert_eq!(app.key_context(), KeyContext::Form(FormField::Category));
        app.apply(Action::FormToggle);
        app.apply(Action::FormSubmit);

        assert!(app.form_state.is_none());
        assert_eq!(app.selected_date, date(2024, 2, 15));
        assert_eq!(app.status_message.as_deref(), Some("Event added"));

        let grid = app.grid();
        let cell = grid.cell_for(15).unwrap();
        assert_eq!(cell.events().len(), 1);
        assert_eq!(cell.events()[0].category, Category::Personal);
    }

    #[test]
    fn empty_title_keeps_form_open_with_error() {
        let mut app = App::new(Store::in_memory(), date(2024, 2, 1));
        app.apply(Action::NewEvent);
        app.apply(Action::FormSubmit);

        assert!(app.form_state.is_some());
        assert!(app.store().is_empty());
        assert!(app.status_message.unwrap().contains("title"));
    }

    #[test]
    fn failed_save_closes_the_form_so_the_event_is_not_added_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        // A directory where the file should be makes every write fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "").unwrap();

        let mut app = App::new(Store::open(FileSlot::new(&path)), date(2024, 2, 1));
        app.apply(Action::NewEvent);
        type_text(&mut app, "Plan");
        app.apply(Action::FormSubmit);

        assert!(app.form_state.is_none());
        assert_eq!(app.key_context(), KeyContext::Normal(ViewMode::Calendar));
        assert_eq!(app.store().len(), 1);
        assert!(app.status_message.as_deref().unwrap().contains("save"));

        app.apply(Action::FormSubmit);
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn edit_and_delete_from_filtered_list() {
        let mut store = Store::in_memory();
        store
            .add(EventDraft::new("Standup", date(2024, 2, 1)))
            .unwrap();
        store
            .add(EventDraft::new("Gym", date(2024, 2, 2)).with_category(Category::Personal))
            .unwrap();
        let mut app = App::new(store, date(2024, 2, 1));

        app.apply(Action::ShowView(ViewMode::Events));
        app.apply(Action::CycleFilter);
        app.apply(Action::CycleFilter);
        assert_eq!(app.filter, CategoryFilter::Only(Category::Personal));
        assert_eq!(app.selected_event().unwrap().title, "Gym");

        app.apply(Action::EditSelected);
        app.apply(Action::FormInput('!'));
        app.apply(Action::FormSubmit);
        assert_eq!(app.status_message.as_deref(), Some("Event updated"));
        assert_eq!(app.store().list()[1].title, "Gym!");

        app.apply(Action::DeleteSelected);
        assert_eq!(app.status_message.as_deref(), Some("Event deleted"));
        assert!(app.visible_events().is_empty());
        assert_eq!(app.store().len(), 1);

        app.apply(Action::DeleteSelected);
        assert_eq!(app.status_message.as_deref(), Some("No event selected"));
    }

    #[test]
    fn selection_stays_in_range() {
        let mut store = Store::in_memory();
        for title in ["a", "b"] {
            store.add(EventDraft::new(title, date(2024, 2, 1))).unwrap();
        }
        let mut app = App::new(store, date(2024, 2, 1));
        app.apply(Action::ShowView(ViewMode::Events));
        for _ in 0..5 {
            app.apply(Action::SelectNext);
        }
        assert_eq!(app.list_index, 1);
        app.apply(Action::DeleteSelected);
        assert_eq!(app.list_index, 0);
        assert_eq!(app.selected_event().unwrap().title, "a");
    }
}
