pub mod event_form;
pub mod event_list;
pub mod month_view;
pub mod status_bar;

pub use event_form::EventForm;
pub use event_list::EventList;
pub use month_view::MonthView;
pub use status_bar::StatusBar;
