//! Personal event calendar: an event store persisted to a JSON file, a
//! month-grid builder, and the terminal front-end that drives them.

pub mod app;
pub mod calendar;
pub mod components;
pub mod config;
pub mod event;
pub mod logging;
pub mod theme;
pub mod tui;
