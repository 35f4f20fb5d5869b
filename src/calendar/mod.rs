pub mod error;
pub mod event;
pub mod grid;
pub mod slot;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use event::{Category, CategoryFilter, Event, EventDraft, EventId, EventPatch};
pub use grid::{DayCell, MonthCursor, MonthGrid};
pub use slot::{FileSlot, MemorySlot, Slot};
pub use store::{Store, StoreChange};
