use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use super::error::{StoreError, StoreResult};
use super::event::{CategoryFilter, Event, EventDraft, EventId, EventPatch};
use super::slot::Slot;

/// Emitted to subscribers after every applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Added(EventId),
    Updated(EventId),
    Removed(EventId),
}

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Owns every event. Reads the slot once on open and rewrites it after
/// each mutation.
pub struct Store {
    events: Vec<Event>,
    slot: Option<Box<dyn Slot>>,
    last_issued: EventId,
    listeners: Vec<Listener>,
}

impl Store {
    /// Store without persistence.
    pub fn in_memory() -> Self {
        Self {
            events: Vec::new(),
            slot: None,
            last_issued: 0,
            listeners: Vec::new(),
        }
    }

    /// Load the list held in `slot`. Missing or unreadable contents start an
    /// empty calendar.
    pub fn open(slot: impl Slot + 'static) -> Self {
        let events = load_events(&slot);
        let last_issued = events.iter().map(|e| e.id).max().unwrap_or(0);
        info!(count = events.len(), "event store opened");

        Self {
            events,
            slot: Some(Box::new(slot)),
            last_issued,
            listeners: Vec::new(),
        }
    }

    /// Events in insertion order.
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&Event> {
        self.events.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.is_on(date)).collect()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add(&mut self, draft: EventDraft) -> StoreResult<Event> {
        validate_title(&draft.title)?;

        let id = self.issue_id()?;
        let event = Event {
            id,
            title: draft.title,
            date: draft.date,
            category: draft.category,
        };
        self.events.push(event.clone());
        info!(id, date = %event.date, category = %event.category, "event added");

        self.commit(StoreChange::Added(id))?;
        Ok(event)
    }

    pub fn update(&mut self, id: EventId, patch: EventPatch) -> StoreResult<()> {
        if let Some(ref title) = patch.title {
            validate_title(title)?;
        }

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(event);
        info!(id, "event updated");

        self.commit(StoreChange::Updated(id))
    }

    pub fn remove(&mut self, id: EventId) -> StoreResult<()> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.events.remove(index);
        info!(id, "event removed");

        self.commit(StoreChange::Removed(id))
    }

    /// Write the full list to the slot. A no-op for in-memory stores.
    pub fn save(&self) -> StoreResult<()> {
        let Some(ref slot) = self.slot else {
            return Ok(());
        };
        let json = serde_json::to_string(&self.events)?;
        slot.write(&json).map_err(|err| {
            error!(%err, "failed to write event list");
            StoreError::Save(err)
        })?;
        debug!(count = self.events.len(), bytes = json.len(), "event list saved");
        Ok(())
    }

    // The mutation is already applied; listeners hear about it even when the
    // write fails.
    fn commit(&mut self, change: StoreChange) -> StoreResult<()> {
        let saved = self.save();
        for listener in &mut self.listeners {
            listener(&change);
        }
        saved
    }

    // Millisecond timestamp, bumped past the last issued id so ids stay
    // strictly increasing.
    fn issue_id(&mut self) -> StoreResult<EventId> {
        let next = self
            .last_issued
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;
        let id = Utc::now().timestamp_millis().max(next);
        self.last_issued = id;
        Ok(id)
    }
}

fn load_events(slot: &dyn Slot) -> Vec<Event> {
    let contents = match slot.read() {
        Ok(Some(contents)) => contents,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(%err, "could not read saved events, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(events) => events,
        Err(err) => {
            warn!(%err, "saved events are not valid, starting empty");
            Vec::new()
        }
    }
}

fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation {
            field: "title",
            reason: "must not be empty",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;
    use crate::calendar::event::Category;
    use crate::calendar::slot::MemorySlot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded(store: &mut Store) -> Vec<Event> {
        vec![
            store
                .add(EventDraft::new("Standup", date(2024, 2, 1)))
                .unwrap(),
            store
                .add(EventDraft::new("Gym", date(2024, 2, 1)).with_category(Category::Personal))
                .unwrap(),
            store
                .add(EventDraft::new("Retro", date(2024, 2, 15)))
                .unwrap(),
        ]
    }

    #[test]
    fn add_assigns_unique_increasing_ids() {
        let mut store = Store::in_memory();
        let mut seen = HashSet::new();
        let mut last = 0;
        for i in 0..50 {
            let event = store
                .add(EventDraft::new(format!("event {i}"), date(2024, 2, 1)))
                .unwrap();
            assert!(seen.insert(event.id));
            assert!(event.id > last);
            last = event.id;
        }
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn removed_ids_are_not_reissued() {
        let mut store = Store::in_memory();
        let first = store.add(EventDraft::new("a", date(2024, 1, 1))).unwrap();
        store.remove(first.id).unwrap();
        let second = store.add(EventDraft::new("b", date(2024, 1, 1))).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut store = Store::in_memory();
        let err = store
            .add(EventDraft::new("   ", date(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "title", .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn update_changes_only_patched_fields() {
        let mut store = Store::in_memory();
        let events = seeded(&mut store);
        let target = &events[1];

        store
            .update(target.id, EventPatch::default().title("Swim"))
            .unwrap();

        let updated = store.get(target.id).unwrap();
        assert_eq!(updated.title, "Swim");
        assert_eq!(updated.date, target.date);
        assert_eq!(updated.category, target.category);
        assert_eq!(store.len(), 3);
        assert_eq!(store.list()[0], events[0]);
        assert_eq!(store.list()[2], events[2]);
    }

    #[test]
    fn update_unknown_id_is_reported() {
        let mut store = Store::in_memory();
        seeded(&mut store);
        let before = store.list().to_vec();
        let err = store
            .update(-1, EventPatch::default().title("x"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn update_rejects_blank_title() {
        let mut store = Store::in_memory();
        let events = seeded(&mut store);
        let err = store
            .update(events[0].id, EventPatch::default().title(""))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        assert_eq!(store.get(events[0].id).unwrap().title, "Standup");
    }

    #[test]
    fn remove_twice_reports_not_found_the_second_time() {
        let mut store = Store::in_memory();
        let events = seeded(&mut store);

        store.remove(events[0].id).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(events[0].id).is_none());

        let err = store.remove(events[0].id).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn filtered_keeps_relative_order() {
        let mut store = Store::in_memory();
        seeded(&mut store);
        store
            .add(EventDraft::new("Dinner", date(2024, 2, 20)).with_category(Category::Personal))
            .unwrap();

        let personal: Vec<_> = store
            .filtered(CategoryFilter::Only(Category::Personal))
            .into_iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(personal, ["Gym", "Dinner"]);
        assert_eq!(store.filtered(CategoryFilter::All).len(), 4);
    }

    #[test]
    fn events_on_matches_exact_date() {
        let mut store = Store::in_memory();
        seeded(&mut store);
        let titles: Vec<_> = store
            .events_on(date(2024, 2, 1))
            .into_iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["Standup", "Gym"]);
        assert!(store.events_on(date(2024, 3, 1)).is_empty());
    }

    #[test]
    fn every_mutation_writes_the_slot() {
        let slot = MemorySlot::new();
        let mut store = Store::open(slot.clone());
        assert!(slot.contents().is_none());

        let event = store.add(EventDraft::new("Plan", date(2024, 5, 5))).unwrap();
        let written: Vec<Event> = serde_json::from_str(&slot.contents().unwrap()).unwrap();
        assert_eq!(written, vec![event.clone()]);

        store
            .update(event.id, EventPatch::default().category(Category::Personal))
            .unwrap();
        let written: Vec<Event> = serde_json::from_str(&slot.contents().unwrap()).unwrap();
        assert_eq!(written[0].category, Category::Personal);

        store.remove(event.id).unwrap();
        assert_eq!(slot.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn reopen_restores_identical_list() {
        let slot = MemorySlot::new();
        let mut store = Store::open(slot.clone());
        let events = seeded(&mut store);
        drop(store);

        let reopened = Store::open(slot);
        assert_eq!(reopened.list(), events.as_slice());
    }

    #[test]
    fn corrupt_slot_starts_empty() {
        let store = Store::open(MemorySlot::with_contents("{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_continue_past_loaded_maximum() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let json = format!(
            r#"[{{"id":{far_future},"title":"Later","date":"2030-01-01","category":"Work"}}]"#
        );
        let mut store = Store::open(MemorySlot::with_contents(json));
        let event = store.add(EventDraft::new("Now", date(2024, 1, 1))).unwrap();
        assert_eq!(event.id, far_future + 1);
    }

    #[test]
    fn add_after_largest_possible_id_fails_cleanly() {
        let json = format!(
            r#"[{{"id":{},"title":"Last","date":"2024-01-01","category":"Work"}}]"#,
            i64::MAX
        );
        let slot = MemorySlot::with_contents(json);
        let mut store = Store::open(slot.clone());
        let before = store.list().to_vec();

        let err = store
            .add(EventDraft::new("One more", date(2024, 1, 2)))
            .unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(store.list(), before.as_slice());
        let written: Vec<Event> = serde_json::from_str(&slot.contents().unwrap()).unwrap();
        assert_eq!(written, before);
    }

    #[test]
    fn listeners_hear_each_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::in_memory();
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| sink.borrow_mut().push(*change));

        let event = store.add(EventDraft::new("a", date(2024, 1, 1))).unwrap();
        store
            .update(event.id, EventPatch::default().title("b"))
            .unwrap();
        store.remove(event.id).unwrap();
        let _ = store.remove(event.id);

        assert_eq!(
            *seen.borrow(),
            vec![
                StoreChange::Added(event.id),
                StoreChange::Updated(event.id),
                StoreChange::Removed(event.id),
            ]
        );
    }
}
