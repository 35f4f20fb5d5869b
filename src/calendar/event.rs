use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type EventId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Work,
    Personal,
}

impl Category {
    pub fn next(self) -> Self {
        match self {
            Category::Work => Category::Personal,
            Category::Personal => Category::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored calendar entry. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Category,
}

impl Event {
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}

/// Field values for an event that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub category: Category,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            category: Category::default(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl EventPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub(crate) fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
    }
}

impl From<EventDraft> for EventPatch {
    fn from(draft: EventDraft) -> Self {
        Self {
            title: Some(draft.title),
            date: Some(draft.date),
            category: Some(draft.category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, event: &Event) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => event.category == category,
        }
    }

    /// All -> Work -> Personal -> All
    pub fn next(self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::Work),
            CategoryFilter::Only(Category::Work) => CategoryFilter::Only(Category::Personal),
            CategoryFilter::Only(Category::Personal) => CategoryFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

// Older saved lists may carry a full timestamp ("2024-02-15T00:00:00.000Z");
// only the calendar date is kept.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_defaults_to_work() {
        assert_eq!(Category::default(), Category::Work);
        assert_eq!(EventDraft::new("Standup", date(2024, 2, 1)).category, Category::Work);
    }

    #[test]
    fn missing_category_deserializes_as_work() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"title":"Lunch","date":"2024-03-02"}"#).unwrap();
        assert_eq!(event.category, Category::Work);
        assert_eq!(event.date, date(2024, 3, 2));
    }

    #[test]
    fn timestamp_dates_keep_only_the_day() {
        let event: Event = serde_json::from_str(
            r#"{"id":7,"title":"Dentist","date":"2024-02-15T00:00:00.000Z","category":"Personal"}"#,
        )
        .unwrap();
        assert_eq!(event.date, date(2024, 2, 15));
        assert_eq!(event.category, Category::Personal);
    }

    #[test]
    fn serialized_shape_matches_keyed_records() {
        let event = Event {
            id: 42,
            title: "Review".into(),
            date: date(2024, 1, 9),
            category: Category::Personal,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-01-09");
        assert_eq!(json["category"], "Personal");
        assert_eq!(json["id"], 42);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut event = Event {
            id: 1,
            title: "Old".into(),
            date: date(2024, 1, 1),
            category: Category::Work,
        };
        EventPatch::default().title("New").apply(&mut event);
        assert_eq!(event.title, "New");
        assert_eq!(event.date, date(2024, 1, 1));
        assert_eq!(event.category, Category::Work);
    }

    #[test]
    fn filter_cycles_through_categories() {
        let f = CategoryFilter::All;
        assert_eq!(f.next(), CategoryFilter::Only(Category::Work));
        assert_eq!(f.next().next(), CategoryFilter::Only(Category::Personal));
        assert_eq!(f.next().next().next(), CategoryFilter::All);
    }
}
