use chrono::{Datelike, NaiveDate};

use super::event::Event;

/// The month currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// `None` unless `month` is 1..=12 and the year is representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        // Day before the first of the following month.
        self.next()
            .first_day()
            .pred_opt()
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// The given day in this month, pulled back to the last day when the
    /// month is shorter.
    pub fn clamp_day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.first_day())
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayCell<'a> {
    Empty,
    Day { day: u32, events: Vec<&'a Event> },
}

impl<'a> DayCell<'a> {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Empty => None,
            DayCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn events(&self) -> &[&'a Event] {
        match self {
            DayCell::Empty => &[],
            DayCell::Day { events, .. } => events,
        }
    }
}

/// Leading padding followed by one cell per day. Weeks start on Sunday and
/// the last week is never padded.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid<'a> {
    pub cursor: MonthCursor,
    pub cells: Vec<DayCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub fn build(cursor: MonthCursor, events: &'a [Event]) -> Self {
        let leading = cursor.first_weekday() as usize;
        let days = cursor.days_in_month();

        let mut cells = Vec::with_capacity(leading + days as usize);
        cells.extend(std::iter::repeat_with(|| DayCell::Empty).take(leading));
        for day in 1..=days {
            let date = cursor.clamp_day(day);
            let matching = events.iter().filter(|e| e.is_on(date)).collect();
            cells.push(DayCell::Day {
                day,
                events: matching,
            });
        }

        Self { cursor, cells }
    }

    pub fn leading_empty(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| matches!(c, DayCell::Empty))
            .count()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(7)
    }

    pub fn week_count(&self) -> usize {
        self.cells.len().div_ceil(7)
    }

    pub fn cell_for(&self, day: u32) -> Option<&DayCell<'a>> {
        self.cells.iter().find(|c| c.day() == Some(day))
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
