//! Month grid construction using Zeller's algorithm and Gregorian month lengths.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Error, Result};
use crate::event::{self, Event};
use crate::source::DateRange;
use crate::types::{DAYS_PER_WEEK, DayCell, MonthGrid};

/// Check if a year is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    // Divisible by 4, except centuries unless divisible by 400
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!("month out of range: {month}"),
    }
}

/// Calculate weekday of the 1st using Zeller's congruence.
pub fn first_day_of_month(year: i32, month: u32) -> Weekday {
    let m = if month < 3 { month + 12 } else { month };
    let q: i32 = 1;
    let year_i = if month < 3 { year - 1 } else { year };
    let k: i32 = year_i.rem_euclid(100);
    let j: i32 = year_i.div_euclid(100);

    let h = (q + (13 * (m as i32 + 1)) / 5 + k + k / 4 + j.div_euclid(4) - 2 * j).rem_euclid(7);
    // h: 0=Sat, 1=Sun, 2=Mon, 3=Tue, 4=Wed, 5=Thu, 6=Fri
    match h {
        0 => Weekday::Sat,
        1 => Weekday::Sun,
        2 => Weekday::Mon,
        3 => Weekday::Tue,
        4 => Weekday::Wed,
        5 => Weekday::Thu,
        6 => Weekday::Fri,
        _ => unreachable!(),
    }
}

impl<'a> MonthGrid<'a> {
    /// Build the grid for the month containing `reference`.
    ///
    /// Produces `first_weekday` padding cells followed by one cell per day. Each
    /// event lands on the day matching its literal date prefix; events without a
    /// readable date or outside the month are left out. Trailing cells of the
    /// last week are not padded.
    pub fn build(reference: NaiveDate, events: &'a [Event]) -> Self {
        let year = reference.year();
        let month = reference.month();
        let days_in_month = days_in_month(year, month);
        let first_weekday = first_day_of_month(year, month).num_days_from_sunday();

        // Bucket once, keeping input order inside each day
        let mut by_day: HashMap<NaiveDate, Vec<&'a Event>> = HashMap::new();
        for event in events {
            if let Some(day) = event.day_key()
                && day.year() == year
                && day.month() == month
            {
                by_day.entry(day).or_default().push(event);
            }
        }

        let mut cells = Vec::with_capacity((first_weekday + days_in_month) as usize);
        for _ in 0..first_weekday {
            cells.push(DayCell::padding());
        }
        for day in 1..=days_in_month {
            let date = NaiveDate::from_ymd_opt(year, month, day);
            let events = date.and_then(|d| by_day.remove(&d)).unwrap_or_default();
            cells.push(DayCell { date, events });
        }

        MonthGrid {
            year,
            month,
            first_weekday,
            days_in_month,
            cells,
        }
    }

    /// Build the grid from a textual reference date.
    pub fn for_reference(reference: &str, events: &'a [Event]) -> Result<Self> {
        let reference = parse_reference_date(reference)?;
        Ok(Self::build(reference, events))
    }

    /// Number of leading padding cells.
    pub fn padding(&self) -> usize {
        self.first_weekday as usize
    }

    /// Cells that carry a date.
    pub fn days(&self) -> &[DayCell<'a>] {
        &self.cells[self.padding()..]
    }

    /// Cells chunked into rows of seven. The last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn week_count(&self) -> usize {
        self.cells.len().div_ceil(DAYS_PER_WEEK)
    }

    pub fn cell_for(&self, date: NaiveDate) -> Option<&DayCell<'a>> {
        if date.year() != self.year || date.month() != self.month {
            return None;
        }
        self.days().get(date.day0() as usize)
    }

    /// Total number of events placed on the grid.
    pub fn event_count(&self) -> usize {
        self.cells.iter().map(|c| c.events.len()).sum()
    }
}

/// Day 1 of the month before `date`.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    shift_month(date, -1)
}

/// Day 1 of the month after `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    shift_month(date, 1)
}

/// Day 1 of the month `delta` months away from `date`.
///
/// Stays on the 1st of `date`'s own month when the target is out of range.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    let total_months = date.year() * 12 + date.month0() as i32 + delta;
    let year = total_months.div_euclid(12);
    let month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

/// Inclusive first..last day window of `date`'s month.
pub fn month_range(date: NaiveDate) -> DateRange {
    let start = date.with_day(1).unwrap_or(date);
    let end = date
        .with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date);
    DateRange { start, end }
}

/// Parse a reference date: `YYYY-MM-DD`, `YYYY-MM` (day 1), or a timestamp with
/// a leading `YYYY-MM-DD` before `T`.
pub fn parse_reference_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Ok(date);
    }
    if s.contains('T')
        && let Some(date) = event::day_key(s)
    {
        return Ok(date);
    }
    Err(Error::InvalidInput(format!(
        "'{}' is not a calendar date (expected YYYY-MM-DD or YYYY-MM)",
        s
    )))
}
