//! Type definitions and constants for the month grid and its display.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::event::Event;

/// Recurrence tag carried by an event. Informational only: instances are
/// materialized by whoever supplies the events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn tag(self) -> &'static str {
        match self {
            Recurrence::None => "NONE",
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Monthly => "MONTHLY",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Recurrence::None),
            "DAILY" => Ok(Recurrence::Daily),
            "WEEKLY" => Ok(Recurrence::Weekly),
            "MONTHLY" => Ok(Recurrence::Monthly),
            _ => Err(Error::UnknownRecurrence(s.to_string())),
        }
    }
}

/// One slot of the month grid.
///
/// Padding slots before the first of the month have no date and no events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<'a> {
    pub date: Option<NaiveDate>,
    pub events: Vec<&'a Event>,
}

impl DayCell<'_> {
    pub fn padding() -> Self {
        DayCell {
            date: None,
            events: Vec::new(),
        }
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

/// Calendar data for a single month with events placed on their days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid<'a> {
    pub year: i32,
    pub month: u32,
    /// Weekday of the 1st, 0 = Sunday .. 6 = Saturday. Also the padding count.
    pub first_weekday: u32,
    pub days_in_month: u32,
    pub cells: Vec<DayCell<'a>>,
}

/// Column display mode for multi-month layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnsMode {
    /// Fixed number of columns.
    Fixed(u32),
    /// Auto-detect from terminal width.
    Auto,
}

/// Display options for the terminal front end.
#[derive(Clone, Debug)]
pub struct CalContext {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// Today's date for highlighting.
    pub today: NaiveDate,
    /// Whether to show year in month headers.
    pub show_year_in_header: bool,
    /// Width of gutter between months in multi-month display.
    pub gutter_width: usize,
    /// Column display mode.
    pub columns: ColumnsMode,
    /// Always render six week rows, padding short months with blank rows.
    pub six_weeks: bool,
    /// Whether to list the events below the grid.
    pub agenda: bool,
    /// Maximum display width of an agenda line.
    pub agenda_width: usize,
}

pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKS_PER_MONTH: usize = 6;

/// Width of a rendered month: seven 3-column cells with single-space separators.
pub const MONTH_WIDTH: usize = DAYS_PER_WEEK * 4 - 1;
pub const GUTTER_WIDTH_REGULAR: usize = 2;
pub const DEFAULT_AGENDA_WIDTH: usize = 80;

pub const COLOR_ENABLED_BY_DEFAULT: bool = true;

/// Marker appended to a day number when color is off and the day has events.
pub const EVENT_MARKER: char = '*';

// ANSI color codes
pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_REVERSE: &str = "\x1b[7m";
pub const COLOR_RED: &str = "\x1b[91m";
pub const COLOR_TEAL: &str = "\x1b[96m";
pub const COLOR_SAND_YELLOW: &str = "\x1b[93m";
pub const COLOR_BOLD_GREEN: &str = "\x1b[1;92m";
