//! Command-line argument parsing using clap.
//!
//! Positional arguments: `[reference | month year]`

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, ValueHint};

use crate::calendar::{next_month, parse_reference_date, previous_month, shift_month};
use crate::error::{Error, Result};
use crate::formatter::{parse_month, terminal_width};
use crate::source::DateRange;
use crate::types::{
    COLOR_ENABLED_BY_DEFAULT, CalContext, ColumnsMode, DEFAULT_AGENDA_WIDTH, GUTTER_WIDTH_REGULAR,
};

/// Environment variable naming the default events file.
pub const EVENTS_ENV: &str = "KIDSCAL_EVENTS";
/// Environment variable overriding today's date (`YYYY-MM-DD`).
pub const TEST_TIME_ENV: &str = "KIDSCAL_TEST_TIME";

#[derive(Parser, Debug)]
#[command(name = "kidscal")]
#[command(about = "Displays a month calendar with your events", long_about = None)]
#[command(version)]
#[command(after_help = HELP_MESSAGE)]
pub struct Args {
    /// JSON file with an array of events ("-" reads stdin).
    #[arg(
        short = 'e',
        long,
        help_heading = "Event options",
        value_name = "file",
        value_hint = ValueHint::FilePath
    )]
    pub events: Option<PathBuf>,

    /// Only load events on or after this day (YYYY-MM-DD).
    #[arg(long, help_heading = "Event options", value_name = "date", requires = "to")]
    pub from: Option<String>,

    /// Only load events on or before this day (YYYY-MM-DD).
    #[arg(long, help_heading = "Event options", value_name = "date", requires = "from")]
    pub to: Option<String>,

    /// Display three months (previous, current, next).
    #[arg(short = '3', long = "three", help_heading = "Display options")]
    pub three_months: bool,

    /// Number of months to display, starting at the reference month.
    #[arg(
        short = 'n',
        long = "months",
        help_heading = "Display options",
        value_name = "num"
    )]
    pub months_count: Option<u32>,

    /// Always draw six week rows per month.
    #[arg(long, help_heading = "Display options")]
    pub six_weeks: bool,

    /// Do not list events below the calendar.
    #[arg(long, help_heading = "Display options")]
    pub no_agenda: bool,

    /// Number of columns for multiple months (or "auto" for terminal width).
    #[arg(
        short = 'c',
        long = "columns",
        help_heading = "Output options",
        value_name = "width"
    )]
    pub columns: Option<String>,

    /// Print the month grid as JSON instead of drawing it.
    #[arg(long, help_heading = "Output options")]
    pub json: bool,

    /// Disable colorized output.
    #[arg(long, help_heading = "Output options")]
    pub no_color: bool,

    /// Reference date (YYYY-MM-DD or YYYY-MM), year, or month (1-12 or name).
    #[arg(index = 1, value_name = "reference", value_hint = ValueHint::Other)]
    pub reference_arg: Option<String>,

    /// Year, when the first argument is a month.
    #[arg(index = 2, value_name = "year", value_hint = ValueHint::Other)]
    pub year_arg: Option<String>,
}

/// Help message displayed with --help.
const HELP_MESSAGE: &str = "Display a month calendar with events placed on their days.

Without any arguments, display the current month.

Examples:
  kidscal -e events.json              Current month with events
  kidscal -e events.json 2024-04-15   Month containing 15 April 2024
  kidscal -e - 4 2024 < events.json   April 2024, events from stdin
  kidscal -3 -e events.json           Previous, current and next month
  kidscal -n 6 --from 2024-01-01 --to 2024-06-30 -e events.json
  kidscal --json 2024-02              Grid cells as JSON";

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }
}

impl CalContext {
    pub fn new(args: &Args) -> Result<Self> {
        let today = get_today_date();

        let color = !args.no_color && COLOR_ENABLED_BY_DEFAULT && std::io::stdout().is_terminal();

        let columns = match args.columns.as_deref() {
            Some("auto") | None => ColumnsMode::Auto,
            Some(s) => {
                let n = s
                    .parse::<u32>()
                    .map_err(|_| Error::Args(format!("Invalid columns value: {}", s)))?;
                if n == 0 {
                    return Err(Error::Args("Columns must be positive".to_string()));
                }
                ColumnsMode::Fixed(n)
            }
        };

        if args.three_months && args.months_count.is_some() {
            return Err(Error::Args("Options -3 and -n are mutually exclusive".to_string()));
        }
        if args.months_count == Some(0) {
            return Err(Error::Args("Number of months must be positive".to_string()));
        }

        Ok(CalContext {
            color,
            today,
            show_year_in_header: true,
            gutter_width: GUTTER_WIDTH_REGULAR,
            columns,
            six_weeks: args.six_weeks,
            agenda: !args.no_agenda,
            agenda_width: terminal_width().unwrap_or(DEFAULT_AGENDA_WIDTH),
        })
    }
}

/// Get today's date, respecting KIDSCAL_TEST_TIME environment variable for testing.
pub fn get_today_date() -> NaiveDate {
    if let Ok(test_time) = std::env::var(TEST_TIME_ENV)
        && let Ok(date) = NaiveDate::parse_from_str(&test_time, "%Y-%m-%d")
    {
        return date;
    }
    chrono::Local::now().date_naive()
}

/// Resolve the reference date from positional arguments.
///
/// Argument patterns:
/// - none: today
/// - 1 arg: year (4 digits, current month), month (1-12 or name, current year),
///   or a reference date `YYYY-MM-DD` / `YYYY-MM`
/// - 2 args: month year
///
/// Bad input is an error; it never falls back to today.
pub fn get_reference_date(args: &Args) -> Result<NaiveDate> {
    let today = get_today_date();

    match (args.reference_arg.as_deref(), args.year_arg.as_deref()) {
        (None, None) => Ok(today),
        (Some(val), None) => {
            if let Ok(num) = val.parse::<i32>() {
                // 4 digits = year
                if (1000..=9999).contains(&num) {
                    return first_of(num, today.month());
                }
                // 1-2 digits = month
                if (1..=12).contains(&num) {
                    return first_of(today.year(), num as u32);
                }
                return Err(Error::InvalidInput(val.to_string()));
            }
            if let Some(month) = parse_month(val) {
                return first_of(today.year(), month);
            }
            parse_reference_date(val)
        }
        (Some(month), Some(year)) => {
            let month =
                parse_month(month).ok_or_else(|| Error::Args(format!("Invalid month: {}", month)))?;
            let year = year
                .parse::<i32>()
                .map_err(|_| Error::Args(format!("Invalid year: {}", year)))?;
            if !(1..=9999).contains(&year) {
                return Err(Error::Args(format!(
                    "Invalid year: {} (must be 1-9999)",
                    year
                )));
            }
            first_of(year, month)
        }
        (None, Some(_)) => Err(Error::Args("Invalid argument combination".to_string())),
    }
}

fn first_of(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidInput(format!("{:04}-{:02}", year, month)))
}

/// Date window for bounded event loading, when `--from`/`--to` are given.
pub fn get_date_range(args: &Args) -> Result<Option<DateRange>> {
    match (args.from.as_deref(), args.to.as_deref()) {
        (Some(from), Some(to)) => DateRange::parse(from, to).map(Some),
        (None, None) => Ok(None),
        _ => Err(Error::Args("--from and --to must be used together".to_string())),
    }
}

/// Events file from `--events`, falling back to KIDSCAL_EVENTS.
pub fn get_events_path(args: &Args) -> Option<PathBuf> {
    args.events
        .clone()
        .or_else(|| std::env::var_os(EVENTS_ENV).map(PathBuf::from))
}

/// Months to draw, each as day 1 of that month.
pub fn get_display_months(args: &Args, reference: NaiveDate) -> Vec<NaiveDate> {
    if args.three_months {
        vec![
            previous_month(reference),
            shift_month(reference, 0),
            next_month(reference),
        ]
    } else if let Some(count) = args.months_count {
        (0..count as i32).map(|i| shift_month(reference, i)).collect()
    } else {
        vec![reference]
    }
}
