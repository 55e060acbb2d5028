//! Event sources and the date windows used to query them.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::Event;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Parse both bounds as `YYYY-MM-DD`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    /// Lower bound as a local start-of-day timestamp.
    pub fn start_param(&self) -> String {
        format!("{}T00:00:00", self.start.format("%Y-%m-%d"))
    }

    /// Upper bound as a local end-of-day timestamp.
    pub fn end_param(&self) -> String {
        format!("{}T23:59:59", self.end.format("%Y-%m-%d"))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("'{}' (expected YYYY-MM-DD)", s)))
}

/// Anything that can hand out events, either all of them or those in a window.
pub trait EventSource {
    fn events(&self, range: Option<&DateRange>) -> Result<Vec<Event>>;
}

/// Events stored as a JSON array in a file, or read from stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<String> {
        if self.path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        } else {
            Ok(fs::read_to_string(&self.path)?)
        }
    }
}

impl EventSource for JsonFileSource {
    fn events(&self, range: Option<&DateRange>) -> Result<Vec<Event>> {
        let raw = self.read_raw()?;
        let events = parse_events(&raw)?;
        debug!(path = %self.path.display(), count = events.len(), "loaded events");
        Ok(filter_range(events, range))
    }
}

/// Parse a JSON array of events, skipping records that do not fit the schema.
pub fn parse_events(raw: &str) -> Result<Vec<Event>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut events = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Event>(value) {
            Ok(event) => events.push(event),
            Err(e) => warn!(index, error = %e, "skipping malformed event record"),
        }
    }
    Ok(events)
}

/// Keep events whose day falls inside `range`. Without a range everything is kept.
pub fn filter_range(events: Vec<Event>, range: Option<&DateRange>) -> Vec<Event> {
    match range {
        None => events,
        Some(range) => events
            .into_iter()
            .filter(|e| e.day_key().is_some_and(|d| range.contains(d)))
            .collect(),
    }
}
