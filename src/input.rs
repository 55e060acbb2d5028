//! Validated event payloads built from raw form fields.
//!
//! A form arrives as [`EventForm`], plain strings exactly as typed. Creating and
//! editing go through separate types: [`NewEventInput`] carries every required
//! field, [`EventUpdatePatch`] only the fields being changed. Both serialize to
//! the JSON bodies the events API expects.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, FieldErrors, Result};
use crate::event::{self, Event};
use crate::types::Recurrence;

/// Wire format for timestamps sent to the API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Recurrence preselected on a blank "new event" form.
pub const DEFAULT_NEW_RECURRENCE: Recurrence = Recurrence::Weekly;

/// Raw form fields, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventForm {
    pub name: String,
    pub date_time: String,
    pub recurrence: String,
    pub notes: String,
    pub recurrence_end_date: String,
}

impl EventForm {
    /// Prefill an edit form from an existing event.
    pub fn from_event(event: &Event) -> Self {
        EventForm {
            name: event.name.clone(),
            date_time: event
                .starts_at()
                .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            recurrence: event.recurrence.tag().to_string(),
            notes: event.notes.clone(),
            recurrence_end_date: event.recurrence_end_date.clone().unwrap_or_default(),
        }
    }
}

/// A complete, validated event ready to be created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventInput {
    pub name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub date_time: NaiveDateTime,
    pub notes: String,
    pub recurrence: Recurrence,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_timestamp"
    )]
    pub recurrence_end_date: Option<NaiveDateTime>,
}

impl TryFrom<EventForm> for NewEventInput {
    type Error = Error;

    fn try_from(form: EventForm) -> Result<Self> {
        let mut errors = FieldErrors::default();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.push("name", "Event name is required");
        }
        let date_time = required_timestamp(&form.date_time, &mut errors);
        let recurrence = if form.recurrence.trim().is_empty() {
            DEFAULT_NEW_RECURRENCE
        } else {
            parse_recurrence(&form.recurrence, &mut errors)
        };
        let recurrence_end_date = optional_end_date(&form.recurrence_end_date, &mut errors);
        if let (Some(start), Some(end)) = (date_time, recurrence_end_date) {
            check_end_after_start(start, end, &mut errors);
        }

        errors.into_result()?;
        Ok(NewEventInput {
            name,
            date_time: date_time.unwrap_or_default(),
            notes: form.notes,
            recurrence,
            recurrence_end_date,
        })
    }
}

/// Fields to change on an existing event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_timestamp"
    )]
    pub date_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_timestamp"
    )]
    pub recurrence_end_date: Option<NaiveDateTime>,
}

impl EventUpdatePatch {
    pub fn is_empty(&self) -> bool {
        *self == EventUpdatePatch::default()
    }

    /// Check the fields that are set.
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            errors.push("name", "Event name is required");
        }
        if let (Some(start), Some(end)) = (self.date_time, self.recurrence_end_date) {
            check_end_after_start(start, end, &mut errors);
        }
        errors.into_result()
    }

    /// Copy of `event` with this patch applied.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut updated = event.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(date_time) = self.date_time {
            updated.date_time = date_time.format(TIMESTAMP_FORMAT).to_string();
        }
        if let Some(recurrence) = self.recurrence {
            updated.recurrence = recurrence;
        }
        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }
        if let Some(end) = self.recurrence_end_date {
            updated.recurrence_end_date = Some(end.format(TIMESTAMP_FORMAT).to_string());
        }
        updated
    }
}

impl TryFrom<EventForm> for EventUpdatePatch {
    type Error = Error;

    /// An edit form always resubmits name and date. Blank recurrence and end
    /// date leave those fields unchanged.
    fn try_from(form: EventForm) -> Result<Self> {
        let mut errors = FieldErrors::default();

        let name = form.name.trim().to_string();
        if name.is_empty() {
            errors.push("name", "Event name is required");
        }
        let date_time = required_timestamp(&form.date_time, &mut errors);
        let recurrence = if form.recurrence.trim().is_empty() {
            None
        } else {
            Some(parse_recurrence(&form.recurrence, &mut errors))
        };
        let recurrence_end_date = optional_end_date(&form.recurrence_end_date, &mut errors);
        if let (Some(start), Some(end)) = (date_time, recurrence_end_date) {
            check_end_after_start(start, end, &mut errors);
        }

        errors.into_result()?;
        Ok(EventUpdatePatch {
            name: Some(name),
            date_time,
            recurrence,
            notes: Some(form.notes),
            recurrence_end_date,
        })
    }
}

fn required_timestamp(raw: &str, errors: &mut FieldErrors) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push("dateTime", "Date and time is required");
        return None;
    }
    let parsed = event::parse_timestamp(raw);
    if parsed.is_none() {
        errors.push("dateTime", format!("Invalid date and time: {}", raw));
    }
    parsed
}

fn parse_recurrence(raw: &str, errors: &mut FieldErrors) -> Recurrence {
    raw.parse().unwrap_or_else(|e: Error| {
        errors.push("recurrence", e.to_string());
        Recurrence::None
    })
}

/// Blank means no end date.
fn optional_end_date(raw: &str, errors: &mut FieldErrors) -> Option<NaiveDateTime> {
    if raw.trim().is_empty() {
        return None;
    }
    let end = parse_end_date(raw);
    if end.is_none() {
        errors.push("recurrenceEndDate", "Invalid end date");
    }
    end
}

/// End dates may be a bare day (midnight) or a full timestamp.
fn parse_end_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
        .or_else(|| event::parse_timestamp(raw))
}

fn check_end_after_start(start: NaiveDateTime, end: NaiveDateTime, errors: &mut FieldErrors) {
    if end.date() < start.date() {
        errors.push("recurrenceEndDate", "End date must not be before the event date");
    }
}

fn serialize_timestamp<S: Serializer>(
    value: &NaiveDateTime,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(&value.format(TIMESTAMP_FORMAT))
}

fn serialize_opt_timestamp<S: Serializer>(
    value: &Option<NaiveDateTime>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_timestamp(v, s),
        None => s.serialize_none(),
    }
}
