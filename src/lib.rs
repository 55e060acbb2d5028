//! Month calendar view for Kids Sync events.
//!
//! Features:
//! - Month grid builder that places events on their calendar day
//! - Month navigation and date windows for querying an event source
//! - Validated create/update payloads for event forms
//! - Injectable session cache with a time-to-live
//! - Terminal rendering with an agenda of the month's events

pub mod args;
pub mod calendar;
pub mod error;
pub mod event;
pub mod formatter;
pub mod input;
pub mod session;
pub mod source;
pub mod types;
