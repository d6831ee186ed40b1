//! Event request/result types and input validation.
//!
//! The JSON wire names (`startISO`, `endISO`, `calendarId`, `htmlLink`) are
//! shared verbatim by the HTTP body and the MCP tool input, so both
//! transports decode into the same types and run the same validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar ID used when a request does not name one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Validation failures for incoming event requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One of the mandatory fields is missing or empty.
    #[error("title, startISO, endISO required")]
    MissingFields,

    /// An attendee entry is not a plausible email address.
    #[error("invalid attendee email: {email}")]
    InvalidAttendee {
        /// The offending attendee string.
        email: String,
    },
}

/// A request to create a calendar event.
///
/// Required fields default to empty strings on deserialization so that an
/// absent field is reported through [`EventRequest::validate`] with a stable
/// message rather than a decoder error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub title: String,

    /// ISO 8601 start time, e.g. `2025-10-21T14:00:00-04:00`.
    #[serde(rename = "startISO", default)]
    pub start_iso: String,

    /// ISO 8601 end time.
    #[serde(rename = "endISO", default)]
    pub end_iso: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Attendee email addresses.
    #[serde(default)]
    pub attendees: Vec<String>,

    /// Target calendar; defaults to `"primary"`.
    #[serde(rename = "calendarId", default = "default_calendar_id")]
    pub calendar_id: String,
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

impl EventRequest {
    /// Creates a request with the three mandatory fields set.
    pub fn new(
        title: impl Into<String>,
        start_iso: impl Into<String>,
        end_iso: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_iso: start_iso.into(),
            end_iso: end_iso.into(),
            location: None,
            description: None,
            attendees: Vec::new(),
            calendar_id: default_calendar_id(),
        }
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the attendee list.
    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }

    /// Builder: set the target calendar.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Checks that the mandatory fields are present and attendee addresses
    /// are syntactically plausible.
    ///
    /// Both transports call this before any provider work happens; the
    /// attendee check is applied uniformly on HTTP and MCP.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty()
            || self.start_iso.trim().is_empty()
            || self.end_iso.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        for attendee in &self.attendees {
            if !is_valid_email(attendee) {
                return Err(ValidationError::InvalidAttendee {
                    email: attendee.clone(),
                });
            }
        }

        Ok(())
    }
}

/// The subset of a created event that callers get back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    /// Provider-assigned event ID.
    pub id: String,
    /// Browser link to the event.
    pub html_link: String,
    /// Event status (e.g. `"confirmed"`).
    pub status: String,
}

/// A calendar from the user's calendar list.
///
/// An explicit boundary type: unexpected provider schema changes fail the
/// decode instead of silently passing arbitrary shapes through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    /// The calendar ID.
    pub id: String,
    /// The calendar name.
    pub summary: String,
    /// The calendar description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is the primary calendar.
    #[serde(default)]
    pub primary: bool,
    /// The calendar timezone (IANA identifier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Background color for UI display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Foreground color for UI display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
}

impl CalendarSummary {
    /// Creates a summary with the given ID and name.
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            primary: false,
            time_zone: None,
            background_color: None,
            foreground_color: None,
        }
    }

    /// Builder: mark as primary.
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}

/// Syntactic email check: single local part, a dot-containing domain,
/// no whitespace. Deliverability is the provider's problem.
pub fn is_valid_email(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
