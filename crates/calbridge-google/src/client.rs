//! Google Calendar API client.
//!
//! A thin HTTP client for the two Calendar v3 endpoints the bridge uses.
//! Each method is a single round trip: no retries, no pagination, no
//! caching.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use calbridge_core::{CalendarSummary, EventRequest, EventResult};

use crate::error::{BridgeError, BridgeResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client bound to one access token.
#[derive(Debug)]
pub struct CalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    /// Creates a client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL. Used by tests against a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Lists the user's calendars.
    ///
    /// A response with no `items` is an empty list, not an error.
    pub async fn list_calendars(&self) -> BridgeResult<Vec<CalendarSummary>> {
        let url = format!("{}/users/me/calendarList", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = check_response(response).await?;

        let list: CalendarListResponse = serde_json::from_str(&body).map_err(|e| {
            BridgeError::invalid_response(format!("failed to parse calendar list: {e}"))
        })?;

        debug!("fetched {} calendars", list.items.len());
        Ok(list.items)
    }

    /// Inserts an event into the given calendar.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        request: &EventRequest,
    ) -> BridgeResult<EventResult> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let body = ApiEventBody::from_request(request);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let body = check_response(response).await?;

        let result: EventResult = serde_json::from_str(&body).map_err(|e| {
            BridgeError::invalid_response(format!("failed to parse inserted event: {e}"))
        })?;

        debug!(event_id = %result.id, "created event");
        Ok(result)
    }
}

/// Maps a reqwest transport failure to a bridge error.
fn map_send_error(err: reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        BridgeError::network("request timeout")
    } else if err.is_connect() {
        BridgeError::network(format!("connection failed: {err}"))
    } else {
        BridgeError::network(format!("request failed: {err}"))
    }
}

/// Checks status, classifies failures, and returns the body text.
///
/// A 401 or an `invalid_grant` body means the stored credential is no
/// longer accepted and the caller should re-run auth.
async fn check_response(response: reqwest::Response) -> BridgeResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| BridgeError::network(format!("failed to read response: {e}")))?;

    if status.is_success() {
        return Ok(body);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || body.contains("invalid_grant") {
        return Err(BridgeError::unauthorized(
            "access token expired or invalid",
        ));
    }

    Err(BridgeError::provider(status.as_u16(), body))
}

/// Request body for the events.insert endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventBody {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: ApiEventTime,
    end: ApiEventTime,
    attendees: Vec<ApiAttendee>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: String,
}

#[derive(Debug, Serialize)]
struct ApiAttendee {
    email: String,
}

impl ApiEventBody {
    fn from_request(request: &EventRequest) -> Self {
        Self {
            summary: request.title.clone(),
            location: request.location.clone(),
            description: request.description.clone(),
            start: ApiEventTime {
                date_time: request.start_iso.clone(),
            },
            end: ApiEventTime {
                date_time: request.end_iso.clone(),
            },
            attendees: request
                .attendees
                .iter()
                .map(|email| ApiAttendee {
                    email: email.clone(),
                })
                .collect(),
        }
    }
}

/// Response from the calendarList endpoint.
#[derive(Debug, serde::Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarSummary>,
}
