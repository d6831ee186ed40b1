//! MCP tool service over the calendar gateway.

use std::sync::Arc;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use calbridge_core::{DEFAULT_CALENDAR_ID, EventRequest};
use calbridge_google::{BridgeError, CalendarGateway};

/// Input for the `create_event` tool. The field names match the HTTP
/// body so both transports take the same JSON shape.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEventParams {
    /// Event title.
    pub title: String,

    /// ISO 8601, e.g. 2025-10-21T14:00:00-04:00
    #[serde(rename = "startISO")]
    pub start_iso: String,

    /// ISO 8601 end time.
    #[serde(rename = "endISO")]
    pub end_iso: String,

    /// Optional location.
    #[serde(default)]
    pub location: Option<String>,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Attendee email addresses.
    #[serde(default)]
    pub attendees: Vec<String>,

    /// Target calendar; defaults to "primary".
    #[serde(rename = "calendarId", default)]
    pub calendar_id: Option<String>,
}

impl From<CreateEventParams> for EventRequest {
    fn from(params: CreateEventParams) -> Self {
        EventRequest {
            title: params.title,
            start_iso: params.start_iso,
            end_iso: params.end_iso,
            location: params.location,
            description: params.description,
            attendees: params.attendees,
            calendar_id: params
                .calendar_id
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
        }
    }
}

/// The MCP-facing service: two tools over the shared gateway.
#[derive(Clone)]
pub struct CalendarService {
    gateway: Arc<dyn CalendarGateway>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CalendarService {
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "list_calendars", description = "List available calendars")]
    pub async fn list_calendars(&self) -> Result<CallToolResult, ErrorData> {
        let calendars = self
            .gateway
            .list_calendars()
            .await
            .map_err(to_mcp_error)?;

        debug!(count = calendars.len(), "listed calendars");
        let text = serde_json::to_string_pretty(&calendars)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(name = "create_event", description = "Create a Google Calendar event")]
    pub async fn create_event(
        &self,
        Parameters(params): Parameters<CreateEventParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = EventRequest::from(params);
        // Same validation as the HTTP surface, before any gateway work.
        request
            .validate()
            .map_err(|e| ErrorData::invalid_params(e.to_string(), None))?;

        let result = self
            .gateway
            .create_event(request)
            .await
            .map_err(to_mcp_error)?;

        debug!(event_id = %result.id, "created event");
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for CalendarService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calbridge".into(),
                title: Some("Google Calendar Bridge".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Create Google Calendar events and list the user's calendars. \
                 Run `calbridge auth` first if tool calls report an authorization error."
                    .into(),
            ),
        }
    }
}

/// Maps bridge failures onto MCP error codes.
///
/// Validation problems are the caller's fault (invalid params); a
/// rejected token tells the caller to re-run auth; everything else is
/// an internal error.
fn to_mcp_error(err: BridgeError) -> ErrorData {
    match &err {
        BridgeError::Validation(validation) => {
            ErrorData::invalid_params(validation.to_string(), None)
        }
        BridgeError::Unauthorized(_) => {
            ErrorData::invalid_request("Unauthorized - re-run auth", None)
        }
        _ => ErrorData::internal_error(err.to_string(), None),
    }
}
