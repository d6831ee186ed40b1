//! OpenAPI description of the REST surface.

use serde_json::{Value, json};

/// Builds the OpenAPI 3.0 document advertising the two routes.
///
/// Kept small on purpose: enough for an Actions-style importer, not a
/// full schema of every response body.
pub fn document(public_url: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": { "title": "Google Calendar Bridge", "version": "1.0.0" },
        "servers": [{ "url": public_url }],
        "paths": {
            "/calendars": {
                "get": {
                    "operationId": "listCalendars",
                    "summary": "List available calendars",
                    "responses": { "200": { "description": "OK" } }
                }
            },
            "/events": {
                "post": {
                    "operationId": "createEvent",
                    "summary": "Create a timed event",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "startISO": { "type": "string" },
                                        "endISO": { "type": "string" },
                                        "location": { "type": "string" },
                                        "description": { "type": "string" },
                                        "attendees": {
                                            "type": "array",
                                            "items": { "type": "string", "format": "email" }
                                        },
                                        "calendarId": { "type": "string", "default": "primary" }
                                    },
                                    "required": ["title", "startISO", "endISO"]
                                }
                            }
                        }
                    },
                    "responses": { "200": { "description": "OK" } }
                }
            }
        }
    })
}
