//! Route definitions and handlers.

use std::sync::Arc;

use axum::extract::{Json, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use calbridge_core::{CalendarSummary, EventRequest, EventResult};
use calbridge_google::CalendarGateway;

use crate::config::HttpConfig;
use crate::error::ApiError;
use crate::openapi;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CalendarGateway>,
    pub config: Arc<HttpConfig>,
}

/// Builds the full router.
///
/// `/` and `/openapi.json` are open so the service can be discovered;
/// the calendar routes sit behind the API-key gate when a key is set.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/calendars", get(list_calendars))
        .route("/events", post(create_event))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(banner))
        .route("/openapi.json", get(openapi_document))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Rejects requests without the configured `x-api-key` header.
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = &state.config.api_key {
        let provided = request
            .headers()
            .get("x-api-key")
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected.as_str()) {
            warn!("rejected request with missing or invalid API key");
            return Err(ApiError::unauthorized());
        }
    }

    Ok(next.run(request).await)
}

/// Friendly root message for visits to the service root.
async fn banner() -> Json<Value> {
    Json(json!({
        "name": "calbridge",
        "message": "API is running. See /openapi.json, /calendars, /events",
    }))
}

async fn openapi_document(State(state): State<AppState>) -> Json<Value> {
    Json(openapi::document(&state.config.public_url))
}

async fn list_calendars(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalendarSummary>>, ApiError> {
    let calendars = state.gateway.list_calendars().await?;
    debug!(count = calendars.len(), "listed calendars");
    Ok(Json(calendars))
}

async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<EventResult>), ApiError> {
    // Reject malformed input before the gateway does any auth or
    // network work.
    request
        .validate()
        .map_err(calbridge_google::BridgeError::from)?;

    let result = state.gateway.create_event(request).await?;
    debug!(event_id = %result.id, "created event");
    Ok((StatusCode::OK, Json(result)))
}
