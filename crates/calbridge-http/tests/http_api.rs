//! End-to-end router tests against a stub gateway.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use calbridge_core::{CalendarSummary, EventRequest, EventResult};
use calbridge_google::{BoxFuture, BridgeError, BridgeResult, CalendarGateway};
use calbridge_http::routes::{AppState, router};
use calbridge_http::HttpConfig;

/// What the stub returns for every call.
#[derive(Clone, Copy)]
enum StubBehavior {
    Succeed,
    Unauthorized,
}

/// Gateway stub that counts calls and records the last create request.
struct StubGateway {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<EventRequest>>,
}

impl StubGateway {
    fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CalendarGateway for StubGateway {
    fn list_calendars(&self) -> BoxFuture<'_, BridgeResult<Vec<CalendarSummary>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior;
        Box::pin(async move {
            match behavior {
                StubBehavior::Succeed => Ok(Vec::new()),
                StubBehavior::Unauthorized => {
                    Err(BridgeError::unauthorized("access token expired or invalid"))
                }
            }
        })
    }

    fn create_event(&self, request: EventRequest) -> BoxFuture<'_, BridgeResult<EventResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior;
        *self.last_request.lock().unwrap() = Some(request);
        Box::pin(async move {
            match behavior {
                StubBehavior::Succeed => Ok(EventResult {
                    id: "evt-1".to_string(),
                    html_link: "https://calendar.google.com/event?eid=evt-1".to_string(),
                    status: "confirmed".to_string(),
                }),
                StubBehavior::Unauthorized => {
                    Err(BridgeError::unauthorized("access token expired or invalid"))
                }
            }
        })
    }
}

fn app(gateway: Arc<StubGateway>, config: HttpConfig) -> axum::Router {
    router(AppState {
        gateway,
        config: Arc::new(config),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_events(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn missing_fields_rejected_before_gateway() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway.clone(), HttpConfig::default());

    let response = app
        .oneshot(post_events(json!({ "title": "Standup" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "title, startISO, endISO required");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn invalid_attendee_rejected_before_gateway() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway.clone(), HttpConfig::default());

    let response = app
        .oneshot(post_events(json!({
            "title": "Standup",
            "startISO": "2025-10-20T18:00:00-04:00",
            "endISO": "2025-10-20T18:30:00-04:00",
            "attendees": ["not-an-email"],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid attendee email: not-an-email");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn api_key_gate_rejects_before_gateway() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(
        gateway.clone(),
        HttpConfig::default().with_api_key("secret"),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/calendars")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn api_key_gate_accepts_matching_key() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(
        gateway.clone(),
        HttpConfig::default().with_api_key("secret"),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/calendars")
                .header("x-api-key", "secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn openapi_reachable_without_key() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(
        gateway,
        HttpConfig::default()
            .with_api_key("secret")
            .with_public_url("https://bridge.example.com"),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Google Calendar Bridge");
    assert_eq!(body["servers"][0]["url"], "https://bridge.example.com");
}

#[tokio::test]
async fn banner_reachable_without_key() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway, HttpConfig::default().with_api_key("secret"));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "calbridge");
}

#[tokio::test]
async fn expired_token_maps_to_rerun_auth() {
    let gateway = StubGateway::new(StubBehavior::Unauthorized);
    let app = app(gateway, HttpConfig::default());

    let response = app
        .oneshot(post_events(json!({
            "title": "Standup",
            "startISO": "2025-10-20T18:00:00-04:00",
            "endISO": "2025-10-20T18:30:00-04:00",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized - re-run auth");
}

#[tokio::test]
async fn create_event_round_trip() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway.clone(), HttpConfig::default());

    let response = app
        .oneshot(post_events(json!({
            "title": "Planning",
            "startISO": "2025-10-20T18:00:00-04:00",
            "endISO": "2025-10-20T18:30:00-04:00",
            "location": "HQ",
            "attendees": ["a@example.com"],
            "calendarId": "work@example.com",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "evt-1");
    assert_eq!(body["htmlLink"], "https://calendar.google.com/event?eid=evt-1");
    assert_eq!(body["status"], "confirmed");

    let seen = gateway.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(seen.title, "Planning");
    assert_eq!(seen.start_iso, "2025-10-20T18:00:00-04:00");
    assert_eq!(seen.calendar_id, "work@example.com");
    assert_eq!(seen.attendees, vec!["a@example.com".to_string()]);
}

#[tokio::test]
async fn calendar_id_defaults_to_primary() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway.clone(), HttpConfig::default());

    let response = app
        .oneshot(post_events(json!({
            "title": "Planning",
            "startISO": "2025-10-20T18:00:00-04:00",
            "endISO": "2025-10-20T18:30:00-04:00",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let seen = gateway.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(seen.calendar_id, "primary");
}

#[tokio::test]
async fn empty_calendar_list_is_empty_array() {
    let gateway = StubGateway::new(StubBehavior::Succeed);
    let app = app(gateway, HttpConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/calendars")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}
