//! CalendarGateway trait and the Google-backed implementation.
//!
//! The trait is the seam between the transports and the provider: HTTP
//! and MCP handlers call it, tests substitute stubs for it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use calbridge_core::{CalendarSummary, EventRequest, EventResult};

use crate::auth::{AuthConfig, Authenticator};
use crate::client::CalendarClient;
use crate::error::BridgeResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so transports can hold an
/// `Arc<dyn CalendarGateway>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The two calendar operations the bridge exposes.
pub trait CalendarGateway: Send + Sync {
    /// Lists the user's calendars. No items is an empty list, not an error.
    fn list_calendars(&self) -> BoxFuture<'_, BridgeResult<Vec<CalendarSummary>>>;

    /// Validates and creates an event, returning the provider's summary of it.
    fn create_event(&self, request: EventRequest) -> BoxFuture<'_, BridgeResult<EventResult>>;
}

/// Gateway backed by the Google Calendar API.
///
/// Each call re-derives its authorized client from durable storage, so
/// there is no shared mutable client state across concurrent requests.
pub struct GoogleGateway {
    authenticator: Authenticator,
    timeout: Duration,
}

impl GoogleGateway {
    /// Creates a gateway from the auth configuration.
    pub fn new(config: AuthConfig) -> Self {
        let timeout = config.timeout;
        Self {
            authenticator: Authenticator::new(config),
            timeout,
        }
    }

    /// Creates a gateway around an existing authenticator.
    pub fn with_authenticator(authenticator: Authenticator, timeout: Duration) -> Self {
        Self {
            authenticator,
            timeout,
        }
    }
}

impl CalendarGateway for GoogleGateway {
    fn list_calendars(&self) -> BoxFuture<'_, BridgeResult<Vec<CalendarSummary>>> {
        Box::pin(async move {
            let auth = self.authenticator.get_auth().await?;
            let client = CalendarClient::new(auth.access_token(), self.timeout);
            client.list_calendars().await
        })
    }

    fn create_event(&self, request: EventRequest) -> BoxFuture<'_, BridgeResult<EventResult>> {
        Box::pin(async move {
            // Validation comes before auth and any network work.
            request.validate()?;

            let auth = self.authenticator.get_auth().await?;
            let client = CalendarClient::new(auth.access_token(), self.timeout);
            client.insert_event(&request.calendar_id, &request).await
        })
    }
}
