//! MCP stdio surface for the calendar bridge.
//!
//! Stdout carries the protocol; all logging in this process must go to
//! stderr or the framing breaks.

pub mod service;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use calbridge_google::CalendarGateway;

pub use service::{CalendarService, CreateEventParams};

/// Serves the MCP protocol over stdin/stdout until the client hangs up.
pub async fn serve_stdio(gateway: Arc<dyn CalendarGateway>) -> anyhow::Result<()> {
    info!("starting MCP server on stdio");

    let service = CalendarService::new(gateway).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
