//! Core types shared by the HTTP and MCP surfaces.

pub mod event;
pub mod tracing;

pub use event::{
    CalendarSummary, DEFAULT_CALENDAR_ID, EventRequest, EventResult, ValidationError,
    is_valid_email,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
