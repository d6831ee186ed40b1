//! Google Calendar access for the bridge.
//!
//! This crate owns everything between the transports and Google:
//!
//! - [`CredentialStore`] / [`TokenStore`] - OAuth client credentials and
//!   token sets from environment snapshots or fixed-path files
//! - [`Authenticator`] - the token lifecycle: env token, disk token, or
//!   interactive authorization-code exchange, in that order
//! - [`CalendarClient`] - the two Calendar v3 calls (list calendars,
//!   insert event)
//! - [`CalendarGateway`] - the trait the HTTP and MCP surfaces call
//!
//! # Authentication flow
//!
//! 1. Client credentials load from `CREDENTIALS_JSON` or `credentials.json`
//! 2. A `TOKEN_JSON` token binds directly (cloud mode, never persisted)
//! 3. Otherwise `token.json` is tried (local dev)
//! 4. Non-interactive environments fail closed at this point
//! 5. Interactive mode prints an authorization URL, reads the pasted
//!    code, exchanges it, and persists the fresh token

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod tokens;

pub use auth::{
    AuthCodePrompt, AuthConfig, AuthorizedClient, Authenticator, DEFAULT_SCOPE, StdinPrompt,
};
pub use client::CalendarClient;
pub use credentials::{ClientCredentials, CredentialStore};
pub use error::{BridgeError, BridgeResult};
pub use gateway::{BoxFuture, CalendarGateway, GoogleGateway};
pub use tokens::{TokenSet, TokenSource, TokenStore};
