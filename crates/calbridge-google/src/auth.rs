//! OAuth2 token lifecycle: the three credential-acquisition paths.
//!
//! [`Authenticator::get_auth`] tries, in order: an environment-injected
//! token, the on-disk token file, and finally an interactive
//! authorization-code exchange. The interactive path blocks on operator
//! input and is gated behind [`AuthConfig::interactive`], so a
//! request-serving process can never hang on a terminal read.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::credentials::{ClientCredentials, CredentialStore};
use crate::error::{BridgeError, BridgeResult};
use crate::tokens::{TokenSet, TokenSource, TokenStore};

/// Google OAuth endpoints.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The read/write calendar scope requested by the interactive flow.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the authenticator.
///
/// Built once at process start (see [`AuthConfig::from_env`]) and passed
/// in, so request paths never re-read the environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JSON client credentials injected through the environment.
    pub credentials_json: Option<String>,

    /// JSON token set injected through the environment.
    pub token_json: Option<String>,

    /// Path of the client credentials file.
    pub credentials_path: PathBuf,

    /// Path of the token file.
    pub token_path: PathBuf,

    /// Whether the interactive code-exchange fallback is allowed.
    ///
    /// False in cloud/CI deployments; the authenticator then fails closed
    /// instead of blocking on terminal input.
    pub interactive: bool,

    /// OAuth scopes requested by the interactive flow.
    pub scopes: Vec<String>,

    /// Token endpoint for the code exchange. Overridden by tests that
    /// run against a local stub.
    pub token_url: String,

    /// Request timeout for token-endpoint and calendar calls.
    pub timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_json: None,
            token_json: None,
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            interactive: true,
            scopes: vec![DEFAULT_SCOPE.to_string()],
            token_url: GOOGLE_TOKEN_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AuthConfig {
    /// Snapshots the process environment.
    ///
    /// Reads `CREDENTIALS_JSON` and `TOKEN_JSON`; the presence of `VERCEL`
    /// or `CI` marks the environment as non-interactive.
    pub fn from_env() -> Self {
        let non_interactive =
            std::env::var_os("VERCEL").is_some() || std::env::var_os("CI").is_some();

        Self {
            credentials_json: std::env::var("CREDENTIALS_JSON").ok(),
            token_json: std::env::var("TOKEN_JSON").ok(),
            interactive: !non_interactive,
            ..Default::default()
        }
    }

    /// Builder: set env-injected credentials JSON.
    pub fn with_credentials_json(mut self, json: impl Into<String>) -> Self {
        self.credentials_json = Some(json.into());
        self
    }

    /// Builder: set env-injected token JSON.
    pub fn with_token_json(mut self, json: impl Into<String>) -> Self {
        self.token_json = Some(json.into());
        self
    }

    /// Builder: set the credentials file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Builder: set the token file path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Builder: allow or forbid the interactive fallback.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Builder: set the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Builder: set the token endpoint URL.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Builder: set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Pluggable source of the authorization code in the interactive flow.
///
/// Implementations show the authorization URL to the operator and return
/// the code they paste back. Only reachable when
/// [`AuthConfig::interactive`] is true.
pub trait AuthCodePrompt: Send + Sync {
    /// Presents `auth_url` and blocks for a single line containing the code.
    fn obtain_code(&self, auth_url: &str) -> io::Result<String>;
}

/// Default prompt: prints the URL and reads the code from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl AuthCodePrompt for StdinPrompt {
    fn obtain_code(&self, auth_url: &str) -> io::Result<String> {
        println!("Authorize this app by visiting: {auth_url}");
        print!("Enter the code here: ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// A capability object bound to client credentials and a token set.
///
/// Can only be built through [`Authenticator::get_auth`], so holding one
/// proves a credential path succeeded. Re-derived per request; never
/// cached across requests.
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    credentials: ClientCredentials,
    token: TokenSet,
    source: TokenSource,
}

impl AuthorizedClient {
    fn new(credentials: ClientCredentials, token: TokenSet, source: TokenSource) -> Self {
        Self {
            credentials,
            token,
            source,
        }
    }

    /// The access token for provider calls.
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// The bound token set.
    pub fn token(&self) -> &TokenSet {
        &self.token
    }

    /// The bound client credentials.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Where the bound token came from.
    pub fn source(&self) -> TokenSource {
        self.source
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenExchangeResponse {
    fn into_token_set(self) -> TokenSet {
        let expiry_date = self
            .expires_in
            .map(|secs| chrono::Utc::now().timestamp_millis() + secs * 1000);

        TokenSet {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            scope: self.scope,
            token_type: self.token_type,
            expiry_date,
        }
    }
}

/// Produces [`AuthorizedClient`]s from the configured credential paths.
pub struct Authenticator {
    config: AuthConfig,
    credential_store: CredentialStore,
    token_store: TokenStore,
    http_client: reqwest::Client,
    prompt: Box<dyn AuthCodePrompt>,
}

impl Authenticator {
    /// Creates an authenticator with the default stdin prompt.
    pub fn new(config: AuthConfig) -> Self {
        Self::with_prompt(config, Box::new(StdinPrompt))
    }

    /// Creates an authenticator with a custom code prompt.
    pub fn with_prompt(config: AuthConfig, prompt: Box<dyn AuthCodePrompt>) -> Self {
        let credential_store = CredentialStore::new(&config);
        let token_store = TokenStore::new(&config);
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            config,
            credential_store,
            token_store,
            http_client,
            prompt,
        }
    }

    /// Produces an authorized client, first matching path wins:
    /// env token, disk token, interactive exchange.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::CredentialsMissing`] when no client credentials parse.
    /// - [`BridgeError::AuthFailed`] when no token is available and the
    ///   environment is non-interactive, or the exchange fails.
    /// - [`BridgeError::Unauthorized`] when the token endpoint reports
    ///   `invalid_grant` for the pasted code.
    pub async fn get_auth(&self) -> BridgeResult<AuthorizedClient> {
        let credentials = self.credential_store.load_client_credentials()?;

        if let Some((token, source)) = self.token_store.load_token()? {
            debug!(?source, "binding stored token");
            return Ok(AuthorizedClient::new(credentials, token, source));
        }

        if !self.config.interactive {
            return Err(BridgeError::auth_failed(
                "Missing TOKEN_JSON in environment; set TOKEN_JSON with OAuth tokens.",
            ));
        }

        let auth_url = self.build_auth_url(&credentials);
        let code = self.prompt.obtain_code(&auth_url).map_err(|e| {
            BridgeError::auth_failed(format!("failed to read authorization code: {e}"))
        })?;

        info!("received authorization code, exchanging for tokens");
        let token = self.exchange_code(&credentials, &code).await?;
        self.token_store.save_token(&token)?;

        Ok(AuthorizedClient::new(credentials, token, TokenSource::Fresh))
    }

    /// Builds the authorization URL for the interactive flow.
    fn build_auth_url(&self, credentials: &ClientCredentials) -> String {
        let scope = self.config.scopes.join(" ");

        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&credentials.client_id),
            urlencoding::encode(&credentials.redirect_uri),
            urlencoding::encode(&scope),
        )
    }

    /// Exchanges an authorization code for a token set.
    async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> BridgeResult<TokenSet> {
        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::network(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            if body.contains("invalid_grant") {
                return Err(BridgeError::unauthorized(format!(
                    "token exchange rejected ({status}): {body}"
                )));
            }
            return Err(BridgeError::auth_failed(format!(
                "token exchange failed ({status}): {body}"
            )));
        }

        let exchange: TokenExchangeResponse = serde_json::from_str(&body)
            .map_err(|e| BridgeError::invalid_response(format!("invalid token response: {e}")))?;

        info!("token exchange succeeded");
        Ok(exchange.into_token_set())
    }

    /// The token file path in use.
    pub fn token_path(&self) -> &std::path::Path {
        self.token_store.path()
    }
}
