//! HTTP server configuration.

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8787;

/// HTTP server configuration, snapshotted once at process start.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Listening port.
    pub port: u16,

    /// Shared secret required in the `x-api-key` header when set.
    pub api_key: Option<String>,

    /// Advertised server URL in the OpenAPI document.
    pub public_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            public_url: format!("http://localhost:{DEFAULT_PORT}"),
        }
    }
}

impl HttpConfig {
    /// Snapshots `PORT`, `API_KEY`, and `PUBLIC_URL` from the environment.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let public_url = std::env::var("PUBLIC_URL")
            .ok()
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Self {
            port,
            api_key: std::env::var("API_KEY").ok(),
            public_url,
        }
    }

    /// Builder: set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: set the shared API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder: set the advertised public URL.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into();
        self
    }
}
