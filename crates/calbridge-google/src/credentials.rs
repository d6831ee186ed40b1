//! OAuth client credential loading.
//!
//! Credentials come from the JSON downloaded from the Google Cloud Console
//! OAuth 2.0 page, either injected whole through the environment
//! (cloud deployments) or read from a `credentials.json` file in the
//! working directory (local dev).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::AuthConfig;
use crate::error::{BridgeError, BridgeResult};

/// OAuth 2.0 client credentials.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// The first registered redirect URI, used for the code exchange.
    pub redirect_uri: String,
}

/// Structure of Google's OAuth credentials JSON file.
///
/// The Console emits either an "installed" (desktop) or "web" section.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<CredentialsSection>,
    web: Option<CredentialsSection>,
}

#[derive(Debug, Deserialize)]
struct CredentialsSection {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientCredentials {
    /// Parses credentials from a Google credentials JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CredentialsMissing`] if the JSON does not
    /// parse or lacks the expected section / redirect URI.
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
            BridgeError::credentials_missing(format!("failed to parse credentials JSON: {e}"))
        })?;

        let section = file.installed.or(file.web).ok_or_else(|| {
            BridgeError::credentials_missing(
                "credentials JSON must contain an 'installed' or 'web' section",
            )
        })?;

        let redirect_uri = section.redirect_uris.into_iter().next().ok_or_else(|| {
            BridgeError::credentials_missing("credentials JSON has no redirect_uris")
        })?;

        Ok(Self {
            client_id: section.client_id,
            client_secret: section.client_secret,
            redirect_uri,
        })
    }

    /// Reads and parses credentials from a JSON file.
    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::credentials_missing(format!(
                "failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content)
    }
}

/// Loads client credentials from the environment snapshot or disk.
///
/// Env-injected JSON wins; otherwise the fixed-path file is read. Loading
/// happens once per authentication attempt, never mid-request.
#[derive(Debug)]
pub struct CredentialStore {
    credentials_json: Option<String>,
    credentials_path: PathBuf,
}

impl CredentialStore {
    /// Creates a store from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            credentials_json: config.credentials_json.clone(),
            credentials_path: config.credentials_path.clone(),
        }
    }

    /// Loads client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::CredentialsMissing`] when neither source
    /// yields credentials of the expected shape.
    pub fn load_client_credentials(&self) -> BridgeResult<ClientCredentials> {
        if let Some(ref json) = self.credentials_json {
            return ClientCredentials::from_json(json);
        }
        ClientCredentials::from_file(&self.credentials_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INSTALLED_JSON: &str = r#"{
        "installed": {
            "client_id": "test-id.apps.googleusercontent.com",
            "client_secret": "test-secret",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    #[test]
    fn parse_installed_section() {
        let creds = ClientCredentials::from_json(INSTALLED_JSON).unwrap();
        assert_eq!(creds.client_id, "test-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "test-secret");
        assert_eq!(creds.redirect_uri, "http://localhost");
    }

    #[test]
    fn parse_web_section() {
        let json = r#"{
            "web": {
                "client_id": "web-id.apps.googleusercontent.com",
                "client_secret": "web-secret",
                "redirect_uris": ["https://example.com/callback", "http://localhost"]
            }
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-id.apps.googleusercontent.com");
        assert_eq!(creds.redirect_uri, "https://example.com/callback");
    }

    #[test]
    fn reject_unknown_shape() {
        let result = ClientCredentials::from_json(r#"{"other": {}}"#);
        assert!(matches!(result, Err(BridgeError::CredentialsMissing(_))));
    }

    #[test]
    fn reject_missing_redirect_uris() {
        let json = r#"{
            "installed": {
                "client_id": "id",
                "client_secret": "secret"
            }
        }"#;

        let result = ClientCredentials::from_json(json);
        assert!(matches!(result, Err(BridgeError::CredentialsMissing(_))));
    }

    #[test]
    fn reject_malformed_json() {
        let result = ClientCredentials::from_json("not json");
        assert!(matches!(result, Err(BridgeError::CredentialsMissing(_))));
    }

    #[test]
    fn env_json_wins_over_file() {
        let config = AuthConfig::default()
            .with_credentials_json(INSTALLED_JSON)
            .with_credentials_path("/nonexistent/credentials.json");

        let store = CredentialStore::new(&config);
        let creds = store.load_client_credentials().unwrap();
        assert_eq!(creds.client_secret, "test-secret");
    }

    #[test]
    fn file_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INSTALLED_JSON.as_bytes()).unwrap();

        let config = AuthConfig::default().with_credentials_path(file.path());
        let store = CredentialStore::new(&config);
        let creds = store.load_client_credentials().unwrap();
        assert_eq!(creds.client_id, "test-id.apps.googleusercontent.com");
    }

    #[test]
    fn missing_file_is_credentials_missing() {
        let config = AuthConfig::default().with_credentials_path("/nonexistent/credentials.json");
        let store = CredentialStore::new(&config);
        assert!(matches!(
            store.load_client_credentials(),
            Err(BridgeError::CredentialsMissing(_))
        ));
    }
}
