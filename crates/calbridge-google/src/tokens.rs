//! OAuth token set storage.
//!
//! Tokens live in one of three places: the `TOKEN_JSON` environment
//! snapshot (cloud mode, read-only), a `token.json` file in the working
//! directory (local dev), or fresh from an interactive code exchange.
//! The on-disk format is the snake_case JSON written by Google's client
//! libraries, so existing `token.json` files keep working.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::AuthConfig;
use crate::error::{BridgeError, BridgeResult};

/// A set of OAuth tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// The access token for API requests.
    pub access_token: String,

    /// The refresh token, when the grant included offline access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Space-separated granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Token type, normally `"Bearer"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Expiry as milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

/// Where a token set was loaded from.
///
/// Env-sourced tokens are immutable for the process and must never be
/// written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Injected through the environment (cloud mode).
    Env,
    /// Read from the token file (local dev).
    Disk,
    /// Produced by an interactive code exchange this process.
    Fresh,
}

/// Token persistence with an env override and a file backend.
#[derive(Debug)]
pub struct TokenStore {
    token_json: Option<String>,
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            token_json: config.token_json.clone(),
            path: config.token_path.clone(),
        }
    }

    /// Loads a token set, preferring the environment snapshot.
    ///
    /// An absent or unparsable token file is a recoverable `Ok(None)`, not
    /// an error; a malformed environment token is an error since there is
    /// nothing to fall back to in cloud mode.
    pub fn load_token(&self) -> BridgeResult<Option<(TokenSet, TokenSource)>> {
        if let Some(ref json) = self.token_json {
            let token: TokenSet = serde_json::from_str(json).map_err(|e| {
                BridgeError::auth_failed(format!("failed to parse TOKEN_JSON: {e}"))
            })?;
            debug!("using token from environment");
            return Ok(Some((token, TokenSource::Env)));
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("no token file at {}: {e}", self.path.display());
                return Ok(None);
            }
        };

        match serde_json::from_str::<TokenSet>(&content) {
            Ok(token) => {
                debug!("loaded token from {}", self.path.display());
                Ok(Some((token, TokenSource::Disk)))
            }
            Err(e) => {
                debug!("unparsable token file at {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    /// Writes the token set to the token file, replacing any existing one.
    ///
    /// Only called after a successful interactive exchange. Writes go
    /// through a temp file and rename, with 0o600 permissions on unix.
    pub fn save_token(&self, token: &TokenSet) -> BridgeResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                BridgeError::auth_failed(format!("failed to create token directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(token)
            .map_err(|e| BridgeError::invalid_response(format!("failed to serialize token: {e}")))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, &content)
            .map_err(|e| BridgeError::auth_failed(format!("failed to write token file: {e}")))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| BridgeError::auth_failed(format!("failed to rename token file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }

        info!("saved token to {}", self.path.display());
        Ok(())
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file used for atomic writes: the token path with `.tmp`
    /// appended, leaving any existing extension intact.
    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}
