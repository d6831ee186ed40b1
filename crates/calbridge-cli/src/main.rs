//! calbridge CLI entry point.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::Level;

use calbridge_core::{TracingConfig, init_tracing};
use calbridge_google::{AuthConfig, Authenticator, GoogleGateway, TokenSource};
use calbridge_http::HttpConfig;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // JSON logs for the long-running HTTP server, compact otherwise.
    // Everything goes to stderr so MCP stdout stays clean.
    let tracing_config = match cli.command {
        Command::Http { .. } => TracingConfig::server(),
        _ => TracingConfig::default(),
    };
    let tracing_config = if cli.debug {
        tracing_config.with_level(Level::DEBUG)
    } else {
        tracing_config
    };

    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Http { port } => {
            let auth_config = AuthConfig::from_env();
            let mut http_config = HttpConfig::from_env();
            if let Some(port) = port {
                http_config = http_config.with_port(port);
            }

            let gateway = Arc::new(GoogleGateway::new(auth_config));
            calbridge_http::serve(http_config, gateway).await?;
            Ok(())
        }
        Command::Mcp => {
            let gateway = Arc::new(GoogleGateway::new(mcp_auth_config()));
            calbridge_mcp::serve_stdio(gateway).await
        }
        Command::Auth { force } => authorize(force).await,
    }
}

/// Auth configuration for MCP serving.
///
/// Stdin and stdout belong to the stdio transport here, so the
/// interactive prompt is disabled regardless of the environment;
/// missing tokens fail closed and `calbridge auth` is the fix.
fn mcp_auth_config() -> AuthConfig {
    AuthConfig::from_env().with_interactive(false)
}

/// Runs the interactive OAuth flow and reports where the token came from.
async fn authorize(force: bool) -> anyhow::Result<()> {
    let config = AuthConfig::from_env().with_interactive(true);
    let authenticator = Authenticator::new(config);

    if force {
        let path = authenticator.token_path();
        match std::fs::remove_file(path) {
            Ok(()) => println!("Removed stored token at {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    let auth = authenticator.get_auth().await?;

    match auth.source() {
        TokenSource::Fresh => {
            println!(
                "Authorization complete. Token saved to {}",
                authenticator.token_path().display()
            );
        }
        TokenSource::Disk => {
            println!(
                "Already authorized (token at {}). Use --force to re-authorize.",
                authenticator.token_path().display()
            );
        }
        TokenSource::Env => {
            println!("Already authorized via TOKEN_JSON in the environment.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calbridge_google::{AuthCodePrompt, Authenticator, BridgeError};

    const CREDENTIALS_JSON: &str = r#"{
        "installed": {
            "client_id": "test-id.apps.googleusercontent.com",
            "client_secret": "test-secret",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    struct RefusingPrompt;

    impl AuthCodePrompt for RefusingPrompt {
        fn obtain_code(&self, _auth_url: &str) -> std::io::Result<String> {
            Err(std::io::Error::other("prompt must not be reached"))
        }
    }

    #[test]
    fn mcp_mode_is_never_interactive() {
        assert!(!mcp_auth_config().interactive);
    }

    #[tokio::test]
    async fn mcp_mode_fails_closed_without_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = mcp_auth_config();
        config.credentials_json = Some(CREDENTIALS_JSON.to_string());
        config.token_json = None;
        config.token_path = dir.path().join("token.json");

        let authenticator = Authenticator::with_prompt(config, Box::new(RefusingPrompt));
        let err = authenticator.get_auth().await.unwrap_err();

        // Fail-closed message, not a prompt-read failure.
        match err {
            BridgeError::AuthFailed(message) => assert_eq!(
                message,
                "Missing TOKEN_JSON in environment; set TOKEN_JSON with OAuth tokens."
            ),
            other => panic!("expected AuthFailed, got {other:?}"),
        }
    }
}
