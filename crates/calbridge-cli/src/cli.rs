//! Command-line interface definition.

use clap::{Parser, Subcommand};

/// calbridge - Google Calendar over HTTP and MCP
#[derive(Debug, Parser)]
#[command(name = "calbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP REST bridge
    Http {
        /// Listening port (overrides the PORT environment variable)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the MCP server on stdin/stdout
    Mcp,

    /// Run the interactive OAuth flow and store a token
    Auth {
        /// Discard any stored token and authorize from scratch
        #[arg(long)]
        force: bool,
    },
}
