//! Command-line interface definition for the consent page
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for serving the consent page and checking configuration.

use clap::{Parser, Subcommand};

/// Custom consent page for Cloudentity ACP
///
/// Receives the consent redirect from the authorization server, shows the
/// requested scopes, and submits the user's decision back.
#[derive(Parser, Debug, Clone)]
#[command(name = "consent-page")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CONSENT_PAGE_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the consent page HTTP server
    Serve {
        /// Override the listen address from config (e.g. 0.0.0.0:4001)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Load and validate configuration, then print the derived endpoints
    CheckConfig,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            verbose: false,
            json_logs: false,
            command: Commands::Serve { bind: None },
        }
    }
}
