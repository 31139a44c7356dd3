//! Consent page - custom consent intermediary for Cloudentity ACP
//!
//! When a client application asks for scopes the user has not granted yet,
//! ACP redirects the browser here with a `login_id` and `login_state`. This
//! library fetches the pending scope grant request with a service token,
//! renders the requested scopes, and submits the user's accept or reject
//! decision back to ACP before redirecting the browser where ACP says.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `acp`: ACP API seam (`AuthorizationServer`) and its HTTP client
//! - `flow`: Consent flow orchestration and the scope extraction rule
//! - `session`: Per-user consent sessions with TTL expiry
//! - `server`: axum router, handlers, cookies and HTML views
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use consent_page::{cli::Cli, server, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Cli::default())?;
//!     config.validate()?;
//!     server::serve(config).await
//! }
//! ```

pub mod acp;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use acp::{AcpClient, AuthorizationServer, Decision};
pub use config::Config;
pub use error::{ConsentError, ConsentResult, Result};
pub use flow::ConsentFlow;

#[cfg(test)]
pub mod test_utils;
