//! Error types for the consent page
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for consent page operations
///
/// Every flow-level variant is terminal for the request that produced it:
/// handlers log the cause and render the error view, the server keeps running.
#[derive(Error, Debug)]
pub enum ConsentError {
    /// `/consent` was visited without `login_id` and/or `login_state`
    #[error("missing state and/or login id")]
    MissingLoginParameters,

    /// The client-credentials exchange against the token endpoint failed
    #[error("error getting access token: {0}")]
    TokenExchangeFailed(String),

    /// The pending scope grant request could not be fetched or parsed
    #[error("error getting scope grants: {0}")]
    ScopeGrantFetchFailed(String),

    /// Accepting or rejecting the scope grant request failed
    #[error("failed to submit consent decision: {0}")]
    DecisionSubmissionFailed(String),

    /// The scope grant request carried no `redirect_uri`
    #[error("scope grant request has no redirect uri")]
    RedirectUriMissing,

    /// No live consent session for this browser (never started, expired, or already decided)
    #[error("consent session not found or expired")]
    SessionNotFound,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ConsentError {
    /// Generic, browser-safe message for this error.
    ///
    /// Never includes upstream cause text; `to_string()` gives the full
    /// message that goes to the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingLoginParameters => "missing state and/or login id",
            Self::TokenExchangeFailed(_) => "error getting access token",
            Self::ScopeGrantFetchFailed(_) | Self::RedirectUriMissing => {
                "error getting scope grants"
            }
            Self::DecisionSubmissionFailed(_) => "failed to submit consent decision",
            Self::SessionNotFound => {
                "your consent session has expired, please restart the login"
            }
            _ => "internal server error",
        }
    }

    /// Returns `true` for errors caused by the authorization server rather than the browser.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::TokenExchangeFailed(_)
                | Self::ScopeGrantFetchFailed(_)
                | Self::DecisionSubmissionFailed(_)
                | Self::RedirectUriMissing
        )
    }
}

/// Result type for consent flow operations
pub type ConsentResult<T> = std::result::Result<T, ConsentError>;

/// Result type alias for process setup (config loading, CLI)
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
