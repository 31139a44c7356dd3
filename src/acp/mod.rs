//! Cloudentity ACP API access
//!
//! The consent flow talks to the authorization server through the
//! [`AuthorizationServer`] trait. [`AcpClient`] is the HTTP implementation;
//! tests substitute a mock.
//!
//! # Calls, in flow order
//!
//! 1. [`AuthorizationServer::fetch_service_token`] - client-credentials grant
//!    for the `manage_scope_grants` scope.
//! 2. [`AuthorizationServer::fetch_scope_grant_request`] - the pending
//!    request: requested scopes and the client's redirect URI.
//! 3. [`AuthorizationServer::submit_decision`] - accept or reject; returns
//!    the URI the browser must be sent to.
//!
//! # References
//!
//! - <https://developer.cloudentity.com/howtos/auth_settings/enabling_custom_consent_pages/>
//! - <https://developer.cloudentity.com/api/authorization_apis/system/#tag/logins>

use async_trait::async_trait;

use crate::error::ConsentResult;

pub mod client;
pub mod types;

pub use client::AcpClient;
pub use types::{BearerToken, Decision, RequestedScope, ScopeGrantRequest};

/// Scope-grant management operations of the authorization server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationServer: Send + Sync {
    /// Exchanges the configured client credentials for a service token.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::TokenExchangeFailed`](crate::error::ConsentError::TokenExchangeFailed)
    /// on transport errors, non-2xx responses, or a response without `access_token`.
    async fn fetch_service_token(&self) -> ConsentResult<BearerToken>;

    /// Retrieves the pending scope grant request for a login.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::ScopeGrantFetchFailed`](crate::error::ConsentError::ScopeGrantFetchFailed)
    /// on transport errors, non-2xx responses, or a malformed body, and
    /// [`ConsentError::RedirectUriMissing`](crate::error::ConsentError::RedirectUriMissing)
    /// when `request_query_params.redirect_uri` is empty.
    async fn fetch_scope_grant_request(
        &self,
        login_id: &str,
        login_state: &str,
        token: &BearerToken,
    ) -> ConsentResult<ScopeGrantRequest>;

    /// Accepts or rejects the scope grant request and returns `redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::DecisionSubmissionFailed`](crate::error::ConsentError::DecisionSubmissionFailed)
    /// on transport errors, non-2xx responses, or a response without `redirect_to`.
    async fn submit_decision(
        &self,
        decision: &Decision,
        login_id: &str,
        login_state: &str,
        token: &BearerToken,
    ) -> ConsentResult<String>;
}
