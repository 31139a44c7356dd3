//! HTTP client for the ACP token and scope-grant APIs.
//!
//! # Example
//!
//! ```rust,no_run
//! use consent_page::acp::{AcpClient, AuthorizationServer};
//! use consent_page::config::AuthorizationServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthorizationServerConfig {
//!     tenant_id: "demo".to_string(),
//!     issuer_url: "https://acp.example.com/demo/system".to_string(),
//!     client_id: "consent-client".to_string(),
//!     client_secret: "secret".to_string(),
//!     ..Default::default()
//! };
//! let client = AcpClient::new(&config)?;
//! let token = client.fetch_service_token().await?;
//! let request = client.fetch_scope_grant_request("L1", "S1", &token).await?;
//! println!("{} scopes requested", request.requested_scopes.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use tracing::{debug, info, warn};

use super::types::{
    AcceptScopeGrantRequest, BearerToken, Decision, DecisionResponse, RejectScopeGrantRequest,
    ScopeGrantRequest, ScopeGrantResponse, TokenResponse,
};
use super::AuthorizationServer;
use crate::config::{AuthorizationServerConfig, Credentials};
use crate::error::{ConsentError, ConsentResult};

/// Scope requested for the service token.
const MANAGE_SCOPE_GRANTS: &str = "manage_scope_grants";

/// ACP API client.
///
/// Holds a single `reqwest::Client` configured with the TLS trust policy and
/// timeout from [`AuthorizationServerConfig`], plus the credentials derived
/// from it at construction time.
#[derive(Debug, Clone)]
pub struct AcpClient {
    client: Client,
    credentials: Credentials,
}

impl AcpClient {
    /// Creates a new ACP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Config`] if the issuer URL cannot be turned
    /// into an origin, or [`ConsentError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(config: &AuthorizationServerConfig) -> ConsentResult<Self> {
        let credentials = Credentials::from_config(config)?;

        if config.insecure_skip_tls_verify {
            warn!(
                origin = %credentials.origin,
                "TLS certificate verification is disabled for the authorization server"
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("consent-page/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()?;

        info!(
            origin = %credentials.origin,
            tenant_id = %credentials.tenant_id,
            "Initialized ACP client"
        );

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Credentials and endpoints derived from configuration.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Turns a non-2xx response into a cause string: `"<status>: <body>"`.
async fn status_error(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        format!("authorization server returned {}", status)
    } else {
        format!("authorization server returned {}: {}", status, body)
    }
}

#[async_trait]
impl AuthorizationServer for AcpClient {
    async fn fetch_service_token(&self) -> ConsentResult<BearerToken> {
        let url = self.credentials.token_url();
        debug!(url = %url, "Requesting service token");

        let response = self
            .client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", self.credentials.basic_auth),
            )
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", MANAGE_SCOPE_GRANTS),
            ])
            .send()
            .await
            .map_err(|e| ConsentError::TokenExchangeFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ConsentError::TokenExchangeFailed(
                status_error(response).await,
            ));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            ConsentError::TokenExchangeFailed(format!("invalid token response: {}", e))
        })?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(BearerToken::new(token)),
            _ => Err(ConsentError::TokenExchangeFailed(
                "token response has no access_token".to_string(),
            )),
        }
    }

    async fn fetch_scope_grant_request(
        &self,
        login_id: &str,
        login_state: &str,
        token: &BearerToken,
    ) -> ConsentResult<ScopeGrantRequest> {
        let url = self.credentials.scope_grant_url(login_id);
        debug!(url = %url, "Fetching scope grant request");

        let response = self
            .client
            .get(&url)
            .query(&[("login_state", login_state)])
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| ConsentError::ScopeGrantFetchFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ConsentError::ScopeGrantFetchFailed(
                status_error(response).await,
            ));
        }

        let body: ScopeGrantResponse = response.json().await.map_err(|e| {
            ConsentError::ScopeGrantFetchFailed(format!("invalid scope grant response: {}", e))
        })?;

        let redirect_uri = body
            .request_query_params
            .redirect_uri
            .into_iter()
            .next()
            .filter(|uri| !uri.is_empty())
            .ok_or(ConsentError::RedirectUriMissing)?;

        Ok(ScopeGrantRequest {
            requested_scopes: body.requested_scopes.into_iter().map(Into::into).collect(),
            redirect_uri,
        })
    }

    async fn submit_decision(
        &self,
        decision: &Decision,
        login_id: &str,
        login_state: &str,
        token: &BearerToken,
    ) -> ConsentResult<String> {
        let url = format!(
            "{}/{}",
            self.credentials.scope_grant_url(login_id),
            decision.endpoint()
        );
        debug!(url = %url, "Submitting consent decision");

        let request = self.client.post(&url).bearer_auth(token.as_str());
        let request = match decision {
            Decision::Accept { granted_scopes } => request.json(&AcceptScopeGrantRequest {
                granted_scopes,
                id: login_id,
                login_state,
            }),
            Decision::Reject => request.json(&RejectScopeGrantRequest {
                id: login_id,
                login_state,
            }),
        };

        let response = request.send().await.map_err(|e| {
            ConsentError::DecisionSubmissionFailed(format!("request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(ConsentError::DecisionSubmissionFailed(
                status_error(response).await,
            ));
        }

        let body: DecisionResponse = response.json().await.map_err(|e| {
            ConsentError::DecisionSubmissionFailed(format!("invalid decision response: {}", e))
        })?;

        body.redirect_to
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| {
                ConsentError::DecisionSubmissionFailed(
                    "decision response has no redirect_to".to_string(),
                )
            })
    }
}
