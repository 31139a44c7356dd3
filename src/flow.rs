//! Consent flow orchestration
//!
//! [`ConsentFlow`] drives the fixed sequence of authorization-server calls
//! behind the consent page:
//!
//! 1. [`ConsentFlow::begin_consent`] validates the login identifiers, obtains
//!    a service token, fetches the pending scope grant request, and stores
//!    the result in a new session.
//! 2. [`ConsentFlow::submit_decision`] takes that session and posts the
//!    accept or reject decision, returning the URI to redirect the browser to.
//!
//! Each step aborts on the first failure; nothing after a failed call runs.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::acp::{AuthorizationServer, Decision, RequestedScope};
use crate::error::{ConsentError, ConsentResult};
use crate::session::{ConsentSession, SessionStore};

/// What the consent page needs to render after a successful start.
#[derive(Debug, Clone)]
pub struct ConsentView {
    /// Session id to hand to the browser
    pub session_id: Uuid,
    /// Scopes to display, in the order ACP returned them
    pub scopes: Vec<RequestedScope>,
}

/// Orchestrates token exchange, scope grant retrieval and decision submission.
#[derive(Clone)]
pub struct ConsentFlow {
    acp: Arc<dyn AuthorizationServer>,
    sessions: SessionStore,
}

impl ConsentFlow {
    /// Creates a flow over an authorization server and a session store.
    pub fn new(acp: Arc<dyn AuthorizationServer>, sessions: SessionStore) -> Self {
        Self { acp, sessions }
    }

    /// The session store backing this flow.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Starts a consent flow for the login identifiers received from ACP.
    ///
    /// # Errors
    ///
    /// - [`ConsentError::MissingLoginParameters`] if either identifier is
    ///   absent or empty; no outbound call is made.
    /// - [`ConsentError::TokenExchangeFailed`]; the scope grant request is
    ///   not fetched.
    /// - [`ConsentError::ScopeGrantFetchFailed`] or
    ///   [`ConsentError::RedirectUriMissing`].
    pub async fn begin_consent(
        &self,
        login_id: Option<&str>,
        login_state: Option<&str>,
    ) -> ConsentResult<ConsentView> {
        let (Some(login_id), Some(login_state)) = (login_id, login_state) else {
            return Err(ConsentError::MissingLoginParameters);
        };
        let mut session = ConsentSession::new(login_id, login_state)?;

        let token = self.acp.fetch_service_token().await?;

        let request = self
            .acp
            .fetch_scope_grant_request(&session.login_id, &session.login_state, &token)
            .await?;

        info!(
            login_id = %session.login_id,
            scopes = request.requested_scopes.len(),
            "Fetched scope grant request"
        );

        let scopes = request.requested_scopes.clone();
        session.access_token = Some(token);
        session.requested_scopes = Some(request.requested_scopes);
        session.redirect_uri = Some(request.redirect_uri);

        let session_id = self.sessions.insert(session).await;
        Ok(ConsentView { session_id, scopes })
    }

    /// Submits the user's decision for a session and returns the redirect target.
    ///
    /// The session is consumed whether or not submission succeeds; a failed
    /// submission must be restarted from the ACP login.
    ///
    /// # Errors
    ///
    /// - [`ConsentError::SessionNotFound`] if `session_id` is absent,
    ///   unknown, expired, or already used.
    /// - [`ConsentError::DecisionSubmissionFailed`].
    pub async fn submit_decision(
        &self,
        session_id: Option<Uuid>,
        decision: Decision,
    ) -> ConsentResult<String> {
        let session_id = session_id.ok_or(ConsentError::SessionNotFound)?;
        let session = self
            .sessions
            .take(&session_id)
            .await
            .ok_or(ConsentError::SessionNotFound)?;
        let token = session.access_token()?;

        let redirect_to = self
            .acp
            .submit_decision(&decision, &session.login_id, &session.login_state, token)
            .await?;

        info!(
            login_id = %session.login_id,
            decision = decision.endpoint(),
            "Submitted consent decision"
        );

        Ok(redirect_to)
    }
}

/// Extracts granted scopes from an `application/x-www-form-urlencoded` body.
///
/// Every field *name* is a granted scope; values are ignored. Order of first
/// occurrence is kept and duplicates dropped. An empty body grants nothing.
pub fn granted_scopes_from_form(body: &[u8]) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for (name, _) in url::form_urlencoded::parse(body) {
        if !name.is_empty() && !scopes.iter().any(|s| s == name.as_ref()) {
            scopes.push(name.into_owned());
        }
    }
    scopes
}
