//! Consent sessions
//!
//! A [`ConsentSession`] carries the login identifiers and everything fetched
//! for them between `/consent` and the user's decision. Sessions live in a
//! [`SessionStore`] keyed by a random id handed to the browser as a cookie,
//! so concurrent users never share state.
//!
//! Sessions expire after a fixed TTL and are single-use: [`SessionStore::take`]
//! removes the entry it returns.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::acp::{BearerToken, RequestedScope};
use crate::error::{ConsentError, ConsentResult};

/// State of one user's consent flow.
#[derive(Debug, Clone)]
pub struct ConsentSession {
    /// Login identifier issued by ACP
    pub login_id: String,
    /// Login correlation state issued by ACP
    pub login_state: String,
    /// Service token, set once the token exchange succeeds
    pub access_token: Option<BearerToken>,
    /// Scopes shown to the user
    pub requested_scopes: Option<Vec<RequestedScope>>,
    /// Client redirect URI from the original request (informational)
    pub redirect_uri: Option<String>,
    created_at: DateTime<Utc>,
}

impl ConsentSession {
    /// Starts a session for a login.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::MissingLoginParameters`] if either identifier
    /// is empty.
    pub fn new(login_id: impl Into<String>, login_state: impl Into<String>) -> ConsentResult<Self> {
        let login_id = login_id.into();
        let login_state = login_state.into();
        if login_id.is_empty() || login_state.is_empty() {
            return Err(ConsentError::MissingLoginParameters);
        }

        Ok(Self {
            login_id,
            login_state,
            access_token: None,
            requested_scopes: None,
            redirect_uri: None,
            created_at: Utc::now(),
        })
    }

    /// The service token for this session.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::TokenExchangeFailed`] if no token was obtained.
    pub fn access_token(&self) -> ConsentResult<&BearerToken> {
        self.access_token.as_ref().ok_or_else(|| {
            ConsentError::TokenExchangeFailed("session has no access token".to_string())
        })
    }

    /// When the session was started.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn is_expired(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// In-memory, TTL-bounded store of consent sessions.
///
/// Cloning is cheap; clones share the same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, ConsentSession>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Creates an empty store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or(Duration::MAX)
    }

    /// Stores a session under a fresh random id and returns the id.
    ///
    /// Expired entries are purged on every insert.
    pub async fn insert(&self, session: ConsentSession) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired consent sessions");
        }

        sessions.insert(id, session);
        id
    }

    /// Removes and returns a live session.
    ///
    /// Returns `None` if the id is unknown or the session has expired.
    pub async fn take(&self, id: &Uuid) -> Option<ConsentSession> {
        let session = self.sessions.write().await.remove(id)?;
        if session.is_expired(self.ttl, Utc::now()) {
            tracing::debug!(session_id = %id, "Consent session expired");
            return None;
        }
        Some(session)
    }

    /// Number of stored sessions, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` when no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
