//! Request and response bodies exchanged with the ACP APIs
//!
//! Fields the client validates itself are `#[serde(default)]`; a missing
//! value surfaces as the matching flow error, not a parse failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bearer token for the ACP system (management) APIs.
///
/// `Debug` never prints the token value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw access token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Token endpoint response; only the access token is used.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// One entry of `requested_scopes`.
///
/// ACP returns either bare scope names or scope objects depending on the
/// API version; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ScopeEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        display_name: Option<String>,
    },
}

impl From<ScopeEntry> for RequestedScope {
    fn from(entry: ScopeEntry) -> Self {
        match entry {
            ScopeEntry::Name(name) => Self {
                name,
                description: None,
            },
            ScopeEntry::Detailed {
                name,
                description,
                display_name,
            } => Self {
                name,
                description: description
                    .filter(|d| !d.is_empty())
                    .or(display_name.filter(|d| !d.is_empty())),
            },
        }
    }
}

/// Query parameters of the original authorization request, as echoed by ACP.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RequestQueryParams {
    #[serde(default)]
    pub redirect_uri: Vec<String>,
}

/// Scope grant request response.
#[derive(Debug, Deserialize)]
pub(crate) struct ScopeGrantResponse {
    pub requested_scopes: Vec<ScopeEntry>,
    pub request_query_params: RequestQueryParams,
}

/// Body of `POST .../scope-grants/{login}/accept`.
///
/// Field order is the wire order.
#[derive(Debug, Serialize)]
pub(crate) struct AcceptScopeGrantRequest<'a> {
    pub granted_scopes: &'a [String],
    pub id: &'a str,
    pub login_state: &'a str,
}

/// Body of `POST .../scope-grants/{login}/reject`.
#[derive(Debug, Serialize)]
pub(crate) struct RejectScopeGrantRequest<'a> {
    pub id: &'a str,
    pub login_state: &'a str,
}

/// Accept/reject response; carries where to send the browser next.
#[derive(Debug, Deserialize)]
pub(crate) struct DecisionResponse {
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// A scope the user is asked to grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestedScope {
    /// Scope identifier; also the form field name on the consent page
    pub name: String,
    /// Human-readable description, when ACP provides one
    pub description: Option<String>,
}

impl RequestedScope {
    /// A scope with no description.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// The pending scope grant request for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeGrantRequest {
    /// Requested scopes, in the order ACP listed them
    pub requested_scopes: Vec<RequestedScope>,
    /// First `redirect_uri` of the original authorization request
    pub redirect_uri: String,
}

/// The user's answer to the consent page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Grant exactly these scopes (possibly none)
    Accept {
        /// Scopes the user left checked
        granted_scopes: Vec<String>,
    },
    /// Deny the request
    Reject,
}

impl Decision {
    /// Trailing path segment of the decision endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "accept",
            Self::Reject => "reject",
        }
    }
}
