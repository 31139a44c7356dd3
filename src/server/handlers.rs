//! Route handlers
//!
//! Every handler runs its flow step to completion and turns the outcome into
//! a response here: a rendered page, a `302 Found` redirect, or the error
//! page. Errors are logged once, at this boundary.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, warn};

use super::{cookies, views, AppState};
use crate::acp::Decision;
use crate::error::ConsentError;
use crate::flow::granted_scopes_from_form;

/// Query string ACP appends when redirecting to the consent page
#[derive(Debug, Deserialize)]
pub struct ConsentQuery {
    /// Login identifier
    pub login_id: Option<String>,
    /// Login correlation state
    pub login_state: Option<String>,
}

/// `GET /` and `GET /health`
pub async fn health() -> Html<&'static str> {
    Html(views::health_page())
}

/// `GET /consent?login_id=..&login_state=..`
pub async fn consent(State(state): State<AppState>, Query(query): Query<ConsentQuery>) -> Response {
    let outcome = state
        .flow
        .begin_consent(query.login_id.as_deref(), query.login_state.as_deref())
        .await;

    match outcome {
        Ok(view) => {
            let mut headers = HeaderMap::new();
            cookies::append_set_cookie(
                &mut headers,
                &cookies::session_cookie(
                    &view.session_id,
                    state.flow.sessions().ttl().as_secs(),
                    state.server.secure_cookies,
                ),
            );
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            (headers, Html(views::consent_page(&view.scopes))).into_response()
        }
        Err(e) => {
            if let Some(login_id) = query.login_id.as_deref() {
                error!(login_id = %login_id, error = %e, "Consent flow failed");
            } else {
                error!(error = %e, "Consent flow failed");
            }
            error_response(&state, &e)
        }
    }
}

/// `POST /accept`; the form's field names are the granted scopes.
pub async fn accept(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let decision = Decision::Accept {
        granted_scopes: granted_scopes_from_form(&body),
    };
    decide(&state, &headers, decision).await
}

/// `GET /reject`
pub async fn reject(State(state): State<AppState>, headers: HeaderMap) -> Response {
    decide(&state, &headers, Decision::Reject).await
}

async fn decide(state: &AppState, headers: &HeaderMap, decision: Decision) -> Response {
    let outcome = state
        .flow
        .submit_decision(cookies::session_id(headers), decision)
        .await
        .and_then(|redirect_to| {
            HeaderValue::from_str(&redirect_to).map_err(|_| {
                ConsentError::DecisionSubmissionFailed(format!(
                    "redirect_to is not a valid Location: {:?}",
                    redirect_to
                ))
            })
        });

    match outcome {
        Ok(location) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::LOCATION, location);
            cookies::append_set_cookie(
                &mut headers,
                &cookies::clear_session_cookie(state.server.secure_cookies),
            );
            (StatusCode::FOUND, headers).into_response()
        }
        Err(e) => {
            error!(error = %e, "Consent decision failed");
            error_response(state, &e)
        }
    }
}

/// Maps an error to its status code and renders the error page.
fn error_response(state: &AppState, e: &ConsentError) -> Response {
    let status = match e {
        ConsentError::MissingLoginParameters | ConsentError::SessionNotFound => {
            StatusCode::BAD_REQUEST
        }
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if state.server.expose_error_details {
        warn!("Exposing upstream error details to the browser");
        e.to_string()
    } else {
        e.public_message().to_string()
    };

    (status, Html(views::error_page(&message))).into_response()
}
