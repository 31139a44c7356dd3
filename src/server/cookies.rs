//! Session cookie helpers
//!
//! The consent session id travels as an `HttpOnly`, `SameSite=Lax` cookie.
//! `Lax` is required: `/accept` is a same-site form post, but the browser
//! reaches `/consent` through a cross-site redirect from ACP.

use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

/// Cookie carrying the consent session id
pub const SESSION_COOKIE: &str = "consent_session";

/// Builds the `Set-Cookie` value that stores a session id.
pub fn session_cookie(session_id: &Uuid, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Appends a `Set-Cookie` header; invalid values are dropped.
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Extracts a cookie value from request headers.
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim().to_owned())
        })
}

/// Reads and parses the session id cookie.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    get_cookie_value(headers, SESSION_COOKIE).and_then(|v| Uuid::parse_str(&v).ok())
}
