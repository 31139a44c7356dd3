//! HTML views
//!
//! Templates are compiled into the binary with `include_str!` and filled by
//! placeholder replacement. Every interpolated value is escaped.

use crate::acp::RequestedScope;

const CONSENT_TEMPLATE: &str = include_str!("../../templates/consent.html");
const ERROR_TEMPLATE: &str = include_str!("../../templates/error.html");
const HEALTH_TEMPLATE: &str = include_str!("../../templates/health.html");

/// Consent form listing `scopes`, each checked by default.
///
/// The checkbox `name` is the scope identifier, which is what `/accept`
/// reads back as the granted scope.
pub fn consent_page(scopes: &[RequestedScope]) -> String {
    let items: String = scopes
        .iter()
        .map(|scope| {
            let name_attr = html_escape::encode_double_quoted_attribute(&scope.name);
            let name_text = html_escape::encode_text(&scope.name);
            let description = scope
                .description
                .as_deref()
                .map(|d| {
                    format!(
                        r#"<span class="description">{}</span>"#,
                        html_escape::encode_text(d)
                    )
                })
                .unwrap_or_default();
            format!(
                "        <li><label><input type=\"checkbox\" name=\"{}\" checked> <strong>{}</strong></label>{}</li>\n",
                name_attr, name_text, description
            )
        })
        .collect();

    CONSENT_TEMPLATE.replace("{{SCOPES}}", items.trim_end())
}

/// Error page with a human-readable message.
pub fn error_page(message: &str) -> String {
    ERROR_TEMPLATE.replace("{{MESSAGE}}", &html_escape::encode_text(message))
}

/// Liveness page.
pub fn health_page() -> &'static str {
    HEALTH_TEMPLATE
}
