//! Test utilities for the consent page

use crate::config::{AuthorizationServerConfig, Config, ServerConfig};

/// Valid configuration pointing at `issuer_url`
///
/// Cookies are not marked `Secure` so plain-HTTP test servers work.
pub fn test_config(issuer_url: &str) -> Config {
    Config {
        server: ServerConfig {
            secure_cookies: false,
            ..Default::default()
        },
        authorization_server: AuthorizationServerConfig {
            tenant_id: "test-tenant".to_string(),
            issuer_url: issuer_url.to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            ..Default::default()
        },
    }
}
