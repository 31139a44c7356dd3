use std::fs;
use std::path::PathBuf;

use consent_page::config::{AuthorizationServerConfig, Config, ServerConfig};
use tempfile::TempDir;

/// Valid configuration whose authorization server is `issuer_url`.
#[allow(dead_code)]
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
            timeout_seconds: 5,
            ..Default::default()
        },
    }
}

/// `Basic base64("test-client:test-secret")`
#[allow(dead_code)]
pub const TEST_BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ=";

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
