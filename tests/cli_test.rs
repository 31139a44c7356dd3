//! CLI integration tests for `consent-page check-config`

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::temp_config_file;

const ENV_OVERRIDES: &[&str] = &[
    "TENANT_ID",
    "AUTHORIZATION_SERVER_URL",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "CONSENT_PAGE_CONFIG",
    "CONSENT_PAGE_BIND_ADDRESS",
    "CONSENT_PAGE_SESSION_TTL_SECONDS",
    "CONSENT_PAGE_INSECURE_SKIP_TLS_VERIFY",
    "CONSENT_PAGE_TIMEOUT_SECONDS",
    "CONSENT_PAGE_SECURE_COOKIES",
    "CONSENT_PAGE_EXPOSE_ERROR_DETAILS",
];

fn consent_page() -> Command {
    let mut cmd = Command::cargo_bin("consent-page").expect("binary must be built");
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

const VALID_CONFIG: &str = r#"
server:
  bind_address: "127.0.0.1:4001"
authorization_server:
  tenant_id: "acme"
  issuer_url: "https://acp.example.com:8443/acme/system"
  client_id: "consent-page"
  client_secret: "s3cret"
"#;

#[test]
fn test_check_config_prints_derived_endpoints() {
    let (_dir, path) = temp_config_file(VALID_CONFIG);

    consent_page()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://acp.example.com:8443"))
        .stdout(predicate::str::contains(
            "https://acp.example.com:8443/acme/system/oauth2/token",
        ))
        .stdout(predicate::str::contains("127.0.0.1:4001"))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn test_check_config_env_overrides_file() {
    let (_dir, path) = temp_config_file(VALID_CONFIG);

    consent_page()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .env("TENANT_ID", "other")
        .assert()
        .success()
        .stdout(predicate::str::contains("/other/system/oauth2/token"));
}

#[test]
fn test_check_config_warns_when_tls_verification_disabled() {
    let (_dir, path) = temp_config_file(VALID_CONFIG);

    consent_page()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .env("CONSENT_PAGE_INSECURE_SKIP_TLS_VERIFY", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("TLS certificate verification is disabled"));
}

#[test]
fn test_check_config_fails_without_tenant() {
    let (_dir, path) = temp_config_file(
        r#"
authorization_server:
  issuer_url: "https://acp.example.com/acme/system"
  client_id: "consent-page"
  client_secret: "s3cret"
"#,
    );

    consent_page()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("authorization_server.tenant_id is required"));
}

#[test]
fn test_check_config_fails_on_invalid_issuer_url() {
    let (_dir, path) = temp_config_file(
        r#"
authorization_server:
  tenant_id: "acme"
  issuer_url: "not a url"
  client_id: "consent-page"
  client_secret: "s3cret"
"#,
    );

    consent_page()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("issuer_url"));
}
