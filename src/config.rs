//! Configuration management for the consent page
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! It also derives the authorization-server credentials once at startup.

use std::fmt;
use std::path::Path;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConsentError, ConsentResult, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Authorization server (ACP) connection settings
    #[serde(default)]
    pub authorization_server: AuthorizationServerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// How long a consent session stays valid after `/consent` (seconds)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,

    /// Set the `Secure` flag on the session cookie
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Append the upstream cause text to the rendered error page
    #[serde(default)]
    pub expose_error_details: bool,
}

fn default_bind_address() -> String {
    "0.0.0.0:4001".to_string()
}

fn default_session_ttl() -> u64 {
    600
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            session_ttl_seconds: default_session_ttl(),
            secure_cookies: default_secure_cookies(),
            expose_error_details: false,
        }
    }
}

/// Authorization server connection configuration
///
/// The four identity values have no defaults; [`Config::validate`] rejects
/// a configuration where any of them is empty.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationServerConfig {
    /// ACP tenant identifier
    #[serde(default)]
    pub tenant_id: String,

    /// Issuer URL of the workspace; only its origin is used
    #[serde(default)]
    pub issuer_url: String,

    /// Client id of the custom consent page system application
    #[serde(default)]
    pub client_id: String,

    /// Client secret of the custom consent page system application
    #[serde(default)]
    pub client_secret: String,

    /// Timeout applied to every outbound request (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Accept invalid TLS certificates (self-signed development setups only)
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

fn default_timeout() -> u64 {
    10
}

impl Default for AuthorizationServerConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            issuer_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_seconds: default_timeout(),
            insecure_skip_tls_verify: false,
        }
    }
}

impl fmt::Debug for AuthorizationServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationServerConfig")
            .field("tenant_id", &self.tenant_id)
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .finish()
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: deployments may supply everything
    /// through the environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using environment only", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConsentError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ConsentError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        let acp = &mut self.authorization_server;

        if let Ok(tenant_id) = std::env::var("TENANT_ID") {
            acp.tenant_id = tenant_id;
        }

        if let Ok(issuer_url) = std::env::var("AUTHORIZATION_SERVER_URL") {
            acp.issuer_url = issuer_url;
        }

        if let Ok(client_id) = std::env::var("CLIENT_ID") {
            acp.client_id = client_id;
        }

        if let Ok(client_secret) = std::env::var("CLIENT_SECRET") {
            acp.client_secret = client_secret;
        }

        if let Ok(timeout) = std::env::var("CONSENT_PAGE_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => acp.timeout_seconds = v,
                Err(_) => tracing::warn!("Invalid CONSENT_PAGE_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(skip) = std::env::var("CONSENT_PAGE_INSECURE_SKIP_TLS_VERIFY") {
            match skip.parse::<bool>() {
                Ok(v) => acp.insecure_skip_tls_verify = v,
                Err(_) => {
                    tracing::warn!("Invalid CONSENT_PAGE_INSECURE_SKIP_TLS_VERIFY: {}", skip)
                }
            }
        }

        // Server overrides
        if let Ok(bind) = std::env::var("CONSENT_PAGE_BIND_ADDRESS") {
            self.server.bind_address = bind;
        }

        if let Ok(ttl) = std::env::var("CONSENT_PAGE_SESSION_TTL_SECONDS") {
            match ttl.parse::<u64>() {
                Ok(v) => self.server.session_ttl_seconds = v,
                Err(_) => tracing::warn!("Invalid CONSENT_PAGE_SESSION_TTL_SECONDS: {}", ttl),
            }
        }

        if let Ok(secure) = std::env::var("CONSENT_PAGE_SECURE_COOKIES") {
            match secure.parse::<bool>() {
                Ok(v) => self.server.secure_cookies = v,
                Err(_) => tracing::warn!("Invalid CONSENT_PAGE_SECURE_COOKIES: {}", secure),
            }
        }

        if let Ok(expose) = std::env::var("CONSENT_PAGE_EXPOSE_ERROR_DETAILS") {
            match expose.parse::<bool>() {
                Ok(v) => self.server.expose_error_details = v,
                Err(_) => tracing::warn!("Invalid CONSENT_PAGE_EXPOSE_ERROR_DETAILS: {}", expose),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let crate::cli::Commands::Serve {
            bind: Some(bind), ..
        } = &cli.command
        {
            self.server.bind_address = bind.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if a required authorization-server value is missing,
    /// the issuer URL is not an absolute URL with a host, or a numeric
    /// setting is zero.
    pub fn validate(&self) -> Result<()> {
        let acp = &self.authorization_server;

        let required = [
            ("authorization_server.tenant_id", &acp.tenant_id),
            ("authorization_server.issuer_url", &acp.issuer_url),
            ("authorization_server.client_id", &acp.client_id),
            ("authorization_server.client_secret", &acp.client_secret),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConsentError::Config(format!("{} is required", key)).into());
            }
        }

        let issuer = Url::parse(&acp.issuer_url).map_err(|e| {
            ConsentError::Config(format!(
                "authorization_server.issuer_url is not a valid URL: {}",
                e
            ))
        })?;
        if issuer.host_str().is_none() {
            return Err(ConsentError::Config(
                "authorization_server.issuer_url must include a host".to_string(),
            )
            .into());
        }

        if acp.timeout_seconds == 0 {
            return Err(ConsentError::Config(
                "authorization_server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.session_ttl_seconds == 0 {
            return Err(ConsentError::Config(
                "server.session_ttl_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

/// Values derived once from [`AuthorizationServerConfig`] at startup.
#[derive(Clone)]
pub struct Credentials {
    /// Tenant identifier used in every API path
    pub tenant_id: String,
    /// `scheme://host[:port]` of the issuer URL, no trailing slash
    pub origin: String,
    /// `base64(client_id:client_secret)`
    pub basic_auth: String,
}

impl Credentials {
    /// Derives the origin and Basic credential from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Config`] if the issuer URL does not parse or
    /// has an opaque origin.
    pub fn from_config(config: &AuthorizationServerConfig) -> ConsentResult<Self> {
        let issuer = Url::parse(&config.issuer_url).map_err(|e| {
            ConsentError::Config(format!(
                "authorization_server.issuer_url is not a valid URL: {}",
                e
            ))
        })?;

        let origin = issuer.origin();
        if !origin.is_tuple() {
            return Err(ConsentError::Config(format!(
                "authorization_server.issuer_url has no usable origin: {}",
                config.issuer_url
            )));
        }

        let basic_auth = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", config.client_id, config.client_secret));

        Ok(Self {
            tenant_id: config.tenant_id.clone(),
            origin: origin.ascii_serialization(),
            basic_auth,
        })
    }

    /// `{origin}/{tenant_id}/system/oauth2/token`
    pub fn token_url(&self) -> String {
        format!("{}/{}/system/oauth2/token", self.origin, self.tenant_id)
    }

    /// `{origin}/api/system/{tenant_id}/scope-grants/{login_id}`
    pub fn scope_grant_url(&self, login_id: &str) -> String {
        format!(
            "{}/api/system/{}/scope-grants/{}",
            self.origin,
            self.tenant_id,
            urlencode_segment(login_id)
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("origin", &self.origin)
            .field("basic_auth", &"<redacted>")
            .finish()
    }
}

/// Percent-encodes a single path segment.
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
