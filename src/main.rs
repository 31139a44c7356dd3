//! Consent page - custom consent intermediary for Cloudentity ACP
//!
#![doc = "Main entry point for the consent page server."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use consent_page::cli::{Cli, Commands};
use consent_page::config::{Config, Credentials};
use consent_page::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration; refuse to serve on anything missing
    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting consent page server");
            server::serve(config).await
        }
        Commands::CheckConfig => {
            let credentials = Credentials::from_config(&config.authorization_server)?;
            println!("configuration ok");
            println!("tenant:         {}", credentials.tenant_id);
            println!("origin:         {}", credentials.origin);
            println!("token endpoint: {}", credentials.token_url());
            println!("listen address: {}", config.server.bind_address);
            if config.authorization_server.insecure_skip_tls_verify {
                println!("warning: TLS certificate verification is disabled");
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "consent_page=debug,tower_http=debug"
    } else {
        "consent_page=info,tower_http=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
