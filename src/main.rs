//! Obra Catalog - Application entry point
//!
//! CLI-based entry point that dispatches to various commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use obra_catalog::{
    cli::{Cli, Commands},
    commands,
    config::{Config, ENV_PRODUCTION},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Loaded before tracing so APP_ENV from .env picks the log format
    dotenvy::dotenv().ok();
    let production = std::env::var("APP_ENV").is_ok_and(|env| env == ENV_PRODUCTION);
    init_tracing(cli.verbose, production);

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Admin(args) => commands::admin::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, detail = %e.internal_detail(), "Command failed");
        std::process::exit(1);
    }
}

/// JSON lines in production, human-readable output elsewhere.
fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
