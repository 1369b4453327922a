//! HTTP server for the Technician Pay Distribution Engine.
//!
//! ```sh
//! tech-pay-engine --config ./config/default --bind 127.0.0.1:8080
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tech_pay_engine::api::{AppState, create_router};
use tech_pay_engine::config::ConfigLoader;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "tech-pay-engine")]
#[command(about = "Technician pay distribution engine")]
struct Args {
    /// Configuration directory containing engine.yaml and mileage_rates/.
    #[arg(short, long, default_value = "./config/default", env = "PAY_ENGINE_CONFIG")]
    config: String,

    /// Address for the HTTP server to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080", env = "PAY_ENGINE_BIND")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let loader = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config))?;
    info!(
        config = %args.config,
        name = %loader.metadata().name,
        version = %loader.metadata().version,
        mileage_rates = loader.mileage_rates().rates().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(bind = %args.bind, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
