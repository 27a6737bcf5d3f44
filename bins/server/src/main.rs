//! Fiscus API Server
//!
//! Main entry point for the Fiscus calculation service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiscus_api::{AppState, create_router};
use fiscus_core::{CalculatorService, InssPolicy};
use fiscus_db::connect;
use fiscus_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiscus=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let inss_policy: InssPolicy = config
        .calculator
        .inss_policy
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid calculator.inss_policy")?;
    info!(%inss_policy, "Calculator configured");

    // History is optional; without a database the service runs stateless.
    let db = match &config.database {
        Some(database) => {
            let db = connect(database).await?;
            info!("Connected to database");
            Some(Arc::new(db))
        }
        None => {
            warn!("No database configured, calculation history disabled");
            None
        }
    };

    let state = AppState {
        calculator: CalculatorService::new(inss_policy),
        jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        db,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
