//! Kendra API Server
//!
//! Main entry point for the Kendra backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kendra_api::{AppState, create_router};
use kendra_core::report::{ReportService, ReportSettings};
use kendra_db::{HierarchyRepository, SectionRepository, connect};
use kendra_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kendra=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    });

    // Create report service over the store repositories
    let timezone: chrono_tz::Tz = config
        .report
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid report timezone: {e}"))?;
    let settings = ReportSettings {
        max_concurrent_fetches: config.report.max_concurrent_fetches,
        timezone,
    };
    let reports = ReportService::new(
        Arc::new(HierarchyRepository::new(db.clone())),
        Arc::new(SectionRepository::new(db)),
        &settings,
    );
    info!(
        max_concurrent_fetches = settings.max_concurrent_fetches,
        timezone = %settings.timezone,
        "Report engine configured"
    );

    // Create application state
    let state = AppState {
        jwt_service: Arc::new(jwt_service),
        reports: Arc::new(reports),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
