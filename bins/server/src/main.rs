//! Chart of accounts builder API server.
//!
//! Main entry point for the chart builder backend service.
//!
//! The server only verifies bearer tokens; it does not issue them. Tokens are
//! HS256-signed with `jwt.secret` and carry the user login as `sub`. For local
//! work, `seeder --token <user>` prints one.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coa_api::{AppState, create_router};
use coa_core::chart::{ChartExporter, ChartService, ChartSession, MokaStateStore};
use coa_db::{PostgresBackend, connect_with_pool};
use coa_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coa_api=debug,coa_core=debug,coa_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_secs: i64::try_from(config.jwt.token_expiry_secs)
            .context("jwt.token_expiry_secs out of range")?,
    });

    let session = ChartSession::new(Arc::new(MokaStateStore::with_config(
        config.cache.max_capacity,
        config.cache.time_to_idle_secs,
    )));
    let exporter = ChartExporter::new(&config.export.site_root);
    info!(export_dir = %exporter.dir().display(), "Chart export configured");

    let service = ChartService::new(PostgresBackend::new(db), session, exporter);
    let app = create_router(AppState::new(service, jwt_service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
