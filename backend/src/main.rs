//! Part Total Price - Backend Server
//!
//! Serves per-part purchase cost and stock aggregates, read from the host
//! inventory database, to the host's UI as plugin panels.

use axum::{routing::get, Router};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

pub use crate::config::Config;

use crate::config::DatabaseConfig;
use crate::models::PLUGIN;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ptp_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!(
        plugin = PLUGIN.name,
        version = PLUGIN.version,
        environment = %config.environment,
        static_url = %config.plugin.static_url,
        "Starting plugin server"
    );

    let db = connect_host_db(&config.database).await?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let app = create_app(AppState {
        db,
        config: Arc::new(config),
    });

    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pool against the host database. The schema is the host's; nothing is migrated.
async fn connect_host_db(database: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database.url)
        .await?;

    tracing::info!(
        max_connections = database.max_connections,
        "Host database connection established"
    );
    Ok(pool)
}

/// Router with liveness routes, the versioned API and HTTP middleware
fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn root() -> String {
    format!("{} plugin API v{}", PLUGIN.title, PLUGIN.version)
}
