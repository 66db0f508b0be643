//! Bountyboard REST backend — entry point.
//!
//! Wires the SQLite pool, the token price client, and the notification
//! webhook into an Axum router serving the sponsor-dashboard and listing
//! endpoints.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bountyboard_api::api::{self, AppState};
use bountyboard_api::config::Config;
use bountyboard_api::db;
use bountyboard_api::price::HttpPriceSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Load config from environment.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    // HTTP client shared by the price lookups and notification dispatch.
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let state = Arc::new(AppState {
        pool,
        price: Arc::new(HttpPriceSource::new(client.clone(), config.price_api_url)),
        http: client,
        notify_webhook_url: config.notify_webhook_url,
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/listings", post(api::create_listing))
        .route("/grants", get(api::list_grants))
        .route("/grantApplication/updateLabel", post(api::update_label))
        .route(
            "/sponsor-dashboard/listings",
            get(api::sponsor_dashboard_listings),
        )
        .route(
            "/sponsor-dashboard/grants/update-application-status",
            post(api::update_application_status),
        )
        .route(
            "/sponsor-dashboard/grants/add-payment",
            get(api::add_payment),
        )
        .route(
            "/sponsor-dashboard/submission/toggle-winner",
            post(api::toggle_winner),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
