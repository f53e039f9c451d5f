//! HTTP server entry point and Axum router setup.
//!
//! Loads the configuration, seeds the in-memory plant list, and serves the
//! mock controller API plus the static frontend on port 4000 by default.

mod dto;
mod error;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use sprinkle_config::ServerConfig;
use sprinkle_core::PlantStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub plants: RwLock<PlantStore>,
}

impl ServerState {
    pub fn new(plants: PlantStore) -> Self {
        Self {
            plants: RwLock::new(plants),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let store = config.initial_store()?;

    info!("Loaded {} plants", store.len());
    for (i, p) in store.plants().iter().enumerate() {
        info!(
            "  - [{}] {} ({} oz every {} min)",
            i, p.name, p.oz_per_watering, p.interval_minutes
        );
    }

    let state = Arc::new(ServerState::new(store));
    let app = build_router(state, &config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mock plant controller running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the full application router: API, static files, CORS and request tracing.
///
/// `OPTIONS` requests on any path are answered by the CORS layer with an empty 200.
pub fn build_router(state: Arc<ServerState>, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let api = Router::new()
        .route("/plants", get(handlers::plants::list))
        .route("/plants/{index}/amount", put(handlers::plants::update_amount))
        .route("/plants/{index}/interval", put(handlers::plants::update_interval))
        .route("/plants/{index}/water-now", post(handlers::plants::water_now))
        .route("/plants/{index}/name", put(handlers::plants::rename))
        .route("/plants/{index}/history", delete(handlers::plants::reset_history))
        .fallback(handlers::unknown_api);

    let logged_routes = Router::new()
        .nest("/api", api)
        .route_service("/", ServeFile::new(config.homepage()))
        .fallback_service(ServeDir::new(&config.data_dir))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
