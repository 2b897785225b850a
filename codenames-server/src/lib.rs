//! Codenames Server - HTTP API over the simulation arena
//!
//! This crate provides the web backend:
//! - REST API for stepping a single live game
//! - Batch simulation endpoint
//! - Match reporting and leaderboard
//! - Optional static file serving for a viewer

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

use anyhow::Context;
use codenames_arena::{JsonFileStore, Leaderboard, MatchStore, MemoryStore, SimulationConfig};

pub use error::ApiError;
pub use state::{GameSession, ServerState};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for non-API paths
    pub static_dir: Option<String>,
    /// JSON match file; in-memory store when None
    pub store_path: Option<PathBuf>,
    /// Template for live games and batches
    pub simulation: SimulationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: None,
            store_path: None,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Leaderboard and match reporting
        .route(
            "/api/stats",
            get(routes::stats::get_stats).post(routes::stats::post_match),
        )
        // Live game API
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/start", post(routes::game::start_game))
        .route("/api/game/step", post(routes::game::step_game))
        // Batch simulation
        .route("/api/simulate", post(routes::simulate::simulate))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Static file serving (must be last)
    match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Build the match store named by the config
pub fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn MatchStore>> {
    match &config.store_path {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .with_context(|| format!("Failed to open match store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let leaderboard = Leaderboard::new(open_store(&config)?);
    let state = Arc::new(ServerState::new(leaderboard, config.simulation.clone()));
    let router = create_router(&config, state);

    tracing::info!("Codenames server starting on http://0.0.0.0:{}", config.port);
    match &config.store_path {
        Some(path) => tracing::info!("Match store: {}", path.display()),
        None => tracing::info!("Match store: in-memory"),
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static files served from: {}", dir);
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
