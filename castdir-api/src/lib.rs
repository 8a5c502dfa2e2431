//! castdir-api library - actor directory service
//!
//! Imports actors from the TVmaze people directory, stores them in SQLite and
//! serves listing, partial update and statistics endpoints.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod names;
pub mod pagination;
pub mod projection;
pub mod query;
pub mod services;
pub mod stats;

use services::PeopleDirectory;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Upstream people directory
    pub directory: Arc<dyn PeopleDirectory>,
    /// Base URL for links when a request has no Host header
    pub public_base_url: String,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        directory: Arc<dyn PeopleDirectory>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            directory,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/actors", get(api::list_actors).post(api::create_actor))
        .route("/actors/statistics", get(api::actor_statistics))
        .route(
            "/actors/:id",
            get(api::get_actor)
                .delete(api::delete_actor)
                .patch(api::update_actor),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
