//! HTTP API handlers for castdir-api

pub mod actors;
pub mod health;
pub mod statistics;

use axum::http::{header, HeaderMap};

use crate::AppState;

pub use actors::{create_actor, delete_actor, get_actor, list_actors, update_actor};
pub use health::health_routes;
pub use statistics::actor_statistics;

/// Base URL for hypermedia links: the request's Host, else the configured URL
pub(crate) fn base_url(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(|host| format!("http://{}", host))
        .unwrap_or_else(|| state.public_base_url.clone())
}
