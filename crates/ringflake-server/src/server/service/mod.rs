//! HTTP surface of the shortener.
//!
//! - [`handler`] - request handlers for `/ping`, `/node`, `/newurl` and the
//!   redirect route.
//!
//! [`AppState`] carries everything the handlers share. It is built once in
//! `main` after the node identity is known.

pub mod handler;

use std::sync::Arc;

use axum::{Router, routing::{get, post}};
use ringflake::{LockSnowflakeGenerator, NodeIdentity, SystemClock};
use tower_http::trace::TraceLayer;

use super::{cache::ExpiringLruCache, store::UrlStore};

/// Generator shared by all requests of this process.
pub type Generator = LockSnowflakeGenerator<SystemClock>;

/// Redirect cache, short key to target URL.
pub type RedirectCache = ExpiringLruCache<String, String>;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    pub store: Arc<dyn UrlStore>,
    pub cache: Arc<RedirectCache>,
    pub url_domain: Arc<str>,
    pub short_id_width: usize,
}

impl AppState {
    pub fn node(&self) -> NodeIdentity {
        self.generator.node()
    }
}

/// Builds the router. Health and peer-protocol routes are left out of the
/// request log.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/newurl", post(handler::new_url))
        .route("/{key}", get(handler::redirect))
        .layer(TraceLayer::new_for_http())
        .route("/ping", get(handler::ping))
        .route(ringflake::NODE_PATH, get(handler::node))
        .with_state(state)
}
