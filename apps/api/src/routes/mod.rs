pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::contact::handlers;
use crate::state::AppState;

/// Upper bound on a contact form body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/contact",
            post(handlers::handle_contact).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

/// Restricts cross-origin posts to `ALLOWED_ORIGIN` when set; any origin otherwise.
pub fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = &config.allowed_origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("ALLOWED_ORIGIN '{origin}' is not a valid origin"))?;

    // Non-matching origins get no Allow-Origin header at all.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
