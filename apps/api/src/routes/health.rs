use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and relay mode.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let mail_relay = if state.mailer.is_some() {
        "configured"
    } else {
        "disabled"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "contact-api",
        "mail_relay": mail_relay
    }))
}
